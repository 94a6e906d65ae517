//! Current-vs-previous period deltas.

use serde::Serialize;

/// Headline counts for the selected period and their change against the
/// previous period. Deltas are signed and never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub current_traffic: u64,
    pub current_visitors: u64,
    pub previous_traffic: u64,
    pub previous_visitors: u64,
    pub delta_traffic: i64,
    pub delta_visitors: i64,
}

/// Pair current counts with their deltas against the previous period.
pub fn compare(
    current_total: u64,
    current_visitors: u64,
    previous_total: u64,
    previous_visitors: u64,
) -> ComparisonResult {
    ComparisonResult {
        current_traffic: current_total,
        current_visitors,
        previous_traffic: previous_total,
        previous_visitors,
        delta_traffic: signed_difference(current_total, previous_total),
        delta_visitors: signed_difference(current_visitors, previous_visitors),
    }
}

fn signed_difference(current: u64, previous: u64) -> i64 {
    current as i64 - previous as i64
}
