//! Preference scoring.

/// Contribution base for a ranked movie.
///
/// Unranked movies contribute nothing, so any ranked movie outscores any
/// number of unranked ones. The base only has to keep lower rank numbers
/// ahead of higher ones, which holds for every rank below it.
pub const RANKED_BASE: i64 = 1_000_000;

/// Score contribution of one movie.
///
/// Ranks at or beyond [`RANKED_BASE`] still contribute 1, so a ranked movie
/// never falls to the unranked level.
pub fn preference(rank: Option<u32>) -> i64 {
    match rank {
        None => 0,
        Some(r) => (RANKED_BASE - i64::from(r)).max(1),
    }
}
