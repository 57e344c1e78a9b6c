//! Finalizing and ranking search results.
//!
//! Turns the chains the beam search kept into itineraries, removes chains
//! that were reached twice, and orders what's left best-first.

use std::collections::HashSet;

use super::beam::ChainArena;
use super::itinerary::Itinerary;
use super::schedule::ScheduledInstance;

/// Convert every chain in the arena into an itinerary, in arena order.
pub(crate) fn finalize(chains: &ChainArena, instances: &[ScheduledInstance]) -> Vec<Itinerary> {
    chains
        .nodes()
        .iter()
        .enumerate()
        .filter_map(|(idx, node)| {
            let showings = chains
                .path(idx as u32)
                .into_iter()
                .map(|i| instances[i as usize].clone())
                .collect();
            Itinerary::new(showings, node.score, node.travel_mins)
        })
        .collect()
}

/// Remove itineraries that visit the same events in the same order.
///
/// Keeps the first occurrence.
pub fn deduplicate(itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    let mut seen: HashSet<Vec<u32>> = HashSet::with_capacity(itineraries.len());

    itineraries
        .into_iter()
        .filter(|itinerary| seen.insert(itinerary.event_slots()))
        .collect()
}

/// Rank itineraries by preference.
///
/// Itineraries are ranked by:
/// 1. Preference score (higher is better)
/// 2. Number of movies (more is better)
/// 3. Finish time (earlier is better)
///
/// The sort is stable, so anything tied on all three keeps its input order.
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| {
        b.score()
            .cmp(&a.score())
            .then_with(|| b.movie_count().cmp(&a.movie_count()))
            .then_with(|| a.finish().cmp(&b.finish()))
    });

    itineraries
}
