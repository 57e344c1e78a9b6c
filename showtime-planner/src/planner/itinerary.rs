//! Finished itineraries.

use chrono::Duration;

use crate::domain::{EventId, ShowTime};

use super::schedule::ScheduledInstance;

/// A chain of showings one person can attend in order.
///
/// # Invariants
///
/// - At least one showing
/// - Showings are in non-decreasing start order
/// - No movie and no event appears twice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    instances: Vec<ScheduledInstance>,
    score: i64,
    finish: ShowTime,
    travel_mins: u32,
}

impl Itinerary {
    /// Build from a chain the search produced. Returns `None` for an empty
    /// chain.
    pub(crate) fn new(instances: Vec<ScheduledInstance>, score: i64, travel_mins: u32) -> Option<Self> {
        let finish = instances.last()?.end;
        Some(Self {
            instances,
            score,
            finish,
            travel_mins,
        })
    }

    /// The showings, in the order they are attended.
    pub fn instances(&self) -> &[ScheduledInstance] {
        &self.instances
    }

    /// Accumulated preference score.
    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn movie_count(&self) -> usize {
        self.instances.len()
    }

    /// Start of the first showing.
    pub fn start(&self) -> ShowTime {
        self.instances[0].start
    }

    /// End of the last showing.
    pub fn finish(&self) -> ShowTime {
        self.finish
    }

    /// Total minutes spent moving between theaters.
    pub fn travel_mins(&self) -> u32 {
        self.travel_mins
    }

    /// Time from the first start to the last finish.
    pub fn total_duration(&self) -> Duration {
        self.finish.signed_duration_since(self.start())
    }

    /// Event identities, in order.
    pub fn event_ids(&self) -> impl Iterator<Item = &EventId> {
        self.instances.iter().map(|i| &i.event_id)
    }

    /// Event slots, in order. Used as the dedup key.
    pub(crate) fn event_slots(&self) -> Vec<u32> {
        self.instances.iter().map(|i| i.event_slot).collect()
    }
}
