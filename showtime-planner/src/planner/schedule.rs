//! Schedule building.
//!
//! Resolves raw event entries against the movie collection into
//! time-resolved instances, sorted by start. Entries that can't be resolved
//! are dropped, never reported as errors: a showtime for a deleted movie or
//! a half-typed timestamp just shrinks the candidate pool.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::{EventEntry, EventId, Movie, MovieId, ShowTime, TheaterId};

/// A showing with its end time resolved.
///
/// Besides the identities, each instance carries dense integer slots for
/// its movie, theater and event so the search can test chain membership
/// with bitsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledInstance {
    pub event_id: EventId,
    pub movie_id: MovieId,
    pub theater_id: TheaterId,
    pub start: ShowTime,
    pub end: ShowTime,

    /// The movie's preference rank at build time.
    pub rank: Option<u32>,

    pub(crate) movie_slot: u32,
    pub(crate) theater_slot: u32,
    pub(crate) event_slot: u32,
}

/// The instances for one planning run, plus what was dropped building them.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    instances: Vec<ScheduledInstance>,
    movie_slots: usize,
    event_slots: usize,
    dropped_unknown_movie: usize,
    dropped_bad_start: usize,
}

impl Schedule {
    /// Build the schedule for `events`.
    ///
    /// Output is sorted ascending by start; entries with equal starts keep
    /// their input order. When two movies share an identity the first one
    /// wins.
    pub fn build(movies: &[Movie], events: &[EventEntry]) -> Self {
        let mut movie_index: HashMap<&MovieId, (u32, &Movie)> = HashMap::with_capacity(movies.len());
        for movie in movies {
            let slot = movie_index.len() as u32;
            movie_index.entry(&movie.id).or_insert((slot, movie));
        }

        let mut theater_slots: HashMap<&TheaterId, u32> = HashMap::new();
        let mut event_slots: HashMap<&EventId, u32> = HashMap::with_capacity(events.len());
        let mut schedule = Schedule {
            movie_slots: movie_index.len(),
            ..Schedule::default()
        };

        for entry in events {
            let Some(&(movie_slot, movie)) = movie_index.get(&entry.movie_id) else {
                trace!(event = %entry.id, movie = %entry.movie_id, "dropping entry for unknown movie");
                schedule.dropped_unknown_movie += 1;
                continue;
            };

            let Some((start, end)) = entry
                .start_time()
                .ok()
                .and_then(|start| Some((start, start.checked_add(movie.runtime())?)))
            else {
                trace!(event = %entry.id, start = %entry.start, "dropping entry with unusable start");
                schedule.dropped_bad_start += 1;
                continue;
            };

            let next_theater = theater_slots.len() as u32;
            let theater_slot = *theater_slots.entry(&entry.theater_id).or_insert(next_theater);
            let next_event = event_slots.len() as u32;
            let event_slot = *event_slots.entry(&entry.id).or_insert(next_event);

            schedule.instances.push(ScheduledInstance {
                event_id: entry.id.clone(),
                movie_id: movie.id.clone(),
                theater_id: entry.theater_id.clone(),
                start,
                end,
                rank: movie.rank,
                movie_slot,
                theater_slot,
                event_slot,
            });
        }

        // Stable, so equal starts stay in arrival order.
        schedule.instances.sort_by_key(|instance| instance.start);
        schedule.event_slots = event_slots.len();

        schedule
    }

    /// The instances, ascending by start.
    pub fn instances(&self) -> &[ScheduledInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of distinct movie slots (every movie, scheduled or not).
    pub(crate) fn movie_slots(&self) -> usize {
        self.movie_slots
    }

    /// Number of distinct event slots among the surviving instances.
    pub(crate) fn event_slots(&self) -> usize {
        self.event_slots
    }

    /// Entries dropped because their movie doesn't exist.
    pub fn dropped_unknown_movie(&self) -> usize {
        self.dropped_unknown_movie
    }

    /// Entries dropped because their start couldn't be parsed.
    pub fn dropped_bad_start(&self) -> usize {
        self.dropped_bad_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies() -> Vec<Movie> {
        vec![
            Movie::new("m1", "Heat", 170).with_rank(1),
            Movie::new("m2", "Ran", 162),
        ]
    }

    #[test]
    fn resolves_end_from_runtime() {
        let events = vec![EventEntry::new("e1", "m1", "t1", "2024-03-15T18:00")];
        let schedule = Schedule::build(&movies(), &events);

        assert_eq!(schedule.len(), 1);
        let instance = &schedule.instances()[0];
        assert_eq!(instance.end.to_string(), "2024-03-15 20:50");
        assert_eq!(instance.rank, Some(1));
        assert_eq!(instance.theater_id, TheaterId::new("t1"));
    }

    #[test]
    fn sorts_by_start_keeping_input_order_for_ties() {
        let events = vec![
            EventEntry::new("late", "m1", "t1", "2024-03-15T21:00"),
            EventEntry::new("tie-a", "m2", "t1", "2024-03-15T19:00"),
            EventEntry::new("tie-b", "m1", "t2", "2024-03-15T19:00"),
            EventEntry::new("early", "m2", "t2", "2024-03-15T12:00"),
        ];
        let schedule = Schedule::build(&movies(), &events);

        let order: Vec<&str> = schedule
            .instances()
            .iter()
            .map(|i| i.event_id.as_str())
            .collect();
        assert_eq!(order, vec!["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn drops_unknown_movies_and_bad_starts() {
        let events = vec![
            EventEntry::new("e1", "m1", "t1", "2024-03-15T18:00"),
            EventEntry::new("e2", "deleted", "t1", "2024-03-15T18:00"),
            EventEntry::new("e3", "m2", "t1", "not a time"),
            EventEntry::new("e4", "m2", "t1", ""),
        ];
        let schedule = Schedule::build(&movies(), &events);

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.dropped_unknown_movie(), 1);
        assert_eq!(schedule.dropped_bad_start(), 2);
    }

    #[test]
    fn first_movie_wins_on_duplicate_identity() {
        let movies = vec![Movie::new("m1", "First", 60), Movie::new("m1", "Second", 200)];
        let events = vec![EventEntry::new("e1", "m1", "t1", "2024-03-15T10:00")];
        let schedule = Schedule::build(&movies, &events);

        assert_eq!(schedule.instances()[0].end.clock(), "11:00");
        assert_eq!(schedule.movie_slots(), 1);
    }

    #[test]
    fn duplicate_event_ids_share_a_slot() {
        let events = vec![
            EventEntry::new("e1", "m1", "t1", "2024-03-15T10:00"),
            EventEntry::new("e1", "m2", "t1", "2024-03-15T14:00"),
        ];
        let schedule = Schedule::build(&movies(), &events);

        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.event_slots(), 1);
        assert_eq!(
            schedule.instances()[0].event_slot,
            schedule.instances()[1].event_slot
        );
    }

    #[test]
    fn empty_inputs() {
        assert!(Schedule::build(&[], &[]).is_empty());
        assert!(Schedule::build(&movies(), &[]).is_empty());
    }
}
