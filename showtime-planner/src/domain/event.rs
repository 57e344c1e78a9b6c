//! Raw showtime entries.

use serde::{Deserialize, Serialize};

use super::{EventId, MovieId, ShowTime, TheaterId, TimestampError};

/// A showing of a movie at a theater, as the user recorded it.
///
/// The start is kept as the text the user entered. It is only resolved to a
/// [`ShowTime`] when planning, so an entry with a malformed timestamp can
/// still be stored, listed and corrected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: EventId,
    pub movie_id: MovieId,
    pub theater_id: TheaterId,

    /// Local wall-clock start, e.g. "2024-03-15T19:30".
    pub start: String,
}

impl EventEntry {
    pub fn new(
        id: impl Into<EventId>,
        movie_id: impl Into<MovieId>,
        theater_id: impl Into<TheaterId>,
        start: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            movie_id: movie_id.into(),
            theater_id: theater_id.into(),
            start: start.into(),
        }
    }

    /// Parse the recorded start time.
    pub fn start_time(&self) -> Result<ShowTime, TimestampError> {
        ShowTime::parse(&self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_time_parses_recorded_text() {
        let ok = EventEntry::new("e1", "m1", "t1", "2024-03-15T19:30");
        assert_eq!(ok.start_time().unwrap().clock(), "19:30");

        let bad = EventEntry::new("e2", "m1", "t1", "half seven");
        assert!(bad.start_time().is_err());
    }
}
