//! The user's recorded movies, theaters and showtimes.
//!
//! A [`Library`] is the shell around the planner: it holds the collections
//! the user edits and the settings they last planned with. [`LibraryStore`]
//! keeps one on disk.

mod error;
mod store;

use serde::{Deserialize, Serialize};

use crate::domain::{EventEntry, EventId, Movie, MovieId, Theater, TheaterId};
use crate::planner::PlannerSettings;

pub use error::{LibraryError, StoreError};
pub use store::{DEFAULT_KEY, LibraryStore, StoreConfig};

/// Movies, theaters, showtimes and saved planner settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub theaters: Vec<Theater>,
    #[serde(default)]
    pub events: Vec<EventEntry>,
    #[serde(default)]
    pub settings: PlannerSettings,
}

impl Library {
    pub fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| &m.id == id)
    }

    pub fn theater(&self, id: &TheaterId) -> Option<&Theater> {
        self.theaters.iter().find(|t| &t.id == id)
    }

    pub fn event(&self, id: &EventId) -> Option<&EventEntry> {
        self.events.iter().find(|e| &e.id == id)
    }

    /// Insert a movie, or replace the one with the same id.
    pub fn upsert_movie(&mut self, movie: Movie) -> Result<(), LibraryError> {
        if movie.id.as_str().trim().is_empty() {
            return Err(LibraryError::EmptyId);
        }
        if movie.title.trim().is_empty() {
            return Err(LibraryError::EmptyTitle);
        }
        if movie.runtime_mins == 0 {
            return Err(LibraryError::ZeroRuntime);
        }
        if movie.rank == Some(0) {
            return Err(LibraryError::InvalidRank);
        }

        match self.movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => *existing = movie,
            None => self.movies.push(movie),
        }
        Ok(())
    }

    /// Remove a movie.
    ///
    /// Its showtimes stay in the library; the planner skips them until the
    /// movie is added back or they are deleted.
    pub fn remove_movie(&mut self, id: &MovieId) -> Result<Movie, LibraryError> {
        let pos = self
            .movies
            .iter()
            .position(|m| &m.id == id)
            .ok_or_else(|| LibraryError::UnknownMovie(id.clone()))?;
        Ok(self.movies.remove(pos))
    }

    /// Insert a theater, or replace the one with the same id.
    pub fn upsert_theater(&mut self, theater: Theater) -> Result<(), LibraryError> {
        if theater.id.as_str().trim().is_empty() {
            return Err(LibraryError::EmptyId);
        }
        if theater.name.trim().is_empty() {
            return Err(LibraryError::EmptyName);
        }

        match self.theaters.iter_mut().find(|t| t.id == theater.id) {
            Some(existing) => *existing = theater,
            None => self.theaters.push(theater),
        }
        Ok(())
    }

    /// Remove a theater together with every showtime recorded there.
    pub fn remove_theater(&mut self, id: &TheaterId) -> Result<Theater, LibraryError> {
        let pos = self
            .theaters
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| LibraryError::UnknownTheater(id.clone()))?;
        self.events.retain(|e| &e.theater_id != id);
        Ok(self.theaters.remove(pos))
    }

    /// Insert a showtime, or replace the one with the same id.
    ///
    /// The movie and theater must exist. The start text is stored as given.
    pub fn upsert_event(&mut self, event: EventEntry) -> Result<(), LibraryError> {
        if event.id.as_str().trim().is_empty() {
            return Err(LibraryError::EmptyId);
        }
        if self.movie(&event.movie_id).is_none() {
            return Err(LibraryError::UnknownMovie(event.movie_id));
        }
        if self.theater(&event.theater_id).is_none() {
            return Err(LibraryError::UnknownTheater(event.theater_id));
        }

        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
        Ok(())
    }

    pub fn remove_event(&mut self, id: &EventId) -> Result<EventEntry, LibraryError> {
        let pos = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| LibraryError::UnknownEvent(id.clone()))?;
        Ok(self.events.remove(pos))
    }

    pub fn set_settings(&mut self, settings: PlannerSettings) {
        self.settings = settings;
    }

    /// Showtimes the planner will skip: unknown movie or unparsable start.
    pub fn unplannable_events(&self) -> impl Iterator<Item = &EventEntry> {
        self.events
            .iter()
            .filter(|e| self.movie(&e.movie_id).is_none() || e.start_time().is_err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Library {
        let mut library = Library::default();
        library.upsert_movie(Movie::new("m1", "Jaws", 124)).unwrap();
        library.upsert_theater(Theater::new("t1", "Roxy")).unwrap();
        library.upsert_theater(Theater::new("t2", "Plaza")).unwrap();
        library
            .upsert_event(EventEntry::new("e1", "m1", "t1", "2024-03-15T19:00"))
            .unwrap();
        library
            .upsert_event(EventEntry::new("e2", "m1", "t2", "2024-03-15T21:00"))
            .unwrap();
        library
    }

    #[test]
    fn upsert_replaces_by_id() {
        let mut library = library();
        library
            .upsert_movie(Movie::new("m1", "Jaws", 124).with_rank(1))
            .unwrap();

        assert_eq!(library.movies.len(), 1);
        assert_eq!(library.movie(&MovieId::new("m1")).unwrap().rank, Some(1));
    }

    #[test]
    fn movie_validation() {
        let mut library = Library::default();

        assert_eq!(
            library.upsert_movie(Movie::new("", "Untitled", 90)),
            Err(LibraryError::EmptyId)
        );
        assert_eq!(
            library.upsert_movie(Movie::new("m1", "  ", 90)),
            Err(LibraryError::EmptyTitle)
        );
        assert_eq!(
            library.upsert_movie(Movie::new("m1", "Short", 0)),
            Err(LibraryError::ZeroRuntime)
        );
        assert_eq!(
            library.upsert_movie(Movie::new("m1", "Zero", 90).with_rank(0)),
            Err(LibraryError::InvalidRank)
        );
        assert!(library.movies.is_empty());
    }

    #[test]
    fn event_requires_known_references() {
        let mut library = library();

        assert_eq!(
            library.upsert_event(EventEntry::new("e3", "nope", "t1", "2024-03-15T10:00")),
            Err(LibraryError::UnknownMovie(MovieId::new("nope")))
        );
        assert_eq!(
            library.upsert_event(EventEntry::new("e3", "m1", "nope", "2024-03-15T10:00")),
            Err(LibraryError::UnknownTheater(TheaterId::new("nope")))
        );
    }

    #[test]
    fn event_start_is_stored_verbatim() {
        let mut library = library();
        library
            .upsert_event(EventEntry::new("e3", "m1", "t1", "sometime"))
            .unwrap();

        let flagged: Vec<&str> = library.unplannable_events().map(|e| e.id.as_str()).collect();
        assert_eq!(flagged, vec!["e3"]);
    }

    #[test]
    fn event_lookup_by_id() {
        let library = library();

        assert_eq!(
            library.event(&EventId::new("e2")).map(|e| e.theater_id.as_str()),
            Some("t2")
        );
        assert!(library.event(&EventId::new("e9")).is_none());
    }

    #[test]
    fn removing_movie_leaves_events_dangling() {
        let mut library = library();
        let removed = library.remove_movie(&MovieId::new("m1")).unwrap();

        assert_eq!(removed.title, "Jaws");
        assert_eq!(library.events.len(), 2);
        assert_eq!(library.unplannable_events().count(), 2);
    }

    #[test]
    fn removing_theater_removes_its_events() {
        let mut library = library();
        library.remove_theater(&TheaterId::new("t1")).unwrap();

        assert_eq!(library.theaters.len(), 1);
        let remaining: Vec<&str> = library.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(remaining, vec!["e2"]);
    }

    #[test]
    fn removing_unknown_ids_fails() {
        let mut library = library();

        assert_eq!(
            library.remove_movie(&MovieId::new("x")),
            Err(LibraryError::UnknownMovie(MovieId::new("x")))
        );
        assert_eq!(
            library.remove_theater(&TheaterId::new("x")),
            Err(LibraryError::UnknownTheater(TheaterId::new("x")))
        );
        assert_eq!(
            library.remove_event(&EventId::new("x")),
            Err(LibraryError::UnknownEvent(EventId::new("x")))
        );
        assert!(library.remove_event(&EventId::new("e1")).is_ok());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let library: Library = serde_json::from_str("{}").unwrap();
        assert_eq!(library, Library::default());
    }
}
