//! Domain types for the showtime planner.
//!
//! Movies, theaters and the raw showtime entries a user records, plus the
//! wall-clock time type the planner resolves those entries into.

mod event;
mod ids;
mod movie;
mod theater;
mod time;

pub use event::EventEntry;
pub use ids::{EventId, MovieId, TheaterId};
pub use movie::Movie;
pub use theater::Theater;
pub use time::{ShowTime, TimestampError};
