//! Web layer for the showtime planner.
//!
//! Provides HTTP endpoints for editing the library and planning itineraries.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
