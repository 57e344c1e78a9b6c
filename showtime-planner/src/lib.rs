//! Movie showtime itinerary planner.
//!
//! Given the movies a person wants to see, the theaters showing them and
//! the showtimes on offer, finds sequences of showings one person can
//! actually attend, favoring the movies they ranked highest.

pub mod config;
pub mod domain;
pub mod library;
pub mod planner;
pub mod web;
