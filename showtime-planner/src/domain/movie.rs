//! Movie records.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::MovieId;

/// A movie the user may want to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,

    /// Running time in minutes.
    pub runtime_mins: u32,

    /// Preference rank, 1 = most wanted. `None` means unranked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl Movie {
    /// Create an unranked movie.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>, runtime_mins: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            runtime_mins,
            rank: None,
        }
    }

    /// Set the preference rank.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Returns the running time as a Duration.
    pub fn runtime(&self) -> Duration {
        Duration::minutes(i64::from(self.runtime_mins))
    }
}
