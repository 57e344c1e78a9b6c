//! Planner settings.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::transition::TransitionRule;

/// The settings record for one planning run.
///
/// Values are used as given. Bounding them to something sensible is the
/// caller's job; the planner only guarantees it terminates for any input,
/// including zero results or a zero-width beam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Minutes after a posted start that a late arrival still catches the
    /// showing (the trailers).
    pub trailer_leeway_mins: u32,

    /// Minutes to get between two different theaters.
    pub travel_mins: u32,

    /// Maximum number of itineraries to return.
    pub max_results: usize,

    /// Number of partial chains kept at each search layer.
    pub beam_width: usize,

    /// Which ordering guard the transition check applies.
    #[serde(default)]
    pub transition_rule: TransitionRule,
}

impl PlannerSettings {
    /// Create settings with the default transition rule.
    pub fn new(
        trailer_leeway_mins: u32,
        travel_mins: u32,
        max_results: usize,
        beam_width: usize,
    ) -> Self {
        Self {
            trailer_leeway_mins,
            travel_mins,
            max_results,
            beam_width,
            transition_rule: TransitionRule::default(),
        }
    }

    /// Use a different transition rule.
    pub fn with_transition_rule(mut self, rule: TransitionRule) -> Self {
        self.transition_rule = rule;
        self
    }

    /// Returns the trailer leeway as a Duration.
    pub fn trailer_leeway(&self) -> Duration {
        Duration::minutes(i64::from(self.trailer_leeway_mins))
    }
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            trailer_leeway_mins: 10,
            travel_mins: 15,
            max_results: 10,
            beam_width: 50,
            transition_rule: TransitionRule::StartOrdered,
        }
    }
}
