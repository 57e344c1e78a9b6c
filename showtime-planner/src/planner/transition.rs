//! Transition feasibility between two showings.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::config::PlannerSettings;
use super::schedule::ScheduledInstance;

/// Ordering guard applied before the arrival deadline is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionRule {
    /// The next showing must not start before the current one starts.
    ///
    /// Only starts are compared, so two showings that overlap on the clock
    /// pass the guard whenever the deadline arithmetic works out (leeway
    /// larger than travel). Kept as the default until a product decision
    /// says otherwise.
    #[default]
    StartOrdered,

    /// The current showing must have ended by the next one's posted start.
    FinishOrdered,
}

/// Outcome of checking one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub feasible: bool,

    /// Travel minutes applied: zero within a theater, otherwise the
    /// configured travel time.
    pub travel_mins: u32,
}

/// Decide whether a traveler finishing `from` can catch `to`.
///
/// Feasible iff the ordering guard holds and
/// `from.end + travel <= to.start + leeway`.
pub fn evaluate(
    from: &ScheduledInstance,
    to: &ScheduledInstance,
    settings: &PlannerSettings,
) -> Transition {
    let travel_mins = if from.theater_slot == to.theater_slot {
        0
    } else {
        settings.travel_mins
    };

    let ordered = match settings.transition_rule {
        TransitionRule::StartOrdered => from.start <= to.start,
        TransitionRule::FinishOrdered => from.end <= to.start,
    };

    // How late we'd walk in, measured against the posted start.
    let lateness =
        from.end.signed_duration_since(to.start) + Duration::minutes(i64::from(travel_mins));

    Transition {
        feasible: ordered && lateness <= settings.trailer_leeway(),
        travel_mins,
    }
}
