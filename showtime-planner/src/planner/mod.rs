//! Itinerary planner using beam search.
//!
//! This module implements the core planning algorithm that answers:
//! "Given these showtimes, which sequences of movies can I see in one go?"
//!
//! Planning is a pure function of its inputs. Each run builds a fresh
//! schedule, a feasibility graph over it, and a bounded beam search, then
//! ranks what the search found. Nothing is cached between runs.

mod beam;
mod config;
mod graph;
mod itinerary;
mod rank;
mod schedule;
mod score;
mod transition;


use tracing::debug;

use crate::domain::{EventEntry, Movie, Theater};

pub use config::PlannerSettings;
pub use graph::{Edge, FeasibilityGraph};
pub use itinerary::Itinerary;
pub use rank::{deduplicate, rank_itineraries};
pub use schedule::{Schedule, ScheduledInstance};
pub use score::{RANKED_BASE, preference};
pub use transition::{Transition, TransitionRule, evaluate};

use beam::BeamSearch;

/// Counters describing one planning run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Showings that survived schedule building.
    pub instances: usize,
    pub dropped_unknown_movie: usize,
    pub dropped_bad_start: usize,
    /// Feasible transitions in the graph.
    pub edges: usize,
    /// Search layers that produced a beam.
    pub layers: usize,
    /// Chains kept in some beam.
    pub chains_kept: usize,
    /// Distinct chains after deduplication.
    pub distinct_chains: usize,
}

/// Result of a planning run.
#[derive(Debug, Clone, Default)]
pub struct PlanResult {
    /// Itineraries, ranked best-first.
    pub itineraries: Vec<Itinerary>,
    pub stats: PlanStats,
}

impl PlanResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Itinerary planner.
pub struct Planner<'a> {
    settings: &'a PlannerSettings,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(settings: &'a PlannerSettings) -> Self {
        Self { settings }
    }

    /// Plan itineraries over `events`.
    ///
    /// Entries whose movie is missing or whose start can't be parsed are
    /// left out. Returns at most `max_results` itineraries.
    pub fn plan(&self, movies: &[Movie], events: &[EventEntry]) -> PlanResult {
        let settings = self.settings;
        if settings.max_results == 0 || settings.beam_width == 0 {
            return PlanResult::empty();
        }

        let schedule = Schedule::build(movies, events);
        let mut stats = PlanStats {
            instances: schedule.len(),
            dropped_unknown_movie: schedule.dropped_unknown_movie(),
            dropped_bad_start: schedule.dropped_bad_start(),
            ..PlanStats::default()
        };
        if schedule.is_empty() {
            debug!(?stats, "nothing to plan");
            return PlanResult {
                itineraries: Vec::new(),
                stats,
            };
        }

        let graph = FeasibilityGraph::build(schedule.instances(), settings);
        stats.edges = graph.edge_count();

        let outcome = BeamSearch::new(&schedule, &graph, settings.beam_width).run();
        stats.layers = outcome.layers;
        stats.chains_kept = outcome.chains.len();

        let itineraries = deduplicate(rank::finalize(&outcome.chains, schedule.instances()));
        stats.distinct_chains = itineraries.len();

        let mut itineraries = rank_itineraries(itineraries);
        itineraries.truncate(settings.max_results);

        debug!(
            instances = stats.instances,
            edges = stats.edges,
            layers = stats.layers,
            expansions = outcome.expansions,
            chains = stats.distinct_chains,
            results = itineraries.len(),
            "planning complete"
        );

        PlanResult { itineraries, stats }
    }
}

/// Plan itineraries from the full entity collections.
///
/// Theaters are not consulted: travel cost only depends on whether two
/// entries name the same theater identity. They are accepted so callers can
/// hand over their collections as-is.
pub fn plan_itineraries(
    movies: &[Movie],
    _theaters: &[Theater],
    events: &[EventEntry],
    settings: &PlannerSettings,
) -> PlanResult {
    Planner::new(settings).plan(movies, events)
}
