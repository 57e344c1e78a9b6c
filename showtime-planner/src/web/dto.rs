//! Data transfer objects for web requests and responses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::domain::{EventEntry, Movie, MovieId, Theater, TheaterId};
use crate::library::Library;
use crate::planner::{Itinerary, PlanStats, PlannerSettings, ScheduledInstance, TransitionRule};

/// Body for creating or replacing a movie. The id comes from the path.
#[derive(Debug, Deserialize)]
pub struct MovieInput {
    pub title: String,
    pub runtime_mins: u32,
    #[serde(default)]
    pub rank: Option<u32>,
}

impl MovieInput {
    pub fn into_movie(self, id: String) -> Movie {
        Movie {
            id: MovieId::new(id),
            title: self.title,
            runtime_mins: self.runtime_mins,
            rank: self.rank,
        }
    }
}

/// Body for creating or replacing a theater.
#[derive(Debug, Deserialize)]
pub struct TheaterInput {
    pub name: String,
}

/// Body for creating or replacing a showtime.
#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub movie_id: String,
    pub theater_id: String,
    /// Local start, e.g. "2024-03-15T19:30"
    pub start: String,
}

impl EventInput {
    pub fn into_event(self, id: String) -> EventEntry {
        EventEntry::new(id, self.movie_id, self.theater_id, self.start)
    }
}

/// Planner settings as sent by a client. Missing fields keep the base
/// value they are applied to.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsDto {
    pub trailer_leeway_mins: Option<u32>,
    pub travel_mins: Option<u32>,
    pub max_results: Option<usize>,
    pub beam_width: Option<usize>,
    pub transition_rule: Option<TransitionRule>,
}

impl SettingsDto {
    /// Overlay these fields on `base`, then bound the result by `limits`.
    pub fn clamp_into(self, base: &PlannerSettings, limits: &Limits) -> PlannerSettings {
        let settings = PlannerSettings {
            trailer_leeway_mins: self.trailer_leeway_mins.unwrap_or(base.trailer_leeway_mins),
            travel_mins: self.travel_mins.unwrap_or(base.travel_mins),
            max_results: self.max_results.unwrap_or(base.max_results),
            beam_width: self.beam_width.unwrap_or(base.beam_width),
            transition_rule: self.transition_rule.unwrap_or(base.transition_rule),
        };
        limits.clamp(settings)
    }
}

/// Collections supplied inline instead of the stored library.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryInput {
    #[serde(default)]
    pub movies: Vec<Movie>,
    #[serde(default)]
    pub theaters: Vec<Theater>,
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

/// Request to plan itineraries.
#[derive(Debug, Default, Deserialize)]
pub struct PlanItinerariesRequest {
    /// Overrides for the stored settings
    #[serde(default)]
    pub settings: Option<SettingsDto>,

    /// Plan over these collections instead of the stored library
    #[serde(default)]
    pub library: Option<LibraryInput>,
}

/// The library plus the showtimes the planner will skip.
#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    #[serde(flatten)]
    pub library: Library,

    /// Ids of showtimes with an unknown movie or unparsable start
    pub unplannable_events: Vec<String>,
}

impl LibraryResponse {
    pub fn from_library(library: Library) -> Self {
        let unplannable_events = library
            .unplannable_events()
            .map(|e| e.id.to_string())
            .collect();
        Self {
            library,
            unplannable_events,
        }
    }
}

/// Resolves movie titles and theater names for display.
///
/// Falls back to the raw id when an entity is missing.
pub struct Names<'a> {
    titles: HashMap<&'a MovieId, &'a str>,
    theaters: HashMap<&'a TheaterId, &'a str>,
}

impl<'a> Names<'a> {
    pub fn new(movies: &'a [Movie], theaters: &'a [Theater]) -> Self {
        let mut titles = HashMap::with_capacity(movies.len());
        for movie in movies {
            titles.entry(&movie.id).or_insert(movie.title.as_str());
        }
        let mut names = HashMap::with_capacity(theaters.len());
        for theater in theaters {
            names.entry(&theater.id).or_insert(theater.name.as_str());
        }
        Self {
            titles,
            theaters: names,
        }
    }

    pub fn title(&self, id: &MovieId) -> String {
        self.titles
            .get(id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn theater(&self, id: &TheaterId) -> String {
        self.theaters
            .get(id)
            .map(|t| t.to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

/// An itinerary option.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub showings: Vec<ShowingResult>,

    /// Start of the first showing
    pub start: String,

    /// End of the last showing
    pub finish: String,

    pub movie_count: usize,
    pub score: i64,
    pub travel_mins: u32,

    /// First start to last finish, in minutes
    pub duration_mins: i64,
}

/// One showing within an itinerary.
#[derive(Debug, Serialize)]
pub struct ShowingResult {
    pub event_id: String,
    pub movie_id: String,
    pub title: String,
    pub theater_id: String,
    pub theater: String,
    pub start: String,
    pub end: String,

    /// Travel before this showing (0 for the first showing)
    pub travel_mins_before: u32,

    /// Minutes between arriving and the posted start. Negative when the
    /// arrival falls inside the trailer leeway. `None` for the first showing.
    pub slack_mins: Option<i64>,
}

/// Travel and slack before each showing of `itinerary`.
///
/// The first showing has no travel and no slack.
pub(crate) fn showing_gaps(itinerary: &Itinerary, settings: &PlannerSettings) -> Vec<(u32, Option<i64>)> {
    let mut gaps = Vec::with_capacity(itinerary.movie_count());
    let mut previous: Option<&ScheduledInstance> = None;

    for instance in itinerary.instances() {
        let gap = match previous {
            Some(prev) => {
                let travel = if prev.theater_id == instance.theater_id {
                    0
                } else {
                    settings.travel_mins
                };
                let slack = instance.start.signed_duration_since(prev.end).num_minutes()
                    - i64::from(travel);
                (travel, Some(slack))
            }
            None => (0, None),
        };
        gaps.push(gap);
        previous = Some(instance);
    }

    gaps
}

impl ItineraryResult {
    pub fn from_itinerary(itinerary: &Itinerary, names: &Names<'_>, settings: &PlannerSettings) -> Self {
        let showings = itinerary
            .instances()
            .iter()
            .zip(showing_gaps(itinerary, settings))
            .map(|(instance, (travel_mins_before, slack_mins))| ShowingResult {
                event_id: instance.event_id.to_string(),
                movie_id: instance.movie_id.to_string(),
                title: names.title(&instance.movie_id),
                theater_id: instance.theater_id.to_string(),
                theater: names.theater(&instance.theater_id),
                start: instance.start.to_string(),
                end: instance.end.to_string(),
                travel_mins_before,
                slack_mins,
            })
            .collect();

        Self {
            showings,
            start: itinerary.start().to_string(),
            finish: itinerary.finish().to_string(),
            movie_count: itinerary.movie_count(),
            score: itinerary.score(),
            travel_mins: itinerary.travel_mins(),
            duration_mins: itinerary.total_duration().num_minutes(),
        }
    }
}

/// Search counters returned with a plan.
#[derive(Debug, Serialize)]
pub struct PlanStatsResult {
    pub instances: usize,
    pub dropped_unknown_movie: usize,
    pub dropped_bad_start: usize,
    pub edges: usize,
    pub layers: usize,
    pub chains_kept: usize,
    pub distinct_chains: usize,
}

impl From<&PlanStats> for PlanStatsResult {
    fn from(stats: &PlanStats) -> Self {
        Self {
            instances: stats.instances,
            dropped_unknown_movie: stats.dropped_unknown_movie,
            dropped_bad_start: stats.dropped_bad_start,
            edges: stats.edges,
            layers: stats.layers,
            chains_kept: stats.chains_kept,
            distinct_chains: stats.distinct_chains,
        }
    }
}

/// Response for itinerary planning.
#[derive(Debug, Serialize)]
pub struct PlanItinerariesResponse {
    /// Itineraries, best first
    pub itineraries: Vec<ItineraryResult>,

    /// Settings the plan actually ran with, after clamping
    pub settings: PlannerSettings,

    pub stats: PlanStatsResult,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
