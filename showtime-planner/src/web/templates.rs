//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::ShowTime;
use crate::library::Library;
use crate::planner::{Itinerary, PlannerSettings, TransitionRule};

use super::dto::{Names, showing_gaps};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page: the library and the planning form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub movies: Vec<MovieView>,
    pub theaters: Vec<TheaterView>,
    pub events: Vec<EventView>,
    pub settings: SettingsView,
}

impl IndexTemplate {
    pub fn from_library(library: &Library) -> Self {
        let names = Names::new(&library.movies, &library.theaters);

        let movies = library
            .movies
            .iter()
            .map(|m| MovieView {
                id: m.id.to_string(),
                title: m.title.clone(),
                runtime_mins: m.runtime_mins,
                rank: m.rank.map(|r| r.to_string()).unwrap_or_default(),
            })
            .collect();

        let theaters = library
            .theaters
            .iter()
            .map(|t| TheaterView {
                id: t.id.to_string(),
                name: t.name.clone(),
            })
            .collect();

        let mut events: Vec<EventView> = library
            .events
            .iter()
            .map(|e| {
                let start = e.start_time().ok();
                EventView {
                    id: e.id.to_string(),
                    title: names.title(&e.movie_id),
                    theater: names.theater(&e.theater_id),
                    start: start.map(|t| format_when(&t)).unwrap_or_else(|| e.start.clone()),
                    plannable: start.is_some() && library.movie(&e.movie_id).is_some(),
                    sort_key: start,
                }
            })
            .collect();
        // Unparsable starts sort first so they're easy to spot.
        events.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));

        Self {
            movies,
            theaters,
            events,
            settings: SettingsView::from_settings(&library.settings),
        }
    }

    /// Count of showtimes the planner will skip.
    pub fn unplannable_count(&self) -> usize {
        self.events.iter().filter(|e| !e.plannable).count()
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Itinerary results fragment.
#[derive(Template)]
#[template(path = "itinerary_results.html")]
pub struct ItineraryResultsTemplate {
    pub itineraries: Vec<ItineraryView>,
    pub dropped: usize,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

#[derive(Debug, Clone)]
pub struct MovieView {
    pub id: String,
    pub title: String,
    pub runtime_mins: u32,
    /// Empty when unranked
    pub rank: String,
}

#[derive(Debug, Clone)]
pub struct TheaterView {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub theater: String,
    pub start: String,
    pub plannable: bool,
    sort_key: Option<ShowTime>,
}

/// Settings as shown in the planning form.
#[derive(Debug, Clone)]
pub struct SettingsView {
    pub trailer_leeway_mins: u32,
    pub travel_mins: u32,
    pub max_results: usize,
    pub beam_width: usize,
    pub finish_ordered: bool,
}

impl SettingsView {
    pub fn from_settings(settings: &PlannerSettings) -> Self {
        Self {
            trailer_leeway_mins: settings.trailer_leeway_mins,
            travel_mins: settings.travel_mins,
            max_results: settings.max_results,
            beam_width: settings.beam_width,
            finish_ordered: settings.transition_rule == TransitionRule::FinishOrdered,
        }
    }
}

/// Itinerary view model for templates.
#[derive(Debug, Clone)]
pub struct ItineraryView {
    pub showings: Vec<ShowingView>,
    pub movie_count: usize,
    pub time_range: String,
    pub duration: String,
    pub travel_mins: u32,
}

impl ItineraryView {
    pub fn from_itinerary(itinerary: &Itinerary, names: &Names<'_>, settings: &PlannerSettings) -> Self {
        let showings = itinerary
            .instances()
            .iter()
            .zip(showing_gaps(itinerary, settings))
            .map(|(instance, (travel_mins, slack_mins))| ShowingView {
                title: names.title(&instance.movie_id),
                theater: names.theater(&instance.theater_id),
                day: instance.start.day_label(),
                start: instance.start.clock(),
                end: instance.end.clock(),
                travel_mins,
                note: slack_mins.map(describe_slack),
            })
            .collect();

        Self {
            showings,
            movie_count: itinerary.movie_count(),
            time_range: format!(
                "{} – {}",
                format_when(&itinerary.start()),
                itinerary.finish().clock()
            ),
            duration: format_duration(itinerary.total_duration().num_minutes()),
            travel_mins: itinerary.travel_mins(),
        }
    }
}

/// One showing within an itinerary.
#[derive(Debug, Clone)]
pub struct ShowingView {
    pub title: String,
    pub theater: String,
    pub day: String,
    pub start: String,
    pub end: String,
    pub travel_mins: u32,
    /// Arrival versus the posted start; `None` for the first showing
    pub note: Option<String>,
}

fn format_when(time: &ShowTime) -> String {
    format!("{} {}", time.day_label(), time.clock())
}

/// Format a minute count as e.g. "5h 10m".
fn format_duration(mins: i64) -> String {
    let (h, m) = (mins / 60, mins % 60);
    if h == 0 {
        format!("{m}m")
    } else if m == 0 {
        format!("{h}h")
    } else {
        format!("{h}h {m}m")
    }
}

fn describe_slack(slack: i64) -> String {
    match slack {
        0 => "arrive on time".to_string(),
        s if s > 0 => format!("{s} min to spare"),
        s => format!("{} min into trailers", -s),
    }
}
