//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{EventEntry, EventId, Movie, MovieId, Theater, TheaterId};
use crate::library::{Library, LibraryError, StoreError};
use crate::planner::{PlannerSettings, plan_itineraries};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/library", get(get_library))
        .route("/api/movies/:id", put(put_movie).delete(delete_movie))
        .route("/api/theaters/:id", put(put_theater).delete(delete_theater))
        .route("/api/events/:id", put(put_event).delete(delete_event))
        .route("/api/settings", put(put_settings))
        .route("/itineraries/plan", post(plan))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page: the library and the planning form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let library = state.store.snapshot().await;
    let html = IndexTemplate::from_library(&library)
        .render()
        .map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;
    Ok(Html(html))
}

/// The stored library, with unplannable showtimes flagged.
async fn get_library(State(state): State<AppState>) -> Json<LibraryResponse> {
    Json(LibraryResponse::from_library(state.store.snapshot().await))
}

async fn put_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<MovieInput>,
) -> Result<Json<Movie>, AppError> {
    let movie = input.into_movie(id);
    let saved = movie.clone();
    state.store.update(move |lib| lib.upsert_movie(movie)).await?;
    info!(movie = %saved.id, "saved movie");
    Ok(Json(saved))
}

/// Remove a movie. Its showtimes stay and are skipped when planning.
async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, AppError> {
    let id = MovieId::new(id);
    let removed = state.store.update(move |lib| lib.remove_movie(&id)).await?;
    info!(movie = %removed.id, "removed movie");
    Ok(Json(removed))
}

async fn put_theater(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TheaterInput>,
) -> Result<Json<Theater>, AppError> {
    let theater = Theater::new(id, input.name);
    let saved = theater.clone();
    state.store.update(move |lib| lib.upsert_theater(theater)).await?;
    info!(theater = %saved.id, "saved theater");
    Ok(Json(saved))
}

/// Remove a theater along with its showtimes.
async fn delete_theater(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Theater>, AppError> {
    let id = TheaterId::new(id);
    let removed = state.store.update(move |lib| lib.remove_theater(&id)).await?;
    info!(theater = %removed.id, "removed theater");
    Ok(Json(removed))
}

async fn put_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventEntry>, AppError> {
    let event = input.into_event(id);
    let saved = event.clone();
    let replaced = state
        .store
        .update(move |lib| {
            let replaced = lib.event(&event.id).is_some();
            lib.upsert_event(event)?;
            Ok(replaced)
        })
        .await
        // Unknown references here come from the body, not the path.
        .map_err(|e| match e {
            StoreError::Library(e) => AppError::BadRequest {
                message: e.to_string(),
            },
            e => AppError::from(e),
        })?;
    info!(event = %saved.id, replaced, "saved showtime");
    Ok(Json(saved))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventEntry>, AppError> {
    let id = EventId::new(id);
    let removed = state.store.update(move |lib| lib.remove_event(&id)).await?;
    info!(event = %removed.id, "removed showtime");
    Ok(Json(removed))
}

/// Update the saved planner settings. Missing fields keep their value.
async fn put_settings(
    State(state): State<AppState>,
    Json(dto): Json<SettingsDto>,
) -> Result<Json<PlannerSettings>, AppError> {
    let limits = state.limits;
    let saved = state
        .store
        .update(move |lib| {
            let settings = dto.clamp_into(&lib.settings, &limits);
            lib.set_settings(settings.clone());
            Ok(settings)
        })
        .await?;
    info!(?saved, "saved settings");
    Ok(Json(saved))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Plan itineraries over the stored library or one sent inline.
async fn plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    // Parse JSON manually so an empty body means "all defaults"
    let req: PlanItinerariesRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PlanItinerariesRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid plan request");
            AppError::BadRequest {
                message: format!("Invalid JSON: {e}"),
            }
        })?
    };

    let Library {
        movies,
        theaters,
        events,
        settings: saved,
    } = state.store.snapshot().await;
    let settings = req
        .settings
        .unwrap_or_default()
        .clamp_into(&saved, &state.limits);

    let (movies, theaters, events) = match req.library {
        Some(inline) => (inline.movies, inline.theaters, inline.events),
        None => (movies, theaters, events),
    };

    if events.len() > state.limits.max_events {
        return Err(AppError::BadRequest {
            message: format!(
                "Too many showtimes: {} (limit {})",
                events.len(),
                state.limits.max_events
            ),
        });
    }

    let plan_settings = settings.clone();
    let (result, movies, theaters) = tokio::task::spawn_blocking(move || {
        let result = plan_itineraries(&movies, &theaters, &events, &plan_settings);
        (result, movies, theaters)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Planner task failed: {e}"),
    })?;

    info!(
        instances = result.stats.instances,
        dropped = result.stats.dropped_unknown_movie + result.stats.dropped_bad_start,
        itineraries = result.itineraries.len(),
        "planned itineraries"
    );

    let names = Names::new(&movies, &theaters);

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = ItineraryResultsTemplate {
            itineraries: result
                .itineraries
                .iter()
                .map(|it| ItineraryView::from_itinerary(it, &names, &settings))
                .collect(),
            dropped: result.stats.dropped_unknown_movie + result.stats.dropped_bad_start,
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;

        Ok(Html(html).into_response())
    } else {
        let itineraries = result
            .itineraries
            .iter()
            .map(|it| ItineraryResult::from_itinerary(it, &names, &settings))
            .collect();

        Ok(Json(PlanItinerariesResponse {
            itineraries,
            stats: PlanStatsResult::from(&result.stats),
            settings,
        })
        .into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<LibraryError> for AppError {
    fn from(e: LibraryError) -> Self {
        if e.is_not_found() {
            AppError::NotFound {
                message: e.to_string(),
            }
        } else {
            AppError::BadRequest {
                message: e.to_string(),
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Library(e) => e.into(),
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
