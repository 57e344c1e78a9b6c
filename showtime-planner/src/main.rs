use showtime_planner::config::ServerConfig;
use showtime_planner::library::LibraryStore;
use showtime_planner::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("showtime_planner=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let store = LibraryStore::open(config.store.clone())?;
    let library = store.snapshot().await;
    info!(
        path = %store.path().display(),
        key = store.key(),
        movies = library.movies.len(),
        theaters = library.theaters.len(),
        events = library.events.len(),
        "loaded library"
    );

    let state = AppState::new(store, config.limits);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Showtime Planner listening on http://{}", config.bind);
    info!("API endpoints:");
    info!("  GET    /health              - Health check");
    info!("  GET    /api/library         - Stored movies, theaters and showtimes");
    info!("  PUT    /api/movies/:id      - Save a movie (also theaters, events)");
    info!("  DELETE /api/movies/:id      - Remove a movie (also theaters, events)");
    info!("  PUT    /api/settings        - Save planner settings");
    info!("  POST   /itineraries/plan    - Plan itineraries");

    axum::serve(listener, app).await?;
    Ok(())
}
