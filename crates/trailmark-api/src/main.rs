//! Trailmark API server entry point.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use trailmark_api::error::AppError;
use trailmark_api::routes;
use trailmark_api::state::AppState;
use trailmark_core::clock::SystemClock;
use trailmark_core::repository::{
    GameRepository, GraphRepository, HintRepository, ScanRepository, SessionRepository,
    TeamRepository,
};
use trailmark_core::rng::{DeterministicRng, SystemRng};
use trailmark_store::{PgStore, schema};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);
const PRESENCE_SWEEP_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Trailmark API server");

    // Read configuration from environment.
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| AppError::Config("DATABASE_URL environment variable must be set".into()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;

    // Create database connection pool and bootstrap the schema.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    schema::ensure_schema(&pool)
        .await
        .map_err(|e| AppError::Schema(e.to_string()))?;

    // Build application state over the PostgreSQL store.
    let store = Arc::new(PgStore::new(pool));
    let rng: Arc<Mutex<dyn DeterministicRng>> = Arc::new(Mutex::new(SystemRng));
    let app_state = AppState::new(
        Arc::clone(&store) as Arc<dyn GameRepository>,
        Arc::clone(&store) as Arc<dyn GraphRepository>,
        Arc::clone(&store) as Arc<dyn TeamRepository>,
        Arc::clone(&store) as Arc<dyn ScanRepository>,
        Arc::clone(&store) as Arc<dyn HintRepository>,
        Arc::clone(&store) as Arc<dyn SessionRepository>,
        Arc::new(SystemClock),
        rng,
    );

    // Background sweeps: expired sessions and silent teams.
    {
        let sessions = Arc::clone(&app_state.sessions);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                if let Err(err) = sessions.sweep_expired().await {
                    tracing::warn!(error = %err, "session sweep failed");
                }
            }
        });
    }
    {
        let presence = Arc::clone(&app_state.presence);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PRESENCE_SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                presence.sweep();
            }
        });
    }

    // Build router.
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
