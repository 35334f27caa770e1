//! # Trainerbook API
//!
//! The API crate provides the web server for the trainer appointment service.
//! It exposes slot availability, booking and per-trainer listings over HTTP.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Adapt HTTP requests to the availability engine
//! - **Middleware**: Bearer token authentication and error mapping
//! - **Config**: Environment-driven server configuration
//!
//! The scheduling rules themselves live in `trainerbook-core`; storage lives
//! in `trainerbook-db`.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr, eyre};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use trainerbook_core::{
    engine::AvailabilityEngine, policy::CivilTimePolicy, repository::AppointmentRepository,
};
use trainerbook_db::{
    create_pool,
    memory::InMemoryAppointmentRepository,
    repositories::appointment::PgAppointmentRepository,
    schema::initialize_database,
    seed::{insert_seed_appointments, read_seed_file, seed_database},
};

use crate::config::{ApiConfig, StorageBackend};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Scheduling engine bound to the configured repository
    pub engine: AvailabilityEngine,
    /// Bearer token required on appointment routes
    pub service_token: String,
}

impl ApiState {
    pub fn new(repository: Arc<dyn AppointmentRepository>, service_token: impl Into<String>) -> Self {
        Self {
            engine: AvailabilityEngine::new(CivilTimePolicy::default(), repository),
            service_token: service_token.into(),
        }
    }
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` refines the filter when set; otherwise `level` applies.
pub fn init_tracing(level: tracing::Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize tracing: {}", e))
}

/// Opens the configured appointment store, preparing schema and seed data.
pub async fn connect_repository(config: &ApiConfig) -> Result<Arc<dyn AppointmentRepository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;
            let pool = create_pool(database_url).await?;
            initialize_database(&pool).await?;
            if let Some(path) = &config.seed_file {
                seed_database(&pool, path).await?;
            }
            info!("Using PostgreSQL appointment storage");
            Ok(Arc::new(PgAppointmentRepository::new(pool)))
        }
        StorageBackend::Memory => {
            let repository = InMemoryAppointmentRepository::new();
            if let Some(path) = &config.seed_file {
                let seeds = read_seed_file(path).await?;
                let inserted = insert_seed_appointments(&repository, seeds).await?;
                info!("Seeded {} appointments from {}", inserted, path.display());
            }
            warn!("Using in-memory appointment storage; bookings are lost on restart");
            Ok(Arc::new(repository))
        }
    }
}

/// Builds the router with every route and the request tracing layer.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability and booking endpoints
        .merge(routes::appointments::routes(state.clone()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins))
}

/// Starts the API server with the provided configuration and repository
pub async fn start_server(
    config: ApiConfig,
    repository: Arc<dyn AppointmentRepository>,
) -> Result<()> {
    let state = Arc::new(ApiState::new(repository, config.service_token.clone()));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
