//! # MaxVariance Web Server
//!
//! The HTTP face of the system: a JSON API over the session store and the
//! analytics engine, built on `axum`.
//!
//! `/api/health` is public. Every other route requires
//! `Authorization: Bearer <key>`.

use analytics::AnalyticsEngine;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use configuration::Settings;
use database::{SessionCache, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod error;
pub mod handlers;

pub use auth::ApiKeyAuth;
pub use error::AppError;

/// The shared application state that all handlers can access.
pub struct AppState<S> {
    pub cache: SessionCache<S>,
    pub engine: AnalyticsEngine,
    pub auth: ApiKeyAuth,
    pub started_at: Instant,
}

impl<S: SessionStore> AppState<S> {
    /// Wires a store into the cache and engine described by `settings`.
    pub fn new(settings: &Settings, store: S) -> anyhow::Result<Self> {
        Ok(Self {
            cache: SessionCache::new(store, Duration::from_secs(settings.cache.ttl_secs)),
            engine: AnalyticsEngine::new(&settings.analytics)?,
            auth: ApiKeyAuth::new(settings.auth.api_key.as_deref()),
            started_at: Instant::now(),
        })
    }
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::exact(HeaderValue::from_str(origin)?)
    };
    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Builds the full application router.
pub fn build_router<S: SessionStore + 'static>(
    state: Arc<AppState<S>>,
    cors_origin: &str,
) -> anyhow::Result<Router> {
    let protected = Router::new()
        .route(
            "/sessions",
            get(handlers::list_sessions::<S>).post(handlers::create_session::<S>),
        )
        .route(
            "/sessions/:id",
            put(handlers::update_session::<S>).delete(handlers::delete_session::<S>),
        )
        .route("/stats/summary", get(handlers::summary::<S>))
        .route("/stats/by-duration", get(handlers::by_duration::<S>))
        .route("/stats/by-game-type", get(handlers::by_game_type::<S>))
        .route("/stats/by-day", get(handlers::by_day::<S>))
        .route("/stats/trends", get(handlers::trends::<S>))
        .route("/cache/clear", post(handlers::clear_cache::<S>))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::require_api_key,
        ));

    let api = Router::new()
        .route("/health", get(handlers::health::<S>))
        .merge(protected)
        .fallback(handlers::not_found::<S>)
        .with_state(state);

    Ok(Router::new()
        .nest("/api", api)
        .layer(cors_layer(cors_origin)?)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http()))
}

/// Configures and runs the web server over the given store until shutdown.
pub async fn run_server<S: SessionStore + 'static>(
    settings: &Settings,
    store: S,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(settings, store)?);
    if !state.auth.is_configured() {
        tracing::warn!("No API key configured; protected routes will answer 500.");
    }
    let app = build_router(state, &settings.server.cors_origin)?;

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Web server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
    }
}
