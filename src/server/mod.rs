//! HTTP server — Axum REST API plus a self-contained HTML dashboard.
//!
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use routes::AppState;

/// The embedded dashboard HTML (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

/// Bind and serve the API. Runs until the server errors or the process
/// shuts down.
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = format!("{host}:{port}");
    info!(%addr, "API server starting on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .await
        .context("API server error")?;
    Ok(())
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // API routes
        .route("/api/health", get(routes::health))
        .route("/api/status", get(routes::agent_status))
        .route("/api/portfolio", get(routes::portfolio))
        .route("/api/quotes/:asset_type/:symbol", get(routes::quote))
        .route("/api/agent/start", post(routes::start_agent))
        .route("/api/agent/stop", post(routes::stop_agent))
        .route("/api/agent/cycle", post(routes::trigger_cycle))
        .route("/api/cycles", get(routes::recent_cycles))
        .route("/api/integrations", get(routes::integration_health))
        .route(
            "/api/integrations/brokerage/login",
            post(routes::brokerage_login),
        )
        .route("/api/pnl", get(routes::pnl))
        .route("/api/graph/stats", get(routes::graph_stats))
        .route("/api/model/status", get(routes::model_status))
        .route("/api/alerts", get(routes::alerts))
        // Dashboard HTML
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

/// Serve the embedded HTML dashboard.
async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
