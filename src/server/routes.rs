//! API route handlers.
//!
//! Thin handlers over the orchestrator: read endpoints snapshot shared
//! state, control endpoints drive the agent lifecycle. Errors surface
//! as `{"error": ...}` JSON with an appropriate status code.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::agent::Orchestrator;
use crate::types::{
    AgentState, ArbiterError, AssetType, CycleRecord, MarketQuote, PortfolioSnapshot,
};

pub type AppState = Arc<Orchestrator>;

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<ArbiterError> for ApiError {
    fn from(e: ArbiterError) -> Self {
        let status = match &e {
            ArbiterError::UnknownAssetType(_) => StatusCode::BAD_REQUEST,
            ArbiterError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError {
            status,
            message: e.to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        error!(error = %e, "Request failed");
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BrokerageLoginRequest {
    pub api_key: String,
    pub private_key: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CyclesQuery {
    #[serde(default = "default_cycle_limit")]
    pub limit: usize,
}

fn default_cycle_limit() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "arbitrage-agent",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn agent_status(State(agent): State<AppState>) -> Json<AgentState> {
    Json(agent.state_snapshot().await)
}

pub async fn portfolio(State(agent): State<AppState>) -> Json<PortfolioSnapshot> {
    Json(agent.brokerage.get_portfolio().await)
}

pub async fn quote(
    State(agent): State<AppState>,
    Path((asset_type, symbol)): Path<(String, String)>,
) -> Result<Json<MarketQuote>, ApiError> {
    let asset_type: AssetType = asset_type
        .parse()
        .map_err(|_| ArbiterError::UnknownAssetType(asset_type))?;
    let quote = match asset_type {
        AssetType::Crypto => agent.brokerage.get_crypto_quote(&symbol).await,
        AssetType::Stock => agent.brokerage.get_stock_quote(&symbol).await,
    };
    Ok(Json(quote))
}

pub async fn start_agent(State(agent): State<AppState>) -> Json<LifecycleResponse> {
    agent.start().await;
    Json(LifecycleResponse { status: "started" })
}

pub async fn stop_agent(State(agent): State<AppState>) -> Json<LifecycleResponse> {
    agent.stop().await;
    Json(LifecycleResponse { status: "stopped" })
}

pub async fn trigger_cycle(
    State(agent): State<AppState>,
) -> Result<Json<CycleRecord>, ApiError> {
    let record = agent.run_cycle().await?;
    Ok(Json(record))
}

pub async fn recent_cycles(
    State(agent): State<AppState>,
    Query(query): Query<CyclesQuery>,
) -> Json<Vec<CycleRecord>> {
    Json(agent.recent_cycles(query.limit).await)
}

pub async fn integration_health(State(agent): State<AppState>) -> Json<serde_json::Value> {
    let mut map = serde_json::Map::new();
    for (name, health) in agent.integration_health().await {
        match serde_json::to_value(&health) {
            Ok(value) => {
                map.insert(name.to_string(), value);
            }
            Err(e) => {
                map.insert(
                    name.to_string(),
                    serde_json::json!({ "status": "error", "error": e.to_string() }),
                );
            }
        }
    }
    Json(serde_json::Value::Object(map))
}

pub async fn brokerage_login(
    State(agent): State<AppState>,
    Json(req): Json<BrokerageLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    agent
        .brokerage
        .update_credentials(&req.api_key, &req.private_key)
        .await
        .map_err(|e| ArbiterError::Authentication {
            integration: "brokerage".to_string(),
            message: e.to_string(),
        })?;
    Ok(Json(LoginResponse {
        status: "success",
        message: "Brokerage authenticated",
    }))
}

pub async fn pnl(State(agent): State<AppState>) -> Json<crate::integrations::ledger::PnlSummary> {
    Json(agent.ledger.get_pnl("all").await)
}

pub async fn graph_stats(
    State(agent): State<AppState>,
) -> Json<crate::integrations::graph::GraphStats> {
    Json(agent.graph.get_stats().await)
}

pub async fn model_status(
    State(agent): State<AppState>,
) -> Json<crate::integrations::predictor::ModelStatus> {
    Json(agent.predictor.get_model_status().await)
}

pub async fn alerts(
    State(agent): State<AppState>,
) -> Json<Vec<crate::integrations::voice::Alert>> {
    Json(agent.voice.get_alert_history().await)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
