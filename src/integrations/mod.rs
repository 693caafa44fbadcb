//! Vendor integration clients.
//!
//! Each external service the agent talks to lives behind the
//! [`Integration`] trait so the orchestrator and the HTTP layer can
//! initialize, health-check, and shut them down uniformly. Every client
//! degrades to deterministic mock responses when no credentials are
//! configured, so the full pipeline runs out of the box.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod brokerage;
pub mod context;
pub mod datasync;
pub mod graph;
pub mod ledger;
pub mod navigator;
pub mod predictor;
pub mod search;
pub mod vision;
pub mod voice;

pub use brokerage::BrokerageClient;
pub use context::ContextStore;
pub use datasync::DatasyncClient;
pub use graph::GraphClient;
pub use ledger::LedgerClient;
pub use navigator::NavigatorClient;
pub use predictor::PredictorClient;
pub use search::SearchClient;
pub use vision::VisionClient;
pub use voice::VoiceClient;

// ---------------------------------------------------------------------------
// Health reporting
// ---------------------------------------------------------------------------

/// Whether an integration is operating against the real vendor API or
/// its built-in mock responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Mock,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Live => write!(f, "live"),
            Mode::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unavailable,
}

/// Health report returned by `GET /api/integrations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationHealth {
    pub status: HealthState,
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntegrationHealth {
    pub fn healthy(mode: Mode) -> Self {
        IntegrationHealth {
            status: HealthState::Healthy,
            mode,
            detail: None,
        }
    }

    pub fn with_detail(mode: Mode, detail: impl Into<String>) -> Self {
        IntegrationHealth {
            status: HealthState::Healthy,
            mode,
            detail: Some(detail.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Integration trait
// ---------------------------------------------------------------------------

/// Common lifecycle contract for all vendor clients.
///
/// `initialize` must be infallible in the sense that missing credentials
/// switch the client to mock mode instead of erroring; startup never
/// depends on external availability.
#[async_trait]
pub trait Integration: Send + Sync {
    /// Stable integration name used as the key in health maps.
    fn name(&self) -> &'static str;

    /// Resolve credentials and prepare the client. Mock fallback on
    /// missing or invalid credentials.
    async fn initialize(&self) -> anyhow::Result<()>;

    /// Current health and operating mode.
    async fn health(&self) -> IntegrationHealth;

    /// Clean shutdown.
    async fn shutdown(&self) {}
}
