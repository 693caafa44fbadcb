//! Voice alert client: synthesized warnings for high-risk anomalies.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{AppConfig, VendorConfig};

use super::{Integration, IntegrationHealth, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub severity: String,
    pub opportunity_id: Option<String>,
    pub status: String,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedWarning {
    pub text: String,
    pub voice: String,
    pub duration_seconds: f64,
    pub audio_url: String,
    pub status: String,
}

pub struct VoiceClient {
    api_key_env: String,
    alerts: RwLock<Vec<Alert>>,
}

impl VoiceClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
            alerts: RwLock::new(Vec::new()),
        }
    }

    /// Dispatch a voice emergency alert.
    pub async fn send_alert(
        &self,
        message: &str,
        severity: &str,
        opportunity_id: Option<String>,
    ) -> Alert {
        let mut alerts = self.alerts.write().await;
        let alert = Alert {
            id: format!("alert-{}", alerts.len() + 1),
            message: message.to_string(),
            severity: severity.to_string(),
            opportunity_id,
            status: "sent".to_string(),
            timestamp: Utc::now(),
        };
        alerts.push(alert.clone());
        warn!(severity = %severity, "VOICE ALERT: {message}");
        alert
    }

    /// Synthesize a spoken warning message.
    pub async fn synthesize_warning(&self, text: &str, voice: &str) -> SynthesizedWarning {
        SynthesizedWarning {
            text: text.to_string(),
            voice: voice.to_string(),
            duration_seconds: text.len() as f64 * 0.06,
            audio_url: "mock://voice/audio/warning.wav".to_string(),
            status: "synthesized".to_string(),
        }
    }

    /// All alerts sent so far, oldest first.
    pub async fn get_alert_history(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }
}

#[async_trait]
impl Integration for VoiceClient {
    fn name(&self) -> &'static str {
        "voice"
    }

    async fn initialize(&self) -> Result<()> {
        info!("Voice alerts initialized");
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if AppConfig::resolve_secret(&self.api_key_env).is_some() {
            Mode::Live
        } else {
            Mode::Mock
        };
        let sent = self.alerts.read().await.len();
        IntegrationHealth::with_detail(mode, format!("{sent} alerts sent"))
    }
}
