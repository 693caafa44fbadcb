//! Prediction model client: opportunity scoring and model metadata.
//!
//! Mock mode applies a weighted heuristic over spread, sentiment, and
//! correlation count with a small random perturbation; live mode would
//! call the fine-tuned hosted model instead.

use anyhow::Result;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AppConfig, VendorConfig};

use super::{Integration, IntegrationHealth, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_id: String,
    pub version: String,
    pub accuracy: f64,
    pub f1_score: f64,
    pub last_trained: String,
    pub training_samples: u64,
}

/// Inputs the model scores an opportunity on.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs {
    pub spread_pct: f64,
    pub sentiment_score: f64,
    pub correlation_count: usize,
}

pub struct PredictorClient {
    api_key_env: String,
}

impl PredictorClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Success probability for an arbitrage opportunity, in [0.0, 1.0].
    pub async fn predict_opportunity(&self, inputs: ScoreInputs) -> f64 {
        let noise = rand::thread_rng().gen_range(-0.05..0.05);
        Self::score(inputs, noise)
    }

    /// Deterministic core of the scoring heuristic; `noise` is bounded
    /// to ±0.05 by the caller.
    fn score(inputs: ScoreInputs, noise: f64) -> f64 {
        let base = (inputs.spread_pct.abs() / 10.0).min(0.4);
        let sentiment_bonus = (inputs.sentiment_score * 0.3).max(0.0);
        let correlation_bonus = (inputs.correlation_count as f64 * 0.05).min(0.2);

        let score = (base + sentiment_bonus + correlation_bonus + noise).clamp(0.0, 1.0);
        (score * 10_000.0).round() / 10_000.0
    }

    /// Current model status and evaluation metrics.
    pub async fn get_model_status(&self) -> ModelStatus {
        ModelStatus {
            model_id: "arbitrage-predictor-v1".to_string(),
            version: "v0.1-mock".to_string(),
            accuracy: 0.73,
            f1_score: 0.68,
            last_trained: "2026-02-27T00:00:00Z".to_string(),
            training_samples: 1_245,
        }
    }
}

#[async_trait]
impl Integration for PredictorClient {
    fn name(&self) -> &'static str {
        "predictor"
    }

    async fn initialize(&self) -> Result<()> {
        info!("Predictor initialized");
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if AppConfig::resolve_secret(&self.api_key_env).is_some() {
            Mode::Live
        } else {
            Mode::Mock
        };
        IntegrationHealth::healthy(mode)
    }
}
