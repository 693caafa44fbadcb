//! Navigator client: data routing and execution decisions.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AppConfig, VendorConfig};
use crate::types::{Decision, DecisionAction};

use super::{Integration, IntegrationHealth, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub priority: String,
    pub pipeline: String,
    pub data_type: String,
    pub status: String,
}

pub struct NavigatorClient {
    api_key_env: String,
}

impl NavigatorClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Route a data payload to its processing pipeline.
    pub async fn route_data(&self, data_type: &str) -> Route {
        let (destination, priority, pipeline) = match data_type {
            "market_data" => ("graph", "high", "analysis"),
            "sentiment" => ("predictor", "medium", "prediction"),
            "visual_pattern" => ("graph", "high", "correlation"),
            "economic_indicator" => ("graph", "low", "enrichment"),
            "trade_result" => ("ledger", "high", "accounting"),
            _ => ("graph", "low", "default"),
        };
        Route {
            destination: destination.to_string(),
            priority: priority.to_string(),
            pipeline: pipeline.to_string(),
            data_type: data_type.to_string(),
            status: "routed".to_string(),
        }
    }

    /// Decide what to do with an opportunity given its predicted score.
    pub async fn make_decision(&self, predicted_score: f64) -> Decision {
        if predicted_score >= 0.95 {
            Decision {
                action: DecisionAction::ExecuteAndAlert,
                urgency: "critical".to_string(),
                reason: "Anomaly detected".to_string(),
            }
        } else if predicted_score >= 0.75 {
            Decision {
                action: DecisionAction::Execute,
                urgency: "high".to_string(),
                reason: "Strong opportunity".to_string(),
            }
        } else if predicted_score >= 0.5 {
            Decision {
                action: DecisionAction::Monitor,
                urgency: "medium".to_string(),
                reason: "Moderate signal".to_string(),
            }
        } else {
            Decision {
                action: DecisionAction::Skip,
                urgency: "low".to_string(),
                reason: "Below threshold".to_string(),
            }
        }
    }

    /// Ordered sub-steps for a workflow stage.
    pub fn navigation_plan(&self, workflow_step: &str) -> Vec<&'static str> {
        match workflow_step {
            "ingest" => vec!["fetch_brokerage", "fetch_datasync", "fetch_search"],
            "analyze" => vec!["vision_patterns", "graph_correlations", "navigator_routing"],
            "predict" => vec!["predictor_score", "context_update"],
            "execute" => vec!["brokerage_trade", "ledger_log"],
            "learn" => vec!["ledger_pnl", "graph_update", "predictor_feedback"],
            _ => vec!["unknown_step"],
        }
    }
}

#[async_trait]
impl Integration for NavigatorClient {
    fn name(&self) -> &'static str {
        "navigator"
    }

    async fn initialize(&self) -> Result<()> {
        info!("Navigator initialized");
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

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NavigatorClient {
        NavigatorClient::new(&VendorConfig {
            api_key_env: "ARBITER_TEST_NAVIGATOR_KEY".to_string(),
            base_url: None,
        })
    }

    #[tokio::test]
    async fn test_route_known_types() {
        let c = client();
        let route = c.route_data("market_data").await;
        assert_eq!(route.destination, "graph");
        assert_eq!(route.pipeline, "analysis");
        assert_eq!(route.status, "routed");

        let route = c.route_data("trade_result").await;
        assert_eq!(route.destination, "ledger");
        assert_eq!(route.priority, "high");
    }

    #[tokio::test]
    async fn test_route_unknown_type_defaults() {
        let route = client().route_data("mystery").await;
        assert_eq!(route.destination, "graph");
        assert_eq!(route.pipeline, "default");
    }

    #[tokio::test]
    async fn test_decision_thresholds() {
        let c = client();
        assert_eq!(c.make_decision(0.96).await.action, DecisionAction::ExecuteAndAlert);
        assert_eq!(c.make_decision(0.95).await.action, DecisionAction::ExecuteAndAlert);
        assert_eq!(c.make_decision(0.80).await.action, DecisionAction::Execute);
        assert_eq!(c.make_decision(0.75).await.action, DecisionAction::Execute);
        assert_eq!(c.make_decision(0.60).await.action, DecisionAction::Monitor);
        assert_eq!(c.make_decision(0.30).await.action, DecisionAction::Skip);
    }

    #[test]
    fn test_navigation_plans() {
        let c = client();
        assert_eq!(c.navigation_plan("ingest").len(), 3);
        assert_eq!(c.navigation_plan("learn")[1], "graph_update");
        assert_eq!(c.navigation_plan("nope"), vec!["unknown_step"]);
    }
}
