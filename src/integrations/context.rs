//! Context store: agent working memory and workflow state.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{AppConfig, VendorConfig};

use super::{Integration, IntegrationHealth, Mode};

struct ContextState {
    context: HashMap<String, Value>,
    workflow_state: String,
}

pub struct ContextStore {
    api_key_env: String,
    state: RwLock<ContextState>,
}

impl ContextStore {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
            state: RwLock::new(ContextState {
                context: HashMap::new(),
                workflow_state: "idle".to_string(),
            }),
        }
    }

    /// A copy of the full context map.
    pub async fn get_context(&self) -> HashMap<String, Value> {
        self.state.read().await.context.clone()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.state.read().await.context.get(key).cloned()
    }

    pub async fn update_context(&self, key: &str, value: Value) {
        let mut state = self.state.write().await;
        state.context.insert(key.to_string(), value);
        state.context.insert(
            "last_updated".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }

    pub async fn get_workflow_state(&self) -> String {
        self.state.read().await.workflow_state.clone()
    }

    /// Record the pipeline step the agent is currently in.
    pub async fn set_workflow_state(&self, workflow_state: &str) {
        {
            let mut state = self.state.write().await;
            state.workflow_state = workflow_state.to_string();
        }
        self.update_context("workflow_state", Value::String(workflow_state.to_string()))
            .await;
    }
}

#[async_trait]
impl Integration for ContextStore {
    fn name(&self) -> &'static str {
        "context"
    }

    async fn initialize(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.context.insert(
            "agent_id".to_string(),
            Value::String("arbitrage-agent-v1".to_string()),
        );
        state.context.insert(
            "started_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        state
            .context
            .insert("mode".to_string(), Value::String("autonomous".to_string()));
        info!("Context store initialized");
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if AppConfig::resolve_secret(&self.api_key_env).is_some() {
            Mode::Live
        } else {
            Mode::Mock
        };
        let keys = self.state.read().await.context.len();
        IntegrationHealth::with_detail(mode, format!("{keys} context keys"))
    }

    async fn shutdown(&self) {
        self.state.write().await.context.clear();
    }
}
