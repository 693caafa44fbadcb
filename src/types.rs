//! Shared types for the ARBITER agent.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that integration, agent,
//! and server modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Market data
// ---------------------------------------------------------------------------

/// Asset class for quote routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Crypto,
    Stock,
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Crypto => write!(f, "crypto"),
            AssetType::Stock => write!(f, "stock"),
        }
    }
}

impl std::str::FromStr for AssetType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crypto" => Ok(AssetType::Crypto),
            "stock" | "stocks" | "equity" => Ok(AssetType::Stock),
            _ => Err(anyhow::anyhow!("Unknown asset type: {s}")),
        }
    }
}

/// A real-time quote for a single asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketQuote {
    pub symbol: String,
    pub asset_type: AssetType,
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume: Option<f64>,
    pub timestamp: DateTime<Utc>,
    /// Where this quote came from: "brokerage_live" | "mock"
    pub source: String,
}

impl fmt::Display for MarketQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ${:.2} (bid: {} | ask: {} | {})",
            self.asset_type,
            self.symbol,
            self.price,
            self.bid.map(|b| format!("${b:.2}")).unwrap_or_else(|| "-".into()),
            self.ask.map(|a| format!("${a:.2}")).unwrap_or_else(|| "-".into()),
            self.source,
        )
    }
}

impl MarketQuote {
    /// Bid/ask spread as a percentage of the bid. None when either side
    /// is missing or the bid is zero.
    pub fn spread_pct(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) if bid > 0.0 => Some((ask - bid) / bid * 100.0),
            _ => None,
        }
    }

    /// Helper to build a test quote with a symmetric 0.1% half-spread.
    #[cfg(test)]
    pub fn sample(symbol: &str, price: f64) -> Self {
        MarketQuote {
            symbol: symbol.to_string(),
            asset_type: AssetType::Crypto,
            price,
            bid: Some(price * 0.999),
            ask: Some(price * 1.001),
            volume: None,
            timestamp: Utc::now(),
            source: "mock".to_string(),
        }
    }
}

/// Sentiment extracted from news/web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub query: String,
    /// Aggregate sentiment in [-1.0, 1.0].
    pub sentiment_score: f64,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    pub sources: Vec<String>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl SentimentSnapshot {
    pub fn neutral(query: &str) -> Self {
        SentimentSnapshot {
            query: query.to_string(),
            sentiment_score: 0.0,
            confidence: 0.0,
            sources: Vec::new(),
            summary: String::new(),
            timestamp: Utc::now(),
        }
    }
}

/// A pattern detected from chart/image analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPattern {
    pub pattern_type: String,
    pub symbol: String,
    /// Detection confidence in [0.0, 1.0].
    pub confidence: f64,
    pub description: String,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for ChartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} (conf {:.0}%)",
            self.pattern_type,
            self.symbol,
            self.confidence * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Opportunities & trades
// ---------------------------------------------------------------------------

/// A detected cross-venue arbitrage opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: uuid::Uuid,
    /// Asset/venue label on the buy side, e.g. "BTC/Exchange-A".
    pub buy_asset: String,
    pub sell_asset: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub spread_pct: f64,
    /// Model score in [0.0, 1.0].
    pub predicted_score: f64,
    pub sentiment_score: f64,
    pub patterns: Vec<ChartPattern>,
    pub correlations: Vec<String>,
    pub detected_at: DateTime<Utc>,
    pub status: String,
}

impl Opportunity {
    /// Score threshold at which an opportunity is worth acting on.
    pub const ACTIONABLE_SCORE: f64 = 0.75;
    /// Score (or absolute spread %) at which it counts as an anomaly.
    pub const ANOMALY_SCORE: f64 = 0.95;
    pub const ANOMALY_SPREAD_PCT: f64 = 5.0;

    pub fn is_actionable(&self) -> bool {
        self.predicted_score >= Self::ACTIONABLE_SCORE
    }

    pub fn is_anomaly(&self) -> bool {
        self.predicted_score >= Self::ANOMALY_SCORE
            || self.spread_pct.abs() > Self::ANOMALY_SPREAD_PCT
    }

    /// The bare symbol on the buy side ("BTC/Exchange-A" → "BTC").
    pub fn symbol(&self) -> &str {
        self.buy_asset.split('/').next().unwrap_or(&self.buy_asset)
    }

    #[cfg(test)]
    pub fn sample(score: f64, spread_pct: f64) -> Self {
        Opportunity {
            id: uuid::Uuid::new_v4(),
            buy_asset: "BTC/Exchange-A".to_string(),
            sell_asset: "BTC/Exchange-B".to_string(),
            buy_price: 97_152.75,
            sell_price: 97_347.25,
            spread_pct,
            predicted_score: score,
            sentiment_score: 0.65,
            patterns: Vec::new(),
            correlations: vec!["fed_rate_decision".to_string()],
            detected_at: Utc::now(),
            status: "detected".to_string(),
        }
    }
}

impl fmt::Display for Opportunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} | spread={:.3}% score={:.4} sentiment={:.2}",
            self.buy_asset, self.sell_asset, self.spread_pct, self.predicted_score,
            self.sentiment_score,
        )
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
            TradeAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// A simulated or real trade execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub opportunity_id: uuid::Uuid,
    pub action: TradeAction,
    pub asset: String,
    pub quantity: f64,
    pub price: f64,
    pub simulated: bool,
    pub executed_at: DateTime<Utc>,
    pub order_id: Option<String>,
    pub notes: String,
}

impl TradeRecord {
    /// Notional value of the trade.
    pub fn total_value(&self) -> f64 {
        self.quantity * self.price
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ ${:.2}{}",
            self.action,
            self.quantity,
            self.asset,
            self.price,
            if self.simulated { " [SIM]" } else { "" },
        )
    }
}

/// Profit & loss record for a completed trade cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlRecord {
    pub trade_id: String,
    pub opportunity_id: uuid::Uuid,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub asset: String,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

/// A single holding inside a portfolio snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub quantity: f64,
    pub average_buy_price: f64,
}

/// Point-in-time read of account holdings. Not persisted by this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub equity: f64,
    pub cash: f64,
    pub positions: Vec<PortfolioPosition>,
    pub source: String,
}

impl PortfolioSnapshot {
    /// Total account value (equity + cash).
    pub fn total_value(&self) -> f64 {
        self.equity + self.cash
    }
}

// ---------------------------------------------------------------------------
// Agent state
// ---------------------------------------------------------------------------

/// Persistent agent state, saved to disk after each cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub cycle_count: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub opportunities_detected: u64,
    pub trades_executed: u64,
    pub total_pnl: f64,
    pub is_running: bool,
    /// Top opportunities from the most recent cycle (capped at 5).
    pub active_opportunities: Vec<Opportunity>,
    /// Most recent trades, newest first (capped at 10).
    pub recent_trades: Vec<TradeRecord>,
    /// Recent cycle errors, oldest first (capped at 20).
    pub errors: Vec<String>,
    pub start_time: DateTime<Utc>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentState {
    pub const MAX_ACTIVE_OPPORTUNITIES: usize = 5;
    pub const MAX_RECENT_TRADES: usize = 10;
    pub const MAX_ERRORS: usize = 20;

    pub fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_at: None,
            opportunities_detected: 0,
            trades_executed: 0,
            total_pnl: 0.0,
            is_running: false,
            active_opportunities: Vec::new(),
            recent_trades: Vec::new(),
            errors: Vec::new(),
            start_time: Utc::now(),
        }
    }

    /// Record a newly executed trade at the front of the recent list.
    pub fn push_trade(&mut self, trade: TradeRecord) {
        self.trades_executed += 1;
        self.recent_trades.insert(0, trade);
        self.recent_trades.truncate(Self::MAX_RECENT_TRADES);
    }

    /// Record a cycle error, dropping the oldest entries past the cap.
    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
        if self.errors.len() > Self::MAX_ERRORS {
            let excess = self.errors.len() - Self::MAX_ERRORS;
            self.errors.drain(..excess);
        }
    }

    /// Uptime duration since agent start.
    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.start_time
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | cycles={} | opportunities={} | trades={} | PnL=${:+.2}",
            if self.is_running { "RUNNING" } else { "IDLE" },
            self.cycle_count,
            self.opportunities_detected,
            self.trades_executed,
            self.total_pnl,
        )
    }
}

// ---------------------------------------------------------------------------
// Cycle records
// ---------------------------------------------------------------------------

/// Summary of the ingest step of one cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSummary {
    pub crypto_quotes: usize,
    pub stock_quotes: usize,
    pub economic_indicators: usize,
    pub sentiment_score: f64,
    pub trending_headlines: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeSummary {
    pub patterns_detected: usize,
    pub correlations_found: usize,
    pub events_stored: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictSummary {
    pub opportunities_found: usize,
    pub top_score: f64,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub traded: bool,
    pub trade: Option<TradeRecord>,
    pub alert_sent: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearnSummary {
    pub pnl_updated: bool,
    pub cycle_pnl: f64,
    pub total_pnl: f64,
}

/// Per-step summaries of one full agent cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleSteps {
    pub ingest: IngestSummary,
    pub analyze: AnalyzeSummary,
    pub predict: PredictSummary,
    pub execute: ExecuteSummary,
    pub learn: LearnSummary,
}

/// The full record of one ingest→analyze→predict→execute→learn pass.
/// Returned by `POST /api/agent/cycle` and listed by `GET /api/cycles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub steps: CycleSteps,
}

impl fmt::Display for CycleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle #{}: opps={} traded={} pnl=${:+.2} ({:.1}s)",
            self.cycle,
            self.steps.predict.opportunities_found,
            self.steps.execute.traded,
            self.steps.learn.cycle_pnl,
            self.duration_seconds,
        )
    }
}

/// A navigator routing decision for the top opportunity of a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub urgency: String,
    pub reason: String,
}

impl Default for Decision {
    fn default() -> Self {
        Decision {
            action: DecisionAction::Skip,
            urgency: "low".to_string(),
            reason: "No opportunities".to_string(),
        }
    }
}

/// What the navigator decided to do with an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    ExecuteAndAlert,
    Execute,
    Monitor,
    Skip,
}

impl DecisionAction {
    /// Whether this decision results in a trade.
    pub fn is_executable(&self) -> bool {
        matches!(self, DecisionAction::Execute | DecisionAction::ExecuteAndAlert)
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionAction::ExecuteAndAlert => write!(f, "execute_and_alert"),
            DecisionAction::Execute => write!(f, "execute"),
            DecisionAction::Monitor => write!(f, "monitor"),
            DecisionAction::Skip => write!(f, "skip"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for ARBITER.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    #[error("Integration error ({integration}): {message}")]
    Integration { integration: String, message: String },

    #[error("Authentication failed ({integration}): {message}")]
    Authentication { integration: String, message: String },

    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("Quote unavailable for {symbol}: {message}")]
    QuoteUnavailable { symbol: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- AssetType tests --

    #[test]
    fn test_asset_type_from_str() {
        assert_eq!("crypto".parse::<AssetType>().unwrap(), AssetType::Crypto);
        assert_eq!("STOCK".parse::<AssetType>().unwrap(), AssetType::Stock);
        assert_eq!("equity".parse::<AssetType>().unwrap(), AssetType::Stock);
        assert!("bond".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_asset_type_serde_lowercase() {
        assert_eq!(serde_json::to_string(&AssetType::Crypto).unwrap(), "\"crypto\"");
        assert_eq!(serde_json::to_string(&AssetType::Stock).unwrap(), "\"stock\"");
    }

    // -- MarketQuote tests --

    #[test]
    fn test_quote_spread_pct() {
        let q = MarketQuote::sample("BTC", 100_000.0);
        // bid = 99_900, ask = 100_100 → spread ≈ 0.2002%
        let spread = q.spread_pct().unwrap();
        assert!((spread - 0.2002).abs() < 0.001);
    }

    #[test]
    fn test_quote_spread_pct_missing_sides() {
        let mut q = MarketQuote::sample("BTC", 100.0);
        q.ask = None;
        assert!(q.spread_pct().is_none());

        q.ask = Some(100.1);
        q.bid = Some(0.0);
        assert!(q.spread_pct().is_none());
    }

    #[test]
    fn test_quote_display() {
        let q = MarketQuote::sample("ETH", 3420.50);
        let display = format!("{q}");
        assert!(display.contains("ETH"));
        assert!(display.contains("crypto"));
    }

    // -- Opportunity tests --

    #[test]
    fn test_opportunity_actionable_threshold() {
        assert!(Opportunity::sample(0.75, 0.1).is_actionable());
        assert!(Opportunity::sample(0.90, 0.1).is_actionable());
        assert!(!Opportunity::sample(0.74, 0.1).is_actionable());
    }

    #[test]
    fn test_opportunity_anomaly_by_score() {
        assert!(Opportunity::sample(0.95, 0.1).is_anomaly());
        assert!(!Opportunity::sample(0.94, 0.1).is_anomaly());
    }

    #[test]
    fn test_opportunity_anomaly_by_spread() {
        assert!(Opportunity::sample(0.10, 5.1).is_anomaly());
        assert!(Opportunity::sample(0.10, -6.0).is_anomaly());
        assert!(!Opportunity::sample(0.10, 4.9).is_anomaly());
    }

    #[test]
    fn test_opportunity_symbol() {
        let opp = Opportunity::sample(0.5, 0.1);
        assert_eq!(opp.symbol(), "BTC");
    }

    #[test]
    fn test_opportunity_serialization_roundtrip() {
        let opp = Opportunity::sample(0.81, 0.25);
        let json = serde_json::to_string(&opp).unwrap();
        let parsed: Opportunity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, opp.id);
        assert!((parsed.predicted_score - 0.81).abs() < 1e-10);
        assert_eq!(parsed.correlations, vec!["fed_rate_decision"]);
    }

    // -- TradeAction / TradeRecord tests --

    #[test]
    fn test_trade_action_display_and_serde() {
        assert_eq!(format!("{}", TradeAction::Buy), "BUY");
        assert_eq!(serde_json::to_string(&TradeAction::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&TradeAction::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn test_trade_record_total_value() {
        let trade = TradeRecord {
            opportunity_id: uuid::Uuid::new_v4(),
            action: TradeAction::Buy,
            asset: "BTC".to_string(),
            quantity: 0.05,
            price: 100_000.0,
            simulated: true,
            executed_at: Utc::now(),
            order_id: None,
            notes: String::new(),
        };
        assert!((trade.total_value() - 5000.0).abs() < 1e-10);
        assert!(format!("{trade}").contains("[SIM]"));
    }

    // -- PortfolioSnapshot tests --

    #[test]
    fn test_portfolio_total_value() {
        let snapshot = PortfolioSnapshot {
            equity: 25_430.50,
            cash: 5_200.00,
            positions: Vec::new(),
            source: "mock".to_string(),
        };
        assert!((snapshot.total_value() - 30_630.50).abs() < 1e-10);
    }

    // -- AgentState tests --

    #[test]
    fn test_agent_state_new() {
        let state = AgentState::new();
        assert_eq!(state.cycle_count, 0);
        assert!(!state.is_running);
        assert!(state.last_cycle_at.is_none());
        assert!(state.recent_trades.is_empty());
    }

    #[test]
    fn test_agent_state_push_trade_caps_list() {
        let mut state = AgentState::new();
        for i in 0..15 {
            state.push_trade(TradeRecord {
                opportunity_id: uuid::Uuid::new_v4(),
                action: TradeAction::Buy,
                asset: format!("A{i}"),
                quantity: 1.0,
                price: 1.0,
                simulated: true,
                executed_at: Utc::now(),
                order_id: None,
                notes: String::new(),
            });
        }
        assert_eq!(state.trades_executed, 15);
        assert_eq!(state.recent_trades.len(), AgentState::MAX_RECENT_TRADES);
        // Newest first
        assert_eq!(state.recent_trades[0].asset, "A14");
    }

    #[test]
    fn test_agent_state_push_error_caps_list() {
        let mut state = AgentState::new();
        for i in 0..25 {
            state.push_error(format!("error {i}"));
        }
        assert_eq!(state.errors.len(), AgentState::MAX_ERRORS);
        // Oldest dropped
        assert_eq!(state.errors[0], "error 5");
        assert_eq!(state.errors.last().unwrap(), "error 24");
    }

    #[test]
    fn test_agent_state_serialization_roundtrip() {
        let mut state = AgentState::new();
        state.cycle_count = 7;
        state.total_pnl = 123.45;
        let json = serde_json::to_string(&state).unwrap();
        let parsed: AgentState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cycle_count, 7);
        assert!((parsed.total_pnl - 123.45).abs() < 1e-10);
    }

    #[test]
    fn test_agent_state_display() {
        let state = AgentState::new();
        let display = format!("{state}");
        assert!(display.contains("IDLE"));
        assert!(display.contains("cycles=0"));
    }

    // -- Decision tests --

    #[test]
    fn test_decision_action_executable() {
        assert!(DecisionAction::Execute.is_executable());
        assert!(DecisionAction::ExecuteAndAlert.is_executable());
        assert!(!DecisionAction::Monitor.is_executable());
        assert!(!DecisionAction::Skip.is_executable());
    }

    #[test]
    fn test_decision_action_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&DecisionAction::ExecuteAndAlert).unwrap(),
            "\"execute_and_alert\"",
        );
        assert_eq!(serde_json::to_string(&DecisionAction::Skip).unwrap(), "\"skip\"");
    }

    #[test]
    fn test_decision_default_is_skip() {
        let d = Decision::default();
        assert_eq!(d.action, DecisionAction::Skip);
        assert_eq!(d.urgency, "low");
    }

    // -- CycleRecord tests --

    #[test]
    fn test_cycle_record_display() {
        let record = CycleRecord {
            cycle: 3,
            started_at: Utc::now(),
            completed_at: Utc::now(),
            duration_seconds: 1.25,
            steps: CycleSteps {
                predict: PredictSummary {
                    opportunities_found: 4,
                    top_score: 0.82,
                    decision: None,
                },
                ..Default::default()
            },
        };
        let display = format!("{record}");
        assert!(display.contains("#3"));
        assert!(display.contains("opps=4"));
    }

    // -- ArbiterError tests --

    #[test]
    fn test_error_display() {
        let e = ArbiterError::Integration {
            integration: "brokerage".to_string(),
            message: "connection timeout".to_string(),
        };
        assert_eq!(
            format!("{e}"),
            "Integration error (brokerage): connection timeout",
        );

        let e = ArbiterError::UnknownAssetType("bond".to_string());
        assert!(format!("{e}").contains("bond"));
    }
}
