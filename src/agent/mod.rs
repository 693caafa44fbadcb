//! Agent orchestrator.
//!
//! Runs the autonomous five-stage workflow:
//! 1. INGEST  — quotes, economic indicators, sentiment
//! 2. ANALYZE — chart patterns, graph correlations, event storage
//! 3. PREDICT — spread detection and model scoring
//! 4. EXECUTE — simulated trades plus voice alerts on anomalies
//! 5. LEARN   — ledger accounting and graph feedback
//!
//! The loop runs as a background tokio task. A cycle gate serializes
//! the loop against on-demand cycles triggered over the API so state
//! updates never interleave.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{AgentConfig, AppConfig};
use crate::integrations::{
    BrokerageClient, ContextStore, DatasyncClient, GraphClient, Integration, IntegrationHealth,
    LedgerClient, NavigatorClient, PredictorClient, SearchClient, VisionClient, VoiceClient,
};
use crate::integrations::predictor::ScoreInputs;
use crate::storage;
use crate::types::{
    AgentState, AnalyzeSummary, CycleRecord, CycleSteps, Decision, ExecuteSummary, IngestSummary,
    LearnSummary, Opportunity, PnlRecord, PredictSummary, TradeAction, TradeRecord,
};

/// Minimum bid/ask spread (in percent) worth scoring.
const MIN_SPREAD_PCT: f64 = 0.05;
/// Cycle records kept in memory for `GET /api/cycles`.
const MAX_CYCLE_LOGS: usize = 50;
/// Back-off after a failed loop cycle.
const ERROR_BACKOFF_SECS: u64 = 5;

pub struct Orchestrator {
    agent_config: AgentConfig,
    state_file: String,
    state: RwLock<AgentState>,
    cycle_logs: RwLock<Vec<CycleRecord>>,
    running: AtomicBool,
    loop_task: Mutex<Option<JoinHandle<()>>>,
    cycle_gate: Mutex<()>,

    pub brokerage: BrokerageClient,
    pub context: ContextStore,
    pub datasync: DatasyncClient,
    pub search: SearchClient,
    pub vision: VisionClient,
    pub graph: GraphClient,
    pub predictor: PredictorClient,
    pub navigator: NavigatorClient,
    pub ledger: LedgerClient,
    pub voice: VoiceClient,
}

impl Orchestrator {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let i = &config.integrations;
        Ok(Self {
            agent_config: config.agent.clone(),
            state_file: config.storage.state_file.clone(),
            state: RwLock::new(AgentState::new()),
            cycle_logs: RwLock::new(Vec::new()),
            running: AtomicBool::new(false),
            loop_task: Mutex::new(None),
            cycle_gate: Mutex::new(()),
            brokerage: BrokerageClient::new(&i.brokerage)
                .context("Failed to construct brokerage client")?,
            context: ContextStore::new(&i.context),
            datasync: DatasyncClient::new(&i.datasync),
            search: SearchClient::new(&i.search),
            vision: VisionClient::new(&i.vision),
            graph: GraphClient::new(&i.graph),
            predictor: PredictorClient::new(&i.predictor),
            navigator: NavigatorClient::new(&i.navigator),
            ledger: LedgerClient::new(&i.ledger),
            voice: VoiceClient::new(&i.voice),
        })
    }

    /// Restore previously persisted state (cycle counts, P&L totals).
    pub async fn restore_state(&self, state: AgentState) {
        *self.state.write().await = state;
    }

    fn integrations(&self) -> Vec<&dyn Integration> {
        vec![
            &self.brokerage,
            &self.context,
            &self.datasync,
            &self.search,
            &self.vision,
            &self.graph,
            &self.predictor,
            &self.navigator,
            &self.ledger,
            &self.voice,
        ]
    }

    /// Initialize every integration. Failures are logged and recorded
    /// but never abort startup; affected clients stay in mock mode.
    pub async fn initialize(&self) -> Result<()> {
        info!(agent = %self.agent_config.name, "Initializing arbitrage agent");
        for integration in self.integrations() {
            match integration.initialize().await {
                Ok(()) => debug!(integration = integration.name(), "initialized"),
                Err(e) => {
                    warn!(integration = integration.name(), error = %e, "initialization failed");
                    self.state
                        .write()
                        .await
                        .push_error(format!("{}: init failed: {e}", integration.name()));
                }
            }
        }
        self.context
            .update_context("agent_name", serde_json::json!(self.agent_config.name))
            .await;
        info!("Agent initialization complete");
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.stop().await;
        for integration in self.integrations() {
            integration.shutdown().await;
        }
        let state = self.state.read().await;
        if let Err(e) = storage::save_state(&state, Some(&self.state_file)) {
            error!(error = %e, "Failed to persist state on shutdown");
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn is_running(&self) -> bool {
        self.running.load(AtomicOrdering::SeqCst)
    }

    /// Start the autonomous loop. Idempotent.
    pub async fn start(self: &Arc<Self>) {
        if self.running.swap(true, AtomicOrdering::SeqCst) {
            warn!("Agent is already running");
            return;
        }
        self.state.write().await.is_running = true;

        let agent = Arc::clone(self);
        let interval = Duration::from_secs(self.agent_config.cycle_interval_secs);
        let handle = tokio::spawn(async move {
            while agent.is_running() {
                match agent.run_cycle().await {
                    Ok(record) => {
                        info!(cycle = record.cycle, "{record}");
                        tokio::time::sleep(interval).await;
                    }
                    Err(e) => {
                        error!(error = %e, "Cycle failed");
                        agent
                            .state
                            .write()
                            .await
                            .push_error(format!("{}: {e}", Utc::now().to_rfc3339()));
                        tokio::time::sleep(Duration::from_secs(ERROR_BACKOFF_SECS)).await;
                    }
                }
            }
        });
        *self.loop_task.lock().await = Some(handle);
        info!("Agent loop started");
    }

    /// Stop the autonomous loop and wait for the task to wind down.
    pub async fn stop(&self) {
        self.running.store(false, AtomicOrdering::SeqCst);
        self.state.write().await.is_running = false;
        if let Some(handle) = self.loop_task.lock().await.take() {
            handle.abort();
            let _ = handle.await;
        }
        info!("Agent loop stopped");
    }

    // -----------------------------------------------------------------------
    // The cycle
    // -----------------------------------------------------------------------

    /// Execute one full cycle. Serialized by the cycle gate so the loop
    /// and manual triggers never run concurrently.
    pub async fn run_cycle(&self) -> Result<CycleRecord> {
        let _gate = self.cycle_gate.lock().await;

        let started_at = Utc::now();
        let cycle_id = {
            let mut state = self.state.write().await;
            state.cycle_count += 1;
            state.cycle_count
        };
        info!(cycle = cycle_id, "Cycle starting");

        let mut steps = CycleSteps::default();

        // -- Step 1: INGEST --
        self.context.set_workflow_state("ingesting").await;
        debug!(plan = ?self.navigator.navigation_plan("ingest"), "Ingest plan");

        let crypto_quotes = join_all(
            self.agent_config
                .crypto_watchlist
                .iter()
                .map(|s| self.brokerage.get_crypto_quote(s)),
        )
        .await;
        let stock_quotes = join_all(
            self.agent_config
                .stock_watchlist
                .iter()
                .map(|s| self.brokerage.get_stock_quote(s)),
        )
        .await;
        let indicators = self.datasync.get_latest_records("economic_indicators").await;
        let sentiment = self.search.get_sentiment("crypto market momentum").await;
        let trending = self.search.get_trending_news("crypto").await;

        steps.ingest = IngestSummary {
            crypto_quotes: crypto_quotes.len(),
            stock_quotes: stock_quotes.len(),
            economic_indicators: indicators.len(),
            sentiment_score: sentiment.sentiment_score,
            trending_headlines: trending.len(),
        };
        info!(
            crypto = crypto_quotes.len(),
            stocks = stock_quotes.len(),
            sentiment = sentiment.sentiment_score,
            "Ingest complete"
        );

        // -- Step 2: ANALYZE --
        self.context.set_workflow_state("analyzing").await;

        let mut patterns = Vec::new();
        for symbol in self.agent_config.crypto_watchlist.iter().take(2) {
            let pattern = self.vision.analyze_chart(symbol, "4h", None).await;
            self.navigator.route_data("visual_pattern").await;
            patterns.push(pattern);
        }

        let first_symbol = self
            .agent_config
            .crypto_watchlist
            .first()
            .map(String::as_str)
            .unwrap_or("");
        let correlations = self.graph.find_correlations("market_move", first_symbol).await;

        let mut events_stored = 0;
        for quote in &crypto_quotes {
            self.graph
                .store_event("price_snapshot", serde_json::to_value(quote)?)
                .await;
            events_stored += 1;
        }

        steps.analyze = AnalyzeSummary {
            patterns_detected: patterns.len(),
            correlations_found: correlations.len(),
            events_stored,
        };

        // -- Step 3: PREDICT --
        self.context.set_workflow_state("predicting").await;

        let mut opportunities = Vec::new();
        for quote in &crypto_quotes {
            let Some(spread_pct) = quote.spread_pct() else {
                continue;
            };
            if spread_pct <= MIN_SPREAD_PCT {
                continue;
            }
            let score = self
                .predictor
                .predict_opportunity(ScoreInputs {
                    spread_pct,
                    sentiment_score: sentiment.sentiment_score,
                    correlation_count: correlations.len(),
                })
                .await;
            opportunities.push(Opportunity {
                id: uuid::Uuid::new_v4(),
                buy_asset: format!("{}/Exchange-A", quote.symbol),
                sell_asset: format!("{}/Exchange-B", quote.symbol),
                buy_price: quote.bid.unwrap_or(quote.price),
                sell_price: quote.ask.unwrap_or(quote.price),
                spread_pct,
                predicted_score: score,
                sentiment_score: sentiment.sentiment_score,
                patterns: patterns.clone(),
                correlations: correlations.iter().map(|c| c.event.clone()).collect(),
                detected_at: Utc::now(),
                status: "detected".to_string(),
            });
        }
        opportunities.sort_by(|a, b| {
            b.predicted_score
                .partial_cmp(&a.predicted_score)
                .unwrap_or(Ordering::Equal)
        });

        let top = opportunities.first().cloned();
        let decision = match &top {
            Some(opp) => self.navigator.make_decision(opp.predicted_score).await,
            None => Decision::default(),
        };

        self.context
            .update_context("last_opportunities", serde_json::json!(opportunities.len()))
            .await;
        self.context
            .update_context(
                "top_score",
                serde_json::json!(top.as_ref().map(|o| o.predicted_score).unwrap_or(0.0)),
            )
            .await;

        steps.predict = PredictSummary {
            opportunities_found: opportunities.len(),
            top_score: top.as_ref().map(|o| o.predicted_score).unwrap_or(0.0),
            decision: Some(decision.clone()),
        };
        if let Some(opp) = &top {
            info!(
                top = %opp.buy_asset,
                score = opp.predicted_score,
                action = %decision.action,
                "Prediction complete"
            );
        }

        // -- Step 4: EXECUTE --
        self.context.set_workflow_state("executing").await;

        let mut trade = None;
        let mut alert_sent = false;
        if let Some(opp) = &top {
            if decision.action.is_executable() {
                let quantity = {
                    let raw: f64 = rand::thread_rng().gen_range(0.01..0.1);
                    (raw * 10_000.0).round() / 10_000.0
                };
                let record = TradeRecord {
                    opportunity_id: opp.id,
                    action: TradeAction::Buy,
                    asset: opp.symbol().to_string(),
                    quantity,
                    price: opp.buy_price,
                    simulated: true,
                    executed_at: Utc::now(),
                    order_id: None,
                    notes: format!(
                        "Score: {:.4} | {}",
                        opp.predicted_score, decision.reason
                    ),
                };
                info!("{record}");
                self.state.write().await.push_trade(record.clone());

                if decision.action == crate::types::DecisionAction::ExecuteAndAlert
                    || opp.is_anomaly()
                {
                    self.voice
                        .send_alert(
                            &format!(
                                "ANOMALY DETECTED: {} spread {:.2}% with score {:.4}",
                                opp.buy_asset, opp.spread_pct, opp.predicted_score
                            ),
                            "critical",
                            Some(opp.id.to_string()),
                        )
                        .await;
                    alert_sent = true;
                }
                trade = Some(record);
            } else {
                debug!("No trade executed this cycle");
            }
        }

        steps.execute = ExecuteSummary {
            traded: trade.is_some(),
            trade: trade.clone(),
            alert_sent,
        };

        // -- Step 5: LEARN --
        self.context.set_workflow_state("learning").await;

        let mut cycle_pnl = 0.0;
        if let Some(trade) = &trade {
            self.ledger.log_trade(trade).await;

            let mock_pnl = {
                let raw: f64 = rand::thread_rng().gen_range(-50.0..150.0);
                (raw * 100.0).round() / 100.0
            };
            let notional = trade.total_value();
            let pnl_record = PnlRecord {
                trade_id: trade
                    .order_id
                    .clone()
                    .unwrap_or_else(|| format!("sim-{cycle_id}")),
                opportunity_id: trade.opportunity_id,
                entry_price: trade.price,
                exit_price: trade.price * (1.0 + mock_pnl / notional),
                quantity: trade.quantity,
                pnl: mock_pnl,
                pnl_pct: (mock_pnl / notional * 100.0 * 100.0).round() / 100.0,
                asset: trade.asset.clone(),
                recorded_at: Utc::now(),
            };
            self.ledger.record_pnl(&pnl_record).await;
            self.graph
                .update_trade_outcome(&pnl_record.trade_id, mock_pnl, mock_pnl > 0.0)
                .await;

            cycle_pnl = mock_pnl;
            let mut state = self.state.write().await;
            state.total_pnl += mock_pnl;
            info!(pnl = format!("${mock_pnl:+.2}"), total = format!("${:+.2}", state.total_pnl), "Learn complete");
        }

        // -- Cycle complete --
        let total_pnl;
        {
            let mut state = self.state.write().await;
            state.last_cycle_at = Some(Utc::now());
            state.opportunities_detected += opportunities.len() as u64;
            opportunities.truncate(AgentState::MAX_ACTIVE_OPPORTUNITIES);
            state.active_opportunities = opportunities;
            total_pnl = state.total_pnl;
        }
        steps.learn = LearnSummary {
            pnl_updated: trade.is_some(),
            cycle_pnl,
            total_pnl,
        };
        self.context.set_workflow_state("idle").await;

        let completed_at = Utc::now();
        let record = CycleRecord {
            cycle: cycle_id,
            started_at,
            completed_at,
            duration_seconds: (completed_at - started_at).num_milliseconds() as f64 / 1000.0,
            steps,
        };
        {
            let mut logs = self.cycle_logs.write().await;
            logs.push(record.clone());
            if logs.len() > MAX_CYCLE_LOGS {
                let excess = logs.len() - MAX_CYCLE_LOGS;
                logs.drain(..excess);
            }
        }

        if let Err(e) = storage::save_state(&*self.state.read().await, Some(&self.state_file)) {
            error!(error = %e, "Failed to persist state after cycle");
        }

        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Read access for the HTTP layer
    // -----------------------------------------------------------------------

    pub async fn state_snapshot(&self) -> AgentState {
        self.state.read().await.clone()
    }

    /// Most recent cycle records, oldest first.
    pub async fn recent_cycles(&self, limit: usize) -> Vec<CycleRecord> {
        let logs = self.cycle_logs.read().await;
        let skip = logs.len().saturating_sub(limit);
        logs[skip..].to_vec()
    }

    /// Health of every integration, in registration order.
    pub async fn integration_health(&self) -> Vec<(&'static str, IntegrationHealth)> {
        let mut health = Vec::new();
        for integration in self.integrations() {
            health.push((integration.name(), integration.health().await));
        }
        health
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn test_config() -> AppConfig {
        let mut state_file = std::env::temp_dir();
        state_file.push(format!("arbiter_agent_test_{}.json", uuid::Uuid::new_v4()));

        let vendor = |env: &str| VendorConfig {
            api_key_env: env.to_string(),
            base_url: None,
        };
        AppConfig {
            agent: AgentConfig {
                name: "ARBITER-TEST".to_string(),
                cycle_interval_secs: 1,
                score_threshold: 0.75,
                anomaly_threshold: 0.95,
                crypto_watchlist: vec![
                    "BTC".to_string(),
                    "ETH".to_string(),
                    "SOL".to_string(),
                    "DOGE".to_string(),
                ],
                stock_watchlist: vec!["AAPL".to_string(), "TSLA".to_string()],
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: StorageConfig {
                state_file: state_file.to_string_lossy().to_string(),
            },
            integrations: IntegrationsConfig {
                brokerage: BrokerageConfig {
                    api_key_env: "ARBITER_TEST_UNSET_1".to_string(),
                    private_key_env: "ARBITER_TEST_UNSET_2".to_string(),
                    base_url: "https://trading.example.com".to_string(),
                },
                search: vendor("ARBITER_TEST_UNSET_3"),
                datasync: DatasyncConfig {
                    api_key_env: "ARBITER_TEST_UNSET_4".to_string(),
                    base_url: "https://api.datasync.example".to_string(),
                    workspace_id: None,
                },
                vision: vendor("ARBITER_TEST_UNSET_5"),
                graph: GraphConfig {
                    uri: "bolt://localhost:7687".to_string(),
                    username: "neo4j".to_string(),
                    password_env: "ARBITER_TEST_UNSET_6".to_string(),
                },
                predictor: vendor("ARBITER_TEST_UNSET_7"),
                navigator: vendor("ARBITER_TEST_UNSET_8"),
                ledger: vendor("ARBITER_TEST_UNSET_9"),
                voice: vendor("ARBITER_TEST_UNSET_10"),
                context: vendor("ARBITER_TEST_UNSET_11"),
            },
        }
    }

    async fn test_agent() -> Arc<Orchestrator> {
        let agent = Arc::new(Orchestrator::new(&test_config()).unwrap());
        agent.initialize().await.unwrap();
        agent
    }

    #[tokio::test]
    async fn test_single_cycle_updates_state() {
        let agent = test_agent().await;
        let record = agent.run_cycle().await.unwrap();

        assert_eq!(record.cycle, 1);
        // The mock quote table gives every crypto symbol a ~0.2% spread,
        // so all four watchlist symbols produce opportunities.
        assert_eq!(record.steps.ingest.crypto_quotes, 4);
        assert_eq!(record.steps.ingest.stock_quotes, 2);
        assert_eq!(record.steps.ingest.economic_indicators, 4);
        assert_eq!(record.steps.predict.opportunities_found, 4);
        assert_eq!(record.steps.analyze.patterns_detected, 2);
        assert_eq!(record.steps.analyze.correlations_found, 3);
        assert_eq!(record.steps.analyze.events_stored, 4);

        let state = agent.state_snapshot().await;
        assert_eq!(state.cycle_count, 1);
        assert_eq!(state.opportunities_detected, 4);
        assert_eq!(state.active_opportunities.len(), 4);
    }

    #[tokio::test]
    async fn test_mock_scores_stay_below_execution_threshold() {
        // Mock spreads (~0.2%) with 0.65 sentiment and three correlations
        // score at most ~0.42 even with maximum positive noise, so a mock
        // cycle never trades.
        let agent = test_agent().await;
        let record = agent.run_cycle().await.unwrap();
        assert!(record.steps.predict.top_score < 0.5);
        assert!(!record.steps.execute.traded);
        assert!(!record.steps.execute.alert_sent);
        assert_eq!(
            record.steps.predict.decision.unwrap().action,
            crate::types::DecisionAction::Skip
        );
        assert_eq!(agent.state_snapshot().await.trades_executed, 0);
    }

    #[tokio::test]
    async fn test_cycle_logs_are_capped() {
        let agent = test_agent().await;
        for _ in 0..3 {
            agent.run_cycle().await.unwrap();
        }
        assert_eq!(agent.recent_cycles(50).await.len(), 3);
        assert_eq!(agent.recent_cycles(2).await.len(), 2);
        // limit=2 keeps the newest records
        assert_eq!(agent.recent_cycles(2).await[1].cycle, 3);
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_stop_clears_flag() {
        let agent = test_agent().await;
        agent.start().await;
        assert!(agent.is_running());
        agent.start().await; // warns, no second task
        assert!(agent.is_running());

        agent.stop().await;
        assert!(!agent.is_running());
        assert!(!agent.state_snapshot().await.is_running);
    }

    #[tokio::test]
    async fn test_integration_health_covers_all_ten() {
        let agent = test_agent().await;
        let health = agent.integration_health().await;
        assert_eq!(health.len(), 10);
        let names: Vec<&str> = health.iter().map(|(n, _)| *n).collect();
        assert!(names.contains(&"brokerage"));
        assert!(names.contains(&"voice"));
        // Without credentials everything reports mock mode
        assert!(health
            .iter()
            .all(|(_, h)| h.mode == crate::integrations::Mode::Mock));
    }

    #[tokio::test]
    async fn test_cycle_persists_state_file() {
        let config = test_config();
        let path = config.storage.state_file.clone();
        let agent = Arc::new(Orchestrator::new(&config).unwrap());
        agent.initialize().await.unwrap();
        agent.run_cycle().await.unwrap();

        let loaded = storage::load_state(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded.cycle_count, 1);
        storage::delete_state(Some(&path)).unwrap();
    }

    #[tokio::test]
    async fn test_workflow_state_returns_to_idle() {
        let agent = test_agent().await;
        agent.run_cycle().await.unwrap();
        assert_eq!(agent.context.get_workflow_state().await, "idle");
    }
}
