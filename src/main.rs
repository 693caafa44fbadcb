//! ARBITER — Autonomous Global Event Arbitrage Agent
//!
//! Entry point. Loads configuration, initialises structured logging,
//! restores persisted state, brings up the ten vendor integrations,
//! and serves the HTTP API until a shutdown signal arrives. The
//! autonomous ingest→analyze→predict→execute→learn loop is started on
//! demand via `POST /api/agent/start`.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use arbiter::agent::Orchestrator;
use arbiter::config::AppConfig;
use arbiter::{server, storage};

const BANNER: &str = r#"
    _    ____  ____ ___ _____ _____ ____
   / \  |  _ \| __ )_ _|_   _| ____|  _ \
  / _ \ | |_) |  _ \| |  | | |  _| | |_) |
 / ___ \|  _ <| |_) | |  | | | |___|  _ <
/_/   \_\_| \_\____/___| |_| |_____|_| \_\

  Autonomous Global Event Arbitrage Agent
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        agent_name = %cfg.agent.name,
        cycle_interval_secs = cfg.agent.cycle_interval_secs,
        score_threshold = cfg.agent.score_threshold,
        "ARBITER starting up"
    );

    // -- Build the orchestrator -------------------------------------------

    let agent = Arc::new(Orchestrator::new(&cfg)?);

    if let Some(state) = storage::load_state(Some(&cfg.storage.state_file))? {
        info!(
            cycles = state.cycle_count,
            trades = state.trades_executed,
            pnl = format!("${:+.2}", state.total_pnl),
            "Resumed from saved state"
        );
        agent.restore_state(state).await;
    }

    agent.initialize().await?;

    // -- Serve until shutdown ---------------------------------------------

    let server_agent = Arc::clone(&agent);
    let host = cfg.server.host.clone();
    let port = cfg.server.port;
    let server_task = tokio::spawn(async move {
        server::serve(server_agent, &host, port).await
    });

    tokio::select! {
        result = server_task => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received.");
        }
    }

    agent.shutdown().await;
    let state = agent.state_snapshot().await;
    info!(
        cycles = state.cycle_count,
        trades = state.trades_executed,
        pnl = format!("${:+.2}", state.total_pnl),
        "ARBITER shut down cleanly."
    );

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arbiter=info"));

    let json_logging = std::env::var("ARBITER_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
