//! Persistence layer.
//!
//! Saves and loads agent state to/from a JSON file. The state survives
//! restarts so cycle counts and P&L totals carry over.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::types::AgentState;

/// Default state file path.
const DEFAULT_STATE_FILE: &str = "arbiter_state.json";

/// Save agent state to a JSON file.
pub fn save_state(state: &AgentState, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    let json = serde_json::to_string_pretty(state)
        .context("Failed to serialise agent state")?;

    std::fs::write(path, &json)
        .context(format!("Failed to write state to {path}"))?;

    debug!(path, total_pnl = %state.total_pnl, "State saved");
    Ok(())
}

/// Load agent state from a JSON file.
/// Returns None if the file doesn't exist (fresh start).
/// `is_running` is reset: a loop task never survives a restart.
pub fn load_state(path: Option<&str>) -> Result<Option<AgentState>> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved state found, starting fresh");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .context(format!("Failed to read state from {path}"))?;

    let mut state: AgentState = serde_json::from_str(&json)
        .context(format!("Failed to parse state from {path}"))?;
    state.is_running = false;

    info!(
        path,
        cycle_count = state.cycle_count,
        trades = state.trades_executed,
        total_pnl = %state.total_pnl,
        "State loaded from disk"
    );

    Ok(Some(state))
}

/// Delete the state file (for testing or reset).
pub fn delete_state(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_STATE_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .context(format!("Failed to delete state file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
