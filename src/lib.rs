//! ARBITER — Autonomous Global Event Arbitrage Agent
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod agent;
pub mod config;
pub mod integrations;
pub mod server;
pub mod storage;
pub mod types;
