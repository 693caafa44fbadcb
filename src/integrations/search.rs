//! Web search, sentiment, and trending news.
//!
//! Mirrors the vendor search API in mock mode: two canned results per
//! query plus a fixed positive sentiment snapshot.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AppConfig, VendorConfig};
use crate::types::SentimentSnapshot;

use super::{Integration, IntegrationHealth, Mode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub headline: String,
    pub sentiment: f64,
    pub category: String,
}

pub struct SearchClient {
    api_key_env: String,
}

impl SearchClient {
    pub fn new(config: &VendorConfig) -> Self {
        Self {
            api_key_env: config.api_key_env.clone(),
        }
    }

    fn has_key(&self) -> bool {
        AppConfig::resolve_secret(&self.api_key_env).is_some()
    }

    /// Search the web for market-relevant information.
    pub async fn search(&self, query: &str, _max_results: usize) -> Vec<SearchResult> {
        vec![
            SearchResult {
                title: format!("Market Analysis: {query}"),
                url: "https://mock.tavily.com/1".to_string(),
                content: format!(
                    "Analysis suggests bullish momentum for {query} based on recent macro data."
                ),
                score: 0.92,
            },
            SearchResult {
                title: format!("Breaking: {query} Alert"),
                url: "https://mock.tavily.com/2".to_string(),
                content: format!(
                    "Unusual volume detected in {query}-related assets across multiple exchanges."
                ),
                score: 0.87,
            },
        ]
    }

    /// Analyze sentiment for a market topic.
    pub async fn get_sentiment(&self, topic: &str) -> SentimentSnapshot {
        let results = self
            .search(&format!("{topic} market sentiment analysis"), 5)
            .await;
        SentimentSnapshot {
            query: topic.to_string(),
            sentiment_score: 0.65,
            confidence: 0.82,
            sources: results.iter().take(3).map(|r| r.url.clone()).collect(),
            summary: format!("Overall positive sentiment detected for {topic}"),
            timestamp: Utc::now(),
        }
    }

    /// Trending financial headlines.
    pub async fn get_trending_news(&self, category: &str) -> Vec<Headline> {
        vec![
            Headline {
                headline: "Bitcoin ETF inflows reach record $2.1B".to_string(),
                sentiment: 0.8,
                category: category.to_string(),
            },
            Headline {
                headline: "Fed signals potential rate pause".to_string(),
                sentiment: 0.6,
                category: "macro".to_string(),
            },
            Headline {
                headline: "Ethereum upgrade drives DeFi surge".to_string(),
                sentiment: 0.75,
                category: "crypto".to_string(),
            },
        ]
    }
}

#[async_trait]
impl Integration for SearchClient {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn initialize(&self) -> Result<()> {
        info!("Search client initialized");
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if self.has_key() { Mode::Live } else { Mode::Mock };
        IntegrationHealth::healthy(mode)
    }
}
