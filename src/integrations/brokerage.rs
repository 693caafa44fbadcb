//! Brokerage client: real-time quotes and portfolio holdings.
//!
//! Talks to the official crypto trading API using Ed25519-signed
//! requests. Without credentials (or when a live call fails) it serves
//! deterministic mock quotes so the rest of the pipeline keeps working.
//! Stock quotes are not covered by the crypto API and are always mocked.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use ed25519_dalek::{Signer, SigningKey};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, BrokerageConfig};
use crate::types::{AssetType, MarketQuote, PortfolioPosition, PortfolioSnapshot};

use super::{Integration, IntegrationHealth, Mode};

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "arbiter-agent/0.1";

const LIVE_SOURCE: &str = "brokerage_live";
const MOCK_SOURCE: &str = "mock";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BestBidAskResponse {
    #[serde(default)]
    results: Vec<BestBidAskQuote>,
}

/// The API returns numeric fields as strings; keep them raw and parse.
#[derive(Debug, Deserialize)]
struct BestBidAskQuote {
    #[serde(default)]
    price: serde_json::Value,
    #[serde(default)]
    bid_inclusive_of_fee: serde_json::Value,
    #[serde(default)]
    ask_inclusive_of_fee: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct HoldingsResponse {
    #[serde(default)]
    results: Vec<Holding>,
}

#[derive(Debug, Deserialize)]
struct Holding {
    #[serde(default)]
    asset_code: String,
    #[serde(default)]
    total_quantity: serde_json::Value,
    #[serde(default)]
    quantity_available_for_trading: serde_json::Value,
}

/// Parse a JSON field that may arrive as a number or a numeric string.
fn json_f64(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

struct Credentials {
    api_key: Secret<String>,
    signer: SigningKey,
}

pub struct BrokerageClient {
    client: reqwest::Client,
    base_url: String,
    api_key_env: String,
    private_key_env: String,
    credentials: RwLock<Option<Credentials>>,
}

impl BrokerageClient {
    pub fn new(config: &BrokerageConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build brokerage HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
            private_key_env: config.private_key_env.clone(),
            credentials: RwLock::new(None),
        })
    }

    /// Install a new API key + base64 Ed25519 seed and re-authenticate.
    /// Errors when the seed does not decode to a 32-byte key.
    pub async fn update_credentials(&self, api_key: &str, private_key: &str) -> Result<()> {
        let signer = parse_signing_key(private_key)?;
        let mut guard = self.credentials.write().await;
        *guard = Some(Credentials {
            api_key: Secret::new(api_key.to_string()),
            signer,
        });
        info!("Brokerage credentials updated, live mode enabled");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    fn signed_headers(
        creds: &Credentials,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<Vec<(&'static str, String)>> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock before Unix epoch")?
            .as_secs()
            .to_string();
        let api_key = creds.api_key.expose_secret();
        let message = format!("{api_key}{timestamp}{path}{method}{body}");
        let signature = BASE64.encode(creds.signer.sign(message.as_bytes()).to_bytes());
        Ok(vec![
            ("x-api-key", api_key.clone()),
            ("x-signature", signature),
            ("x-timestamp", timestamp),
        ])
    }

    async fn signed_get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let guard = self.credentials.read().await;
        let creds = guard
            .as_ref()
            .context("Brokerage client is not authenticated")?;
        let headers = Self::signed_headers(creds, "GET", path, "")?;

        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        for (name, value) in headers {
            req = req.header(name, value);
        }
        let resp = req.send().await.context("Brokerage request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Brokerage API returned {}: {}", resp.status(), path);
        }

        resp.json::<T>()
            .await
            .context("Failed to parse brokerage response")
    }

    // -- Quotes --

    /// Real-time crypto quote; falls back to the mock price table.
    pub async fn get_crypto_quote(&self, symbol: &str) -> MarketQuote {
        if self.is_authenticated().await {
            match self.fetch_live_crypto_quote(symbol).await {
                Ok(quote) => return quote,
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "Live crypto quote failed, using mock");
                }
            }
        }
        mock_crypto_quote(symbol)
    }

    async fn fetch_live_crypto_quote(&self, symbol: &str) -> Result<MarketQuote> {
        // The official API wants currency-pair symbols (BTC → BTC-USD).
        let pair = if symbol.contains('-') {
            symbol.to_string()
        } else {
            format!("{symbol}-USD")
        };
        let path = format!(
            "/api/v2/crypto/marketdata/best_bid_ask/?symbol={}",
            urlencoding::encode(&pair)
        );
        let data: BestBidAskResponse = self.signed_get(&path).await?;
        let quote = data
            .results
            .first()
            .with_context(|| format!("No quote returned for {pair}"))?;

        let price = json_f64(&quote.price)
            .with_context(|| format!("Missing price in quote for {pair}"))?;
        debug!(symbol = %symbol, price = %price, "Live crypto quote");

        Ok(MarketQuote {
            symbol: symbol.to_string(),
            asset_type: AssetType::Crypto,
            price,
            bid: json_f64(&quote.bid_inclusive_of_fee).or(Some(price)),
            ask: json_f64(&quote.ask_inclusive_of_fee).or(Some(price)),
            volume: None,
            timestamp: Utc::now(),
            source: LIVE_SOURCE.to_string(),
        })
    }

    /// Stock quote. The crypto trading API has no equities endpoint, so
    /// this is always served from the mock table.
    pub async fn get_stock_quote(&self, symbol: &str) -> MarketQuote {
        mock_stock_quote(symbol)
    }

    // -- Portfolio --

    pub async fn get_portfolio(&self) -> PortfolioSnapshot {
        if self.is_authenticated().await {
            match self.fetch_live_portfolio().await {
                Ok(snapshot) => return snapshot,
                Err(e) => {
                    error!(error = %e, "Live portfolio fetch failed, using mock");
                }
            }
        }
        mock_portfolio()
    }

    async fn fetch_live_portfolio(&self) -> Result<PortfolioSnapshot> {
        let data: HoldingsResponse = self.signed_get("/api/v1/crypto/trading/holdings/").await?;
        let positions: Vec<PortfolioPosition> = data
            .results
            .iter()
            .filter_map(|h| {
                let quantity = json_f64(&h.total_quantity)?;
                if quantity <= 0.0 {
                    return None;
                }
                Some(PortfolioPosition {
                    symbol: h.asset_code.clone(),
                    quantity,
                    average_buy_price: json_f64(&h.quantity_available_for_trading)
                        .unwrap_or(0.0),
                })
            })
            .collect();

        let equity = positions
            .iter()
            .map(|p| p.quantity * p.average_buy_price)
            .sum();

        Ok(PortfolioSnapshot {
            equity,
            // The holdings endpoint carries no fiat balance.
            cash: 0.0,
            positions,
            source: LIVE_SOURCE.to_string(),
        })
    }
}

fn parse_signing_key(private_key_base64: &str) -> Result<SigningKey> {
    let seed = BASE64
        .decode(private_key_base64.trim())
        .context("Private key is not valid base64")?;
    let seed: [u8; 32] = seed
        .try_into()
        .map_err(|_| anyhow::anyhow!("Private key must be a 32-byte Ed25519 seed"))?;
    Ok(SigningKey::from_bytes(&seed))
}

// ---------------------------------------------------------------------------
// Mock data
// ---------------------------------------------------------------------------

fn mock_crypto_quote(symbol: &str) -> MarketQuote {
    let price = match symbol.to_uppercase().as_str() {
        "BTC" => 97_250.00,
        "ETH" => 3_420.50,
        "DOGE" => 0.245,
        "SOL" => 195.30,
        _ => 100.0,
    };
    MarketQuote {
        symbol: symbol.to_string(),
        asset_type: AssetType::Crypto,
        price,
        bid: Some(price * 0.999),
        ask: Some(price * 1.001),
        volume: None,
        timestamp: Utc::now(),
        source: MOCK_SOURCE.to_string(),
    }
}

fn mock_stock_quote(symbol: &str) -> MarketQuote {
    let price = match symbol.to_uppercase().as_str() {
        "AAPL" => 245.80,
        "TSLA" => 342.15,
        "NVDA" => 875.60,
        "SPY" => 520.30,
        "DJT" => 32.50,
        _ => 150.0,
    };
    MarketQuote {
        symbol: symbol.to_string(),
        asset_type: AssetType::Stock,
        price,
        bid: Some(price * 0.999),
        ask: Some(price * 1.001),
        volume: None,
        timestamp: Utc::now(),
        source: MOCK_SOURCE.to_string(),
    }
}

fn mock_portfolio() -> PortfolioSnapshot {
    PortfolioSnapshot {
        equity: 25_430.50,
        cash: 5_200.00,
        positions: vec![
            PortfolioPosition {
                symbol: "AAPL".to_string(),
                quantity: 10.0,
                average_buy_price: 240.00,
            },
            PortfolioPosition {
                symbol: "NVDA".to_string(),
                quantity: 5.0,
                average_buy_price: 850.00,
            },
            PortfolioPosition {
                symbol: "BTC".to_string(),
                quantity: 0.15,
                average_buy_price: 92_000.00,
            },
            PortfolioPosition {
                symbol: "ETH".to_string(),
                quantity: 2.5,
                average_buy_price: 3_200.00,
            },
        ],
        source: MOCK_SOURCE.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Integration impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Integration for BrokerageClient {
    fn name(&self) -> &'static str {
        "brokerage"
    }

    async fn initialize(&self) -> Result<()> {
        let api_key = AppConfig::resolve_secret(&self.api_key_env);
        let private_key = AppConfig::resolve_secret(&self.private_key_env);

        match (api_key, private_key) {
            (Some(api_key), Some(private_key)) => {
                match parse_signing_key(private_key.expose_secret()) {
                    Ok(signer) => {
                        let mut guard = self.credentials.write().await;
                        *guard = Some(Credentials { api_key, signer });
                        info!("Brokerage API keys configured, live mode");
                    }
                    Err(e) => {
                        warn!(error = %e, "Brokerage private key invalid, running in mock mode");
                    }
                }
            }
            _ => {
                warn!("No brokerage API keys provided, running in mock mode");
            }
        }
        Ok(())
    }

    async fn health(&self) -> IntegrationHealth {
        let mode = if self.is_authenticated().await {
            Mode::Live
        } else {
            Mode::Mock
        };
        IntegrationHealth::healthy(mode)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BrokerageConfig {
        BrokerageConfig {
            api_key_env: "ARBITER_TEST_BROKERAGE_KEY".to_string(),
            private_key_env: "ARBITER_TEST_BROKERAGE_SEED".to_string(),
            base_url: "https://trading.example.com".to_string(),
        }
    }

    #[test]
    fn test_json_f64_number_and_string() {
        assert_eq!(json_f64(&serde_json::json!(42.5)), Some(42.5));
        assert_eq!(json_f64(&serde_json::json!("42.5")), Some(42.5));
        assert_eq!(json_f64(&serde_json::json!(null)), None);
        assert_eq!(json_f64(&serde_json::json!("not-a-number")), None);
    }

    #[test]
    fn test_parse_signing_key_rejects_bad_input() {
        assert!(parse_signing_key("not base64!!!").is_err());
        // Valid base64 but wrong length
        assert!(parse_signing_key(&BASE64.encode([0u8; 16])).is_err());
        // 32-byte seed is accepted
        assert!(parse_signing_key(&BASE64.encode([7u8; 32])).is_ok());
    }

    #[test]
    fn test_mock_crypto_prices() {
        let btc = mock_crypto_quote("BTC");
        assert!((btc.price - 97_250.00).abs() < 1e-10);
        assert_eq!(btc.source, "mock");
        assert!(btc.bid.unwrap() < btc.price);
        assert!(btc.ask.unwrap() > btc.price);

        // Unknown symbols get the default price
        assert!((mock_crypto_quote("XYZ").price - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_mock_stock_prices() {
        assert!((mock_stock_quote("aapl").price - 245.80).abs() < 1e-10);
        assert!((mock_stock_quote("UNKNOWN").price - 150.0).abs() < 1e-10);
    }

    #[test]
    fn test_mock_portfolio_shape() {
        let p = mock_portfolio();
        assert_eq!(p.positions.len(), 4);
        assert!((p.total_value() - 30_630.50).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_starts_unauthenticated_in_mock_mode() {
        let client = BrokerageClient::new(&test_config()).unwrap();
        client.initialize().await.unwrap();
        assert!(!client.is_authenticated().await);
        let health = client.health().await;
        assert_eq!(health.mode, Mode::Mock);
    }

    #[tokio::test]
    async fn test_update_credentials_switches_to_live() {
        let client = BrokerageClient::new(&test_config()).unwrap();
        let seed = BASE64.encode([3u8; 32]);
        client.update_credentials("test-api-key", &seed).await.unwrap();
        assert!(client.is_authenticated().await);
        assert_eq!(client.health().await.mode, Mode::Live);
    }

    #[tokio::test]
    async fn test_update_credentials_rejects_bad_seed() {
        let client = BrokerageClient::new(&test_config()).unwrap();
        assert!(client.update_credentials("key", "bogus").await.is_err());
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_mock_quote_served_without_auth() {
        let client = BrokerageClient::new(&test_config()).unwrap();
        let quote = client.get_crypto_quote("ETH").await;
        assert_eq!(quote.source, "mock");
        assert!((quote.price - 3_420.50).abs() < 1e-10);
        assert_eq!(quote.asset_type, AssetType::Crypto);
    }

    #[test]
    fn test_signed_headers_shape() {
        let creds = Credentials {
            api_key: Secret::new("api-key".to_string()),
            signer: parse_signing_key(&BASE64.encode([9u8; 32])).unwrap(),
        };
        let headers =
            BrokerageClient::signed_headers(&creds, "GET", "/api/v1/test/", "").unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0].0, "x-api-key");
        assert_eq!(headers[0].1, "api-key");
        assert_eq!(headers[1].0, "x-signature");
        // Ed25519 signatures are 64 bytes → 88 base64 chars
        assert_eq!(headers[1].1.len(), 88);
        assert_eq!(headers[2].0, "x-timestamp");
    }
}
