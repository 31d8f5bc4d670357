//! Venue Price Feed
//!
//! Polls the public price APIs of both venues over HTTP:
//!   GET {price_url}?token={token_address}  ->  {"price": 1.2345}
//!
//! - Every HTTP request, retries included, takes a rate limiter slot
//! - A venue that still fails reports `None`; the other side is unaffected
//! - Both venues failing in the same refresh is a transport failure (`Err`)
//! - Calls within `cache_ttl` of the last refresh return the cached prices
//!   with the timestamp of that refresh
//!
//! Created: 2026-10-13

use crate::dex::PriceSource;
use crate::error::ArbError;
use crate::types::{BotConfig, PricePair};
use crate::utils::{retry_with_delay, RateLimiter, RetryPolicy};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error};

/// Price endpoint for one venue
#[derive(Debug, Clone)]
struct PriceEndpoint {
    name: String,
    url: String,
}

/// HTTP price source for the two configured venues
pub struct HttpPriceFeed {
    client: Client,
    token_address: String,
    venue_a: PriceEndpoint,
    venue_b: PriceEndpoint,
    retry: RetryPolicy,
    limiter: Mutex<RateLimiter>,
    cache_ttl: Duration,
    last_venue_a: Option<f64>,
    last_venue_b: Option<f64>,
    last_update: Option<Instant>,
    last_observed_at: Option<DateTime<Utc>>,
}

impl HttpPriceFeed {
    pub fn new(config: &BotConfig) -> Result<Self, ArbError> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;

        Ok(Self {
            client,
            token_address: config.token_address.clone(),
            venue_a: PriceEndpoint {
                name: config.venue_a.name.clone(),
                url: config.venue_a_price_url.clone(),
            },
            venue_b: PriceEndpoint {
                name: config.venue_b.name.clone(),
                url: config.venue_b_price_url.clone(),
            },
            retry: RetryPolicy::new(config.max_retries, config.retry_delay()),
            limiter: Mutex::new(RateLimiter::new(
                config.rate_limit_calls,
                config.rate_limit_period(),
            )),
            cache_ttl: config.price_cache_ttl(),
            last_venue_a: None,
            last_venue_b: None,
            last_update: None,
            last_observed_at: None,
        })
    }

    /// Last successfully fetched prices (survive a failed refresh)
    pub fn last_known(&self) -> (Option<f64>, Option<f64>) {
        (self.last_venue_a, self.last_venue_b)
    }

    fn cache_is_fresh(&self) -> bool {
        self.last_update
            .map(|at| at.elapsed() < self.cache_ttl)
            .unwrap_or(false)
    }

    async fn fetch_venue(&self, endpoint: &PriceEndpoint) -> Result<f64, ArbError> {
        let client = &self.client;
        let limiter = &self.limiter;
        let token = self.token_address.as_str();
        let url = endpoint.url.as_str();
        let op_name = format!("{} price", endpoint.name);

        retry_with_delay(self.retry, &op_name, || async move {
            limiter.lock().await.wait_if_needed().await;
            request_price(client, url, token).await
        })
        .await
    }

    async fn refresh(&mut self) -> Result<PricePair, ArbError> {
        let endpoint_a = self.venue_a.clone();
        let endpoint_b = self.venue_b.clone();

        let result_a = self.fetch_venue(&endpoint_a).await;
        let result_b = self.fetch_venue(&endpoint_b).await;
        self.last_update = Some(Instant::now());

        match (result_a, result_b) {
            (Err(err_a), Err(err_b)) => Err(ArbError::PriceFetch(format!(
                "{}: {}; {}: {}",
                endpoint_a.name, err_a, endpoint_b.name, err_b
            ))),
            (result_a, result_b) => {
                let price_a = self.keep(&endpoint_a, result_a);
                let price_b = self.keep(&endpoint_b, result_b);
                if let Some(p) = price_a {
                    self.last_venue_a = Some(p);
                }
                if let Some(p) = price_b {
                    self.last_venue_b = Some(p);
                }
                let pair = PricePair::new(price_a, price_b);
                self.last_observed_at = Some(pair.observed_at);
                Ok(pair)
            }
        }
    }

    fn keep(&self, endpoint: &PriceEndpoint, result: Result<f64, ArbError>) -> Option<f64> {
        match result {
            Ok(price) => Some(price),
            Err(e) => {
                error!("Failed to fetch {} price: {}", endpoint.name, e);
                None
            }
        }
    }
}

#[async_trait]
impl PriceSource for HttpPriceFeed {
    async fn fetch_prices(&mut self) -> Result<PricePair, ArbError> {
        if self.cache_is_fresh() {
            debug!("Price cache hit ({:?} ttl)", self.cache_ttl);
            let mut pair = PricePair::new(self.last_venue_a, self.last_venue_b);
            if let Some(observed_at) = self.last_observed_at {
                pair.observed_at = observed_at;
            }
            return Ok(pair);
        }
        self.refresh().await
    }
}

async fn request_price(client: &Client, url: &str, token: &str) -> Result<f64, ArbError> {
    let body: Value = client
        .get(url)
        .query(&[("token", token)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    parse_price(&body)
}

/// Read the `price` field as a number or numeric string
pub fn parse_price(body: &Value) -> Result<f64, ArbError> {
    let field = body
        .get("price")
        .ok_or_else(|| ArbError::PriceFetch("response has no price field".to_string()))?;

    let price = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    price.ok_or_else(|| ArbError::PriceFetch(format!("unreadable price value: {}", field)))
}

/// Relative price gap in percent of the lower price; 0 if either price is not positive
pub fn price_difference_percent(price1: f64, price2: f64) -> f64 {
    if price1 <= 0.0 || price2 <= 0.0 {
        return 0.0;
    }
    (price1 - price2).abs() / price1.min(price2) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local price API: `GET /ok` answers `{"price": 1.1}`, any other path 500.
    /// Returns the base URL; `hits` counts requests received.
    async fn spawn_price_server(hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let hits = hits.clone();
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    hits.fetch_add(1, Ordering::SeqCst);

                    let request = String::from_utf8_lossy(&buf[..n]);
                    let response = if request.starts_with("GET /ok") {
                        let body = r#"{"price": 1.1}"#;
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                             content-length: {}\r\nconnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else {
                        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\n\
                         connection: close\r\n\r\n"
                            .to_string()
                    };
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_numeric_price() {
        assert_eq!(parse_price(&json!({"price": 1.25})).unwrap(), 1.25);
    }

    #[test]
    fn test_parse_string_price() {
        assert_eq!(parse_price(&json!({"price": " 0.5 "})).unwrap(), 0.5);
    }

    #[test]
    fn test_parse_missing_or_bad_price() {
        assert!(parse_price(&json!({"data": 1})).is_err());
        assert!(parse_price(&json!({"price": "n/a"})).is_err());
        assert!(parse_price(&json!({"price": null})).is_err());
    }

    #[test]
    fn test_price_difference_percent() {
        assert!((price_difference_percent(1.1, 1.0) - 10.0).abs() < 1e-9);
        assert_eq!(price_difference_percent(1.0, 1.0), 0.0);
        assert_eq!(price_difference_percent(0.0, 1.0), 0.0);
    }

    #[tokio::test]
    async fn test_new_feed_has_no_prices() {
        let feed = HttpPriceFeed::new(&test_config()).unwrap();
        assert_eq!(feed.last_known(), (None, None));
        assert!(!feed.cache_is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_prices_served_within_ttl() {
        let mut config = test_config();
        config.price_cache_ttl_ms = 5_000;
        let mut feed = HttpPriceFeed::new(&config).unwrap();
        let observed_at = Utc::now() - chrono::Duration::seconds(4);
        feed.last_venue_a = Some(1.0);
        feed.last_venue_b = Some(1.1);
        feed.last_update = Some(Instant::now());
        feed.last_observed_at = Some(observed_at);

        tokio::time::advance(Duration::from_secs(4)).await;
        let pair = feed.fetch_prices().await.unwrap();
        assert_eq!(pair.both(), Some((1.0, 1.1)));
        // Cached prices keep the time they were fetched
        assert_eq!(pair.observed_at, observed_at);
    }

    #[tokio::test]
    async fn test_one_venue_down_keeps_other_price() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_price_server(hits.clone()).await;
        let mut config = test_config();
        config.venue_a_price_url = format!("{}/ok", base);
        config.venue_b_price_url = format!("{}/down", base);
        config.max_retries = 2;
        config.retry_delay_ms = 0;
        config.price_cache_ttl_ms = 0;
        let mut feed = HttpPriceFeed::new(&config).unwrap();

        let pair = feed.fetch_prices().await.unwrap();
        assert_eq!(pair.venue_a, Some(1.1));
        assert_eq!(pair.venue_b, None);
        assert_eq!(pair.both(), None);
        assert_eq!(feed.last_known(), (Some(1.1), None));
        // One request for A, two attempts for B
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_every_retry_takes_a_rate_limit_slot() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = spawn_price_server(hits.clone()).await;
        let mut config = test_config();
        config.venue_a_price_url = format!("{}/down", base);
        config.venue_b_price_url = format!("{}/down", base);
        config.max_retries = 3;
        config.retry_delay_ms = 0;
        config.price_cache_ttl_ms = 0;
        config.rate_limit_calls = 10;
        config.rate_limit_period_ms = 60_000;
        let mut feed = HttpPriceFeed::new(&config).unwrap();

        assert!(feed.fetch_prices().await.is_err());
        assert_eq!(hits.load(Ordering::SeqCst), 6);
        assert_eq!(feed.limiter.lock().await.in_window(), 6);
    }

    #[tokio::test]
    async fn test_both_venues_unreachable_is_error() {
        let mut config = test_config();
        // Nothing listens on port 1; connection is refused immediately
        config.venue_a_price_url = "http://127.0.0.1:1/price".to_string();
        config.venue_b_price_url = "http://127.0.0.1:1/price".to_string();
        config.max_retries = 1;
        config.retry_delay_ms = 0;
        config.price_cache_ttl_ms = 0;
        let mut feed = HttpPriceFeed::new(&config).unwrap();

        let err = feed.fetch_prices().await.unwrap_err();
        assert!(matches!(err, ArbError::PriceFetch(_)));
    }
}
