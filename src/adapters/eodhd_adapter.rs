//! EODHD end-of-day API data adapter.
//!
//! `GET {base_url}/eod/{symbol}?api_token=..&fmt=json[&from=..][&to=..]`
//! returns a JSON array of daily bars. The HTTP client is behind the `eodhd`
//! feature; response parsing is always available.

use crate::domain::error::TurtleError;
use crate::domain::price::RawPriceRecord;
use chrono::NaiveDate;

pub const DEFAULT_BASE_URL: &str = "https://eodhd.com/api";
pub const API_KEY_ENV: &str = "EODHD_API_KEY";

/// Decode an EOD response body. An error object instead of an array is reported as such.
pub fn parse_eod_json(symbol: &str, body: &str) -> Result<Vec<RawPriceRecord>, TurtleError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TurtleError::DataSource {
            reason: format!("invalid JSON for {symbol}: {e}"),
        })?;

    if !value.is_array() {
        let detail = value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|m| m.as_str())
            .unwrap_or("expected a JSON array");
        return Err(TurtleError::DataSource {
            reason: format!("unexpected response for {symbol}: {detail}"),
        });
    }

    serde_json::from_value(value).map_err(|e| TurtleError::DataSource {
        reason: format!("unexpected record shape for {symbol}: {e}"),
    })
}

pub fn eod_url(
    base_url: &str,
    symbol: &str,
    api_key: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> String {
    let mut url = format!(
        "{}/eod/{symbol}?api_token={api_key}&fmt=json",
        base_url.trim_end_matches('/')
    );
    if let Some(s) = start {
        url.push_str(&format!("&from={s}"));
    }
    if let Some(e) = end {
        url.push_str(&format!("&to={e}"));
    }
    url
}

#[cfg(feature = "eodhd")]
pub use client::EodhdAdapter;

#[cfg(feature = "eodhd")]
mod client {
    use super::*;
    use crate::ports::config_port::ConfigPort;
    use crate::ports::data_port::DataPort;
    use std::time::Duration;
    use tracing::info;

    pub struct EodhdAdapter {
        client: reqwest::blocking::Client,
        base_url: String,
        api_key: String,
    }

    impl EodhdAdapter {
        pub fn new(base_url: String, api_key: String) -> Result<Self, TurtleError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .map_err(|e| TurtleError::DataSource {
                    reason: format!("failed to build HTTP client: {e}"),
                })?;
            Ok(Self {
                client,
                base_url,
                api_key,
            })
        }

        /// `[eodhd] api_key` with `EODHD_API_KEY` as fallback.
        pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TurtleError> {
            let api_key = config
                .get_string("eodhd", "api_key")
                .or_else(|| std::env::var(API_KEY_ENV).ok())
                .ok_or_else(|| TurtleError::ConfigMissing {
                    section: "eodhd".into(),
                    key: "api_key".into(),
                })?;
            let base_url = config
                .get_string("eodhd", "base_url")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
            Self::new(base_url, api_key)
        }
    }

    impl DataPort for EodhdAdapter {
        fn fetch_prices(
            &self,
            symbol: &str,
            start: Option<NaiveDate>,
            end: Option<NaiveDate>,
        ) -> Result<Vec<RawPriceRecord>, TurtleError> {
            let url = eod_url(&self.base_url, symbol, &self.api_key, start, end);
            info!(symbol, base_url = %self.base_url, "fetching end-of-day prices");

            let resp = self
                .client
                .get(&url)
                .send()
                .map_err(|e| TurtleError::DataSource {
                    reason: format!("request for {symbol} failed: {}", e.without_url()),
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TurtleError::DataSource {
                    reason: format!("HTTP {status} for {symbol}"),
                });
            }

            let body = resp.text().map_err(|e| TurtleError::DataSource {
                reason: format!("failed to read response for {symbol}: {}", e.without_url()),
            })?;
            parse_eod_json(symbol, &body)
        }
    }
}
