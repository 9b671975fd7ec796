#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use turtletrader::domain::backtest::BacktestConfig;
use turtletrader::domain::error::TurtleError;
pub use turtletrader::domain::price::RawPriceRecord;
use turtletrader::ports::data_port::{in_range, DataPort};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawPriceRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, symbol: &str, records: Vec<RawPriceRecord>) -> Self {
        self.data.insert(symbol.to_string(), records);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<RawPriceRecord>, TurtleError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TurtleError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.date.parse().is_none_or(|d| in_range(d, start, end)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One record per calendar day from 2024-01-01, high/low one unit around close.
pub fn records_from_closes(closes: &[f64]) -> Vec<RawPriceRecord> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let day = start + chrono::Duration::days(i as i64);
            RawPriceRecord::new(day, c + 1.0, c - 1.0, c)
        })
        .collect()
}

/// Flat at 100 with a single jump to `jump_close` at `jump_index`.
pub fn breakout_records(len: usize, jump_index: usize, jump_close: f64) -> Vec<RawPriceRecord> {
    let closes: Vec<f64> = (0..len)
        .map(|i| if i == jump_index { jump_close } else { 100.0 })
        .collect();
    records_from_closes(&closes)
}

/// Gently oscillating series with a rising drift.
pub fn trending_records(len: usize) -> Vec<RawPriceRecord> {
    let closes: Vec<f64> = (0..len)
        .map(|i| 100.0 + i as f64 * 0.5 + 3.0 * ((i as f64) / 4.0).sin())
        .collect();
    records_from_closes(&closes)
}

pub fn default_config() -> BacktestConfig {
    BacktestConfig::default()
}

pub fn csv_text(records: &[(&str, f64, f64, f64)]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for (d, high, low, close) in records {
        out.push_str(&format!("{d},{close},{high},{low},{close},1000\n"));
    }
    out
}
