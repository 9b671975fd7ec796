//! Price records: the raw shape handed over by data sources and the
//! validated daily point used by the engine.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// A date as delivered by a data source: already typed, text, or any other
/// value (a bare number, a bool, null) that preparation rejects with its index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Native(NaiveDate),
    Text(String),
    Other(serde_json::Value),
}

impl RawDate {
    /// Calendar date of the record. Accepts ISO dates, naive datetimes and RFC 3339.
    pub fn parse(&self) -> Option<NaiveDate> {
        match self {
            RawDate::Native(d) => Some(*d),
            RawDate::Text(s) => parse_date_text(s.trim()),
            RawDate::Other(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            RawDate::Native(d) => d.to_string(),
            RawDate::Text(s) => s.clone(),
            RawDate::Other(v) => v.to_string(),
        }
    }
}

impl From<NaiveDate> for RawDate {
    fn from(d: NaiveDate) -> Self {
        RawDate::Native(d)
    }
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        RawDate::Text(s.to_string())
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// A numeric field that may arrive as a number or as text. Anything else is
/// kept as `Other` and never coerces.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawField {
    pub fn coerce(&self) -> Option<f64> {
        let v = match self {
            RawField::Number(n) => *n,
            RawField::Text(s) => s.trim().parse::<f64>().ok()?,
            RawField::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for RawField {
    fn from(v: f64) -> Self {
        RawField::Number(v)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

/// Unvalidated daily record. Unknown fields in the source are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPriceRecord {
    #[serde(alias = "Date", alias = "DATE")]
    pub date: RawDate,
    #[serde(alias = "Close", alias = "CLOSE")]
    pub close: RawField,
    #[serde(alias = "High", alias = "HIGH")]
    pub high: RawField,
    #[serde(alias = "Low", alias = "LOW")]
    pub low: RawField,
}

impl RawPriceRecord {
    pub fn new(
        date: impl Into<RawDate>,
        high: impl Into<RawField>,
        low: impl Into<RawField>,
        close: impl Into<RawField>,
    ) -> Self {
        Self {
            date: date.into(),
            close: close.into(),
            high: high.into(),
            low: low.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}
