//! Series preparation: raw records in, validated chronological series out.

use crate::domain::error::TurtleError;
use crate::domain::price::{PricePoint, RawField, RawPriceRecord};
use chrono::NaiveDate;

/// Chronologically ordered daily prices with strictly increasing dates.
///
/// Only [`PriceSeries::prepare`] builds one, so the ordering and price
/// invariants hold for every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate, sort and length-check raw records.
    ///
    /// Fails with `DataIntegrity` on unparseable dates, non-numeric prices,
    /// broken price invariants or duplicate dates, and with `InsufficientData`
    /// when fewer than `min_len` records remain.
    pub fn prepare(records: Vec<RawPriceRecord>, min_len: usize) -> Result<Self, TurtleError> {
        let mut points = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            points.push(parse_record(index, record)?);
        }

        points.sort_by_key(|p| p.date);

        if let Some(w) = points.windows(2).find(|w| w[0].date == w[1].date) {
            let dup = w[1].date;
            let index = records
                .iter()
                .rposition(|r| r.date.parse() == Some(dup))
                .unwrap_or_default();
            return Err(TurtleError::integrity(
                index,
                Some(dup.to_string()),
                "duplicate date",
            ));
        }

        if points.len() < min_len {
            return Err(TurtleError::InsufficientData {
                bars: points.len(),
                minimum: min_len,
            });
        }

        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

fn parse_record(index: usize, record: &RawPriceRecord) -> Result<PricePoint, TurtleError> {
    let date = record.date.parse().ok_or_else(|| {
        TurtleError::integrity(
            index,
            Some(record.date.as_text()),
            "unrecognised date format",
        )
    })?;
    let date_text = || Some(date.to_string());

    let field = |name: &str, raw: &RawField| {
        raw.coerce().ok_or_else(|| {
            TurtleError::integrity(index, date_text(), format!("{name} is not numeric: {raw:?}"))
        })
    };

    let close = field("close", &record.close)?;
    let high = field("high", &record.high)?;
    let low = field("low", &record.low)?;

    if high <= 0.0 || low <= 0.0 || close <= 0.0 {
        return Err(TurtleError::integrity(
            index,
            date_text(),
            format!("prices must be positive (high={high}, low={low}, close={close})"),
        ));
    }
    if high < low {
        return Err(TurtleError::integrity(
            index,
            date_text(),
            format!("high {high} is below low {low}"),
        ));
    }

    Ok(PricePoint {
        date,
        high,
        low,
        close,
    })
}
