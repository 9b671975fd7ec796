//! Data access port trait.

use crate::domain::error::TurtleError;
use crate::domain::price::RawPriceRecord;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily records for `symbol`, optionally limited to `[start, end]`.
    ///
    /// Records are returned unvalidated and in source order.
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<RawPriceRecord>, TurtleError>;
}

/// Inclusive date-range check; open bounds always match.
pub fn in_range(date: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
}
