//! CSV file data adapter.
//!
//! Reads `{base_path}/{symbol}.csv`. The header row must name `date`, `close`,
//! `high` and `low` columns; any other columns are ignored.

use crate::domain::error::TurtleError;
use crate::domain::price::RawPriceRecord;
use crate::ports::data_port::{in_range, DataPort};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

/// Parse CSV text into raw records, keeping source order.
pub fn parse_csv(content: &str) -> Result<Vec<RawPriceRecord>, TurtleError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (index, result) in rdr.deserialize::<RawPriceRecord>().enumerate() {
        let record = result.map_err(|e| TurtleError::DataSource {
            reason: format!("CSV parse error at record {}: {}", index, e),
        })?;
        records.push(record);
    }
    Ok(records)
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<RawPriceRecord>, TurtleError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| TurtleError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let records = parse_csv(&content)?;
        let total = records.len();

        // Unparseable dates pass through so preparation reports them with their index.
        let records: Vec<RawPriceRecord> = records
            .into_iter()
            .filter(|r| r.date.parse().is_none_or(|d| in_range(d, start, end)))
            .collect();

        debug!(
            path = %path.display(),
            total,
            kept = records.len(),
            "loaded CSV price records"
        );
        Ok(records)
    }
}
