//! JSON dump of the report, equity curves and position trajectory.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TurtleError;
use crate::domain::metrics::{EquityPoint, PerformanceReport};
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Serialize)]
struct PositionEntry {
    date: NaiveDate,
    position: i8,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    symbol: &'a str,
    report: &'a PerformanceReport,
    strategy_equity: &'a [EquityPoint],
    benchmark_equity: &'a [EquityPoint],
    positions: Vec<PositionEntry>,
}

pub fn to_json(result: &BacktestResult, symbol: &str) -> Result<String, TurtleError> {
    let positions = result
        .series
        .dates()
        .zip(result.positions.positions())
        .map(|(date, p)| PositionEntry {
            date,
            position: p.as_i8(),
        })
        .collect();

    let doc = JsonReport {
        symbol,
        report: &result.report,
        strategy_equity: &result.strategy_equity,
        benchmark_equity: &result.benchmark_equity,
        positions,
    };

    serde_json::to_string_pretty(&doc).map_err(|e| TurtleError::Report {
        reason: format!("failed to serialise report: {e}"),
    })
}

pub struct JsonReportAdapter {
    output_path: PathBuf,
}

impl JsonReportAdapter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(&self, result: &BacktestResult, symbol: &str) -> Result<(), TurtleError> {
        let json = to_json(result, symbol)?;
        fs::write(&self.output_path, json).map_err(|e| TurtleError::Report {
            reason: format!("failed to write {}: {}", self.output_path.display(), e),
        })?;
        info!(path = %self.output_path.display(), "JSON report written");
        Ok(())
    }
}
