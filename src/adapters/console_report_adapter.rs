//! Plain-text performance summary on stdout.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TurtleError;
use crate::ports::report_port::ReportPort;
use std::fmt::Write as _;

pub struct ConsoleReportAdapter;

fn pct(v: f64) -> String {
    format!("{:.2}%", v * 100.0)
}

fn ratio(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"))
}

pub fn format_summary(result: &BacktestResult, symbol: &str) -> String {
    let r = &result.report;
    let mut out = String::new();

    let _ = writeln!(out, "===== PERFORMANCE METRICS: {symbol} =====");
    if let (Some(first), Some(last)) = (result.series.first_date(), result.series.last_date()) {
        let bars = result.series.len();
        let _ = writeln!(out, "Period:                 {first} to {last} ({bars} bars)");
    }
    let _ = writeln!(out, "CAGR (Turtle Strategy): {}", pct(r.cagr_strategy));
    let _ = writeln!(out, "CAGR (Buy & Hold):      {}", pct(r.cagr_benchmark));
    let _ = writeln!(out, "Sharpe Ratio:           {}", ratio(r.sharpe_strategy));
    let _ = writeln!(out, "Max Drawdown:           {}", pct(r.max_drawdown_strategy));
    let _ = writeln!(out, "Sharpe (Buy & Hold):    {}", ratio(r.sharpe_benchmark));
    let _ = writeln!(out, "Max DD (Buy & Hold):    {}", pct(r.max_drawdown_benchmark));
    let _ = writeln!(out, "Position Changes:       {}", result.positions.transitions());
    let _ = writeln!(out, "Latest ATR:             {}", ratio(r.latest_atr));
    out
}

/// Write the summary to `out`; I/O failures (a closed pipe) become report errors.
pub fn write_summary(
    out: &mut impl std::io::Write,
    result: &BacktestResult,
    symbol: &str,
) -> Result<(), TurtleError> {
    out.write_all(format_summary(result, symbol).as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| TurtleError::Report {
            reason: format!("failed to write summary: {e}"),
        })
}

impl ReportPort for ConsoleReportAdapter {
    fn write(&self, result: &BacktestResult, symbol: &str) -> Result<(), TurtleError> {
        write_summary(&mut std::io::stdout().lock(), result, symbol)
    }
}
