//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::TurtleError;

/// Port for presenting backtest results (console text, charts, files).
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, symbol: &str) -> Result<(), TurtleError>;
}
