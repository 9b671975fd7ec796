//! Backtest pipeline: prepare → indicators/signals/positions → evaluate.
//!
//! BacktestConfig bundles the system and metric parameters for one run.

use crate::domain::error::TurtleError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::metrics::{self, EquityPoint, MetricsParams, PerformanceReport};
use crate::domain::position::PositionTrajectory;
use crate::domain::price::RawPriceRecord;
use crate::domain::series::PriceSeries;
use crate::domain::signal::{self, Signals};
use crate::domain::strategy::TurtleParams;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestConfig {
    pub turtle: TurtleParams,
    pub metrics: MetricsParams,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub series: PriceSeries,
    pub frame: IndicatorFrame,
    pub signals: Vec<Signals>,
    pub positions: PositionTrajectory,
    pub benchmark_returns: Vec<f64>,
    pub strategy_returns: Vec<f64>,
    pub strategy_equity: Vec<EquityPoint>,
    pub benchmark_equity: Vec<EquityPoint>,
    pub report: PerformanceReport,
}

/// Run the full pipeline over raw records.
pub fn run(
    records: Vec<RawPriceRecord>,
    config: &BacktestConfig,
) -> Result<BacktestResult, TurtleError> {
    let series = PriceSeries::prepare(records, config.turtle.min_bars())?;
    info!(
        bars = series.len(),
        first = ?series.first_date(),
        last = ?series.last_date(),
        "prepared price series"
    );
    run_series(series, config)
}

/// Indicator frame, signals and positions for a prepared series.
pub fn compute_positions(
    series: &PriceSeries,
    params: &TurtleParams,
) -> Result<(IndicatorFrame, Vec<Signals>, PositionTrajectory), TurtleError> {
    let frame = IndicatorFrame::compute(series, params)?;
    let signals = signal::generate(series, &frame);
    let positions = PositionTrajectory::from_signals(&signals, params.priority);
    Ok((frame, signals, positions))
}

/// Run the engine and evaluator over an already prepared series.
pub fn run_series(
    series: PriceSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, TurtleError> {
    let (frame, signals, positions) = compute_positions(&series, &config.turtle)?;
    debug!(
        signal_steps = signals.iter().filter(|s| s.any()).count(),
        transitions = positions.transitions(),
        priority = %config.turtle.priority,
        "computed position trajectory"
    );

    let eval = metrics::evaluate(&series, &positions, frame.latest_atr(), &config.metrics)?;
    info!(
        cagr_strategy = eval.report.cagr_strategy,
        cagr_benchmark = eval.report.cagr_benchmark,
        "evaluated performance"
    );

    Ok(BacktestResult {
        series,
        frame,
        signals,
        positions,
        benchmark_returns: eval.benchmark_returns,
        strategy_returns: eval.strategy_returns,
        strategy_equity: eval.strategy_equity,
        benchmark_equity: eval.benchmark_equity,
        report: eval.report,
    })
}
