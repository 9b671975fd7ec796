//! Performance metrics: returns, equity curves, CAGR, Sharpe, drawdown.

use crate::domain::error::TurtleError;
use crate::domain::position::PositionTrajectory;
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsParams {
    pub trading_days_per_year: f64,
    pub calendar_days_per_year: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            calendar_days_per_year: CALENDAR_DAYS_PER_YEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub cagr_strategy: f64,
    pub cagr_benchmark: f64,
    pub sharpe_strategy: Option<f64>,
    pub sharpe_benchmark: Option<f64>,
    pub max_drawdown_strategy: f64,
    pub max_drawdown_benchmark: f64,
    pub latest_atr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Buy-and-hold returns; index 0 corresponds to step 1 of the series.
    pub benchmark_returns: Vec<f64>,
    /// Lagged strategy returns, aligned with `benchmark_returns`.
    pub strategy_returns: Vec<f64>,
    pub strategy_equity: Vec<EquityPoint>,
    pub benchmark_equity: Vec<EquityPoint>,
    pub report: PerformanceReport,
}

/// r[i] = close[i] / close[i-1] - 1 for i >= 1.
pub fn period_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Apply yesterday's position to today's return.
///
/// `returns[k]` is the return of step k+1, so it is paired with `positions[k]`.
pub fn strategy_returns(positions: &PositionTrajectory, returns: &[f64]) -> Vec<f64> {
    positions
        .positions()
        .iter()
        .zip(returns)
        .map(|(p, r)| p.as_f64() * r)
        .collect()
}

/// Cumulative product of (1 + r), starting at 1.0 on the first date.
///
/// `dates` has one more element than `returns`.
pub fn equity_curve(dates: &[NaiveDate], returns: &[f64]) -> Vec<EquityPoint> {
    let Some(&first) = dates.first() else {
        return Vec::new();
    };

    let mut curve = Vec::with_capacity(dates.len());
    curve.push(EquityPoint {
        date: first,
        value: 1.0,
    });

    let mut value = 1.0;
    for (&date, r) in dates[1..].iter().zip(returns) {
        value *= 1.0 + r;
        curve.push(EquityPoint { date, value });
    }

    curve
}

/// (last / first) ^ (days_per_year / days_elapsed) - 1
pub fn cagr(curve: &[EquityPoint], calendar_days_per_year: f64) -> Result<f64, TurtleError> {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return Err(TurtleError::DegenerateSeries {
            reason: "equity curve is empty".into(),
        });
    };

    let days = (last.date - first.date).num_days();
    if days <= 0 {
        return Err(TurtleError::DegenerateSeries {
            reason: format!("zero time span ({} to {})", first.date, last.date),
        });
    }
    if first.value == 0.0 {
        return Err(TurtleError::DegenerateSeries {
            reason: format!("equity is zero at {}", first.date),
        });
    }

    Ok((last.value / first.value).powf(calendar_days_per_year / days as f64) - 1.0)
}

/// sqrt(days_per_year) * mean / sample stddev; `None` when undefined.
pub fn sharpe(returns: &[f64], trading_days_per_year: f64) -> Option<f64> {
    if returns.len() < 2 || returns.iter().all(|&r| r == returns[0]) {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 && stddev.is_finite() {
        Some(trading_days_per_year.sqrt() * mean / stddev)
    } else {
        None
    }
}

/// min(value / running_max - 1); 0.0 for empty or never-declining curves.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;

    for &v in values {
        peak = peak.max(v);
        if peak > 0.0 {
            max_dd = max_dd.min(v / peak - 1.0);
        }
    }

    max_dd
}

fn curve_values(curve: &[EquityPoint]) -> Vec<f64> {
    curve.iter().map(|p| p.value).collect()
}

/// Build returns, both equity curves and the summary report.
pub fn evaluate(
    series: &PriceSeries,
    positions: &PositionTrajectory,
    latest_atr: Option<f64>,
    params: &MetricsParams,
) -> Result<Evaluation, TurtleError> {
    if positions.len() != series.len() {
        return Err(TurtleError::DegenerateSeries {
            reason: format!(
                "position trajectory has {} steps but series has {}",
                positions.len(),
                series.len()
            ),
        });
    }

    let dates: Vec<NaiveDate> = series.dates().collect();
    let benchmark_returns = period_returns(&series.closes());
    let strategy_returns = strategy_returns(positions, &benchmark_returns);

    let strategy_equity = equity_curve(&dates, &strategy_returns);
    let benchmark_equity = equity_curve(&dates, &benchmark_returns);

    let report = PerformanceReport {
        cagr_strategy: cagr(&strategy_equity, params.calendar_days_per_year)?,
        cagr_benchmark: cagr(&benchmark_equity, params.calendar_days_per_year)?,
        sharpe_strategy: sharpe(&strategy_returns, params.trading_days_per_year),
        sharpe_benchmark: sharpe(&benchmark_returns, params.trading_days_per_year),
        max_drawdown_strategy: max_drawdown(&curve_values(&strategy_equity)),
        max_drawdown_benchmark: max_drawdown(&curve_values(&benchmark_equity)),
        latest_atr,
    };

    Ok(Evaluation {
        benchmark_returns,
        strategy_returns,
        strategy_equity,
        benchmark_equity,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Position;
    use crate::domain::price::RawPriceRecord;
    use crate::domain::signal::Signals;
    use crate::domain::strategy::SignalPriority;
    use approx::assert_relative_eq;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn make_curve(values: &[f64]) -> Vec<EquityPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| EquityPoint {
                date: day(i as i64),
                value,
            })
            .collect()
    }

    fn make_series(closes: &[f64]) -> PriceSeries {
        let records = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| RawPriceRecord::new(day(i as i64), c, c, c))
            .collect();
        PriceSeries::prepare(records, 1).unwrap()
    }

    fn trajectory(entries: &[Signals]) -> PositionTrajectory {
        PositionTrajectory::from_signals(entries, SignalPriority::EntryFirst)
    }

    #[test]
    fn period_returns_basic() {
        let r = period_returns(&[100.0, 110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert_relative_eq!(r[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn strategy_returns_lag_positions_by_one_step() {
        let long = Signals {
            long_entry: true,
            ..Signals::default()
        };
        // positions: [0, 1, 1]
        let t = trajectory(&[Signals::default(), long, Signals::default()]);
        assert_eq!(t.positions()[1], Position::Long);

        let r = strategy_returns(&t, &[0.10, 0.05]);
        // step 1 uses position[0] = 0, step 2 uses position[1] = +1
        assert_eq!(r, vec![0.0, 0.05]);
    }

    #[test]
    fn short_position_inverts_return() {
        let short = Signals {
            short_entry: true,
            ..Signals::default()
        };
        let t = trajectory(&[Signals::default(), short, Signals::default()]);
        let r = strategy_returns(&t, &[0.10, 0.05]);
        assert_eq!(r, vec![0.0, -0.05]);
    }

    #[test]
    fn equity_curve_compounds_from_one() {
        let dates = [day(0), day(1), day(2)];
        let curve = equity_curve(&dates, &[0.10, -0.10]);
        assert_eq!(curve.len(), 3);
        assert_relative_eq!(curve[0].value, 1.0);
        assert_relative_eq!(curve[1].value, 1.10, epsilon = 1e-12);
        assert_relative_eq!(curve[2].value, 0.99, epsilon = 1e-12);
        assert_eq!(curve[2].date, day(2));
    }

    #[test]
    fn equity_curve_empty() {
        assert!(equity_curve(&[], &[]).is_empty());
    }

    #[test]
    fn cagr_doubling_over_one_year() {
        let curve = vec![
            EquityPoint {
                date: day(0),
                value: 1.0,
            },
            EquityPoint {
                date: day(365),
                value: 2.0,
            },
        ];
        assert_relative_eq!(cagr(&curve, 365.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cagr_zero_span_is_degenerate() {
        let curve = make_curve(&[1.0]);
        assert!(matches!(
            cagr(&curve, 365.0),
            Err(TurtleError::DegenerateSeries { .. })
        ));
    }

    #[test]
    fn cagr_zero_base_is_degenerate() {
        let curve = make_curve(&[0.0, 1.0]);
        assert!(matches!(
            cagr(&curve, 365.0),
            Err(TurtleError::DegenerateSeries { .. })
        ));
        assert!(matches!(
            cagr(&[], 365.0),
            Err(TurtleError::DegenerateSeries { .. })
        ));
    }

    #[test]
    fn sharpe_zero_variance_is_unavailable() {
        assert_eq!(sharpe(&[0.0; 30], 252.0), None);
        assert_eq!(sharpe(&[0.01; 30], 252.0), None);
        assert_eq!(sharpe(&[0.01], 252.0), None);
    }

    #[test]
    fn sharpe_uses_sample_stddev() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        // mean = 0.005, sample variance = (0.000025*2 + 0.000225*2) / 3
        let mean = 0.005_f64;
        let var = (0.005_f64.powi(2) + 0.015_f64.powi(2) + 0.015_f64.powi(2) + 0.005_f64.powi(2))
            / 3.0;
        let expected = 252.0_f64.sqrt() * mean / var.sqrt();
        assert_relative_eq!(sharpe(&returns, 252.0).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_example() {
        let dd = max_drawdown(&[1.0, 1.2, 0.9, 1.1]);
        assert_relative_eq!(dd, -0.25, epsilon = 1e-12);
    }

    #[test]
    fn max_drawdown_non_decreasing_is_zero() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 1.05, 1.10]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn evaluate_flat_strategy() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = make_series(&closes);
        let t = trajectory(&vec![Signals::default(); 30]);

        let eval = evaluate(&series, &t, None, &MetricsParams::default()).unwrap();

        assert_eq!(eval.strategy_equity.len(), 30);
        assert_eq!(eval.benchmark_equity.len(), 30);
        assert!(eval.strategy_equity.iter().all(|p| p.value == 1.0));
        assert_relative_eq!(eval.report.cagr_strategy, 0.0);
        assert_eq!(eval.report.sharpe_strategy, None);
        assert_eq!(eval.report.max_drawdown_strategy, 0.0);

        let last = eval.benchmark_equity.last().unwrap().value;
        assert_relative_eq!(last, 129.0 / 100.0, epsilon = 1e-12);
        assert!(eval.report.cagr_benchmark > 0.0);
        assert_eq!(eval.report.max_drawdown_benchmark, 0.0);
    }

    #[test]
    fn evaluate_rejects_misaligned_positions() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        let t = trajectory(&[Signals::default(); 2]);
        assert!(evaluate(&series, &t, None, &MetricsParams::default()).is_err());
    }
}
