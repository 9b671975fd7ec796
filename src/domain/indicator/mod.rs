//! Breakout channels and volatility (ATR) over a [`PriceSeries`].
//!
//! This module provides:
//! - `Channel`: rolling high/low band for one step
//! - `IndicatorRow`: all indicator values for one step
//! - `IndicatorFrame`: rows aligned 1:1 with the price series
//!
//! Values that need more history than is available are `None`.

pub mod atr;
pub mod channel;

use crate::domain::error::TurtleError;
use crate::domain::series::PriceSeries;
use crate::domain::strategy::TurtleParams;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub entry: Option<Channel>,
    pub exit: Option<Channel>,
    pub true_range: Option<f64>,
    pub atr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// Compute entry/exit channels, true range and ATR for every step.
    ///
    /// Fails fast with `InsufficientData` when the series cannot fill the
    /// largest window.
    pub fn compute(series: &PriceSeries, params: &TurtleParams) -> Result<Self, TurtleError> {
        let minimum = params.min_bars();
        if series.len() < minimum {
            return Err(TurtleError::InsufficientData {
                bars: series.len(),
                minimum,
            });
        }

        let points = series.points();
        let entry = channel::donchian(points, params.entry_window);
        let exit = channel::donchian(points, params.exit_window);
        let true_range = atr::true_range(points);
        let atr = atr::rolling_atr(&true_range, params.atr_period);

        let rows = points
            .iter()
            .enumerate()
            .map(|(i, p)| IndicatorRow {
                date: p.date,
                entry: entry[i],
                exit: exit[i],
                true_range: true_range[i],
                atr: atr[i],
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// ATR of the most recent step, if its window is filled.
    pub fn latest_atr(&self) -> Option<f64> {
        self.rows.last().and_then(|r| r.atr)
    }
}
