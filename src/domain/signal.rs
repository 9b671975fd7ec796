//! Breakout entry/exit signals.
//!
//! The close at step i is compared with the channels as of step i-1, so a
//! bar never breaks out of a channel that already includes its own range.

use crate::domain::indicator::{Channel, IndicatorFrame};
use crate::domain::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub long_entry: bool,
    pub short_entry: bool,
    pub exit: bool,
}

impl Signals {
    /// Signals for a close given yesterday's channels. Undefined channels never fire.
    pub fn evaluate(close: f64, prev_entry: Option<Channel>, prev_exit: Option<Channel>) -> Self {
        let (long_entry, short_entry) = match prev_entry {
            Some(ch) => (close > ch.high, close < ch.low),
            None => (false, false),
        };
        let exit = prev_exit.is_some_and(|ch| close < ch.low || close > ch.high);

        Self {
            long_entry,
            short_entry,
            exit,
        }
    }

    pub fn any(&self) -> bool {
        self.long_entry || self.short_entry || self.exit
    }
}

/// One `Signals` per step; step 0 has no prior channel and never fires.
pub fn generate(series: &PriceSeries, frame: &IndicatorFrame) -> Vec<Signals> {
    let points = series.points();
    let mut signals = Vec::with_capacity(points.len());
    if points.is_empty() {
        return signals;
    }

    signals.push(Signals::default());
    for i in 1..points.len() {
        let prev = &frame.rows[i - 1];
        signals.push(Signals::evaluate(points[i].close, prev.entry, prev.exit));
    }

    signals
}
