//! Turtle system parameters.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_ENTRY_WINDOW: usize = 20;
pub const DEFAULT_EXIT_WINDOW: usize = 10;
pub const DEFAULT_ATR_PERIOD: usize = 14;

/// Order in which same-step signals are resolved by the position state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalPriority {
    /// Long entry, then short entry, then exit.
    #[default]
    EntryFirst,
    /// Exit, then long entry, then short entry.
    ExitFirst,
}

impl FromStr for SignalPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry_first" | "entry" => Ok(SignalPriority::EntryFirst),
            "exit_first" | "exit" => Ok(SignalPriority::ExitFirst),
            other => Err(format!(
                "unknown priority '{other}' (expected entry_first or exit_first)"
            )),
        }
    }
}

impl fmt::Display for SignalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalPriority::EntryFirst => write!(f, "entry_first"),
            SignalPriority::ExitFirst => write!(f, "exit_first"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurtleParams {
    pub entry_window: usize,
    pub exit_window: usize,
    pub atr_period: usize,
    pub priority: SignalPriority,
}

impl TurtleParams {
    /// Largest rolling window; a series must have at least this many bars.
    pub fn min_bars(&self) -> usize {
        self.entry_window.max(self.exit_window).max(self.atr_period)
    }
}

impl Default for TurtleParams {
    fn default() -> Self {
        Self {
            entry_window: DEFAULT_ENTRY_WINDOW,
            exit_window: DEFAULT_EXIT_WINDOW,
            atr_period: DEFAULT_ATR_PERIOD,
            priority: SignalPriority::EntryFirst,
        }
    }
}
