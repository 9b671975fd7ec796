//! Position state machine and trajectory.

use crate::domain::signal::Signals;
use crate::domain::strategy::SignalPriority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    Short,
    #[default]
    Flat,
    Long,
}

impl Position {
    pub fn as_i8(self) -> i8 {
        match self {
            Position::Short => -1,
            Position::Flat => 0,
            Position::Long => 1,
        }
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.as_i8())
    }

    pub fn is_flat(self) -> bool {
        self == Position::Flat
    }
}

/// Single transition of the state machine.
pub fn next_position(prev: Position, signals: Signals, priority: SignalPriority) -> Position {
    match priority {
        SignalPriority::EntryFirst => {
            if signals.long_entry {
                Position::Long
            } else if signals.short_entry {
                Position::Short
            } else if signals.exit {
                Position::Flat
            } else {
                prev
            }
        }
        SignalPriority::ExitFirst => {
            if signals.exit {
                Position::Flat
            } else if signals.long_entry {
                Position::Long
            } else if signals.short_entry {
                Position::Short
            } else {
                prev
            }
        }
    }
}

/// One position per step. Step 0 is always flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTrajectory {
    positions: Vec<Position>,
}

impl PositionTrajectory {
    /// Fold the transition function over the signals, starting flat.
    pub fn from_signals(signals: &[Signals], priority: SignalPriority) -> Self {
        let Some((_, rest)) = signals.split_first() else {
            return Self {
                positions: Vec::new(),
            };
        };

        let positions = std::iter::once(Position::Flat)
            .chain(rest.iter().scan(Position::Flat, |state, &s| {
                *state = next_position(*state, s, priority);
                Some(*state)
            }))
            .collect();

        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn as_i8(&self) -> Vec<i8> {
        self.positions.iter().map(|p| p.as_i8()).collect()
    }

    /// Number of steps where the position differs from the step before.
    pub fn transitions(&self) -> usize {
        self.positions.windows(2).filter(|w| w[0] != w[1]).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(long_entry: bool, short_entry: bool, exit: bool) -> Signals {
        Signals {
            long_entry,
            short_entry,
            exit,
        }
    }

    const NONE: Signals = Signals {
        long_entry: false,
        short_entry: false,
        exit: false,
    };

    #[test]
    fn position_values() {
        assert_eq!(Position::Short.as_i8(), -1);
        assert_eq!(Position::Flat.as_i8(), 0);
        assert_eq!(Position::Long.as_i8(), 1);
        assert_eq!(Position::default(), Position::Flat);
        assert!((Position::Short.as_f64() + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn entry_first_priority_order() {
        let p = SignalPriority::EntryFirst;
        assert_eq!(next_position(Position::Flat, sig(true, true, true), p), Position::Long);
        assert_eq!(next_position(Position::Long, sig(false, true, true), p), Position::Short);
        assert_eq!(next_position(Position::Short, sig(false, false, true), p), Position::Flat);
        assert_eq!(next_position(Position::Short, NONE, p), Position::Short);
        assert_eq!(next_position(Position::Long, NONE, p), Position::Long);
    }

    #[test]
    fn exit_first_priority_order() {
        let p = SignalPriority::ExitFirst;
        assert_eq!(next_position(Position::Long, sig(true, false, true), p), Position::Flat);
        assert_eq!(next_position(Position::Flat, sig(true, true, false), p), Position::Long);
        assert_eq!(next_position(Position::Flat, sig(false, true, false), p), Position::Short);
        assert_eq!(next_position(Position::Long, NONE, p), Position::Long);
    }

    #[test]
    fn first_step_is_flat_even_with_signal() {
        let signals = vec![sig(true, false, false), NONE];
        let t = PositionTrajectory::from_signals(&signals, SignalPriority::EntryFirst);
        assert_eq!(t.positions(), &[Position::Flat, Position::Flat]);
    }

    #[test]
    fn trajectory_carries_forward() {
        let signals = vec![
            NONE,
            NONE,
            sig(true, false, false),
            NONE,
            NONE,
            sig(false, false, true),
            NONE,
            sig(false, true, false),
            NONE,
        ];
        let t = PositionTrajectory::from_signals(&signals, SignalPriority::EntryFirst);
        assert_eq!(t.as_i8(), vec![0, 0, 1, 1, 1, 0, 0, -1, -1]);
        assert_eq!(t.transitions(), 3);
    }

    #[test]
    fn empty_signals() {
        let t = PositionTrajectory::from_signals(&[], SignalPriority::EntryFirst);
        assert!(t.is_empty());
    }
}
