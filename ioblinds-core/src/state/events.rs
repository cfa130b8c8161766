//! Events published by the controller
//!
//! State changes are published so the bridge can notify its host; faults are
//! published so the firmware can log them. Nothing here is fatal.

use crate::motion::Direction;
use crate::state::PositionState;

/// Events published by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlindEvent {
    // Published state
    /// Motion state changed
    PositionStateChanged(PositionState),
    /// Estimated position changed
    CurrentPositionChanged(u8),
    /// Target position changed
    TargetPositionChanged(u8),

    // Manual switches
    /// A pushbutton was pressed
    ManualPress {
        direction: Direction,
        /// False when the blind was already moving that way
        accepted: bool,
    },

    // Faults
    /// Reading an input pin failed; the sample was discarded
    InputReadFailed { pin: u8 },
    /// Writing an output pin failed
    OutputWriteFailed { pin: u8 },
    /// The position store rejected a read or write
    StoreFailed,
    /// The stored position was outside 0-100 and was ignored
    StoredPositionInvalid(u8),
}

impl BlindEvent {
    /// Check if this event reports a fault
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            BlindEvent::InputReadFailed { .. }
                | BlindEvent::OutputWriteFailed { .. }
                | BlindEvent::StoreFailed
                | BlindEvent::StoredPositionInvalid(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_classification() {
        assert!(BlindEvent::InputReadFailed { pin: 0 }.is_fault());
        assert!(BlindEvent::StoreFailed.is_fault());
        assert!(!BlindEvent::CurrentPositionChanged(10).is_fault());
        assert!(!BlindEvent::ManualPress {
            direction: Direction::Up,
            accepted: true
        }
        .is_fault());
    }
}
