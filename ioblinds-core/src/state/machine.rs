//! Position state machine
//!
//! The blind is either stopped or moving in one direction. Every output and
//! timer decision in the controller follows from the current state and a
//! motion event.

use crate::motion::Direction;

/// Reported motion state
///
/// Discriminants are the wire values used by the accessory protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PositionState {
    /// Moving towards 0
    Decreasing = 0,
    /// Moving towards 100
    Increasing = 1,
    /// Not moving
    #[default]
    Stopped = 2,
}

/// Events that drive the position state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionEvent {
    /// A command with a nonzero delta started travel in a direction
    Start(Direction),
    /// The completion timeout fired
    Complete,
    /// Motion was cut short (forced stop, retarget to the current position)
    Halt,
}

impl PositionState {
    /// State while travelling in `direction`
    pub fn moving(direction: Direction) -> Self {
        match direction {
            Direction::Up => PositionState::Increasing,
            Direction::Down => PositionState::Decreasing,
        }
    }

    /// Check if the blind is moving
    pub fn is_moving(self) -> bool {
        self != PositionState::Stopped
    }

    /// Direction of travel, if moving
    pub fn direction(self) -> Option<Direction> {
        match self {
            PositionState::Increasing => Some(Direction::Up),
            PositionState::Decreasing => Some(Direction::Down),
            PositionState::Stopped => None,
        }
    }

    /// Check if a command in `direction` would reverse the current travel
    pub fn is_opposite(self, direction: Direction) -> bool {
        self.direction() == Some(direction.opposite())
    }

    /// Wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PositionState::Decreasing),
            1 => Some(PositionState::Increasing),
            2 => Some(PositionState::Stopped),
            _ => None,
        }
    }

    /// Process an event and return the next state
    pub fn transition(self, event: MotionEvent) -> Self {
        match event {
            // Also covers reversal: Increasing -> Decreasing and back
            MotionEvent::Start(direction) => Self::moving(direction),
            MotionEvent::Complete | MotionEvent::Halt => PositionState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(PositionState::default(), PositionState::Stopped);
        assert!(!PositionState::default().is_moving());
    }

    #[test]
    fn test_start_from_stopped() {
        let s = PositionState::Stopped;
        assert_eq!(
            s.transition(MotionEvent::Start(Direction::Up)),
            PositionState::Increasing
        );
        assert_eq!(
            s.transition(MotionEvent::Start(Direction::Down)),
            PositionState::Decreasing
        );
    }

    #[test]
    fn test_reversal_while_moving() {
        let s = PositionState::Increasing;
        assert!(s.is_opposite(Direction::Down));
        assert!(!s.is_opposite(Direction::Up));
        assert_eq!(
            s.transition(MotionEvent::Start(Direction::Down)),
            PositionState::Decreasing
        );
    }

    #[test]
    fn test_completion_and_halt_stop() {
        for s in [PositionState::Increasing, PositionState::Decreasing] {
            assert_eq!(s.transition(MotionEvent::Complete), PositionState::Stopped);
            assert_eq!(s.transition(MotionEvent::Halt), PositionState::Stopped);
        }
        assert_eq!(
            PositionState::Stopped.transition(MotionEvent::Halt),
            PositionState::Stopped
        );
    }

    #[test]
    fn test_stopped_is_never_opposite() {
        assert!(!PositionState::Stopped.is_opposite(Direction::Up));
        assert!(!PositionState::Stopped.is_opposite(Direction::Down));
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(PositionState::Decreasing.as_u8(), 0);
        assert_eq!(PositionState::Increasing.as_u8(), 1);
        assert_eq!(PositionState::Stopped.as_u8(), 2);
        for v in 0..3 {
            assert_eq!(PositionState::from_u8(v).unwrap().as_u8(), v);
        }
        assert_eq!(PositionState::from_u8(3), None);
    }
}
