//! Travel timing math
//!
//! All durations are linear in the position delta:
//!
//! ```text
//! duration = round(|target - current| / 100 * full_travel)
//! step     = full_travel / 100          (one 1% tick)
//! hold     = duration + offset          (offset only for targets 0 and 100)
//! ```

use crate::config::TravelConfig;

/// Fully down
pub const MIN_POSITION: u8 = 0;

/// Fully up
pub const MAX_POSITION: u8 = 100;

/// Travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards 100
    Up,
    /// Towards 0
    Down,
}

impl Direction {
    /// Direction needed to go from `current` to `target`
    ///
    /// Equal positions count as up.
    pub fn between(current: u8, target: u8) -> Self {
        if target >= current {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Target of a full travel in this direction
    pub fn full_travel_target(self) -> u8 {
        match self {
            Direction::Up => MAX_POSITION,
            Direction::Down => MIN_POSITION,
        }
    }

    /// The other direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Check if a position is one of the mechanical end-stops
pub fn is_end_of_travel(position: u8) -> bool {
    position == MIN_POSITION || position == MAX_POSITION
}

impl TravelConfig {
    /// Full-travel duration for a direction (ms)
    pub fn full_duration_ms(&self, direction: Direction) -> u32 {
        match direction {
            Direction::Up => self.duration_up_ms,
            Direction::Down => self.duration_down_ms,
        }
    }

    /// Period of one 1% position tick (ms), never zero
    pub fn step_interval_ms(&self, direction: Direction) -> u32 {
        let full = self.full_duration_ms(direction);
        (full.saturating_add(50) / 100).max(1)
    }

    /// Time to travel from `current` to `target` (ms), rounded half up
    pub fn travel_duration_ms(&self, current: u8, target: u8) -> u32 {
        let direction = Direction::between(current, target);
        let delta = current.abs_diff(target) as u64;
        let full = self.full_duration_ms(direction) as u64;
        ((delta * full + 50) / 100) as u32
    }

    /// Relay hold time for a travel of `duration_ms` ending at `target`
    pub fn hold_duration_ms(&self, target: u8, duration_ms: u32) -> u32 {
        if is_end_of_travel(target) {
            duration_ms.saturating_add(self.duration_offset_ms)
        } else {
            duration_ms
        }
    }
}

/// Timing of one motion command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TravelPlan {
    /// Direction of travel
    pub direction: Direction,
    /// Time until the blind is considered arrived (ms)
    pub duration_ms: u32,
    /// Time the relay stays energized (ms)
    pub hold_ms: u32,
    /// Period of the 1% position tick (ms)
    pub step_interval_ms: u32,
}

impl TravelPlan {
    /// Plan a travel from `current` to `target`
    ///
    /// Returns `None` when no motion is needed.
    pub fn new(current: u8, target: u8, travel: &TravelConfig) -> Option<Self> {
        if current == target {
            return None;
        }
        let direction = Direction::between(current, target);
        let duration_ms = travel.travel_duration_ms(current, target);
        Some(Self {
            direction,
            duration_ms,
            hold_ms: travel.hold_duration_ms(target, duration_ms),
            step_interval_ms: travel.step_interval_ms(direction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn travel(up: u32, down: u32, offset: u32) -> TravelConfig {
        TravelConfig {
            duration_up_ms: up,
            duration_down_ms: down,
            duration_offset_ms: offset,
        }
    }

    #[test]
    fn test_partial_travel_duration() {
        let t = travel(10_000, 8_000, 0);
        assert_eq!(t.travel_duration_ms(20, 80), 6000);
        assert_eq!(t.travel_duration_ms(80, 20), 4800);
    }

    #[test]
    fn test_duration_rounds_half_up() {
        // 1% of 1050 ms = 10.5 ms
        let t = travel(1050, 1050, 0);
        assert_eq!(t.travel_duration_ms(0, 1), 11);
        // 3% of 1010 ms = 30.3 ms
        let t = travel(1010, 1010, 0);
        assert_eq!(t.travel_duration_ms(10, 13), 30);
    }

    #[test]
    fn test_offset_only_at_extremes() {
        let t = travel(10_000, 10_000, 500);
        assert_eq!(TravelPlan::new(50, 100, &t).unwrap().hold_ms, 5500);
        assert_eq!(TravelPlan::new(50, 0, &t).unwrap().hold_ms, 5500);
        assert_eq!(TravelPlan::new(0, 50, &t).unwrap().hold_ms, 5000);
        assert_eq!(TravelPlan::new(100, 50, &t).unwrap().hold_ms, 5000);
    }

    #[test]
    fn test_step_interval() {
        let t = travel(15_500, 40, 0);
        assert_eq!(t.step_interval_ms(Direction::Up), 155);
        // Very short travel still ticks
        assert_eq!(t.step_interval_ms(Direction::Down), 1);
    }

    #[test]
    fn test_no_plan_without_delta() {
        assert!(TravelPlan::new(42, 42, &TravelConfig::default()).is_none());
    }

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(10, 20), Direction::Up);
        assert_eq!(Direction::between(20, 10), Direction::Down);
        assert_eq!(Direction::between(30, 30), Direction::Up);
        assert_eq!(Direction::Up.full_travel_target(), 100);
        assert_eq!(Direction::Down.full_travel_target(), 0);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }

    proptest! {
        #[test]
        fn prop_duration_is_linear_in_delta(
            current in 0u8..=100,
            target in 0u8..=100,
            up in 1u32..120_000,
            down in 1u32..120_000,
        ) {
            let t = travel(up, down, 0);
            let full = (if target >= current { up } else { down }) as f64;
            let expected = (current.abs_diff(target) as f64 / 100.0 * full).round() as u32;
            let actual = t.travel_duration_ms(current, target);
            // Float rounding may disagree only on exact .5 boundaries
            prop_assert!(actual.abs_diff(expected) <= 1);
        }

        #[test]
        fn prop_full_travel_takes_configured_duration(up in 1u32..120_000, down in 1u32..120_000) {
            let t = travel(up, down, 0);
            prop_assert_eq!(t.travel_duration_ms(0, 100), up);
            prop_assert_eq!(t.travel_duration_ms(100, 0), down);
        }

        #[test]
        fn prop_hold_never_shorter_than_duration(
            current in 0u8..=100,
            target in 0u8..=100,
            offset in 0u32..5_000,
        ) {
            let t = travel(30_000, 25_000, offset);
            if let Some(plan) = TravelPlan::new(current, target, &t) {
                prop_assert!(plan.hold_ms >= plan.duration_ms);
                prop_assert_eq!(plan.hold_ms - plan.duration_ms, if is_end_of_travel(target) { offset } else { 0 });
            }
        }
    }
}
