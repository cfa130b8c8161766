//! Motion planning
//!
//! Without a position sensor, travel is planned purely from the position
//! delta and the configured full-travel durations.

pub mod travel;

pub use travel::*;
