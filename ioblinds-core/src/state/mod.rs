//! Position state machine and the events the controller publishes

pub mod events;
pub mod machine;

pub use events::BlindEvent;
pub use machine::{MotionEvent, PositionState};
