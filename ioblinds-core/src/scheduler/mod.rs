//! Cancellable timers
//!
//! One-shot timeouts and fixed-period intervals measured against a
//! caller-supplied millisecond clock.

pub mod timer;

pub use timer::{Interval, Timeout};
