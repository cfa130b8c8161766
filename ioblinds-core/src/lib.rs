//! Board-agnostic core logic for the blind controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Blind configuration and validation
//! - Travel math (durations, step intervals, end-of-travel offset)
//! - Position state machine and published events
//! - Cancellable timers driven by a millisecond clock
//! - Debounced pushbutton inputs
//! - The [`BlindController`] that ties them together
//!
//! The controller never sleeps or spawns anything. The caller feeds it the
//! current time through [`BlindController::poll`] and asks
//! [`BlindController::next_deadline_ms`] when to come back.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod input;
pub mod motion;
pub mod scheduler;
pub mod state;

pub use controller::{BlindController, CommandError, SetupError};
