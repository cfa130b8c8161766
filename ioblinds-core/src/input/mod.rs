//! Pushbutton inputs
//!
//! Buttons are sampled at a fixed period and debounced by comparing each
//! sample with the previous one. There is no dedicated debounce timer.

pub mod debounce;

pub use debounce::{DebouncedInput, Edge};
