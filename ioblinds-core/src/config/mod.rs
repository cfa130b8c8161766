//! Configuration types
//!
//! Board-agnostic blind configuration. The firmware builds a
//! [`BlindConfig`] from TOML and hands it to the controller by value.

pub mod types;

pub use types::*;
