//! GPIO expander drivers

pub mod mcp23017;

pub use mcp23017::{Mcp23017, Mcp23017Error};
