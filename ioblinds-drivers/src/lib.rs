//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in ioblinds-hal:
//!
//! - GPIO expanders (MCP23017 over I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod expander;
