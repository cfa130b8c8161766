//! Accessory Bridge Protocol
//!
//! This crate defines the UART protocol between the accessory bridge (the
//! host exposing the blind to the home automation framework) and the blind
//! controller.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CRC8 │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B   │
//! └───────┴────────┴──────┴─────────────┴──────┘
//! ```
//!
//! The bridge asks, the controller answers. State changes on the
//! controller side are also pushed unprompted so the bridge never has to
//! poll.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{crc8, Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeRequest, ControllerMessage, ErrorCode};
