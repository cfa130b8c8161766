//! ioblinds Hardware Abstraction Layer
//!
//! This crate defines the seams between the blind controller logic and the
//! hardware it drives. The controller never talks to a bus or a flash chip
//! directly; it only sees these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ioblinds-core (BlindController)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ioblinds-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  ioblinds-    │       │  ioblinds-    │
//! │  drivers      │       │  hal-rp2040   │
//! │  (MCP23017)   │       │  (flash)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioExpander`] - Pin mode, digital read and write on an expander
//! - [`store::PositionStore`] - Synchronous position persistence by blind name
//! - [`flash::FlashStorage`] - Async wear-levelled key-value flash storage

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod store;

// Re-export key traits at crate root for convenience
pub use flash::{BlindName, FlashError, FlashStorage, StorageKey, MAX_NAME_LEN};
pub use gpio::{GpioExpander, Level, PinMode};
pub use store::PositionStore;
