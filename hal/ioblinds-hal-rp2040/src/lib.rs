//! RP2040-specific HAL for the blind controller
//!
//! Provides the flash storage driver (implements
//! `ioblinds_hal::FlashStorage`) used to persist blind positions and the
//! configuration override.

#![no_std]

pub mod flash;

// Re-export shared traits from ioblinds-hal for convenience
pub use ioblinds_hal::{FlashStorage as FlashStorageTrait, StorageKey};
