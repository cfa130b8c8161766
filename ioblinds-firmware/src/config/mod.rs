//! Configuration and position persistence
//!
//! Loads the blind configuration from flash or the embedded blind.toml,
//! and keeps the last known position in flash across power cycles.

pub mod loader;
pub mod position;
pub mod toml;

pub use loader::{log_config_summary, ConfigPersistence};
pub use position::{load_position, save_position, PersistError};
pub use toml::parse_config;
