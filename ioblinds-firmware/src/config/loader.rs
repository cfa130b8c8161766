//! Configuration loading
//!
//! A TOML override stored in flash wins over the blind.toml embedded at
//! build time. If neither parses, built-in defaults are used so the relays
//! still end up in a safe state.

use core::str;
use defmt::*;

use ioblinds_core::config::BlindConfig;
use ioblinds_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
use ioblinds_hal_rp2040::FlashStorageTrait;

use super::toml::{parse_config, ParseError};

/// Maximum TOML config size
const MAX_TOML_SIZE: usize = 2048;

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// TOML parsing failed
    Parse(ParseError),
}

impl From<FlashError> for LoadError {
    fn from(e: FlashError) -> Self {
        LoadError::Flash(e)
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<'d> {
    storage: FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    /// Create a new config persistence manager
    pub fn new(storage: FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Give the storage back for position persistence
    pub fn into_storage(self) -> FlashStorage<'d> {
        self.storage
    }

    /// Load the configuration, falling back to `embedded` and then defaults
    pub async fn load(&mut self, embedded: &str) -> BlindConfig {
        match self.load_override().await {
            Ok(config) => {
                info!("Loaded configuration override from flash");
                return config;
            }
            Err(LoadError::Flash(FlashError::NotFound)) => {
                debug!("No configuration override in flash");
            }
            Err(e) => {
                warn!("Ignoring configuration override: {:?}", e);
            }
        }

        match parse_config(embedded) {
            Ok(config) => {
                info!("Parsed embedded configuration");
                config
            }
            Err(e) => {
                error!("Failed to parse embedded config: {:?}", e);
                error!("Using default configuration");
                BlindConfig::default()
            }
        }
    }

    async fn load_override(&mut self) -> Result<BlindConfig, LoadError> {
        let mut buffer = [0u8; MAX_TOML_SIZE];
        let len = self
            .storage
            .read(&StorageKey::ConfigToml, &mut buffer)
            .await?;

        debug!("Read {} bytes of TOML from flash", len);

        let toml_str = str::from_utf8(&buffer[..len]).map_err(|_| LoadError::InvalidUtf8)?;
        Ok(parse_config(toml_str)?)
    }
}

/// Log the configuration the controller will run with
pub fn log_config_summary(config: &BlindConfig) {
    info!(
        "Blind '{}': expander {:#x} on I2C{}",
        config.name.as_str(),
        config.expander.address,
        config.expander.device
    );
    info!(
        "  pins up {}/{} down {}/{}, active {}",
        config.pins.up_input,
        config.pins.up_output,
        config.pins.down_input,
        config.pins.down_output,
        if config.active_low { "low" } else { "high" }
    );
    info!(
        "  travel up {}ms down {}ms offset {}ms, inputs every {}ms",
        config.travel.duration_up_ms,
        config.travel.duration_down_ms,
        config.travel.duration_offset_ms,
        config.input_interval_ms
    );
}
