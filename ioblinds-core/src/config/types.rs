//! Configuration type definitions
//!
//! These types mirror the recognized configuration options of a blind:
//! expander bus identifiers, the four pins, travel durations, the input poll
//! period and the relay polarity.

use ioblinds_hal::{BlindName, Level};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest pin number on a 16-bit port expander
pub const MAX_PIN: u8 = 15;

/// Default I2C address of the expander (all address straps high)
pub const DEFAULT_EXPANDER_ADDRESS: u8 = 0x27;

/// Default I2C bus number
pub const DEFAULT_EXPANDER_DEVICE: u8 = 1;

/// Default input poll period in ms
pub const DEFAULT_INPUT_INTERVAL_MS: u32 = 100;

/// Port expander location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExpanderConfig {
    /// 7-bit I2C address
    pub address: u8,
    /// I2C bus number the expander is attached to
    pub device: u8,
    /// Verbose logging of controller activity
    pub debug: bool,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_EXPANDER_ADDRESS,
            device: DEFAULT_EXPANDER_DEVICE,
            debug: false,
        }
    }
}

/// Expander pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlindPins {
    /// Up pushbutton
    pub up_input: u8,
    /// Up relay
    pub up_output: u8,
    /// Down pushbutton
    pub down_input: u8,
    /// Down relay
    pub down_output: u8,
}

impl Default for BlindPins {
    fn default() -> Self {
        Self {
            up_input: 0,
            down_input: 1,
            up_output: 8,
            down_output: 9,
        }
    }
}

impl BlindPins {
    /// All pins in a fixed order
    pub fn all(&self) -> [u8; 4] {
        [self.up_input, self.up_output, self.down_input, self.down_output]
    }
}

/// Travel timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TravelConfig {
    /// Time for a full 0 → 100 travel (ms)
    pub duration_up_ms: u32,
    /// Time for a full 100 → 0 travel (ms)
    pub duration_down_ms: u32,
    /// Extra relay hold time when commanding exactly 0 or 100 (ms)
    pub duration_offset_ms: u32,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            duration_up_ms: 20_000,
            duration_down_ms: 20_000,
            duration_offset_ms: 0,
        }
    }
}

/// Complete configuration of one blind
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlindConfig {
    /// Blind name, also the persistence key for its position
    pub name: BlindName,
    /// Expander location
    pub expander: ExpanderConfig,
    /// Pin assignment
    pub pins: BlindPins,
    /// Travel timing
    pub travel: TravelConfig,
    /// Pushbutton poll period (ms)
    pub input_interval_ms: u32,
    /// Relays energize on a low output
    pub active_low: bool,
}

impl Default for BlindConfig {
    fn default() -> Self {
        let mut name = BlindName::new();
        let _ = name.push_str("Blind");
        Self {
            name,
            expander: ExpanderConfig::default(),
            pins: BlindPins::default(),
            travel: TravelConfig::default(),
            input_interval_ms: DEFAULT_INPUT_INTERVAL_MS,
            active_low: true,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Blind name is empty
    EmptyName,
    /// I2C address does not fit in 7 bits
    InvalidAddress(u8),
    /// Pin number beyond the expander
    PinOutOfRange(u8),
    /// The same pin is assigned twice
    DuplicatePin(u8),
    /// A full-travel duration is zero
    ZeroTravelDuration,
    /// Input poll period is zero
    ZeroInputInterval,
}

impl BlindConfig {
    /// Output level that leaves a relay released
    pub fn initial_level(&self) -> Level {
        if self.active_low {
            Level::High
        } else {
            Level::Low
        }
    }

    /// Output level that energizes a relay
    pub fn active_level(&self) -> Level {
        self.initial_level().inverted()
    }

    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.expander.address > 0x7F {
            return Err(ConfigError::InvalidAddress(self.expander.address));
        }

        let pins = self.pins.all();
        for (i, &pin) in pins.iter().enumerate() {
            if pin > MAX_PIN {
                return Err(ConfigError::PinOutOfRange(pin));
            }
            if pins[i + 1..].contains(&pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }

        if self.travel.duration_up_ms == 0 || self.travel.duration_down_ms == 0 {
            return Err(ConfigError::ZeroTravelDuration);
        }
        if self.input_interval_ms == 0 {
            return Err(ConfigError::ZeroInputInterval);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BlindConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.expander.address, 0x27);
        assert_eq!(config.expander.device, 1);
        assert_eq!(config.input_interval_ms, 100);
        assert!(config.active_low);
    }

    #[test]
    fn test_polarity_levels() {
        let mut config = BlindConfig::default();
        assert_eq!(config.initial_level(), Level::High);
        assert_eq!(config.active_level(), Level::Low);

        config.active_low = false;
        assert_eq!(config.initial_level(), Level::Low);
        assert_eq!(config.active_level(), Level::High);
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = BlindConfig::default();
        config.pins.down_output = config.pins.up_output;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePin(config.pins.up_output))
        );
    }

    #[test]
    fn test_pin_out_of_range_rejected() {
        let mut config = BlindConfig::default();
        config.pins.up_input = 16;
        assert_eq!(config.validate(), Err(ConfigError::PinOutOfRange(16)));
    }

    #[test]
    fn test_zero_durations_rejected() {
        let mut config = BlindConfig::default();
        config.travel.duration_down_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTravelDuration));

        let mut config = BlindConfig::default();
        config.input_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInputInterval));
    }

    #[test]
    fn test_empty_name_and_bad_address_rejected() {
        let mut config = BlindConfig::default();
        config.name.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));

        let mut config = BlindConfig::default();
        config.expander.address = 0x80;
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0x80)));
    }
}
