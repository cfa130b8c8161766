//! Simple TOML parser for the blind configuration
//!
//! Handles only the subset blind.toml uses, not the full TOML grammar.
//!
//! Supported features:
//! - A single `[blind]` section
//! - Key = value pairs (string, integer, boolean)
//! - Decimal and `0x` hexadecimal integers
//! - Comments (# ...)
//!
//! Keys left out keep their defaults. Unknown keys are ignored so newer
//! files still load on older firmware.

use ioblinds_core::config::{BlindConfig, ConfigError};
use ioblinds_hal::BlindName;

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section other than `[blind]`
    InvalidSection,
    /// Key = value line outside `[blind]`
    MissingSection,
    /// Value has the wrong type or does not fit
    InvalidValue,
    /// Name longer than the stored key allows
    NameTooLong,
    /// I2C bus other than 0 or 1
    InvalidDevice(u8),
    /// Values parsed but the configuration is unusable
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Parse TOML configuration into a validated BlindConfig
pub fn parse_config(input: &str) -> Result<BlindConfig, ParseError> {
    let mut config = BlindConfig::default();
    let mut in_blind = false;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if line[1..line.len() - 1].trim() != "blind" {
                return Err(ParseError::InvalidSection);
            }
            in_blind = true;
            continue;
        }

        let Some((key, value)) = parse_key_value(line) else {
            continue;
        };
        if !in_blind {
            return Err(ParseError::MissingSection);
        }
        apply_value(&mut config, key, value)?;
    }

    if config.expander.device > 1 {
        return Err(ParseError::InvalidDevice(config.expander.device));
    }
    config.validate()?;
    Ok(config)
}

fn apply_value(config: &mut BlindConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "name" => {
            let name = parse_string(value)?;
            config.name = BlindName::try_from(name).map_err(|_| ParseError::NameTooLong)?;
        }
        "address" => config.expander.address = parse_int(value)?,
        "device" => config.expander.device = parse_int(value)?,
        "debug" => config.expander.debug = parse_bool(value)?,
        "pin_up_input" => config.pins.up_input = parse_int(value)?,
        "pin_up_output" => config.pins.up_output = parse_int(value)?,
        "pin_down_input" => config.pins.down_input = parse_int(value)?,
        "pin_down_output" => config.pins.down_output = parse_int(value)?,
        "duration_up" => config.travel.duration_up_ms = parse_int(value)?,
        "duration_down" => config.travel.duration_down_ms = parse_int(value)?,
        "duration_offset" => config.travel.duration_offset_ms = parse_int(value)?,
        "input_interval" => config.input_interval_ms = parse_int(value)?,
        "active_low" => config.active_low = parse_bool(value)?,
        _ => {}
    }
    Ok(())
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

/// Parse a decimal or `0x` hexadecimal integer, `_` separators allowed
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseError> {
    let mut digits = heapless::String::<16>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }

    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse::<u32>(),
    }
    .map_err(|_| ParseError::InvalidValue)?;
    T::try_from(parsed).map_err(|_| ParseError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
