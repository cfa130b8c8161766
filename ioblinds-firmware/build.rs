//! Build script for ioblinds-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates blind.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest blind name the firmware stores
const MAX_NAME_LEN: usize = 24;

/// Highest expander pin
const MAX_PIN: i64 = 15;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate blind.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=blind.toml");

    let config_path = Path::new("blind.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: blind.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a blind.toml configuration file.            ║\n\
            ║  Please create one in the ioblinds-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read blind.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in blind.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_blind(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid blind configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=blind.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check the [blind] table, collecting every problem found
fn validate_blind(config: &toml::Value) -> Vec<String> {
    let blind = match config.get("blind") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => return vec!["[blind] must be a table".to_string()],
        None => return vec!["Missing [blind] section".to_string()],
    };

    let mut errors = Vec::new();

    match blind.get("name") {
        Some(toml::Value::String(name)) => {
            if name.is_empty() {
                errors.push("[blind] name cannot be empty".to_string());
            }
            if name.len() > MAX_NAME_LEN {
                errors.push(format!("[blind] name longer than {} bytes", MAX_NAME_LEN));
            }
        }
        Some(_) => errors.push("[blind] name must be a string".to_string()),
        None => {}
    }

    check_int(blind, "address", 0, 0x7F, &mut errors);
    check_int(blind, "device", 0, 1, &mut errors);
    check_int(blind, "duration_up", 1, u32::MAX as i64, &mut errors);
    check_int(blind, "duration_down", 1, u32::MAX as i64, &mut errors);
    check_int(blind, "duration_offset", 0, u32::MAX as i64, &mut errors);
    check_int(blind, "input_interval", 1, u32::MAX as i64, &mut errors);

    for key in ["debug", "active_low"] {
        if let Some(value) = blind.get(key) {
            if !value.is_bool() {
                errors.push(format!("[blind] {} must be true or false", key));
            }
        }
    }

    let mut pins: Vec<(&str, i64)> = Vec::new();
    for key in [
        "pin_up_input",
        "pin_up_output",
        "pin_down_input",
        "pin_down_output",
    ] {
        if let Some(pin) = check_int(blind, key, 0, MAX_PIN, &mut errors) {
            if let Some((other, _)) = pins.iter().find(|(_, p)| *p == pin) {
                errors.push(format!("[blind] {} and {} share pin {}", other, key, pin));
            }
            pins.push((key, pin));
        }
    }

    errors
}

/// Check an optional integer key against an inclusive range
fn check_int(
    table: &toml::Table,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(value)) => {
            if *value < min || *value > max {
                errors.push(format!("[blind] {} must be {}-{}", key, min, max));
                None
            } else {
                Some(*value)
            }
        }
        Some(_) => {
            errors.push(format!("[blind] {} must be an integer", key));
            None
        }
        None => None,
    }
}
