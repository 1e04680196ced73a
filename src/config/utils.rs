// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::{debug, warn};

use super::{Config, DeviceKind};
use crate::actuation::drive_table::{DriveLevelTable, DriveValue, MAX_LEVEL};

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line.
///
/// # Example
///
/// ```bash
/// ./ares_bridge --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(super::CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Check if a string is a valid IP address
///
/// Validates that a string represents a valid IPv4 or IPv6 address,
/// or is one of the special values like "localhost" or "0.0.0.0".
pub fn is_valid_ip_address(addr: &str) -> bool {
    if addr.parse::<std::net::IpAddr>().is_ok() {
        return true;
    }

    // Special cases
    matches!(addr, "localhost" | "::" | "::0" | "0.0.0.0")
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **Port Range**: the control port is within 1-65534
/// - **Receive Buffer**: between 1 and 1024 bytes
/// - **Drive Channels**: the four motor pins are pairwise distinct
/// - **Level Table**: exactly 11 strictly increasing drive codes
/// - **Creep Values**: neither creep code equals the neutral code
/// - **Turn Level**: within 1-5
/// - **Serial Device**: a path is given when the serial driver is selected
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    if config.server.port < 1 || config.server.port > 65534 {
        anyhow::bail!("Invalid port number: {}", config.server.port);
    }

    if config.server.buffer_size == 0 || config.server.buffer_size > 1024 {
        anyhow::bail!(
            "Invalid receive buffer size: {} (expected 1-1024)",
            config.server.buffer_size
        );
    }

    if !is_valid_ip_address(&config.server.address) {
        // Hostnames still bind, so only warn
        warn!(
            "Potentially invalid address format: {}",
            config.server.address
        );
    }

    let channels = config.drive.channels.as_array();
    for (i, channel) in channels.iter().enumerate() {
        if channels[i + 1..].contains(channel) {
            anyhow::bail!("Drive channel {} is assigned to more than one motor", channel);
        }
    }

    let table = DriveLevelTable::try_from(config.drive.levels.as_slice())
        .context("Invalid drive level table")?;

    let neutral = table.neutral();
    if DriveValue(config.drive.creep_forward) == neutral
        || DriveValue(config.drive.creep_backward) == neutral
    {
        anyhow::bail!("Creep drive values must differ from the neutral value {}", neutral);
    }

    if config.drive.turn_level < 1 || config.drive.turn_level > MAX_LEVEL as u8 {
        anyhow::bail!(
            "Invalid turn level: {} (expected 1-{})",
            config.drive.turn_level,
            MAX_LEVEL
        );
    }

    if config.device.kind == DeviceKind::Serial && config.device.path.trim().is_empty() {
        anyhow::bail!("Serial device selected without a device path");
    }

    if config.telemetry.signal_strength > 100 {
        anyhow::bail!(
            "Invalid signal strength: {}%",
            config.telemetry.signal_strength
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes() {
        assert!(validate_specific_rules(&Config::default()).is_ok());
    }

    #[test]
    fn test_duplicate_channel_rejected() {
        let mut config = Config::default();
        config.drive.channels.rear_left = config.drive.channels.front_right;
        let err = validate_specific_rules(&config).unwrap_err();
        assert!(err.to_string().contains("more than one motor"));
    }

    #[test]
    fn test_creep_on_neutral_rejected() {
        let mut config = Config::default();
        config.drive.creep_forward = 187;
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_turn_level_bounds() {
        let mut config = Config::default();
        config.drive.turn_level = 0;
        assert!(validate_specific_rules(&config).is_err());
        config.drive.turn_level = 6;
        assert!(validate_specific_rules(&config).is_err());
        config.drive.turn_level = 5;
        assert!(validate_specific_rules(&config).is_ok());
    }

    #[test]
    fn test_serial_needs_path() {
        let mut config = Config::default();
        config.device.kind = DeviceKind::Serial;
        config.device.path = " ".to_string();
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_ip_address_helper() {
        assert!(is_valid_ip_address("192.168.1.3"));
        assert!(is_valid_ip_address("::"));
        assert!(is_valid_ip_address("localhost"));
        assert!(!is_valid_ip_address("ares-wifi"));
    }
}
