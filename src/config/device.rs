// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Device channel configuration

use serde::{Deserialize, Serialize};

/// Device channel implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Serial link to the motor and actuator controller
    Serial,
    /// Log and record frames without hardware
    Simulated,
}

/// Configuration of the channel frames are written to.
///
/// `path` and `baud_rate` are only used when `kind` is `serial`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_kind")]
    pub kind: DeviceKind,

    /// Serial device path
    #[serde(default = "default_path")]
    pub path: String,

    /// Serial line speed
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

fn default_kind() -> DeviceKind {
    DeviceKind::Simulated // No hardware writes unless asked for
}

fn default_path() -> String {
    "/dev/ttyAMA0".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            path: default_path(),
            baud_rate: default_baud_rate(),
        }
    }
}
