// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Drive train configuration
//!
//! Channel numbers are the controller PWM pins wired to each motor. The level
//! table holds the calibrated drive codes for speed levels -5 through 5.

use serde::{Deserialize, Serialize};

use crate::actuation::drive_table::STANDARD_LEVELS;

/// Controller pin of each drive motor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveChannelsConfig {
    pub front_right: u8,
    pub front_left: u8,
    pub rear_right: u8,
    pub rear_left: u8,
}

impl Default for DriveChannelsConfig {
    fn default() -> Self {
        Self {
            front_right: 5,
            front_left: 7,
            rear_right: 10,
            rear_left: 8,
        }
    }
}

impl DriveChannelsConfig {
    pub fn as_array(&self) -> [u8; 4] {
        [
            self.front_right,
            self.front_left,
            self.rear_right,
            self.rear_left,
        ]
    }
}

/// Drive train settings.
///
/// # Fields
///
/// * `channels` - Controller pins of the four drive motors
/// * `levels` - Drive codes for levels -5..=5, strictly increasing
/// * `creep_forward` - Drive code used by `^` without a speed
/// * `creep_backward` - Drive code used by `v` without a speed
/// * `turn_level` - Speed level magnitude used when turning in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default)]
    pub channels: DriveChannelsConfig,

    #[serde(default = "default_levels")]
    pub levels: Vec<u8>,

    #[serde(default = "default_creep_forward")]
    pub creep_forward: u8,

    #[serde(default = "default_creep_backward")]
    pub creep_backward: u8,

    #[serde(default = "default_turn_level")]
    pub turn_level: u8,
}

fn default_levels() -> Vec<u8> {
    STANDARD_LEVELS.to_vec()
}

fn default_creep_forward() -> u8 {
    200
}

fn default_creep_backward() -> u8 {
    180
}

fn default_turn_level() -> u8 {
    1
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            channels: DriveChannelsConfig::default(),
            levels: default_levels(),
            creep_forward: default_creep_forward(),
            creep_backward: default_creep_backward(),
            turn_level: default_turn_level(),
        }
    }
}
