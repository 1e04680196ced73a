// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Device channel to the actuator controller
//!
//! This module provides the outbound side of the bridge:
//! - `DeviceChannel`: hardware abstraction accepting encoded frames
//! - Serial driver for the real controller
//! - Simulated driver recording frames for dry runs and tests

pub mod drivers;

use async_trait::async_trait;
use log::info;
use thiserror::Error;

use crate::config::{DeviceConfig, DeviceKind};

/// Errors raised by a device channel.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open device channel {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: tokio_serial::Error,
    },

    #[error("device channel write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("device channel is closed")]
    Closed,
}

/// Outbound channel to the actuator controller.
///
/// Owned by the session manager and driven one frame at a time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceChannel: Send {
    /// Write one complete frame.
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError>;

    /// Release the channel. Later writes fail with [`DeviceError::Closed`].
    async fn close(&mut self) -> Result<(), DeviceError>;

    /// Human readable description for logs.
    fn describe(&self) -> String;
}

/// Open the device channel selected by the configuration.
pub fn create_device_channel(config: &DeviceConfig) -> Result<Box<dyn DeviceChannel>, DeviceError> {
    match config.kind {
        DeviceKind::Serial => {
            info!(
                "Opening serial device {} at {} baud",
                config.path, config.baud_rate
            );
            Ok(Box::new(drivers::serial::SerialDevice::open(
                &config.path,
                config.baud_rate,
            )?))
        }
        DeviceKind::Simulated => {
            info!("Using simulated device channel");
            Ok(Box::new(drivers::simulated::SimulatedDevice::new()))
        }
    }
}
