// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Serial driver for the actuator controller
//!
//! The controller sits on a UART (`/dev/ttyAMA0` on the rover, 115200 baud).
//! Frames are written whole and flushed before the next one is sent. Writes
//! have no timeout: a controller that stops draining the UART stalls the
//! session.

use async_trait::async_trait;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::device::{DeviceChannel, DeviceError};

/// Serial port device channel
pub struct SerialDevice {
    path: String,
    baud_rate: u32,
    port: Option<SerialStream>,
}

impl SerialDevice {
    /// Open the serial port. Must be called from within the tokio runtime.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, DeviceError> {
        let port = tokio_serial::new(path, baud_rate)
            .open_native_async()
            .map_err(|source| DeviceError::Open {
                path: path.to_string(),
                source,
            })?;

        Ok(Self {
            path: path.to_string(),
            baud_rate,
            port: Some(port),
        })
    }
}

#[async_trait]
impl DeviceChannel for SerialDevice {
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        let port = self.port.as_mut().ok_or(DeviceError::Closed)?;
        port.write_all(frame).await?;
        port.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        if let Some(mut port) = self.port.take() {
            debug!("Closing serial device {}", self.path);
            port.flush().await?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("serial {} @ {} baud", self.path, self.baud_rate)
    }
}
