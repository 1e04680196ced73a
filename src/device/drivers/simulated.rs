// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated device channel
//!
//! Stands in for the controller when no hardware is attached. Every frame is
//! logged at info level and appended to a shared [`FrameRecorder`], which lets
//! tests and dry runs check exactly what the rover would have received.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use log::info;

use crate::device::{DeviceChannel, DeviceError};

#[derive(Debug, Default)]
struct Recording {
    frames: Vec<String>,
    close_count: usize,
}

/// Shared view on the frames written to a [`SimulatedDevice`].
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    inner: Arc<Mutex<Recording>>,
}

impl FrameRecorder {
    fn lock(&self) -> MutexGuard<'_, Recording> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Frames written so far, oldest first.
    pub fn frames(&self) -> Vec<String> {
        self.lock().frames.clone()
    }

    /// Number of times the channel was closed.
    pub fn close_count(&self) -> usize {
        self.lock().close_count
    }
}

/// Device channel that records frames instead of driving hardware
pub struct SimulatedDevice {
    recorder: FrameRecorder,
    open: bool,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self {
            recorder: FrameRecorder::default(),
            open: true,
        }
    }

    /// Handle on the recorded frames, usable after the device is moved away.
    pub fn recorder(&self) -> FrameRecorder {
        self.recorder.clone()
    }
}

#[async_trait]
impl DeviceChannel for SimulatedDevice {
    async fn send_frame(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        if !self.open {
            return Err(DeviceError::Closed);
        }
        let frame = String::from_utf8_lossy(frame).into_owned();
        info!("SIMULATED DEVICE <- {}", frame);
        self.recorder.lock().frames.push(frame);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DeviceError> {
        if self.open {
            self.open = false;
            self.recorder.lock().close_count += 1;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}
