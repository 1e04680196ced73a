// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Battery and signal telemetry replies

use anyhow::Result;
use rand::Rng;

use crate::config::TelemetryConfig;

/// Source of the battery and signal strength replies.
pub trait Telemetry: Send {
    fn battery_report(&mut self) -> Result<String>;

    fn signal_report(&mut self) -> Result<String>;
}

/// Telemetry without sensors: random battery charge, configured signal strength.
pub struct SimulatedTelemetry {
    signal_strength: u8,
}

impl SimulatedTelemetry {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            signal_strength: config.signal_strength,
        }
    }
}

impl Telemetry for SimulatedTelemetry {
    fn battery_report(&mut self) -> Result<String> {
        let charge: u8 = rand::rng().random_range(1..=100);
        Ok(format!("BATT {charge}"))
    }

    fn signal_report(&mut self) -> Result<String> {
        Ok(format!("SIG: {}%", self.signal_strength))
    }
}
