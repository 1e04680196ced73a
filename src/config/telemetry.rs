// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use serde::{Deserialize, Serialize};

/// Telemetry reply settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Signal strength percentage reported to `s` queries
    pub signal_strength: u8,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            signal_strength: 100,
        }
    }
}
