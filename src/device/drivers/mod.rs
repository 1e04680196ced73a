// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Device channel drivers
//!
//! - Serial: UART link to the motor and actuator controller
//! - Simulated: logs and records frames without hardware

pub mod serial;
pub mod simulated;

pub use serial::SerialDevice;
pub use simulated::{FrameRecorder, SimulatedDevice};
