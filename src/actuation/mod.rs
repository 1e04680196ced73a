// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Actuation layer
//!
//! This module turns decoded operator commands into controller frames:
//! - `drive_table`: speed level to raw drive value mapping
//! - `instruction`: device instructions and their `;` terminated frame encoding
//! - `translator`: command to instruction translation and operator replies

pub mod drive_table;
pub mod instruction;
pub mod translator;

pub use drive_table::{DriveLevelTable, DriveValue, SpeedLevel};
pub use instruction::{ActuatorAction, ChannelId, DeviceInstruction, Drum};
pub use translator::{ActuatorTranslator, DriveChannels, Reply, Translation};
