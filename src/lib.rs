// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # ARES bridge
//!
//! TCP command bridge between an operator console and the motor and actuator
//! controller of a mining rover.
//!
//! The operator sends single-character commands (`^,3`, `*`, `u`, ...) over a
//! TCP connection. Each command is parsed by [`protocol`], translated by
//! [`actuation`] into controller frames (`a,5,220;`, `u,0,0;`), written to a
//! [`device`] channel, and acknowledged with a short status text. The
//! [`session`] module owns the connection lifecycle.

pub mod actuation;
pub mod config;
pub mod device;
pub mod protocol;
pub mod session;
pub mod telemetry;
