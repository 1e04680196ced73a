// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Operator session handling
//!
//! The [`SessionManager`] accepts one operator connection at a time, turns
//! every received payload into device frames and answers with a status line.
//! A lost connection sends it back to waiting for the next operator; `Quit`
//! or a shutdown request ends it and releases the device channel.

pub mod session_manager;

pub use session_manager::{
    shutdown_on, DispatchOutcome, PayloadAssembler, SessionEnd, SessionManager, SessionState,
    TransportError,
};
