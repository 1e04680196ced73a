// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Control server configuration
//!
//! This module defines the structures for configuring the TCP listener the
//! operator console connects to.

use serde::{Deserialize, Serialize};

/// Configuration for the operator control listener.
///
/// # Fields
///
/// * `address` - Network address to bind to (default: 0.0.0.0)
/// * `port` - TCP port (default: 25555)
/// * `buffer_size` - Maximum number of bytes taken by one receive (default: 16)
///
/// # Example
///
/// ```
/// use ares_bridge::config::ServerConfig;
///
/// let server_config = ServerConfig {
///     address: "127.0.0.1".to_string(),
///     port: 25556,
///     buffer_size: 16,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The network address the control server binds to.
    ///
    /// Use "0.0.0.0" to accept the operator console on any IPv4 interface.
    pub address: String,

    /// The TCP port the control server listens on.
    ///
    /// Valid range is 1-65534. The operator console connects to 25555.
    pub port: u16,

    /// Size of the receive buffer.
    ///
    /// Commands are a few bytes long; a single receive never returns more
    /// than this many bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    16
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 25555,
            buffer_size: default_buffer_size(),
        }
    }
}
