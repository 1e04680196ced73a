// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Session Manager
//!
//! Owns the operator connection and the device channel, and runs the
//! accept → read → dispatch → reply cycle:
//!
//! ```text
//! AwaitingConnection ──accept──▶ Connected ──payload──▶ Dispatching ──reply──▶ Connected
//!        ▲                           │                                      │
//!        └──── read/write failure ───┘                       Quit/shutdown  ▼
//!                                                                      Terminated
//! ```
//!
//! Everything runs sequentially in one task. The client read is the only
//! suspension point in the happy path, so the device channel never sees two
//! commands interleaved and needs no lock. A device write that never completes
//! stalls the whole bridge; there is no timeout.
//!
//! ## Usage
//!
//! ```no_run
//! use ares_bridge::actuation::ActuatorTranslator;
//! use ares_bridge::config::TelemetryConfig;
//! use ares_bridge::device::drivers::SimulatedDevice;
//! use ares_bridge::session::SessionManager;
//! use ares_bridge::telemetry::SimulatedTelemetry;
//! use tokio::net::TcpListener;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("0.0.0.0:25555").await?;
//!     let manager = SessionManager::new(
//!         Box::new(SimulatedDevice::new()),
//!         Box::new(SimulatedTelemetry::new(&TelemetryConfig::default())),
//!         ActuatorTranslator::default(),
//!         16,
//!     );
//!     manager
//!         .run(listener, async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time;

use crate::actuation::{ActuatorTranslator, DeviceInstruction, Reply, Translation};
use crate::device::{DeviceChannel, DeviceError};
use crate::protocol::parse;
use crate::telemetry::Telemetry;

/// Pause after a failed accept before trying again.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Failures of the operator connection. All of them are recovered by
/// waiting for a new connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed by peer")]
    Closed,

    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("reply write failed: {0}")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingConnection,
    Connected,
    Dispatching,
    Terminated,
}

/// Why a connection stopped being served.
#[derive(Debug)]
pub enum SessionEnd {
    /// The operator sent `Quit`.
    Quit,
    /// The connection failed; the manager goes back to accepting.
    Disconnected(TransportError),
    /// The shutdown future resolved.
    Shutdown,
}

/// Reply produced for one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub reply: String,
    pub terminate: bool,
}

/// Serves one operator at a time and drives the device channel.
pub struct SessionManager {
    device: Box<dyn DeviceChannel>,
    telemetry: Box<dyn Telemetry>,
    translator: ActuatorTranslator,
    buffer_size: usize,
    state: SessionState,
}

impl SessionManager {
    pub fn new(
        device: Box<dyn DeviceChannel>,
        telemetry: Box<dyn Telemetry>,
        translator: ActuatorTranslator,
        buffer_size: usize,
    ) -> Self {
        Self {
            device,
            telemetry,
            translator,
            buffer_size: buffer_size.max(1),
            state: SessionState::AwaitingConnection,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!("Session state: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Accept and serve connections until `Quit` or until `shutdown` resolves.
    ///
    /// Lost connections are not errors: the manager logs them and waits for
    /// the next client. On exit the device channel is closed exactly once and
    /// the close result is returned.
    pub async fn run<F>(mut self, listener: TcpListener, shutdown: F) -> Result<(), DeviceError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if let Ok(local) = listener.local_addr() {
            info!("Control server listening on {}", local);
        }
        info!("Device channel: {}", self.device.describe());

        loop {
            self.transition(SessionState::AwaitingConnection);
            info!("Awaiting connection...");

            let accepted = tokio::select! {
                accepted = listener.accept() => accepted,
                _ = &mut shutdown => {
                    info!("Shutdown requested while awaiting connection");
                    break;
                }
            };

            let (stream, peer) = match accepted {
                Ok(connection) => connection,
                Err(err) => {
                    warn!("Failed to accept connection: {}", err);
                    time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };
            info!("Connection address: {}", peer);

            match self.serve_connection(stream, shutdown.as_mut()).await {
                SessionEnd::Disconnected(reason) => {
                    info!("Client {} disconnected: {}", peer, reason);
                }
                SessionEnd::Quit => {
                    info!("Quit received from {}", peer);
                    break;
                }
                SessionEnd::Shutdown => {
                    info!("Shutdown requested, dropping connection from {}", peer);
                    break;
                }
            }
        }

        self.transition(SessionState::Terminated);
        info!("Terminating, releasing {}", self.device.describe());
        self.device.close().await
    }

    /// Serve one connection until it fails, the operator quits or `shutdown` resolves.
    ///
    /// Payloads are delimited by `;` and may span several reads; every
    /// payload is dispatched in order with its own reply.
    pub async fn serve_connection<S, F>(
        &mut self,
        mut stream: S,
        mut shutdown: Pin<&mut F>,
    ) -> SessionEnd
    where
        S: AsyncRead + AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        self.transition(SessionState::Connected);
        let mut buffer = vec![0u8; self.buffer_size];
        let mut assembler = PayloadAssembler::new(self.buffer_size);

        loop {
            let read = tokio::select! {
                read = stream.read(&mut buffer) => read,
                _ = shutdown.as_mut() => return SessionEnd::Shutdown,
            };

            let len = match read {
                Ok(0) => return SessionEnd::Disconnected(TransportError::Closed),
                Ok(len) => len,
                Err(err) => return SessionEnd::Disconnected(TransportError::Read(err)),
            };

            let chunk = &buffer[..len];
            info!("Received: {:?}", String::from_utf8_lossy(chunk));

            for payload in assembler.push(chunk) {
                let outcome = self.dispatch(&payload).await;
                info!("Reply: {}", outcome.reply);

                if let Err(err) = write_reply(&mut stream, &outcome.reply).await {
                    return SessionEnd::Disconnected(TransportError::Write(err));
                }
                if outcome.terminate {
                    return SessionEnd::Quit;
                }
            }
        }
    }

    /// Parse, translate and execute one payload.
    ///
    /// Never fails: parse errors, device failures and telemetry failures all
    /// become the reply text.
    pub async fn dispatch(&mut self, payload: &[u8]) -> DispatchOutcome {
        self.transition(SessionState::Dispatching);

        let translation = match parse(payload) {
            Ok(command) => {
                debug!("Parsed command '{}': {:?}", command.letter(), command);
                self.translator.translate(&command)
            }
            Err(err) => {
                warn!(
                    "Rejected payload {:?}: {}",
                    String::from_utf8_lossy(payload),
                    err
                );
                Translation::rejected(&err)
            }
        };

        let reply = match self.execute(&translation.instructions).await {
            Ok(()) => self.resolve_reply(translation.reply),
            Err(err) => {
                error!("Device channel failure: {}", err);
                format!("Problem writing to device: {err}")
            }
        };

        self.transition(SessionState::Connected);
        DispatchOutcome {
            reply,
            terminate: translation.terminate,
        }
    }

    async fn execute(&mut self, instructions: &[DeviceInstruction]) -> Result<(), DeviceError> {
        for instruction in instructions {
            let frame = instruction.encode();
            debug!("Device <- {}", frame);
            self.device.send_frame(frame.as_bytes()).await?;
        }
        Ok(())
    }

    fn resolve_reply(&mut self, reply: Reply) -> String {
        let report = match reply {
            Reply::Status(text) => return text,
            Reply::Battery => self.telemetry.battery_report(),
            Reply::Signal => self.telemetry.signal_report(),
        };
        report.unwrap_or_else(|err| {
            warn!("Telemetry failure: {}", err);
            format!("Problem reading telemetry: {err}")
        })
    }
}

/// Shutdown future for [`SessionManager::run`] built on an OS signal.
///
/// Resolves when `signal` fires. If the signal cannot be installed the error
/// is logged and the future never resolves, leaving `Quit` as the only way
/// to stop the bridge.
pub async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await
        }
    }
}

async fn write_reply<S>(stream: &mut S, reply: &str) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(reply.as_bytes()).await?;
    stream.flush().await
}

/// Reassembles `;` terminated payloads across reads.
///
/// A read is not aligned on commands: the segment after the last `;` of a
/// receive is kept until its terminator arrives. A receive with no `;` and
/// nothing pending is one whole command, which keeps unterminated clients
/// working. Pending bytes never grow past `limit`; beyond it they are
/// dispatched as they are.
#[derive(Debug)]
pub struct PayloadAssembler {
    pending: Vec<u8>,
    limit: usize,
}

impl PayloadAssembler {
    pub fn new(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Bytes waiting for their terminator.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Feed one receive and return the payloads ready for dispatch, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let carried = !self.pending.is_empty();
        self.pending.extend_from_slice(chunk);

        let Some(last_terminator) = self.pending.iter().rposition(|byte| *byte == b';') else {
            if !carried {
                return vec![std::mem::take(&mut self.pending)];
            }
            if self.pending.len() > self.limit {
                warn!(
                    "Unterminated payload exceeds {} bytes, dispatching it as is",
                    self.limit
                );
                return vec![std::mem::take(&mut self.pending)];
            }
            return Vec::new();
        };

        let tail = self.pending.split_off(last_terminator + 1);
        let mut payloads: Vec<Vec<u8>> = self.pending[..last_terminator]
            .split(|byte| *byte == b';')
            .map(<[u8]>::to_vec)
            .collect();
        self.pending.clear();

        // Line endings after the final terminator are dropped
        if tail.iter().all(u8::is_ascii_whitespace) {
            return payloads;
        }

        if tail.len() > self.limit {
            warn!(
                "Unterminated payload exceeds {} bytes, dispatching it as is",
                self.limit
            );
            payloads.push(tail);
        } else {
            debug!("Holding partial payload {:?}", String::from_utf8_lossy(&tail));
            self.pending = tail;
        }
        payloads
    }
}
