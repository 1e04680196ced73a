// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! End to end tests of the bridge over a loopback TCP connection
//!
//! Each test starts a session manager with a simulated device on an
//! OS-assigned port and talks to it the way the operator console does.

use std::net::SocketAddr;

use ares_bridge::actuation::ActuatorTranslator;
use ares_bridge::config::TelemetryConfig;
use ares_bridge::device::drivers::{FrameRecorder, SimulatedDevice};
use ares_bridge::device::DeviceError;
use ares_bridge::session::SessionManager;
use ares_bridge::telemetry::SimulatedTelemetry;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestBridge {
    addr: SocketAddr,
    recorder: FrameRecorder,
    shutdown: Option<oneshot::Sender<()>>,
    server: JoinHandle<Result<(), DeviceError>>,
}

async fn start_bridge() -> TestBridge {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let device = SimulatedDevice::new();
    let recorder = device.recorder();
    let telemetry = SimulatedTelemetry::new(&TelemetryConfig {
        signal_strength: 87,
    });
    let manager = SessionManager::new(
        Box::new(device),
        Box::new(telemetry),
        ActuatorTranslator::default(),
        16,
    );

    let (tx, rx) = oneshot::channel::<()>();
    let server = tokio::spawn(manager.run(listener, async move {
        let _ = rx.await;
    }));

    TestBridge {
        addr,
        recorder,
        shutdown: Some(tx),
        server,
    }
}

async fn send_command(client: &mut TcpStream, command: &str, expected: &str) {
    client.write_all(command.as_bytes()).await.unwrap();
    let mut reply = vec![0u8; expected.len()];
    client.read_exact(&mut reply).await.unwrap();
    assert_eq!(String::from_utf8(reply).unwrap(), expected);
}

#[tokio::test]
async fn test_forward_command_drives_all_motors() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    send_command(&mut client, "^,3;", "GO FWD 220").await;

    assert_eq!(
        bridge.recorder.frames(),
        vec!["a,5,220;", "a,7,220;", "a,10,220;", "a,8,220;"]
    );
}

#[tokio::test]
async fn test_reconnect_after_disconnect() {
    let bridge = start_bridge().await;

    let mut first = TcpStream::connect(bridge.addr).await.unwrap();
    send_command(&mut first, "v,2;", "GO BWD 170").await;
    drop(first);

    let mut second = TcpStream::connect(bridge.addr).await.unwrap();
    send_command(&mut second, "*;", "STOP").await;
    send_command(&mut second, "s;", "SIG: 87%").await;
    send_command(&mut second, "-;", "Terminating...").await;

    bridge.server.await.unwrap().unwrap();

    let frames = bridge.recorder.frames();
    assert_eq!(frames.len(), 8);
    assert_eq!(&frames[..4], ["a,5,170;", "a,7,170;", "a,10,170;", "a,8,170;"]);
    assert_eq!(&frames[4..], ["a,5,187;", "a,7,187;", "a,10,187;", "a,8,187;"]);
    assert_eq!(bridge.recorder.close_count(), 1);
}

#[tokio::test]
async fn test_unknown_and_malformed_commands_keep_connection() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    send_command(&mut client, "q;", " -Error: unimplemented command.").await;
    send_command(
        &mut client,
        ";",
        "Problem parsing data: empty payload ...data: ",
    )
    .await;
    send_command(&mut client, "u;", "RAISE CHASSIS").await;

    assert_eq!(bridge.recorder.frames(), vec!["u,0,0;"]);
}

#[tokio::test]
async fn test_several_commands_in_one_receive() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    send_command(&mut client, "p;c;", "MINE FRONT DRUMRAISE REAR DRUM").await;

    assert_eq!(bridge.recorder.frames(), vec!["p,0,0;", "c,0,0;"]);
}

#[tokio::test]
async fn test_battery_query() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    client.write_all(b"b;").await.unwrap();
    let mut reply = [0u8; 16];
    let len = client.read(&mut reply).await.unwrap();
    let reply = std::str::from_utf8(&reply[..len]).unwrap();

    let charge: u8 = reply.strip_prefix("BATT ").unwrap().parse().unwrap();
    assert!((1..=100).contains(&charge));
    assert!(bridge.recorder.frames().is_empty());
}

#[tokio::test]
async fn test_shutdown_while_connected_releases_device() {
    let mut bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();
    send_command(&mut client, ">;", "TURN CW").await;

    bridge.shutdown.take().unwrap().send(()).unwrap();
    bridge.server.await.unwrap().unwrap();

    assert_eq!(bridge.recorder.close_count(), 1);
    // The server dropped the connection
    let mut buf = [0u8; 8];
    assert_eq!(client.read(&mut buf).await.unwrap(), 0);
}

#[tokio::test]
async fn test_shutdown_while_awaiting_connection() {
    let mut bridge = start_bridge().await;

    bridge.shutdown.take().unwrap().send(()).unwrap();
    bridge.server.await.unwrap().unwrap();

    assert_eq!(bridge.recorder.close_count(), 1);
    assert!(bridge.recorder.frames().is_empty());
}

#[tokio::test]
async fn test_command_split_across_reads() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    // 18 bytes against a 16 byte receive buffer: `^,3;` straddles two reads
    send_command(
        &mut client,
        "*;*;*;*;*;*;*;^,3;",
        &format!("{}GO FWD 220", "STOP".repeat(7)),
    )
    .await;

    let frames = bridge.recorder.frames();
    assert_eq!(frames.len(), 32);
    assert_eq!(
        &frames[28..],
        ["a,5,220;", "a,7,220;", "a,10,220;", "a,8,220;"]
    );
    assert!(!frames.iter().any(|frame| frame.ends_with(",200;")));
}

#[tokio::test]
async fn test_command_sent_in_pieces() {
    let bridge = start_bridge().await;
    let mut client = TcpStream::connect(bridge.addr).await.unwrap();

    send_command(&mut client, "u;v", "RAISE CHASSIS").await;
    client.write_all(b",").await.unwrap();
    client.flush().await.unwrap();
    send_command(&mut client, "4;", "GO BWD 135").await;

    assert_eq!(
        bridge.recorder.frames(),
        vec!["u,0,0;", "a,5,135;", "a,7,135;", "a,10,135;", "a,8,135;"]
    );
}
