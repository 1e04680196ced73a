// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use ares_bridge::config::Config;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

fn assert_rejected_with_sample(contents: &str) -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(
        Path::new(&sample_path).exists(),
        "Sample config file was not created"
    );

    // The sample itself must load
    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config.server.port, 25555);
    Ok(())
}

#[test]
fn test_schema_error_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
server:
  address: "0.0.0.0"
  port: 99999
"#,
    )
}

#[test]
fn test_unknown_field_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
server:
  address: "0.0.0.0"
  port: 25555
  web_port: 8080
"#,
    )
}

#[test]
fn test_wrong_types_create_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
server:
  address: 12345
  port: "not-an-integer"
device:
  kind: bluetooth
"#,
    )
}

#[test]
fn test_specific_rules_create_sample_file() -> Result<()> {
    setup();
    // Schema valid, but the level table is not increasing
    assert_rejected_with_sample(
        r#"
drive:
  levels: [125, 135, 150, 170, 180, 187, 200, 200, 220, 235, 254]
"#,
    )?;

    // Schema valid, but two motors share a pin
    assert_rejected_with_sample(
        r#"
drive:
  channels:
    front_right: 5
    front_left: 5
    rear_right: 10
    rear_left: 8
"#,
    )
}

#[test]
fn test_invalid_yaml_is_an_error() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "server: [unterminated")?;

    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}
