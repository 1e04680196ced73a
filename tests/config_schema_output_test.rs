// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use ares_bridge::config;

#[test]
fn test_config_schema_output() -> Result<()> {
    // Output goes to stdout, only check that the embedded schema is usable
    config::output_config_schema()?;
    Ok(())
}

#[test]
fn test_default_config_matches_schema() -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(config::CONFIG_SCHEMA)?;
    let validator = jsonschema::draft202012::new(&schema)?;

    let yaml = serde_yml::to_string(&config::Config::default())?;
    let value: serde_yml::Value = serde_yml::from_str(&yaml)?;
    let instance = serde_json::to_value(&value)?;

    assert!(validator.is_valid(&instance));
    Ok(())
}
