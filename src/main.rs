// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the ares-bridge project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the rover command bridge
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;

use ares_bridge::actuation::ActuatorTranslator;
use ares_bridge::config::{self, Config};
use ares_bridge::device::create_device_channel;
use ares_bridge::session::{shutdown_on, SessionManager};
use ares_bridge::telemetry::SimulatedTelemetry;

/// TCP command bridge between the operator console and the rover controller
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (YAML format)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Control server address
    #[arg(short, long)]
    address: Option<String>,

    /// Control server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Serial device of the motor controller, selects the serial driver
    #[arg(long)]
    serial_device: Option<String>,

    /// Serial line speed
    #[arg(long)]
    baud_rate: Option<u32>,

    /// Log frames instead of writing them to hardware
    #[arg(long)]
    simulate: bool,

    /// Path to a configuration to validate and exit
    #[arg(long)]
    validate_config: Option<PathBuf>,

    /// Output the configuration schema as JSON and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Disable all logging output
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.quiet {
        log::LevelFilter::Off
    } else if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    if let Some(validate_path) = args.validate_config {
        if !validate_path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file does not exist: {}",
                validate_path.display()
            ));
        }

        Config::from_file(&validate_path)
            .map_err(|err| anyhow::anyhow!("Configuration validation failed: {}", err))?;
        println!("Configuration file is valid: {}", validate_path.display());
        return Ok(());
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let mut config = Config::from_file(&config_path)?;

    config.apply_args(
        args.address.clone(),
        args.port,
        args.serial_device.clone(),
        args.baud_rate,
        args.simulate,
    );
    config::utils::validate_specific_rules(&config)
        .context("Invalid configuration after command line overrides")?;

    // A bridge without its device channel has nothing to drive
    let device = create_device_channel(&config.device).map_err(|err| {
        error!("{}", err);
        anyhow::anyhow!("Unable to open device channel: {}", err)
    })?;

    let translator = ActuatorTranslator::from_config(&config.drive)?;
    let telemetry = SimulatedTelemetry::new(&config.telemetry);

    let bind_address = format!("{}:{}", config.server.address, config.server.port);
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind control server on {}", bind_address))?;

    let manager = SessionManager::new(
        device,
        Box::new(telemetry),
        translator,
        config.server.buffer_size,
    );

    manager
        .run(listener, shutdown_on(signal::ctrl_c()))
        .await
        .context("Failed to release device channel")?;

    info!("Bridge stopped");
    Ok(())
}
