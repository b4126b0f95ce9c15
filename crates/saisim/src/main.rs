//! saisimd entry point.
//!
//! Creates the switch on an in-memory forwarding engine, provisions the
//! configured boot ports and applies engine events until interrupted.

use clap::Parser;
use log::{error, info, warn};
use saisim::ports::{PortAttrs, SysfsDevices};
use saisim::switch::SwitchAttrs;
use saisim::{SaiServer, SaisimConfig};
use saisim_fwd::{ForwardingEngine, MemoryEngine};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// SAI switch simulator daemon
#[derive(Parser, Debug)]
#[command(name = "saisimd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Request a warm restart when the switch is removed
    #[arg(long)]
    warm_boot: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = match &args.config {
        Some(path) => match SaisimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SaisimConfig::default(),
    };
    info!("Starting saisimd");
    if args.warm_boot {
        info!("Warm boot mode: ENABLED");
    }

    let engine = Arc::new(MemoryEngine::new());
    let boot_ports = config.boot_ports.clone();
    let server = Arc::new(SaiServer::new(
        engine.clone(),
        config,
        Arc::new(SysfsDevices),
    ));

    let switch = match server.create_switch(SwitchAttrs {
        init_switch: Some(true),
        restart_warm: Some(args.warm_boot),
        ..Default::default()
    }) {
        Ok(switch) => switch,
        Err(e) => {
            error!("Failed to create switch: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Switch {:#x} ready", switch);

    let ports = boot_ports
        .into_iter()
        .map(|port| PortAttrs {
            hw_lane_list: Some(port.lanes),
            speed: Some(port.speed),
            admin_state: Some(true),
            ..Default::default()
        })
        .collect();
    for (index, result) in server.create_ports(switch, ports).into_iter().enumerate() {
        if let Err(e) = result {
            warn!("Boot port {} was not created: {}", index, e);
        }
    }

    let mut events = match engine.notify_subscribe() {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to subscribe to engine events: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let handler = server.clone();
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            handler.handle_event(&event);
        }
    });

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to wait for shutdown signal: {}", e);
        return ExitCode::FAILURE;
    }
    info!("Shutting down");
    if let Err(e) = server.remove_switch(switch) {
        error!("Failed to remove switch: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
