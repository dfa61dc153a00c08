/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */


mod commands;
mod entities;

use crate::commands::Commands;
use crate::entities::{DeviceEntry, ReportLine, StoreRecords, SweepLines};
use agent_utils::{AgentError, EXIT_SUCCESS};
use challenge::{enroll, list_devices, run_challenge, sweep, with_session, Pacer, SessionOptions};
use clap::Parser;
use common_log::config::{LogConfig, LoggerConfig};
use common_log::init_with_config;
use config::{Config, ConfigManager, LoggingConfig, TOOL_CONFIG};
use log::{error, info};
use puf_store::PufStore;
use secube_device::SimulatedDevice;
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;

const MAX_LOG_FILE_SIZE: u64 = 10485760; // 10MB
const MAX_LOG_FILE_COUNT: u32 = 6;

#[derive(Parser, Debug)]
#[clap(author, version, about = "SEcube PUF enrollment and challenge tool", long_about = None)]
struct Cli {
    /// Configuration file path
    #[clap(long, default_value = "")]
    config: String,

    /// Print machine-readable JSON instead of text
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(e.exit_code())
        },
    }
}

fn run(cli: &Cli) -> Result<(), AgentError> {
    let config_manager = ConfigManager::new(&cli.config)
        .map_err(|e| AgentError::ConfigError(format!("Failed to initialize ConfigManager: {}", e)))?;
    let config: Config = TOOL_CONFIG
        .get_instance()
        .map_err(|e| AgentError::ConfigError(format!("Failed to get tool config instance: {}", e)))?
        .clone();

    init_logger(&config.logging)?;
    info!("Configuration: {}", config_manager.get_config_path().unwrap_or("built-in defaults"));

    let mut device = build_device(&config)?;
    let store = PufStore::new(&config.puf.store_path);
    let pacer = Pacer::from_config(&config.pacing);
    let base = config.puf.mem_base;

    match &cli.command {
        Commands::Devices => {
            let devices = list_devices(&mut device)?;
            let entries = DeviceEntry::from_descriptors(&devices);
            if cli.json {
                print_json(&entries)?;
            } else {
                entries.iter().for_each(|entry| println!("{}", entry));
            }
        },
        Commands::Enroll { count } => {
            let count = count.unwrap_or(config.puf.count);
            let options = SessionOptions::from_config(&config.device)?;
            let values = with_session(&mut device, &options, &pacer, |session| enroll(session, &store, count))?;
            let records = StoreRecords { store_path: config.puf.store_path.clone(), offset: 0, values };
            print_output(cli.json, &records, &records)?;
        },
        Commands::Challenge { address } => {
            let address = address.unwrap_or(base);
            let options = SessionOptions::from_config(&config.device)?;
            let report = with_session(&mut device, &options, &pacer, |session| {
                run_challenge(session, &store, address, base)
            })?;
            print_output(cli.json, &report, &ReportLine(&report))?;
        },
        Commands::Sweep { start, count } => {
            let options = SessionOptions::from_config(&config.device)?;
            let summary = with_session(&mut device, &options, &pacer, |session| {
                sweep(session, &store, *start, *count, base, config.puf.match_code)
            })?;
            print_output(cli.json, &summary, &SweepLines(&summary))?;
        },
        Commands::Show { offset } => {
            let records = match offset {
                Some(offset) => StoreRecords {
                    store_path: config.puf.store_path.clone(),
                    offset: *offset,
                    values: vec![store.read_at(*offset).map_err(challenge::ChallengeError::from)?],
                },
                None => StoreRecords {
                    store_path: config.puf.store_path.clone(),
                    offset: 0,
                    values: store.read_all().map_err(challenge::ChallengeError::from)?,
                },
            };
            print_output(cli.json, &records, &records)?;
        },
    }
    Ok(())
}

/// Route the tool's log records to the configured file
fn init_logger(logging: &LoggingConfig) -> Result<(), AgentError> {
    init_with_config(log_config(logging))
        .map_err(|e| AgentError::LogInitError(format!("Failed to initialize logger: {}", e)))?;
    info!("Logger initialized");
    Ok(())
}

fn log_config(logging: &LoggingConfig) -> LogConfig {
    let log_path = Path::new(&logging.file);
    let log_directory = log_path
        .parent()
        .and_then(|p| p.to_str())
        .filter(|p| !p.is_empty())
        .unwrap_or(".")
        .to_string();
    let log_file_name = log_path.file_name().and_then(|name| name.to_str()).unwrap_or("secube-puf.log").to_string();

    LogConfig {
        loggers: vec![LoggerConfig {
            path_prefix: "root".to_string(),
            log_directory,
            log_file_name,
            max_file_size: MAX_LOG_FILE_SIZE,
            max_zip_count: MAX_LOG_FILE_COUNT,
            level: logging.level.clone(),
        }],
        console: logging.console,
    }
}

fn build_device(config: &Config) -> Result<SimulatedDevice, AgentError> {
    let simulated = &config.device.simulated;
    SimulatedDevice::builder()
        .devices(simulated.devices.clone())
        .pin(config.device.pin.as_bytes())
        .seed(simulated.seed)
        .puf_words(simulated.puf_words)
        .mem_base(config.puf.mem_base)
        .stale_session(simulated.stale_session)
        .build()
        .map_err(|e| AgentError::ConfigError(format!("Failed to set up SEcube device: {}", e)))
}

fn print_output<T: Serialize, V: Display>(json: bool, value: &T, text: &V) -> Result<(), AgentError> {
    if json {
        print_json(value)
    } else {
        println!("{}", text);
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AgentError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AgentError::ExecutionError(format!("Failed to serialize output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
