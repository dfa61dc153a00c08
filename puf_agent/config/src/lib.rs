pub mod config;

pub use crate::config::{
    parse_u32, Config, ConfigManager, DeviceConfig, LoggingConfig, PacingConfig, PufConfig, SimulatedConfig,
    TOOL_CONFIG,
};
