use config_manager::ConfigSingleton;
use log::{info, warn};
use secube_device::{AccessLevel, DeviceDescriptor, DEFAULT_MEM_BASE, DEFAULT_PUF_WORDS, PIN_SIZE};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "puf_config.yaml";
const ETC_CONFIG_FILE: &str = "/etc/secube_puf/puf_config.yaml";
const MAX_STEP_MILLIS: u64 = 60_000;

// Simulated board used when no real SDK binding is available
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatedConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_puf_words")]
    pub puf_words: usize,
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceDescriptor>,
    #[serde(default)]
    pub stale_session: bool, // Start with a session left open by a previous host
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self { seed: 0, puf_words: default_puf_words(), devices: default_devices(), stale_session: false }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default)]
    pub selection_index: usize, // Index into the enumerated device list
    #[serde(default = "default_pin")]
    pub pin: String,
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default = "default_true")]
    pub force_logout: bool, // Close a session the device still holds from an earlier run
    #[serde(default)]
    pub simulated: SimulatedConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            selection_index: 0,
            pin: default_pin(),
            access: AccessLevel::default(),
            force_logout: true,
            simulated: SimulatedConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PufConfig {
    #[serde(default = "default_store_path")]
    pub store_path: String, // Flat file holding one PUF word per line
    #[serde(default = "default_mem_base", deserialize_with = "deserialize_u32")]
    pub mem_base: u32, // Device address of the word stored on line 0
    #[serde(default = "default_count")]
    pub count: usize, // Words read during enrollment
    #[serde(default = "default_match_code")]
    pub match_code: u8, // Device result byte counted as a match by sweeps
}

impl Default for PufConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            mem_base: default_mem_base(),
            count: default_count(),
            match_code: default_match_code(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PacingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_step_millis")]
    pub step_millis: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self { enabled: false, step_millis: default_step_millis() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default = "default_true")]
    pub console: bool, // Mirror the log to stderr
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level(), file: default_log_file(), console: true }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub puf: PufConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        // 1. Validate logging configuration
        if !["trace", "debug", "info", "warn", "error", "off"].contains(&self.logging.level.as_str()) {
            return Err(format!("Invalid log level: {}", self.logging.level));
        }
        if self.logging.file.is_empty() {
            return Err("Log file cannot be empty".to_string());
        }

        // 2. Validate device credentials
        if self.device.pin.is_empty() {
            return Err("Device PIN cannot be empty".to_string());
        }
        if self.device.pin.len() > PIN_SIZE {
            return Err(format!("Device PIN exceeds {} bytes", PIN_SIZE));
        }

        // 3. Validate PUF layout
        if self.puf.store_path.is_empty() {
            return Err("PUF store path cannot be empty".to_string());
        }
        if self.puf.mem_base % 4 != 0 {
            return Err(format!("PUF memory base 0x{:08X} is not word aligned", self.puf.mem_base));
        }
        let simulated = &self.device.simulated;
        let max_words = (u32::MAX - self.puf.mem_base) as usize / 4 + 1;
        if simulated.puf_words > max_words {
            return Err(format!(
                "Simulated PUF memory of {} words does not fit above 0x{:08X}",
                simulated.puf_words, self.puf.mem_base
            ));
        }

        // 4. Validate pacing
        if self.pacing.step_millis > MAX_STEP_MILLIS {
            return Err(format!(
                "Pacing step {}ms exceeds the limit of {}ms",
                self.pacing.step_millis, MAX_STEP_MILLIS
            ));
        }

        Ok(())
    }
}

/// Accepts `0x`-prefixed hex or decimal text
pub fn parse_u32(text: &str) -> Result<u32, String> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => trimmed.replace('_', "").parse::<u32>(),
    };
    parsed.map_err(|e| format!("Invalid 32-bit value '{}': {}", text, e))
}

fn deserialize_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u32),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => parse_u32(&text).map_err(serde::de::Error::custom),
    }
}

fn default_true() -> bool {
    true
}

fn default_pin() -> String {
    "test".to_string()
}

fn default_devices() -> Vec<DeviceDescriptor> {
    vec![DeviceDescriptor::new("/dev/secube0", "SEC0000000000001")]
}

fn default_puf_words() -> usize {
    DEFAULT_PUF_WORDS
}

fn default_store_path() -> String {
    "PUFS.txt".to_string()
}

fn default_mem_base() -> u32 {
    DEFAULT_MEM_BASE
}

fn default_count() -> usize {
    10
}

fn default_match_code() -> u8 {
    1
}

fn default_step_millis() -> u64 {
    1000
}

fn default_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/secube-puf.log".to_string()
}

/// Process-wide tool configuration.
///
/// The configuration file is loaded using the following priority order:
/// 1. Command line specified path (must exist when given)
/// 2. Current working directory: ./puf_config.yaml
/// 3. System-wide configuration: /etc/secube_puf/puf_config.yaml
///
/// When neither 2 nor 3 exists the built-in defaults are used.
pub static TOOL_CONFIG: ConfigSingleton<Config> = ConfigSingleton::new();

#[derive(Clone)]
pub struct ConfigManager {
    config_path: Option<String>, // Records the configuration file actually used
}

impl ConfigManager {
    pub fn new(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let actual_path = Self::find_config_path(config_path)?;

        match &actual_path {
            Some(path) => {
                TOOL_CONFIG.initialize(path).map_err(|e| format!("Failed to initialize config: {}", e))?;
            },
            None => {
                warn!("No configuration file found, using built-in defaults");
                if !TOOL_CONFIG.is_initialized() {
                    TOOL_CONFIG.set(Config::default())?;
                }
            },
        }

        TOOL_CONFIG.get_instance().and_then(|config| {
            config.validate().map_err(|e| format!("Configuration validation failed: {}", e))
        })?;

        if let Some(path) = &actual_path {
            info!("Configuration loaded from {}", path);
        }
        Ok(Self { config_path: actual_path })
    }

    fn find_config_path(cli_path: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        // 1. Check command line specified path
        if !cli_path.is_empty() {
            if PathBuf::from(cli_path).exists() {
                return Ok(Some(cli_path.to_string()));
            }
            return Err(format!("Configuration file {} does not exist", cli_path).into());
        }

        // 2. Check current working directory
        let current_dir_config = PathBuf::from(DEFAULT_CONFIG_FILE);
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config.to_string_lossy().to_string()));
        }

        // 3. Check system-wide configuration directory
        let etc_config = PathBuf::from(ETC_CONFIG_FILE);
        if etc_config.exists() {
            return Ok(Some(etc_config.to_string_lossy().to_string()));
        }

        Ok(None)
    }

    /// Path of the loaded configuration file, `None` when running on defaults
    pub fn get_config_path(&self) -> Option<&str> {
        self.config_path.as_deref()
    }
}
