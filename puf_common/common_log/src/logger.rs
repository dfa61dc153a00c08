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

use crate::config::{LogConfig, LoggerConfig};
use chrono::{DateTime, Local};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger as SizeBasedTriggerPolicy;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::{
    append::rolling_file::RollingFileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config, Handle,
};
use std::env;
use std::path::PathBuf;

const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S:%3f)} {l} [{M}:{L}] - {m}{n}";
const CONSOLE_PATTERN: &str = "{h({l})} {m}{n}";
const ROOT_APPENDER: &str = "root_appender";
const CONSOLE_APPENDER: &str = "console_appender";

/// Keeps the log4rs handle alive for the lifetime of the process
pub struct Logger {
    _handle: Handle,
}

impl Logger {
    pub fn new_from_config(config: LogConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let final_config = Self::build_config(&config)?;
        let handle = log4rs::init_config(final_config)?;
        Ok(Self { _handle: handle })
    }

    pub(crate) fn build_config(config: &LogConfig) -> Result<Config, Box<dyn std::error::Error>> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("load .env file: {}", path.display());
        }

        let mut log4rs_config = Config::builder();
        let mut root = Root::builder();
        if config.console {
            let console = ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
                .build();
            log4rs_config = log4rs_config.appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
            root = root.appender(CONSOLE_APPENDER);
        }

        let level = match config.get_root_config() {
            Some(root_config) => {
                let appender = Self::create_appender(root_config)?;
                log4rs_config = log4rs_config.appender(Appender::builder().build(ROOT_APPENDER, Box::new(appender)));
                root = root.appender(ROOT_APPENDER);
                Self::parse_level(&root_config.level)
            },
            None => LevelFilter::Info,
        };

        Ok(log4rs_config.build(root.build(level))?)
    }

    fn create_appender(config: &LoggerConfig) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
        let log_directory = Self::resolve_directory(&config.log_directory);
        std::fs::create_dir_all(&log_directory)?;

        let now: DateTime<Local> = Local::now();
        let formatted_time = now.format("%Y%m%d%H%M%S%3f").to_string();

        let log_file = log_directory.join(&config.log_file_name);
        let archived_log_pattern = format!(
            "{}/{}-{{}}-{}.gz",
            log_directory.display(),
            config.log_file_name,
            formatted_time
        );

        let size_trigger = SizeBasedTriggerPolicy::new(config.max_file_size);
        let roller = FixedWindowRoller::builder().build(&archived_log_pattern, config.max_zip_count)?;
        let compound_policy = CompoundPolicy::new(Box::new(size_trigger), Box::new(roller));

        let appender = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
            .build(log_file, Box::new(compound_policy))?;

        Ok(appender)
    }

    /// `LOG_OUTPUT_DIR`, when set, prefixes relative log directories
    fn resolve_directory(log_directory: &str) -> PathBuf {
        let directory = PathBuf::from(log_directory);
        if directory.is_absolute() {
            return directory;
        }
        match env::var("LOG_OUTPUT_DIR") {
            Ok(prefix) if !prefix.is_empty() => PathBuf::from(prefix).join(directory),
            _ => directory,
        }
    }

    pub fn parse_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_level() {
        assert_eq!(Logger::parse_level("TRACE"), LevelFilter::Trace);
        assert_eq!(Logger::parse_level("warn"), LevelFilter::Warn);
        assert_eq!(Logger::parse_level("off"), LevelFilter::Off);
        assert_eq!(Logger::parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_build_config_creates_log_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let config = LogConfig {
            loggers: vec![LoggerConfig {
                path_prefix: "root".to_string(),
                log_directory: log_dir.to_string_lossy().to_string(),
                log_file_name: "puf.log".to_string(),
                max_file_size: 1024,
                max_zip_count: 2,
                level: "debug".to_string(),
            }],
            console: true,
        };

        let built = Logger::build_config(&config).unwrap();
        assert_eq!(built.root().level(), LevelFilter::Debug);
        assert!(log_dir.is_dir());
    }
}
