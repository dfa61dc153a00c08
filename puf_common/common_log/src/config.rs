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


#[derive(Debug, Clone)]
pub struct LogConfig {
    pub loggers: Vec<LoggerConfig>,
    /// Mirror the root logger to stderr
    pub console: bool,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub log_directory: String,
    pub log_file_name: String,
    pub max_file_size: u64,
    pub max_zip_count: u32,
    pub level: String,
}

impl LogConfig {
    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }

    pub fn get_root_config(&self) -> Option<&LoggerConfig> {
        self.get_logger_config("root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(prefix: &str, level: &str) -> LoggerConfig {
        LoggerConfig {
            path_prefix: prefix.to_string(),
            log_directory: "logs".to_string(),
            log_file_name: format!("{}.log", prefix),
            max_file_size: 1024,
            max_zip_count: 2,
            level: level.to_string(),
        }
    }

    #[test]
    fn test_logger_lookup_by_prefix() {
        let config = LogConfig { loggers: vec![logger("root", "debug")], console: false };
        assert_eq!(config.get_root_config().unwrap().level, "debug");
        assert_eq!(config.get_logger_config("root").unwrap().log_file_name, "root.log");
        assert!(config.get_logger_config("puf_store").is_none());
    }

    #[test]
    fn test_missing_root_logger() {
        let config = LogConfig { loggers: Vec::new(), console: true };
        assert!(config.get_root_config().is_none());
    }
}
