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

use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::OnceLock;

/// Read a YAML file and deserialize it into `T`.
///
/// # Errors
///
/// Returns a descriptive message if the file cannot be opened, read, or parsed.
pub fn load_yaml<T, P>(path: P) -> Result<T, String>
where
    T: for<'a> Deserialize<'a>,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())
        .map_err(|e| format!("Failed to open config file {}: {}", path.as_ref().display(), e))?;

    let mut contents = String::new();
    let mut reader = BufReader::new(file);
    reader.read_to_string(&mut contents).map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_yaml::from_str(&contents).map_err(|e| format!("Failed to parse YAML: {}", e))
}

/// A thread-safe singleton holding configuration loaded once from YAML.
///
/// # Type Parameters
///
/// * `T` - The configuration type; must implement `Deserialize`, `Send`, `Sync`, and be `'static`.
pub struct ConfigSingleton<T: for<'a> Deserialize<'a> + Send + Sync + 'static> {
    instance: OnceLock<T>,
}

impl<T: for<'a> Deserialize<'a> + Send + Sync + 'static> ConfigSingleton<T> {
    /// Creates a new, uninitialized `ConfigSingleton`.
    ///
    /// Call `initialize` or `set` before `get_instance`.
    pub const fn new() -> Self {
        ConfigSingleton { instance: OnceLock::new() }
    }

    /// Loads the YAML file at `path` into the singleton.
    ///
    /// If the singleton is already initialized this is a no-op returning `Ok(())`,
    /// the first loaded configuration stays in place.
    ///
    /// # Errors
    ///
    /// * The file cannot be opened or read
    /// * The YAML content cannot be parsed into `T`
    pub fn initialize<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        if self.instance.get().is_some() {
            return Ok(());
        }

        let config = load_yaml(path)?;
        let _ = self.instance.set(config);
        Ok(())
    }

    /// Installs an already built configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the singleton was already initialized.
    pub fn set(&self, config: T) -> Result<(), String> {
        self.instance.set(config).map_err(|_| "Configuration already initialized".to_string())
    }

    /// Retrieves the initialized configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `initialize` nor `set` has succeeded yet.
    pub fn get_instance(&self) -> Result<&T, String> {
        self.instance.get().ok_or_else(|| "Configuration not initialized".to_string())
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl<T: for<'a> Deserialize<'a> + Send + Sync + 'static> Default for ConfigSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        count: u32,
    }

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes()).expect("Failed to write config");
        file
    }

    #[test]
    fn test_load_yaml_parses_file() {
        let file = yaml_file("name: secube\ncount: 4\n");
        let sample: Sample = load_yaml(file.path()).unwrap();
        assert_eq!(sample, Sample { name: "secube".to_string(), count: 4 });
    }

    #[test]
    fn test_load_yaml_missing_file() {
        let err = load_yaml::<Sample, _>("/nonexistent/puf_config.yaml").unwrap_err();
        assert!(err.starts_with("Failed to open config file"));
    }

    #[test]
    fn test_load_yaml_invalid_content() {
        let file = yaml_file("name: [unterminated\n");
        let err = load_yaml::<Sample, _>(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse YAML"));
    }

    #[test]
    fn test_singleton_keeps_first_value() {
        let singleton: ConfigSingleton<Sample> = ConfigSingleton::new();
        assert!(singleton.get_instance().is_err());

        let first = yaml_file("name: first\n");
        let second = yaml_file("name: second\n");
        singleton.initialize(first.path()).unwrap();
        singleton.initialize(second.path()).unwrap();

        assert_eq!(singleton.get_instance().unwrap().name, "first");
        assert!(singleton.set(Sample { name: "third".to_string(), count: 0 }).is_err());
    }
}
