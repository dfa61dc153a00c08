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

/// Configuration loading for the PUF tooling.
///
/// Configuration data is read from YAML files and deserialized into a
/// strongly typed struct. `ConfigSingleton` keeps one process-wide instance
/// behind a `OnceLock`; `load_yaml` gives the same parsing without the
/// global, which is what tests use.
///
/// # Example
///
/// ```no_run
/// use serde::Deserialize;
///
/// use config_manager::ConfigSingleton;
///
/// #[derive(Deserialize)]
/// struct ToolConfig {
///     store_path: String,
///     #[serde(default)]
///     count: usize,
/// }
///
/// static CONFIG: ConfigSingleton<ToolConfig> = ConfigSingleton::new();
///
/// CONFIG.initialize("puf_config.yaml").expect("Failed to load config");
/// let config = CONFIG.get_instance().expect("Config not initialized");
/// println!("store at {} ({} words)", config.store_path, config.count);
/// ```
pub mod manager;

pub use manager::{load_yaml, ConfigSingleton};
