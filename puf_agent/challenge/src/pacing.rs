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

use config::PacingConfig;
use std::time::Duration;

/// Optional delay between narrated steps. Has no effect on results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacer {
    step: Option<Duration>,
}

impl Pacer {
    pub fn none() -> Self {
        Self { step: None }
    }

    pub fn fixed(step: Duration) -> Self {
        Self { step: Some(step) }
    }

    pub fn from_config(config: &PacingConfig) -> Self {
        if config.enabled {
            Self::fixed(Duration::from_millis(config.step_millis))
        } else {
            Self::none()
        }
    }

    pub fn delay(&self, steps: u32) -> Duration {
        self.step.map_or(Duration::ZERO, |step| step * steps)
    }

    /// Block the calling thread for `steps` pacing units
    pub fn pause(&self, steps: u32) {
        let delay = self.delay(steps);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}
