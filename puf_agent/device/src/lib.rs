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

/// Device boundary for the SEcube PUF tooling

mod simulated;
mod traits;
mod types;

pub use traits::DeviceError;
pub use traits::DeviceSdk;
#[cfg(feature = "mock")]
pub use traits::MockDeviceSdk;

pub use types::{AccessLevel, DeviceDescriptor, Pin, SerialNumber, DEFAULT_MEM_BASE, PIN_SIZE, SERIAL_SIZE};

pub use simulated::{SimulatedDevice, SimulatedDeviceBuilder, DEFAULT_PUF_WORDS, MATCH, MISMATCH};
