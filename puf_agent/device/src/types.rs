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

use crate::traits::DeviceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial number buffer length used by the SDK's low-level layer
pub const SERIAL_SIZE: usize = 32;
/// PIN buffer length used by the SDK's session layer
pub const PIN_SIZE: usize = 32;
/// Flash address where the device keeps its PUF words
pub const DEFAULT_MEM_BASE: u32 = 0x080E_0000;

/// One attached device as reported by enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub path: String,
    pub serial: String,
}

impl DeviceDescriptor {
    pub fn new(path: impl Into<String>, serial: impl Into<String>) -> Self {
        Self { path: path.into(), serial: serial.into() }
    }
}

impl fmt::Display for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path, self.serial)
    }
}

/// Fixed-size, zero padded serial number buffer
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber {
    bytes: [u8; SERIAL_SIZE],
    len: usize,
}

impl SerialNumber {
    /// Copy `serial` into a fixed buffer; fails when it does not fit
    pub fn new(serial: &str) -> Result<Self, DeviceError> {
        let raw = serial.as_bytes();
        if raw.len() > SERIAL_SIZE {
            return Err(DeviceError::InvalidArgument(format!(
                "serial number is {} bytes, buffer holds {}",
                raw.len(),
                SERIAL_SIZE
            )));
        }
        let mut bytes = [0u8; SERIAL_SIZE];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self { bytes, len: raw.len() })
    }

    pub fn as_bytes(&self) -> &[u8; SERIAL_SIZE] {
        &self.bytes
    }

    /// The significant part of the buffer, without padding
    pub fn significant(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl fmt::Debug for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SerialNumber").field(&String::from_utf8_lossy(self.significant())).finish()
    }
}

/// Login credential; never printed
#[derive(Clone, PartialEq, Eq)]
pub struct Pin {
    bytes: [u8; PIN_SIZE],
    len: usize,
}

impl Pin {
    pub fn new(pin: &[u8]) -> Result<Self, DeviceError> {
        if pin.len() > PIN_SIZE {
            return Err(DeviceError::InvalidArgument(format!("PIN longer than {} bytes", PIN_SIZE)));
        }
        let mut bytes = [0u8; PIN_SIZE];
        bytes[..pin.len()].copy_from_slice(pin);
        Ok(Self { bytes, len: pin.len() })
    }

    pub fn as_bytes(&self) -> &[u8; PIN_SIZE] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin(***)")
    }
}

/// Privilege requested at login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    User,
    Admin,
}

impl AccessLevel {
    /// Numeric privilege code understood by the SDK
    pub fn code(self) -> u16 {
        match self {
            AccessLevel::User => 100,
            AccessLevel::Admin => 1000,
        }
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Admin
    }
}
