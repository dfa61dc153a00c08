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

// Device SDK capability definitions

use crate::types::{AccessLevel, DeviceDescriptor, Pin, SerialNumber};
use thiserror::Error;

/// Capabilities consumed from the vendor SDK.
///
/// Every call is blocking and all-or-nothing. Implementations own transport,
/// session handshake and PUF verification; callers only sequence them.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait DeviceSdk: Send {
    /// Enumerate attached devices as (path, serial) pairs
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>, DeviceError>;

    /// Number of devices found by the last enumeration
    fn device_count(&self) -> usize;

    fn select(&mut self, serial: &SerialNumber) -> Result<(), DeviceError>;

    /// `force_logout` closes a session the device may still hold from an earlier host process
    fn login(&mut self, pin: &Pin, access: AccessLevel, force_logout: bool) -> Result<(), DeviceError>;

    fn is_logged_in(&self) -> bool;

    fn logout(&mut self) -> Result<(), DeviceError>;

    /// Read the first `count` PUF words
    fn read_pufs(&mut self, count: usize) -> Result<Vec<u32>, DeviceError>;

    /// Submit a packed challenge word; the device answers with one status byte
    fn challenge_puf(&mut self, challenge: u64) -> Result<u8, DeviceError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("No device selected")]
    NotSelected,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}
