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

use puf_store::StoreError;
use secube_device::DeviceError;
use std::error::Error;
use std::fmt;

/// Error types raised while talking to a device and its PUF store
#[derive(Debug)]
pub enum ChallengeError {
    /// Configuration values that cannot be turned into session options
    ConfigError(String),

    /// Device enumeration failed
    DeviceDiscovery(String),
    /// Enumeration succeeded but reported no device
    NoDevices,
    /// Selection index or serial number unusable
    Selection(String),
    /// Login rejected or session not established afterwards
    Auth(String),
    /// Logout rejected or session still active afterwards
    Logout(String),

    /// PUF store could not serve the request
    Store(StoreError),

    /// Challenge address lies below the PUF memory base
    AddressBelowBase { address: u32, base: u32 },
    /// Challenge address is not a multiple of 4 from the base
    MisalignedAddress { address: u32, base: u32 },
    /// Requested address range leaves the 32-bit space
    InvalidRange(String),

    /// Any other failure reported by the device SDK
    Device(DeviceError),
}

impl fmt::Display for ChallengeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),

            // Session errors
            Self::DeviceDiscovery(msg) => write!(f, "Error while searching for SEcube devices: {}", msg),
            Self::NoDevices => write!(f, "No SEcube devices found"),
            Self::Selection(msg) => write!(f, "Device selection error: {}", msg),
            Self::Auth(msg) => write!(f, "Login error: {}", msg),
            Self::Logout(msg) => write!(f, "Logout error: {}", msg),

            Self::Store(e) => write!(f, "{}", e),

            // Address validation errors
            Self::AddressBelowBase { address, base } => {
                write!(f, "Challenge address 0x{:08X} is below PUF memory base 0x{:08X}", address, base)
            },
            Self::MisalignedAddress { address, base } => {
                write!(f, "Challenge address 0x{:08X} is not word aligned to base 0x{:08X}", address, base)
            },
            Self::InvalidRange(msg) => write!(f, "Invalid address range: {}", msg),

            Self::Device(e) => write!(f, "Device error: {}", e),
        }
    }
}

impl Error for ChallengeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ChallengeError {
    fn from(err: StoreError) -> Self {
        ChallengeError::Store(err)
    }
}

impl From<DeviceError> for ChallengeError {
    fn from(err: DeviceError) -> Self {
        ChallengeError::Device(err)
    }
}

impl ChallengeError {
    /// True for the address alignment gate, which callers report separately
    pub fn is_alignment(&self) -> bool {
        matches!(self, Self::MisalignedAddress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_error_display() {
        let err = ChallengeError::MisalignedAddress { address: 0x080E_0002, base: 0x080E_0000 };
        assert_eq!(err.to_string(), "Challenge address 0x080E0002 is not word aligned to base 0x080E0000");

        let err = ChallengeError::AddressBelowBase { address: 0x10, base: 0x080E_0000 };
        assert_eq!(err.to_string(), "Challenge address 0x00000010 is below PUF memory base 0x080E0000");

        assert_eq!(ChallengeError::NoDevices.to_string(), "No SEcube devices found");
        assert_eq!(ChallengeError::Auth("wrong PIN".to_string()).to_string(), "Login error: wrong PIN");
        assert_eq!(ChallengeError::Logout("busy".to_string()).to_string(), "Logout error: busy");
    }

    #[test]
    fn test_store_error_conversion_keeps_message() {
        let err: ChallengeError = StoreError::OffsetOutOfRange { offset: 4, len: 2 }.into();
        assert!(matches!(err, ChallengeError::Store(StoreError::OffsetOutOfRange { offset: 4, len: 2 })));
        assert_eq!(err.to_string(), "PUF offset 4 out of range: store holds 2 records");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_device_error_conversion() {
        let err: ChallengeError = DeviceError::NotLoggedIn.into();
        assert!(matches!(err, ChallengeError::Device(DeviceError::NotLoggedIn)));
        assert_eq!(err.to_string(), "Device error: Not logged in");
    }

    #[test]
    fn test_is_alignment() {
        assert!(ChallengeError::MisalignedAddress { address: 1, base: 0 }.is_alignment());
        assert!(!ChallengeError::NoDevices.is_alignment());
    }
}
