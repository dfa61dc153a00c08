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

//! In-process stand-in for a SEcube board.
//!
//! PUF memory is derived from a seed so that the same configuration always
//! yields the same words, which lets an enrollment and a later challenge run
//! agree without hardware.

use crate::traits::{DeviceError, DeviceSdk};
use crate::types::{AccessLevel, DeviceDescriptor, Pin, SerialNumber, DEFAULT_MEM_BASE};
use log::{debug, info};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_PUF_WORDS: usize = 1024;
pub const MATCH: u8 = 1;
pub const MISMATCH: u8 = 0;

#[derive(Debug)]
pub struct SimulatedDevice {
    devices: Vec<DeviceDescriptor>,
    pin: Pin,
    mem_base: u32,
    puf_memory: Vec<u32>,
    enumerated: usize,
    selected: Option<SerialNumber>,
    // device side still runs a session loop from an earlier host
    session_open: bool,
    logged_in: bool,
}

impl SimulatedDevice {
    pub fn builder() -> SimulatedDeviceBuilder {
        SimulatedDeviceBuilder::default()
    }

    pub fn mem_base(&self) -> u32 {
        self.mem_base
    }

    pub fn puf_memory(&self) -> &[u32] {
        &self.puf_memory
    }

    fn require_login(&self) -> Result<(), DeviceError> {
        if self.logged_in {
            Ok(())
        } else {
            Err(DeviceError::NotLoggedIn)
        }
    }

    fn word_index(&self, address: u32) -> Result<usize, DeviceError> {
        let offset = address
            .checked_sub(self.mem_base)
            .ok_or_else(|| DeviceError::Protocol(format!("address 0x{:X} below PUF memory", address)))?;
        if offset % 4 != 0 {
            return Err(DeviceError::Protocol(format!("address 0x{:X} is not word aligned", address)));
        }
        let index = (offset / 4) as usize;
        if index >= self.puf_memory.len() {
            return Err(DeviceError::Protocol(format!("address 0x{:X} beyond PUF memory", address)));
        }
        Ok(index)
    }
}

impl DeviceSdk for SimulatedDevice {
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>, DeviceError> {
        self.enumerated = self.devices.len();
        Ok(self.devices.clone())
    }

    fn device_count(&self) -> usize {
        self.enumerated
    }

    fn select(&mut self, serial: &SerialNumber) -> Result<(), DeviceError> {
        let known = self.devices.iter().any(|d| d.serial.as_bytes() == serial.significant());
        if !known {
            return Err(DeviceError::NotFound(String::from_utf8_lossy(serial.significant()).to_string()));
        }
        self.selected = Some(*serial);
        Ok(())
    }

    fn login(&mut self, pin: &Pin, access: AccessLevel, force_logout: bool) -> Result<(), DeviceError> {
        if self.selected.is_none() {
            return Err(DeviceError::NotSelected);
        }
        if self.session_open {
            if !force_logout {
                return Err(DeviceError::AuthFailed("device session already active".to_string()));
            }
            debug!("Forcing logout of pending device session");
            self.session_open = false;
            self.logged_in = false;
        }
        if *pin != self.pin {
            return Err(DeviceError::AuthFailed("wrong PIN".to_string()));
        }
        info!("Simulated device login with privilege {}", access.code());
        self.session_open = true;
        self.logged_in = true;
        Ok(())
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn logout(&mut self) -> Result<(), DeviceError> {
        self.require_login()?;
        self.logged_in = false;
        self.session_open = false;
        Ok(())
    }

    fn read_pufs(&mut self, count: usize) -> Result<Vec<u32>, DeviceError> {
        self.require_login()?;
        if count > self.puf_memory.len() {
            return Err(DeviceError::Protocol(format!(
                "requested {} PUF words, device holds {}",
                count,
                self.puf_memory.len()
            )));
        }
        Ok(self.puf_memory[..count].to_vec())
    }

    fn challenge_puf(&mut self, challenge: u64) -> Result<u8, DeviceError> {
        self.require_login()?;
        let address = (challenge >> 32) as u32;
        let expected = challenge as u32;
        let index = self.word_index(address)?;
        Ok(if self.puf_memory[index] == expected { MATCH } else { MISMATCH })
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedDeviceBuilder {
    devices: Vec<DeviceDescriptor>,
    pin: Vec<u8>,
    seed: u64,
    puf_words: usize,
    mem_base: u32,
    stale_session: bool,
}

impl Default for SimulatedDeviceBuilder {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            pin: b"test".to_vec(),
            seed: 0,
            puf_words: DEFAULT_PUF_WORDS,
            mem_base: DEFAULT_MEM_BASE,
            stale_session: false,
        }
    }
}

impl SimulatedDeviceBuilder {
    pub fn device(mut self, path: impl Into<String>, serial: impl Into<String>) -> Self {
        self.devices.push(DeviceDescriptor::new(path, serial));
        self
    }

    pub fn devices(mut self, devices: Vec<DeviceDescriptor>) -> Self {
        self.devices = devices;
        self
    }

    pub fn pin(mut self, pin: &[u8]) -> Self {
        self.pin = pin.to_vec();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn puf_words(mut self, puf_words: usize) -> Self {
        self.puf_words = puf_words;
        self
    }

    pub fn mem_base(mut self, mem_base: u32) -> Self {
        self.mem_base = mem_base;
        self
    }

    /// Start as if a previous host exited without logging out
    pub fn stale_session(mut self, stale: bool) -> Self {
        self.stale_session = stale;
        self
    }

    pub fn build(self) -> Result<SimulatedDevice, DeviceError> {
        let max_words = (u32::MAX - self.mem_base) as usize / 4 + 1;
        if self.puf_words > max_words {
            return Err(DeviceError::InvalidArgument(format!(
                "{} PUF words do not fit above 0x{:08X}",
                self.puf_words, self.mem_base
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let puf_memory = (0..self.puf_words).map(|_| rng.next_u32()).collect();

        Ok(SimulatedDevice {
            devices: self.devices,
            pin: Pin::new(&self.pin)?,
            mem_base: self.mem_base,
            puf_memory,
            enumerated: 0,
            selected: None,
            session_open: self.stale_session,
            logged_in: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> SimulatedDevice {
        SimulatedDevice::builder().device("/dev/secube0", "SEC0001").seed(7).puf_words(16).build().unwrap()
    }

    fn logged_in() -> SimulatedDevice {
        let mut device = device();
        device.list_devices().unwrap();
        device.select(&SerialNumber::new("SEC0001").unwrap()).unwrap();
        device.login(&Pin::new(b"test").unwrap(), AccessLevel::Admin, true).unwrap();
        device
    }

    #[test]
    fn test_same_seed_same_memory() {
        assert_eq!(device().puf_memory(), device().puf_memory());
        let other = SimulatedDevice::builder().seed(8).puf_words(16).build().unwrap();
        assert_ne!(device().puf_memory(), other.puf_memory());
    }

    #[test]
    fn test_count_follows_enumeration() {
        let mut device = device();
        assert_eq!(device.device_count(), 0);
        device.list_devices().unwrap();
        assert_eq!(device.device_count(), 1);
    }

    #[test]
    fn test_select_unknown_serial() {
        let mut device = device();
        let err = device.select(&SerialNumber::new("NOPE").unwrap()).unwrap_err();
        assert!(matches!(err, DeviceError::NotFound(_)));
    }

    #[test]
    fn test_login_requires_selection_and_pin() {
        let mut device = device();
        let pin = Pin::new(b"test").unwrap();
        assert_eq!(device.login(&pin, AccessLevel::Admin, true), Err(DeviceError::NotSelected));

        device.select(&SerialNumber::new("SEC0001").unwrap()).unwrap();
        let wrong = Pin::new(b"nope").unwrap();
        assert!(matches!(device.login(&wrong, AccessLevel::Admin, true), Err(DeviceError::AuthFailed(_))));
        assert!(!device.is_logged_in());

        device.login(&pin, AccessLevel::Admin, true).unwrap();
        assert!(device.is_logged_in());
    }

    #[test]
    fn test_stale_session_needs_force_logout() {
        let mut device = SimulatedDevice::builder()
            .device("/dev/secube0", "SEC0001")
            .stale_session(true)
            .build()
            .unwrap();
        device.select(&SerialNumber::new("SEC0001").unwrap()).unwrap();
        let pin = Pin::new(b"test").unwrap();

        assert!(matches!(device.login(&pin, AccessLevel::Admin, false), Err(DeviceError::AuthFailed(_))));
        device.login(&pin, AccessLevel::Admin, true).unwrap();
        assert!(device.is_logged_in());
    }

    #[test]
    fn test_reads_require_login() {
        let mut device = device();
        assert_eq!(device.read_pufs(1), Err(DeviceError::NotLoggedIn));
        assert_eq!(device.challenge_puf(0), Err(DeviceError::NotLoggedIn));
    }

    #[test]
    fn test_read_pufs_bounds() {
        let mut device = logged_in();
        let words = device.read_pufs(4).unwrap();
        assert_eq!(words, device.puf_memory()[..4].to_vec());
        assert!(matches!(device.read_pufs(17), Err(DeviceError::Protocol(_))));
    }

    #[test]
    fn test_challenge_match_and_mismatch() {
        let mut device = logged_in();
        let base = device.mem_base();
        let expected = device.puf_memory()[2];
        let address = base + 8;

        let word = (u64::from(address) << 32) | u64::from(expected);
        assert_eq!(device.challenge_puf(word).unwrap(), MATCH);

        let wrong = (u64::from(address) << 32) | u64::from(expected.wrapping_add(1));
        assert_eq!(device.challenge_puf(wrong).unwrap(), MISMATCH);

        let misaligned = (u64::from(base + 2) << 32) | u64::from(expected);
        assert!(matches!(device.challenge_puf(misaligned), Err(DeviceError::Protocol(_))));

        let beyond = (u64::from(base + 16 * 4) << 32) | u64::from(expected);
        assert!(matches!(device.challenge_puf(beyond), Err(DeviceError::Protocol(_))));
    }

    #[test]
    fn test_logout_clears_state() {
        let mut device = logged_in();
        device.logout().unwrap();
        assert!(!device.is_logged_in());
        assert_eq!(device.logout(), Err(DeviceError::NotLoggedIn));
    }
}
