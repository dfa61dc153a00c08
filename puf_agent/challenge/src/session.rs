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

//! Device session bootstrap.
//!
//! Order is fixed: enumerate, check the count, select, login, verify the
//! login, use the device, logout, verify the logout. A [`Session`] value only
//! exists after a verified login, so reads and challenges cannot run before
//! it and logout is never attempted without it.

use crate::challenge::ChallengeWord;
use crate::challenge_error::ChallengeError;
use crate::pacing::Pacer;
use config::DeviceConfig;
use log::{debug, error, info, warn};
use secube_device::{AccessLevel, DeviceDescriptor, DeviceSdk, Pin, SerialNumber};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub selection_index: usize,
    pub pin: Pin,
    pub access: AccessLevel,
    pub force_logout: bool,
}

impl SessionOptions {
    pub fn from_config(config: &DeviceConfig) -> Result<Self, ChallengeError> {
        let pin = Pin::new(config.pin.as_bytes()).map_err(|e| ChallengeError::ConfigError(e.to_string()))?;
        Ok(Self {
            selection_index: config.selection_index,
            pin,
            access: config.access,
            force_logout: config.force_logout,
        })
    }
}

/// Enumerate attached devices; an empty result is an error
pub fn list_devices<D: DeviceSdk + ?Sized>(device: &mut D) -> Result<Vec<DeviceDescriptor>, ChallengeError> {
    let devices = device.list_devices().map_err(|e| {
        error!("Error while searching for SEcube devices: {}", e);
        ChallengeError::DeviceDiscovery(e.to_string())
    })?;

    if device.device_count() == 0 || devices.is_empty() {
        error!("No SEcube devices found");
        return Err(ChallengeError::NoDevices);
    }
    Ok(devices)
}

/// Authenticated device session. Logs out on drop if not closed explicitly.
pub struct Session<'a, D: DeviceSdk + ?Sized> {
    device: &'a mut D,
    selected: DeviceDescriptor,
    closed: bool,
}

/// Run the bootstrap up to a verified login
pub fn open_session<'a, D: DeviceSdk + ?Sized>(
    device: &'a mut D,
    options: &SessionOptions,
    pacer: &Pacer,
) -> Result<Session<'a, D>, ChallengeError> {
    info!("Looking for SEcube devices...");
    pacer.pause(2);

    let devices = list_devices(&mut *device)?;
    let available = device.device_count().min(devices.len());
    info!("Number of SEcube devices found: {}", available);
    for (index, descriptor) in devices.iter().take(available).enumerate() {
        debug!("{}) {}", index, descriptor);
    }

    if options.selection_index >= available {
        error!("Device index {} is invalid, {} devices found", options.selection_index, available);
        return Err(ChallengeError::Selection(format!(
            "index {} out of range, {} devices found",
            options.selection_index, available
        )));
    }
    let selected = devices[options.selection_index].clone();

    let serial = SerialNumber::new(&selected.serial).map_err(|e| {
        error!("Unusable serial number for {}: {}", selected.path, e);
        ChallengeError::Selection(e.to_string())
    })?;
    device.select(&serial).map_err(|e| {
        error!("Failed to select {}: {}", selected, e);
        ChallengeError::Selection(e.to_string())
    })?;
    info!("Device {} selected.", selected);

    info!("Attempting login...");
    pacer.pause(1);
    device.login(&options.pin, options.access, options.force_logout).map_err(|e| {
        error!("Login error: {}", e);
        ChallengeError::Auth(e.to_string())
    })?;
    if !device.is_logged_in() {
        error!("Login error: device reports no active session");
        return Err(ChallengeError::Auth("device reports no active session after login".to_string()));
    }
    info!("Logged in to {}", selected);

    Ok(Session { device, selected, closed: false })
}

impl<'a, D: DeviceSdk + ?Sized> Session<'a, D> {
    pub fn selected(&self) -> &DeviceDescriptor {
        &self.selected
    }

    pub fn read_pufs(&mut self, count: usize) -> Result<Vec<u32>, ChallengeError> {
        self.device.read_pufs(count).map_err(|e| {
            error!("Failed to read {} PUF words: {}", count, e);
            ChallengeError::Device(e)
        })
    }

    /// Forward a challenge word; the status byte is returned untouched
    pub fn submit(&mut self, word: ChallengeWord) -> Result<u8, ChallengeError> {
        self.device.challenge_puf(word.value()).map_err(|e| {
            error!("Challenge {} failed: {}", word, e);
            ChallengeError::Device(e)
        })
    }

    /// Logout and verify the device no longer reports a session
    pub fn close(mut self) -> Result<(), ChallengeError> {
        self.closed = true;
        info!("Logging out...");
        self.device.logout().map_err(|e| {
            error!("Logout error: {}", e);
            ChallengeError::Logout(e.to_string())
        })?;
        if self.device.is_logged_in() {
            error!("Logout error: device still reports an active session");
            return Err(ChallengeError::Logout("device still reports an active session".to_string()));
        }
        info!("You are now logged out.");
        Ok(())
    }
}

/// Open a session, run `operation` in it and close it.
///
/// The session is closed whether or not `operation` succeeded. An operation
/// error wins over a logout error.
pub fn with_session<D, T, F>(
    device: &mut D,
    options: &SessionOptions,
    pacer: &Pacer,
    operation: F,
) -> Result<T, ChallengeError>
where
    D: DeviceSdk + ?Sized,
    F: FnOnce(&mut Session<'_, D>) -> Result<T, ChallengeError>,
{
    let mut session = open_session(device, options, pacer)?;
    match operation(&mut session) {
        Ok(value) => {
            session.close()?;
            Ok(value)
        },
        Err(e) => {
            if let Err(close_err) = session.close() {
                warn!("Logout after failed operation also failed: {}", close_err);
            }
            Err(e)
        },
    }
}

impl<'a, D: DeviceSdk + ?Sized> Drop for Session<'a, D> {
    fn drop(&mut self) {
        if self.closed || !self.device.is_logged_in() {
            return;
        }
        warn!("Session on {} dropped without logout, logging out", self.selected);
        if let Err(e) = self.device.logout() {
            warn!("Best-effort logout failed: {}", e);
        }
    }
}
