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


use crate::challenge_error::ChallengeError;
use crate::session::Session;
use log::{error, info};
use puf_store::PufStore;
use secube_device::{DeviceError, DeviceSdk};

/// Read `count` PUF words from the device and replace the store with them.
///
/// The store is only touched once the device returned every requested word.
pub fn enroll<D: DeviceSdk + ?Sized>(
    session: &mut Session<'_, D>,
    store: &PufStore,
    count: usize,
) -> Result<Vec<u32>, ChallengeError> {
    info!("Reading {} PUF words from {}", count, session.selected());
    let values = session.read_pufs(count)?;
    if values.len() < count {
        error!("Device returned {} PUF words, {} requested", values.len(), count);
        return Err(ChallengeError::Device(DeviceError::Protocol(format!(
            "device returned {} PUF words, {} requested",
            values.len(),
            count
        ))));
    }

    let values = values.into_iter().take(count).collect::<Vec<_>>();
    for (index, value) in values.iter().enumerate() {
        info!("{}->{:X}", index, value);
    }

    store.write(&values)?;
    info!("Enrolled {} PUF words into {}", values.len(), store.path().display());
    Ok(values)
}
