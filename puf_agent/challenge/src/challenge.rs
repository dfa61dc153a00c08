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
use log::{debug, error, info};
use puf_store::{PufStore, StoreError};
use secube_device::DeviceSdk;
use serde::Serialize;
use std::fmt;

/// Bytes between two consecutive PUF words in device memory
pub const WORD_STRIDE: u32 = 4;

/// Target address in the high half, expected PUF word in the low half
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChallengeWord(u64);

impl ChallengeWord {
    pub fn new(address: u32, expected: u32) -> Self {
        Self((u64::from(address) << 32) | u64::from(expected))
    }

    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn address(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    pub fn expected(&self) -> u32 {
        self.0 as u32
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChallengeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<ChallengeWord> for u64 {
    fn from(word: ChallengeWord) -> Self {
        word.0
    }
}

/// Outcome of one submitted challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeReport {
    pub address: u32,
    pub line_index: usize,
    pub expected: u32,
    pub word: ChallengeWord,
    /// Status byte exactly as returned by the device
    pub result: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub attempted: usize,
    pub matched: usize,
    pub match_code: u8,
    pub reports: Vec<ChallengeReport>,
}

/// Store line holding the PUF word for `address`
pub fn line_index(address: u32, base: u32) -> Result<usize, ChallengeError> {
    let offset = address.checked_sub(base).ok_or_else(|| {
        error!("Challenge address 0x{:X} is below PUF base 0x{:X}", address, base);
        ChallengeError::AddressBelowBase { address, base }
    })?;
    if offset % WORD_STRIDE != 0 {
        error!("Challenge address 0x{:X} is not word aligned", address);
        return Err(ChallengeError::MisalignedAddress { address, base });
    }
    Ok((offset / WORD_STRIDE) as usize)
}

/// Validate `address`, look up its expected word and pack both.
///
/// Address checks run before the store is opened. Returns the word together
/// with the store line it was built from.
pub fn build_challenge(address: u32, base: u32, store: &PufStore) -> Result<(ChallengeWord, usize), ChallengeError> {
    let index = line_index(address, base)?;
    let expected = store.read_at(index)?;
    let word = ChallengeWord::new(address, expected);
    debug!("challenge, puf -> 0x{:X}, 0x{:X}", word.address(), word.expected());
    Ok((word, index))
}

pub fn submit<D: DeviceSdk + ?Sized>(session: &mut Session<'_, D>, word: ChallengeWord) -> Result<u8, ChallengeError> {
    session.submit(word)
}

/// Build, submit and report a single challenge
pub fn run_challenge<D: DeviceSdk + ?Sized>(
    session: &mut Session<'_, D>,
    store: &PufStore,
    address: u32,
    base: u32,
) -> Result<ChallengeReport, ChallengeError> {
    let (word, index) = build_challenge(address, base, store)?;
    let result = submit(session, word)?;
    info!("Challenge {} on line {} answered 0x{:X}", word, index, result);

    Ok(ChallengeReport { address, line_index: index, expected: word.expected(), word, result })
}

/// Challenge `count` consecutive words from `start`, counting answers equal to `match_code`.
///
/// The whole range is checked against the store before anything is submitted.
/// Stops at the first failing challenge.
pub fn sweep<D: DeviceSdk + ?Sized>(
    session: &mut Session<'_, D>,
    store: &PufStore,
    start: u32,
    count: usize,
    base: u32,
    match_code: u8,
) -> Result<SweepSummary, ChallengeError> {
    let fits = match count.checked_sub(1) {
        None => true,
        Some(last) => u32::try_from(last)
            .ok()
            .and_then(|last| last.checked_mul(WORD_STRIDE))
            .and_then(|bytes| start.checked_add(bytes))
            .is_some(),
    };
    if !fits {
        return Err(ChallengeError::InvalidRange(format!(
            "{} words from 0x{:08X} exceed the 32-bit address space",
            count, start
        )));
    }

    if count == 0 {
        info!("Matched PUFs: 0 of 0");
        return Ok(SweepSummary { attempted: 0, matched: 0, match_code, reports: Vec::new() });
    }

    let first = line_index(start, base)?;
    let expected_words = store.read_range(first, count).map_err(|e| match e {
        StoreError::OffsetOutOfRange { len, .. } => {
            error!("Sweep of {} words from line {} runs past the {} stored records", count, first, len);
            ChallengeError::InvalidRange(format!(
                "{} words from line {} exceed the {} stored records",
                count, first, len
            ))
        },
        other => other.into(),
    })?;

    let mut reports = Vec::new();
    let mut address = start;
    for (step, expected) in expected_words.into_iter().enumerate() {
        if step > 0 {
            address += WORD_STRIDE;
        }
        let word = ChallengeWord::new(address, expected);
        debug!("challenge, puf -> 0x{:X}, 0x{:X}", word.address(), word.expected());
        let result = submit(session, word)?;
        info!("Challenge {} on line {} answered 0x{:X}", word, first + step, result);
        reports.push(ChallengeReport { address, line_index: first + step, expected, word, result });
    }

    let matched = reports.iter().filter(|r| r.result == match_code).count();
    info!("Matched PUFs: {} of {}", matched, reports.len());
    Ok(SweepSummary { attempted: reports.len(), matched, match_code, reports })
}
