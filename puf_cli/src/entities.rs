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


use challenge::{ChallengeReport, SweepSummary};
use secube_device::DeviceDescriptor;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Serialize)]
pub struct DeviceEntry {
    pub index: usize,
    pub path: String,
    pub serial: String,
}

impl DeviceEntry {
    pub fn from_descriptors(devices: &[DeviceDescriptor]) -> Vec<Self> {
        devices
            .iter()
            .enumerate()
            .map(|(index, d)| Self { index, path: d.path.clone(), serial: d.serial.clone() })
            .collect()
    }
}

impl Display for DeviceEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}) {} - {}", self.index, self.path, self.serial)
    }
}

#[derive(Debug, Serialize)]
pub struct StoreRecords {
    pub store_path: String,
    /// Line offset of the first record in `values`
    pub offset: usize,
    pub values: Vec<u32>,
}

impl Display for StoreRecords {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, value) in self.values.iter().enumerate() {
            writeln!(f, "{}->{:X}", self.offset + i, value)?;
        }
        write!(f, "{} record(s) in {}", self.values.len(), self.store_path)
    }
}

/// Text rendering of a single challenge report
pub struct ReportLine<'a>(pub &'a ChallengeReport);

impl Display for ReportLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let r = self.0;
        write!(
            f,
            "challenge 0x{:08X} (line {}) -> {} result 0x{:02X}",
            r.address, r.line_index, r.word, r.result
        )
    }
}

pub struct SweepLines<'a>(pub &'a SweepSummary);

impl Display for SweepLines<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for report in &self.0.reports {
            writeln!(f, "{}", ReportLine(report))?;
        }
        write!(f, "Matched PUFs: {} of {}", self.0.matched, self.0.attempted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use challenge::ChallengeWord;

    #[test]
    fn test_device_entries_are_indexed() {
        let devices = vec![DeviceDescriptor::new("/dev/a", "S1"), DeviceDescriptor::new("/dev/b", "S2")];
        let entries = DeviceEntry::from_descriptors(&devices);
        assert_eq!(entries[1].to_string(), "1) /dev/b - S2");
    }

    #[test]
    fn test_store_records_text() {
        let records = StoreRecords { store_path: "PUFS.txt".to_string(), offset: 2, values: vec![10, 255] };
        assert_eq!(records.to_string(), "2->A\n3->FF\n2 record(s) in PUFS.txt");
    }

    #[test]
    fn test_report_line() {
        let report = ChallengeReport {
            address: 0x080E_0004,
            line_index: 1,
            expected: 222,
            word: ChallengeWord::new(0x080E_0004, 222),
            result: 1,
        };
        assert_eq!(
            ReportLine(&report).to_string(),
            "challenge 0x080E0004 (line 1) -> 0x080E0004000000DE result 0x01"
        );
    }
}
