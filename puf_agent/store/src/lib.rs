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

//! Line-indexed flat file of PUF words.
//!
//! Record `i` lives on line `i` as an unsigned decimal followed by `\n`.
//! There is no header, checksum or stored count; the line count is the
//! record count.

mod store_error;

pub use store_error::StoreError;

use log::{debug, error};
use std::fs::{self, File, Permissions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Conventional store file name, relative to the working directory
pub const DEFAULT_STORE_FILE: &str = "PUFS.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PufStore {
    path: PathBuf,
}

impl PufStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Replace the store content with `values`, one record per line.
    ///
    /// The records go to a temporary file next to the store which is then
    /// renamed over it, so readers see either the old or the new table.
    /// An empty slice leaves an empty file.
    pub fn write(&self, values: &[u32]) -> Result<(), StoreError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&directory).map_err(|e| self.unavailable(e))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            for value in values {
                writeln!(writer, "{}", value).map_err(|e| self.unavailable(e))?;
            }
            writer.flush().map_err(|e| self.unavailable(e))?;
        }
        temp.as_file().sync_all().map_err(|e| self.unavailable(e))?;
        if let Some(permissions) = self.target_permissions() {
            temp.as_file().set_permissions(permissions).map_err(|e| self.unavailable(e))?;
        }
        temp.persist(&self.path).map_err(|e| self.unavailable(e.error))?;

        debug!("Stored {} PUF records in {}", values.len(), self.path.display());
        Ok(())
    }

    /// Record at line `offset`.
    ///
    /// The scan stops at end of file; an offset at or past the record count
    /// is reported as `OffsetOutOfRange`.
    pub fn read_at(&self, offset: usize) -> Result<u32, StoreError> {
        let reader = self.open()?;

        let mut len = 0;
        for line in reader.lines() {
            let line = line.map_err(|e| self.unavailable(e))?;
            if len == offset {
                return parse_record(offset, &line);
            }
            len += 1;
        }

        error!("PUF offset {} requested, {} holds {} records", offset, self.path.display(), len);
        Err(StoreError::OffsetOutOfRange { offset, len })
    }

    /// `count` consecutive records starting at line `offset`, read in one scan.
    ///
    /// Fails with `OffsetOutOfRange` when the store ends before the last
    /// requested record. Lines after it are never parsed.
    pub fn read_range(&self, offset: usize, count: usize) -> Result<Vec<u32>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let reader = self.open()?;

        let mut values = Vec::new();
        let mut len = 0;
        for line in reader.lines() {
            let line = line.map_err(|e| self.unavailable(e))?;
            if len >= offset {
                values.push(parse_record(len, &line)?);
                if values.len() == count {
                    return Ok(values);
                }
            }
            len += 1;
        }

        error!(
            "{} PUF records from offset {} requested, {} holds {} records",
            count,
            offset,
            self.path.display(),
            len
        );
        Err(StoreError::OffsetOutOfRange { offset: offset + values.len(), len })
    }

    /// Number of records
    pub fn len(&self) -> Result<usize, StoreError> {
        let reader = self.open()?;
        let mut len = 0;
        for line in reader.lines() {
            line.map_err(|e| self.unavailable(e))?;
            len += 1;
        }
        Ok(len)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn read_all(&self) -> Result<Vec<u32>, StoreError> {
        let reader = self.open()?;
        reader
            .lines()
            .enumerate()
            .map(|(index, line)| {
                let line = line.map_err(|e| self.unavailable(e))?;
                parse_record(index, &line)
            })
            .collect()
    }

    fn open(&self) -> Result<BufReader<File>, StoreError> {
        File::open(&self.path).map(BufReader::new).map_err(|e| {
            error!("Can't open PUF file {}: {}", self.path.display(), e);
            self.unavailable(e)
        })
    }

    /// Keep the mode of the file being replaced; new files get 0644
    fn target_permissions(&self) -> Option<Permissions> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(_) => default_permissions(),
        }
    }

    fn unavailable(&self, source: std::io::Error) -> StoreError {
        StoreError::Unavailable { path: self.path.clone(), source }
    }
}

impl Default for PufStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_FILE)
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}

/// Unsigned decimal; negative `i32` text from older writers maps to its two's complement
fn parse_record(index: usize, line: &str) -> Result<u32, StoreError> {
    let text = line.trim();
    if let Ok(value) = text.parse::<u32>() {
        return Ok(value);
    }
    match text.parse::<i32>() {
        Ok(value) => Ok(value as u32),
        Err(_) => Err(StoreError::Corrupt { index, content: text.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_unsigned() {
        assert_eq!(parse_record(0, "0").unwrap(), 0);
        assert_eq!(parse_record(0, "4294967295").unwrap(), u32::MAX);
        assert_eq!(parse_record(0, " 42\r").unwrap(), 42);
    }

    #[test]
    fn test_parse_record_legacy_negative() {
        assert_eq!(parse_record(0, "-1").unwrap(), u32::MAX);
        assert_eq!(parse_record(0, "-2147483648").unwrap(), 0x8000_0000);
    }

    #[test]
    fn test_parse_record_rejects_garbage() {
        let err = parse_record(3, "0xDEAD").unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { index: 3, .. }));
        assert!(parse_record(0, "").is_err());
        assert!(parse_record(0, "4294967296").is_err());
    }

    #[test]
    fn test_default_store_path() {
        assert_eq!(PufStore::default().path(), Path::new(DEFAULT_STORE_FILE));
    }
}
