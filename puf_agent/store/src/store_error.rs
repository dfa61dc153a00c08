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

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be opened, written or replaced
    #[error("PUF store {path} unavailable: {source}", path = .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PUF offset {offset} out of range: store holds {len} records")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Corrupt PUF record at line {index}: {content:?}")]
    Corrupt { index: usize, content: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable {
            path: PathBuf::from("PUFS.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "PUF store PUFS.txt unavailable: no such file");

        let err = StoreError::OffsetOutOfRange { offset: 10, len: 10 };
        assert_eq!(err.to_string(), "PUF offset 10 out of range: store holds 10 records");

        let err = StoreError::Corrupt { index: 2, content: "abc".to_string() };
        assert_eq!(err.to_string(), "Corrupt PUF record at line 2: \"abc\"");
    }

    #[test]
    fn test_unavailable_keeps_source() {
        use std::error::Error;
        let err = StoreError::Unavailable {
            path: PathBuf::from("PUFS.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
