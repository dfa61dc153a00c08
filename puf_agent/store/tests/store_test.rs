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

use puf_store::{PufStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> PufStore {
    PufStore::new(dir.path().join("PUFS.txt"))
}

#[test]
fn test_every_written_value_reads_back_at_its_offset() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let values = [111, 222, 0, u32::MAX, 0x8000_0000, 7];

    store.write(&values).unwrap();

    for (offset, expected) in values.iter().enumerate() {
        assert_eq!(store.read_at(offset).unwrap(), *expected);
    }
    assert_eq!(store.read_all().unwrap(), values.to_vec());
    assert_eq!(store.len().unwrap(), values.len());
}

#[test]
fn test_file_format_is_one_unsigned_decimal_per_line() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.write(&[1, 4294967295, 30]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(content, "1\n4294967295\n30\n");
}

#[test]
fn test_offset_past_end_is_out_of_range() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[5, 6, 7]).unwrap();

    for offset in [3, 4, 1000] {
        match store.read_at(offset) {
            Err(StoreError::OffsetOutOfRange { offset: got, len }) => {
                assert_eq!(got, offset);
                assert_eq!(len, 3);
            },
            other => panic!("expected OffsetOutOfRange, got {:?}", other),
        }
    }
}

#[test]
fn test_empty_write_leaves_empty_file() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[9, 9, 9]).unwrap();

    store.write(&[]).unwrap();

    assert!(store.exists());
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    assert_eq!(store.len().unwrap(), 0);
    assert!(store.is_empty().unwrap());
    assert!(matches!(store.read_at(0), Err(StoreError::OffsetOutOfRange { offset: 0, len: 0 })));
}

#[test]
fn test_write_replaces_previous_content() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[1, 2, 3, 4, 5]).unwrap();

    store.write(&[10, 20]).unwrap();

    assert_eq!(store.read_all().unwrap(), vec![10, 20]);
    // no temporary files left behind
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_missing_file_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(!store.exists());
    assert!(matches!(store.read_at(0), Err(StoreError::Unavailable { .. })));
    assert!(matches!(store.len(), Err(StoreError::Unavailable { .. })));
}

#[test]
fn test_write_into_missing_directory_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = PufStore::new(dir.path().join("missing").join("PUFS.txt"));

    let err = store.write(&[1]).unwrap_err();
    assert!(matches!(err, StoreError::Unavailable { .. }));
}

#[test]
fn test_legacy_signed_records_are_accepted() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "123\n-1\n-559038737\n").unwrap();

    assert_eq!(store.read_at(0).unwrap(), 123);
    assert_eq!(store.read_at(1).unwrap(), u32::MAX);
    assert_eq!(store.read_at(2).unwrap(), 0xDEAD_BEEF);
}

#[test]
fn test_corrupt_record_only_fails_when_reached() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "1\n2\nnot-a-number\n4\n").unwrap();

    assert_eq!(store.read_at(1).unwrap(), 2);
    assert_eq!(store.read_at(3).unwrap(), 4);
    assert!(matches!(store.read_at(2), Err(StoreError::Corrupt { index: 2, .. })));
    assert!(matches!(store.read_all(), Err(StoreError::Corrupt { index: 2, .. })));
}

#[test]
fn test_file_without_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "8\n9").unwrap();

    assert_eq!(store.len().unwrap(), 2);
    assert_eq!(store.read_at(1).unwrap(), 9);
}

#[test]
fn test_single_record_store() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[1, 2, 3]).unwrap();

    store.write(&[42]).unwrap();

    assert_eq!(fs::read_to_string(store.path()).unwrap(), "42\n");
    assert_eq!(store.read_at(0).unwrap(), 42);
    assert!(matches!(store.read_at(1), Err(StoreError::OffsetOutOfRange { offset: 1, len: 1 })));
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_read_range_scans_once_within_bounds() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[10, 11, 12, 13, 14]).unwrap();

    assert_eq!(store.read_range(1, 3).unwrap(), vec![11, 12, 13]);
    assert_eq!(store.read_range(4, 1).unwrap(), vec![14]);
    assert_eq!(store.read_range(9, 0).unwrap(), Vec::<u32>::new());
    assert!(matches!(store.read_range(3, 5), Err(StoreError::OffsetOutOfRange { offset: 5, len: 5 })));
    assert!(matches!(store.read_range(7, 1), Err(StoreError::OffsetOutOfRange { offset: 7, len: 5 })));
    assert!(matches!(
        store.read_range(0, 1_000_000_000),
        Err(StoreError::OffsetOutOfRange { offset: 5, len: 5 })
    ));
}

#[test]
fn test_read_range_ignores_corrupt_lines_after_range() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    fs::write(store.path(), "1\n2\nbroken\n").unwrap();

    assert_eq!(store.read_range(0, 2).unwrap(), vec![1, 2]);
    assert!(matches!(store.read_range(1, 2), Err(StoreError::Corrupt { index: 2, .. })));
}

#[cfg(unix)]
#[test]
fn test_new_store_file_is_world_readable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[1, 2]).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[cfg(unix)]
#[test]
fn test_rewrite_keeps_existing_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.write(&[1]).unwrap();
    fs::set_permissions(store.path(), fs::Permissions::from_mode(0o640)).unwrap();

    store.write(&[2, 3]).unwrap();

    let mode = fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
    assert_eq!(store.read_all().unwrap(), vec![2, 3]);
}
