use std::fs;

use crate::cartridge::flashram::flashram::FLASHRAM_SIZE;
use crate::cartridge::storage::file::FileStorage;
use crate::cartridge::storage::storage::{MemoryStorage, Storage};
use crate::error::StorageError;

#[test]
fn memory_storage_starts_formatted() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.bytes().len(), FLASHRAM_SIZE);
    assert!(storage.bytes().iter().all(|&b| b == 0xFF));
    assert_eq!(storage.saves(), 0);
}

#[test]
fn memory_storage_counts_saves() {
    let mut storage = MemoryStorage::new();
    storage.data()[0] = 0x12;
    storage.save();
    storage.save();
    assert_eq!(storage.saves(), 2);
    assert_eq!(storage.bytes()[0], 0x12);
}

#[test]
fn missing_file_opens_formatted_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.fla");

    let storage = FileStorage::open(&path).unwrap();

    assert!(storage.bytes().iter().all(|&b| b == 0xFF));
    assert!(!path.exists());
}

#[test]
fn save_writes_whole_buffer_and_reopens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.fla");

    let mut storage = FileStorage::open(&path).unwrap();
    storage.data()[0x80] = 0x5A;
    storage.save();

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(on_disk.len(), FLASHRAM_SIZE);
    assert_eq!(on_disk[0x80], 0x5A);

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.bytes(), on_disk.as_slice());
}

#[test]
fn wrong_size_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.fla");
    fs::write(&path, [0u8; 16]).unwrap();

    match FileStorage::open(&path) {
        Err(StorageError::WrongSize { actual, expected, .. }) => {
            assert_eq!(actual, 16);
            assert_eq!(expected, FLASHRAM_SIZE);
        }
        other => panic!("expected WrongSize, got {:?}", other.map(|s| s.path().to_path_buf())),
    }
}

#[test]
fn create_ignores_existing_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.fla");
    fs::write(&path, vec![0u8; FLASHRAM_SIZE]).unwrap();

    let storage = FileStorage::create(&path);
    assert!(storage.bytes().iter().all(|&b| b == 0xFF));
}

#[test]
fn memory_storage_rejects_wrong_length_image() {
    match MemoryStorage::from_bytes(vec![0; FLASHRAM_SIZE - 4]) {
        Err(StorageError::WrongLength { actual, expected }) => {
            assert_eq!(actual, FLASHRAM_SIZE - 4);
            assert_eq!(expected, FLASHRAM_SIZE);
        }
        other => panic!("expected WrongLength, got {:?}", other.map(|s| s.saves())),
    }
    assert!(MemoryStorage::from_bytes(vec![0; FLASHRAM_SIZE]).is_ok());
}
