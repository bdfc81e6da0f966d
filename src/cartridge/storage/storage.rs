//! Storage capability and in-memory backend.

use crate::cartridge::flashram::flashram::{FLASHRAM_SIZE, format};
use crate::error::StorageError;

/// Byte buffer the chip reads and programs in place, and a way to make it durable.
///
/// The chip calls [`save`](Storage::save) after every erase or program and never checks whether
/// it succeeded.
pub trait Storage {
    /// The whole save buffer, in word-swapped layout.
    fn data(&mut self) -> &mut [u8];
    /// Persist the current buffer contents.
    fn save(&mut self);
}

/// Save memory that lives only as long as the process. Counts saves.
pub struct MemoryStorage {
    data: Vec<u8>,
    saves: usize,
}

impl MemoryStorage {
    /// Freshly formatted (all 0xFF) storage.
    pub fn new() -> Self {
        let mut data = vec![0; FLASHRAM_SIZE];
        format(&mut data);
        Self { data, saves: 0 }
    }

    /// Storage initialised from an existing image of exactly `FLASHRAM_SIZE` bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, StorageError> {
        if data.len() != FLASHRAM_SIZE {
            return Err(StorageError::WrongLength {
                actual: data.len(),
                expected: FLASHRAM_SIZE,
            });
        }
        Ok(Self { data, saves: 0 })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of times [`Storage::save`] has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn data(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn save(&mut self) {
        self.saves += 1;
    }
}
