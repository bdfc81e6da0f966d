//! File-backed save memory (`.fla`).
//!
//! The file is the raw buffer: `FLASHRAM_SIZE` bytes in word-swapped layout, no header.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::cartridge::flashram::flashram::{FLASHRAM_SIZE, format};
use crate::cartridge::storage::storage::Storage;
use crate::error::StorageError;

pub struct FileStorage {
    path: PathBuf,
    data: Vec<u8>,
}

impl FileStorage {
    /// Load `path`, or start from a formatted buffer if it does not exist yet.
    ///
    /// Nothing is written until the first [`save`](Storage::save).
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no save file, formatting");
                return Ok(Self::formatted(path));
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        if data.len() != FLASHRAM_SIZE {
            return Err(StorageError::WrongSize {
                path,
                actual: data.len(),
                expected: FLASHRAM_SIZE,
            });
        }

        Ok(Self { path, data })
    }

    /// A formatted buffer bound to `path`, ignoring whatever is there now.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self::formatted(path.as_ref().to_path_buf())
    }

    fn formatted(path: PathBuf) -> Self {
        let mut data = vec![0; FLASHRAM_SIZE];
        format(&mut data);
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl Storage for FileStorage {
    fn data(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn save(&mut self) {
        match fs::write(&self.path, &self.data) {
            Ok(()) => debug!(path = %self.path.display(), "flashram saved"),
            Err(err) => error!(path = %self.path.display(), %err, "failed to save flashram"),
        }
    }
}
