//! Error types.
//!
//! [`FlashRamError`] describes the non-fatal conditions the chip absorbs and logs; the bus never
//! sees them. [`BusError`] is returned by the host-side RDRAM helpers. [`StorageError`] is returned
//! when backing storage cannot be opened or has the wrong size.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cartridge::flashram::mode::Mode;

#[derive(Debug, Error)]
pub enum FlashRamError {
    #[error("unknown flashram command: {0:08X}")]
    UnknownCommand(u32),
    #[error("invalid flashram register address: {0:08X}")]
    InvalidAddress(u32),
    #[error("flashram register access while flashram is disabled: {0:08X}")]
    Disabled(u32),
    #[error("flashram {operation} in {mode:?} mode")]
    ModeMismatch { operation: &'static str, mode: Mode },
    #[error("flashram {operation} out of range: {start:#X}+{len:#X} exceeds {size:#X}")]
    OutOfRange {
        operation: &'static str,
        start: usize,
        len: usize,
        size: usize,
    },
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("RDRAM access out of range: {start:#X}+{len:#X} exceeds {size:#X}")]
    OutOfRange { start: usize, len: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is {actual} bytes, expected {expected}", path.display())]
    WrongSize {
        path: PathBuf,
        actual: usize,
        expected: usize,
    },
    #[error("save image is {actual} bytes, expected {expected}")]
    WrongLength { actual: usize, expected: usize },
}
