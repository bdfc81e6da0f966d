//! Backing storage for cartridge save memory.
//!
//! - **storage**: the [`Storage`](storage::Storage) capability the chip borrows, plus an
//!   in-memory implementation.
//! - **file**: a `.fla` file on disk.

pub mod file;
pub mod storage;

#[cfg(test)]
mod tests;
