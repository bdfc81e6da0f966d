//! Cartridge save hardware.
//!
//! - **flashram**: the FlashRAM chip mapped at $0800_0000 (status) and $0801_0000 (command).
//! - **storage**: backing storage the chip programs into and persists through.

pub mod flashram;
pub mod storage;
