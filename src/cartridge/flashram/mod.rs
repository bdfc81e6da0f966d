//! Cartridge FlashRAM (128 KiB, 128-byte pages).
//!
//! - **flashram**: the chip: command decoder, status/command registers, PI DMA.
//! - **command**: command words, opcodes, and the status values they latch.
//! - **mode**: operating mode and save-type detection state.
//! - **byte_order**: byte-lane swap between 8-bit transfers and 32-bit word storage.

pub mod byte_order;
pub mod command;
pub mod flashram;
pub mod mode;
