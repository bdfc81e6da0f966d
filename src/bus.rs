//! PI bus for a FlashRAM cartridge.
//!
//! Maps cartridge domain 2 addresses onto the chip's status and command registers, and runs PI
//! DMA between RDRAM and the chip.

use tracing::{debug, warn};

use crate::cartridge::flashram::byte_order::{physical_index, word_span_end};
use crate::cartridge::flashram::flashram::FlashRam;
use crate::cartridge::storage::storage::Storage;
use crate::error::BusError;

/// Status register window.
pub const FLASHRAM_STATUS: u32 = 0x0800_0000;
/// Command register window.
pub const FLASHRAM_COMMAND: u32 = 0x0801_0000;
const REGISTER_WINDOW: u32 = 0xFFFF;

/// Cartridge domain 2, where SRAM and FlashRAM live.
const CART_DOM2: std::ops::RangeInclusive<u32> = 0x0800_0000..=0x0FFF_FFFF;

/// 4 MiB without the Expansion Pak.
pub const RDRAM_SIZE: usize = 0x40_0000;

/// 32-bit register access as issued by the CPU.
pub trait Bus {
    /// `None` when nothing drives the bus (unmapped or rejected access).
    fn read_word(&mut self, addr: u32) -> Option<u32>;
    fn write_word(&mut self, addr: u32, value: u32, mask: u32);
}

/// RDRAM plus the FlashRAM cartridge.
pub struct PiBus<'a, S: Storage + ?Sized> {
    /// Word-swapped, like the chip's storage.
    pub rdram: Vec<u8>,
    pub flashram: FlashRam<'a, S>,
}

impl<'a, S: Storage + ?Sized> PiBus<'a, S> {
    pub fn new(flashram: FlashRam<'a, S>) -> Self {
        Self::with_rdram_size(flashram, RDRAM_SIZE)
    }

    pub fn with_rdram_size(flashram: FlashRam<'a, S>, rdram_size: usize) -> Self {
        Self {
            rdram: vec![0; rdram_size],
            flashram,
        }
    }

    /// PI DMA cartridge → RDRAM (`PI_WR_LEN`). Returns the cycle cost.
    pub fn dma_to_rdram(&mut self, dram_addr: u32, cart_addr: u32, length: u32) -> u32 {
        if !CART_DOM2.contains(&cart_addr) {
            warn!("PI DMA from unmapped cartridge address {cart_addr:08X}");
            return 0;
        }
        self.flashram
            .dma_to_ram(&mut self.rdram, dram_addr, cart_addr, length)
    }

    /// PI DMA RDRAM → cartridge (`PI_RD_LEN`). Returns the cycle cost.
    pub fn dma_from_rdram(&mut self, dram_addr: u32, cart_addr: u32, length: u32) -> u32 {
        if !CART_DOM2.contains(&cart_addr) {
            warn!("PI DMA to unmapped cartridge address {cart_addr:08X}");
            return 0;
        }
        self.flashram.dma_from_ram(dram_addr, cart_addr, length)
    }

    /// Store bytes into RDRAM the way the CPU's byte stores would land.
    pub fn write_rdram(&mut self, addr: u32, bytes: &[u8]) -> Result<(), BusError> {
        let start = self.rdram_span(addr, bytes.len())?;
        for (i, &byte) in bytes.iter().enumerate() {
            self.rdram[physical_index(start + i)] = byte;
        }
        Ok(())
    }

    /// Load bytes from RDRAM the way the CPU's byte loads would see them.
    pub fn read_rdram(&self, addr: u32, len: usize) -> Result<Vec<u8>, BusError> {
        let start = self.rdram_span(addr, len)?;
        Ok((start..start + len)
            .map(|i| self.rdram[physical_index(i)])
            .collect())
    }

    fn rdram_span(&self, addr: u32, len: usize) -> Result<usize, BusError> {
        let start = addr as usize;
        let size = self.rdram.len();
        match word_span_end(start, len) {
            Some(end) if end <= size => Ok(start),
            _ => Err(BusError::OutOfRange {
                start,
                len,
                size,
            }),
        }
    }
}

impl<'a, S: Storage + ?Sized> Bus for PiBus<'a, S> {
    fn read_word(&mut self, addr: u32) -> Option<u32> {
        match addr & !REGISTER_WINDOW {
            FLASHRAM_STATUS => self.flashram.read_status(addr),
            FLASHRAM_COMMAND => Some(self.flashram.read_command(addr)),
            _ => {
                debug!("read from unmapped address {addr:08X}");
                None
            }
        }
    }

    fn write_word(&mut self, addr: u32, value: u32, mask: u32) {
        match addr & !REGISTER_WINDOW {
            FLASHRAM_STATUS => self.flashram.write_status(addr, value, mask),
            FLASHRAM_COMMAND => self
                .flashram
                .write_command(&self.rdram, addr, value, mask),
            _ => debug!("write to unmapped address {addr:08X}"),
        }
    }
}
