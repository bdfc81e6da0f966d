//! FlashRAM chip: command decoder, register access, and PI DMA.
//!
//! The chip is a mode state machine. Mode-entry commands latch a mode and (for most of them) a
//! 64-bit status word; the execute command performs whatever the current mode has pending and
//! drops back to [`Mode::Idle`]. Data moves only through DMA: reads copy array or status data into
//! RDRAM, writes only remember where in RDRAM the next page program should read from.
//!
//! Every error here is absorbed: the bus gets no failure back, a diagnostic is logged instead.

use tracing::{debug, error, trace, warn};

use crate::cartridge::flashram::byte_order::{physical_index, word_span_end};
use crate::cartridge::flashram::command::{
    Command, PAGE_SIZE, STATUS_ERASE_MODE, STATUS_ERASE_PENDING, STATUS_READ_MODE,
    STATUS_STATUS_MODE, page_offset,
};
use crate::cartridge::flashram::mode::{FlashRamUsage, Mode};
use crate::cartridge::storage::storage::Storage;
use crate::error::FlashRamError;

/// Size of the flash array and of a `.fla` save file.
pub const FLASHRAM_SIZE: usize = 0x20000;

/// Nominal cost reported for every DMA, whatever its length.
pub const DMA_COST: u32 = 0x1000;

const DMA_LENGTH_MASK: u32 = 0x00FF_FFFF;
const ERASED: u8 = 0xFF;

/// Fill a save buffer with the erased value.
pub fn format(buffer: &mut [u8]) {
    buffer.fill(ERASED);
}

/// PI DMA lengths are encoded as `bytes - 1` in the low 24 bits.
fn dma_length(length: u32) -> usize {
    ((length & DMA_LENGTH_MASK) + 1) as usize
}

fn check_span(
    operation: &'static str,
    start: usize,
    len: usize,
    size: usize,
) -> Result<(), FlashRamError> {
    match word_span_end(start, len) {
        Some(end) if end <= size => Ok(()),
        _ => Err(FlashRamError::OutOfRange {
            operation,
            start,
            len,
            size,
        }),
    }
}

/// One cartridge's FlashRAM. Borrows its backing storage for its whole lifetime.
pub struct FlashRam<'a, S: Storage + ?Sized> {
    mode: Mode,
    status: u64,
    erase_offset: u32,
    write_pointer: u32,
    usage: FlashRamUsage,
    storage: &'a mut S,
}

impl<'a, S: Storage + ?Sized> FlashRam<'a, S> {
    /// Bind a chip to its storage, in the powered-on state.
    pub fn new(storage: &'a mut S) -> Self {
        Self {
            mode: Mode::Idle,
            status: 0,
            erase_offset: 0,
            write_pointer: 0,
            usage: FlashRamUsage::Auto,
            storage,
        }
    }

    /// Rebind the backing storage. Chip state is left as is.
    pub fn initialize(&mut self, storage: &'a mut S) {
        self.storage = storage;
    }

    /// Reset the chip registers. Storage and save-type detection are untouched.
    pub fn power_on(&mut self) {
        self.mode = Mode::Idle;
        self.status = 0;
        self.erase_offset = 0;
        self.write_pointer = 0;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> u64 {
        self.status
    }

    pub fn erase_offset(&self) -> u32 {
        self.erase_offset
    }

    pub fn write_pointer(&self) -> u32 {
        self.write_pointer
    }

    pub fn usage(&self) -> FlashRamUsage {
        self.usage
    }

    /// Force the save-type detection, e.g. from a game database entry.
    pub fn set_usage(&mut self, usage: FlashRamUsage) {
        self.usage = usage;
    }

    pub fn storage(&self) -> &S {
        &*self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut *self.storage
    }

    // -------------------------------------------------------------------------
    // Command decoder
    // -------------------------------------------------------------------------

    /// Decode and run one command word. `ram` is the source for a page program.
    pub fn execute_command(&mut self, ram: &[u8], command: u32) {
        if let Err(err) = self.command(ram, command) {
            warn!("{err}");
        }
    }

    fn command(&mut self, ram: &[u8], word: u32) -> Result<(), FlashRamError> {
        let command = Command::decode(word).ok_or(FlashRamError::UnknownCommand(word))?;
        trace!(?command, mode = ?self.mode, "flashram command");

        match command {
            Command::EraseSetup { page } => self.erase_offset = page_offset(page),
            Command::EraseMode => {
                self.mode = Mode::Erase;
                self.status = STATUS_ERASE_MODE;
            }
            Command::EraseModeWithOffset { page } => {
                self.erase_offset = page_offset(page);
                self.mode = Mode::Erase;
                self.status = STATUS_ERASE_PENDING;
            }
            Command::WriteMode => self.mode = Mode::Write,
            Command::Execute => {
                let result = self.execute(ram);
                self.mode = Mode::Idle;
                return result;
            }
            Command::StatusMode => {
                self.mode = Mode::Status;
                self.status = STATUS_STATUS_MODE;
            }
            Command::ReadMode => {
                self.mode = Mode::Read;
                self.status = STATUS_READ_MODE;
            }
        }

        Ok(())
    }

    fn execute(&mut self, ram: &[u8]) -> Result<(), FlashRamError> {
        match self.mode {
            Mode::Idle | Mode::Read | Mode::Status => Ok(()),
            Mode::Erase => self.erase_page(),
            Mode::Write => self.program_page(ram),
        }
    }

    fn erase_page(&mut self) -> Result<(), FlashRamError> {
        let start = self.erase_offset as usize;
        let mem = self.storage.data();
        check_span("erase", start, PAGE_SIZE, mem.len())?;

        for i in start..start + PAGE_SIZE {
            mem[physical_index(i)] = ERASED;
        }

        self.storage.save();
        debug!(offset = start, "flashram page erased");
        Ok(())
    }

    fn program_page(&mut self, ram: &[u8]) -> Result<(), FlashRamError> {
        let src = self.write_pointer as usize;
        let dst = self.erase_offset as usize;
        check_span("program source", src, PAGE_SIZE, ram.len())?;
        let mem = self.storage.data();
        check_span("program", dst, PAGE_SIZE, mem.len())?;

        for i in 0..PAGE_SIZE {
            mem[physical_index(dst + i)] = ram[physical_index(src + i)];
        }

        self.storage.save();
        debug!(offset = dst, source = src, "flashram page programmed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Registers ($0800_0000 status, $0801_0000 command)
    // -------------------------------------------------------------------------

    fn claim_register(&mut self, address: u32) -> Result<(), FlashRamError> {
        if self.usage == FlashRamUsage::Disabled {
            return Err(FlashRamError::Disabled(address));
        }
        if address & 0xFFFF != 0 {
            return Err(FlashRamError::InvalidAddress(address));
        }
        self.usage = FlashRamUsage::InUse;
        Ok(())
    }

    /// High word of the status latch. `None` for a rejected access.
    pub fn read_status(&mut self, address: u32) -> Option<u32> {
        match self.claim_register(address) {
            Ok(()) => Some((self.status >> 32) as u32),
            Err(err) => {
                error!("{err}");
                None
            }
        }
    }

    /// Writes to the status register are ignored by the chip.
    pub fn write_status(&mut self, _address: u32, _value: u32, _mask: u32) {}

    pub fn read_command(&self, _address: u32) -> u32 {
        0
    }

    pub fn write_command(&mut self, ram: &[u8], address: u32, value: u32, mask: u32) {
        if let Err(err) = self.claim_register(address) {
            error!("{err}");
            return;
        }
        self.execute_command(ram, value & mask);
    }

    // -------------------------------------------------------------------------
    // PI DMA
    // -------------------------------------------------------------------------

    /// Cartridge to RDRAM. Copies the status latch in status mode, array data in read mode.
    pub fn dma_to_ram(
        &mut self,
        ram: &mut [u8],
        ram_addr: u32,
        flash_addr: u32,
        length: u32,
    ) -> u32 {
        let length = dma_length(length);
        if let Err(err) = self.copy_to_ram(ram, ram_addr, flash_addr, length) {
            warn!("{err}");
        }
        DMA_COST
    }

    fn copy_to_ram(
        &mut self,
        ram: &mut [u8],
        ram_addr: u32,
        flash_addr: u32,
        length: usize,
    ) -> Result<(), FlashRamError> {
        match self.mode {
            Mode::Status => {
                // Two word stores: high half, then low half.
                let base = (ram_addr & !3) as usize;
                check_span("status DMA", base, 8, ram.len())?;
                for (i, byte) in self.status.to_be_bytes().into_iter().enumerate() {
                    ram[physical_index(base + i)] = byte;
                }
            }
            Mode::Read => {
                let src = ((flash_addr & 0xFFFF) * 2) as usize;
                let dst = ram_addr as usize;
                let mem = self.storage.data();
                check_span("read DMA source", src, length, mem.len())?;
                check_span("read DMA", dst, length, ram.len())?;

                for i in 0..length {
                    ram[physical_index(dst + i)] = mem[physical_index(src + i)];
                }
            }
            mode => {
                return Err(FlashRamError::ModeMismatch {
                    operation: "DMA to RAM",
                    mode,
                });
            }
        }
        Ok(())
    }

    /// RDRAM to cartridge. Only latches the page source; the copy happens on execute.
    pub fn dma_from_ram(&mut self, ram_addr: u32, _flash_addr: u32, length: u32) -> u32 {
        let length = dma_length(length);
        match self.mode {
            Mode::Write => {
                self.write_pointer = ram_addr;
                trace!(ram_addr, length, "flashram write pointer latched");
            }
            mode => error!(
                "{}",
                FlashRamError::ModeMismatch {
                    operation: "DMA from RAM",
                    mode,
                }
            ),
        }
        DMA_COST
    }
}
