//! FlashRAM command words.
//!
//! The host writes a 32-bit word to the command register; the top byte selects the command and,
//! for the offset-carrying commands, the low 16 bits hold a page index.

/// Bytes per erase/program page.
pub const PAGE_SIZE: usize = 128;

pub const CMD_ERASE_SETUP: u8 = 0x4B;
pub const CMD_ERASE_MODE: u8 = 0x78;
pub const CMD_ERASE_MODE_WITH_OFFSET: u8 = 0xA5;
pub const CMD_WRITE_MODE: u8 = 0xB4;
pub const CMD_EXECUTE: u8 = 0xD2;
pub const CMD_STATUS_MODE: u8 = 0xE1;
pub const CMD_READ_MODE: u8 = 0xF0;

/// Status latched by the erase-mode command.
pub const STATUS_ERASE_MODE: u64 = 0x1111_8008_00C2_0000;
/// Status latched by the erase-with-offset command.
pub const STATUS_ERASE_PENDING: u64 = 0x1111_8004_00C2_0000;
/// Status latched by the status-mode command.
pub const STATUS_STATUS_MODE: u64 = 0x1111_8001_00C2_0000;
/// Status latched by the read-mode command.
pub const STATUS_READ_MODE: u64 = 0x1111_8004_F000_0000;

/// A decoded command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// $4B: select the page for the next erase or program.
    EraseSetup { page: u16 },
    /// $78: enter erase mode.
    EraseMode,
    /// $A5: select a page and enter erase mode.
    EraseModeWithOffset { page: u16 },
    /// $B4: enter write mode.
    WriteMode,
    /// $D2: run the pending operation for the current mode.
    Execute,
    /// $E1: enter status mode.
    StatusMode,
    /// $F0: enter read mode.
    ReadMode,
}

impl Command {
    /// Decode a command word. Bits 16-23 are ignored; `None` for an unknown top byte.
    pub fn decode(word: u32) -> Option<Self> {
        let page = (word & 0xFFFF) as u16;
        let command = match (word >> 24) as u8 {
            CMD_ERASE_SETUP => Command::EraseSetup { page },
            CMD_ERASE_MODE => Command::EraseMode,
            CMD_ERASE_MODE_WITH_OFFSET => Command::EraseModeWithOffset { page },
            CMD_WRITE_MODE => Command::WriteMode,
            CMD_EXECUTE => Command::Execute,
            CMD_STATUS_MODE => Command::StatusMode,
            CMD_READ_MODE => Command::ReadMode,
            _ => return None,
        };
        Some(command)
    }

    /// The command word a game writes for this command.
    pub fn word(self) -> u32 {
        let (opcode, page) = match self {
            Command::EraseSetup { page } => (CMD_ERASE_SETUP, page),
            Command::EraseMode => (CMD_ERASE_MODE, 0),
            Command::EraseModeWithOffset { page } => (CMD_ERASE_MODE_WITH_OFFSET, page),
            Command::WriteMode => (CMD_WRITE_MODE, 0),
            Command::Execute => (CMD_EXECUTE, 0),
            Command::StatusMode => (CMD_STATUS_MODE, 0),
            Command::ReadMode => (CMD_READ_MODE, 0),
        };
        ((opcode as u32) << 24) | page as u32
    }
}

/// Byte offset of a page within the flash address space.
#[inline]
pub fn page_offset(page: u16) -> u32 {
    page as u32 * PAGE_SIZE as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_top_byte_and_page() {
        assert_eq!(
            Command::decode(0x4B00_0003),
            Some(Command::EraseSetup { page: 3 })
        );
        assert_eq!(
            Command::decode(0xA5FF_1234),
            Some(Command::EraseModeWithOffset { page: 0x1234 })
        );
        assert_eq!(Command::decode(0xD200_0000), Some(Command::Execute));
        assert_eq!(Command::decode(0xE100_0000), Some(Command::StatusMode));
    }

    #[test]
    fn rejects_unknown_opcode() {
        assert_eq!(Command::decode(0x0000_0000), None);
        assert_eq!(Command::decode(0x3C00_0000), None);
        assert_eq!(Command::decode(0xFF00_0001), None);
    }

    #[test]
    fn word_decodes_back() {
        let command = Command::EraseSetup { page: 0x3FF };
        assert_eq!(command.word(), 0x4B00_03FF);
        assert_eq!(Command::decode(command.word()), Some(command));
    }

    #[test]
    fn page_offset_is_page_aligned() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(5), 640);
        assert_eq!(page_offset(0xFFFF), 0xFFFF * 128);
    }
}
