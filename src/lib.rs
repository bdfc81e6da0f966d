//! FlashRAM: the N64 cartridge flash save chip, as seen from the peripheral interface (PI).
//!
//! Models the chip's command protocol and mode state machine, and the two paths the host uses to
//! reach it: 32-bit register accesses in cartridge domain 2 and bulk PI DMA to and from RDRAM.
//!
//! ## Modules
//!
//! - **bus** – PI-side routing: status and command registers, DMA between RDRAM and the chip
//! - **cartridge** – the FlashRAM chip and its backing storage (in memory or a `.fla` file)
//! - **error** – diagnostics the chip absorbs, and storage open failures

pub mod bus;
pub mod cartridge;
pub mod error;
