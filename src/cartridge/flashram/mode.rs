//! FlashRAM operating mode.

/// What the chip does on the next execute command or DMA transfer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Nothing pending; execute is a no-op and DMA is rejected.
    #[default]
    Idle,
    /// Execute erases the page at the erase offset.
    Erase,
    /// DMA from RAM latches the source pointer; execute programs one page.
    Write,
    /// DMA to RAM copies array data.
    Read,
    /// DMA to RAM copies the 64-bit status latch.
    Status,
}

/// Who owns cartridge domain 2: FlashRAM, or another save type (SRAM).
///
/// Register accesses settle `Auto` into `InUse`; a `Disabled` chip rejects them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FlashRamUsage {
    #[default]
    Auto,
    InUse,
    Disabled,
}
