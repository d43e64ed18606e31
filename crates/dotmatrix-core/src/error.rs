use thiserror::Error;

/// Fatal conditions the core can surface. None of these are recoverable:
/// the first two abort startup, the last two abort emulation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The header logo bytes at 0x0104-0x0133 did not match the expected
    /// constant, so the image is not a valid cartridge.
    #[error("cartridge logo check failed: not a valid Game Boy image")]
    InvalidCartridge,

    #[error("failed to read cartridge: {0}")]
    Io(#[from] std::io::Error),

    /// An undefined opcode slot was fetched. Either the ROM jumped into
    /// data, or an instruction is missing from the dispatch table.
    #[error("illegal opcode {opcode:#04x} at {pc:#06x}")]
    IllegalOpcode { pc: u16, opcode: u8 },

    /// A memory access fell outside every mapped region. The address
    /// decoder covers the full 64 KiB space, so seeing this means a bug in
    /// the decoder itself rather than in the ROM.
    #[error("unmapped address {addr:#06x}")]
    UnmappedAddress { addr: u16 },
}
