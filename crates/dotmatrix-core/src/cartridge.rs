use std::path::Path;

use crate::error::CoreError;

/// Header logo bytes every licensed cartridge carries at 0x0104-0x0133.
/// The boot sequence refuses to run a ROM whose header does not match.
const HEADER_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

const LOGO_START: usize = 0x0104;
const LOGO_END: usize = 0x0134;
const TITLE_START: usize = 0x0134;
const TITLE_END: usize = 0x0144;

/// A flat (bank-switch-free) ROM image. Cartridges that declare a mapper
/// still load, but only the first 32 KiB are addressable and writes into
/// ROM space are discarded by the MMU.
#[derive(Debug)]
pub struct Cartridge {
    pub rom: Vec<u8>,
    pub title: String,
}

impl Cartridge {
    /// Validate and wrap a ROM image already in memory.
    pub fn load(rom: Vec<u8>) -> Result<Self, CoreError> {
        match rom.get(LOGO_START..LOGO_END) {
            Some(logo) if logo == &HEADER_LOGO[..] => {}
            _ => return Err(CoreError::InvalidCartridge),
        }

        let title = Self::parse_title(&rom);
        Ok(Self { rom, title })
    }

    /// Read and validate a ROM image from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let rom = std::fs::read(path)?;
        Self::load(rom)
    }

    /// ROM-space read. Images shorter than 32 KiB read as open bus past
    /// their end.
    pub fn read(&self, addr: u16) -> u8 {
        self.rom.get(addr as usize).copied().unwrap_or(0xFF)
    }

    fn parse_title(rom: &[u8]) -> String {
        let end = TITLE_END.min(rom.len());
        let mut slice = &rom[TITLE_START.min(rom.len())..end];
        if let Some(pos) = slice.iter().position(|&b| b == 0) {
            slice = &slice[..pos];
        }
        String::from_utf8_lossy(slice).trim().to_string()
    }
}

/// Build a header that passes the logo check, for callers that synthesize
/// ROMs (tests, tools). The title bytes are optional.
pub fn write_header(rom: &mut [u8], title: &str) {
    rom[LOGO_START..LOGO_END].copy_from_slice(&HEADER_LOGO);
    for (dst, src) in rom[TITLE_START..TITLE_END].iter_mut().zip(title.bytes()) {
        *dst = src;
    }
}
