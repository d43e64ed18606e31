//! DMG Game Boy emulation core.
//!
//! This crate contains the platform-agnostic emulator logic: the SM83 CPU,
//! the 64 KiB memory map with its memory-mapped I/O, the scanline PPU, the
//! timers and the joypad register. Frontends live in separate crates and
//! drive the core through the [`gameboy`] facade: load a [`cartridge`],
//! call [`gameboy::GameBoy::step_frame`] at ~60 Hz, and present the
//! framebuffer.

/// ROM image loading and header integrity checking.
pub mod cartridge;

/// SM83 CPU core: opcode dispatch, cycle accounting, interrupts.
pub mod cpu;

/// Fatal error conditions.
pub mod error;

/// High-level facade that wires the CPU, MMU and PPU into a single machine.
pub mod gameboy;

/// Joypad register and host button interface.
pub mod input;

/// Memory map and hardware register plumbing.
pub mod mmu;

/// Pixel processing unit: LCD mode machine and scanline renderer.
pub mod ppu;

/// Divider/timer unit.
pub mod timer;
