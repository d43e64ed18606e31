use log::trace;

use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::error::CoreError;
use crate::mmu::Mmu;
use crate::ppu::Ppu;

/// T-cycles per emulated frame: 4_194_304 Hz / 60.
pub const CYCLES_PER_FRAME: u32 = 69_905;

/// T-cycles a halted CPU burns per step while waiting for an interrupt.
const HALT_IDLE_CYCLES: u32 = 4;

/// High-level facade wiring the CPU, memory and PPU into one machine.
///
/// The host drives it one frame at a time via [`GameBoy::step_frame`] and
/// reads the finished picture back with [`GameBoy::framebuffer`].
pub struct GameBoy {
    pub cpu: Cpu,
    pub mmu: Mmu,
    pub ppu: Ppu,
}

impl GameBoy {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            mmu: Mmu::new(),
            ppu: Ppu::new(),
        }
    }

    pub fn load_cart(&mut self, cart: Cartridge) {
        self.mmu.load_cart(cart);
    }

    pub fn framebuffer(&self) -> &[u32; crate::ppu::SCREEN_WIDTH * crate::ppu::SCREEN_HEIGHT] {
        self.ppu.framebuffer()
    }

    /// Advance emulation by one host frame's worth of T-cycles.
    pub fn step_frame(&mut self) -> Result<(), CoreError> {
        let mut cycles_this_frame = 0u32;
        while cycles_this_frame < CYCLES_PER_FRAME {
            cycles_this_frame += self.step()?;
        }
        Ok(())
    }

    /// One instruction boundary: execute (or idle while halted), then tick
    /// the timer, the EI/DI latch and the PPU in that order, and finally
    /// let the dispatcher consume any interrupt that became pending. The
    /// ordering is load-bearing: a timer overflow must reach IF before the
    /// dispatcher inspects it in the same step.
    pub fn step(&mut self) -> Result<u32, CoreError> {
        let mut cycles;
        if self.cpu.halted {
            cycles = HALT_IDLE_CYCLES;
            if self.mmu.if_reg & self.mmu.ie_reg & 0x1F != 0 {
                self.cpu.halted = false;
            }
        } else {
            let bytes = self.mmu.fetch3(self.cpu.pc);
            trace!(
                "[{:04X}] {:02X} {:02X} {:02X}  {}",
                self.cpu.pc,
                bytes[0],
                bytes[1],
                bytes[2],
                self.cpu.debug_state()
            );
            let (advance, c) = self.cpu.execute(&mut self.mmu, bytes)?;
            self.cpu.pc = self.cpu.pc.wrapping_add(advance);
            cycles = c;
        }

        self.mmu.timer.step(cycles, &mut self.mmu.if_reg);
        self.cpu.tick_ime_latch();
        self.ppu.step(cycles, &mut self.mmu);
        cycles += self.cpu.dispatch_interrupt(&mut self.mmu);

        Ok(cycles)
    }
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}
