use dotmatrix_core::cartridge::{write_header, Cartridge};
use dotmatrix_core::gameboy::{GameBoy, CYCLES_PER_FRAME};

/// A valid cartridge whose entry point spins in a tight loop.
fn looping_cart() -> Cartridge {
    let mut rom = vec![0u8; 0x8000];
    write_header(&mut rom, "LOOP");
    // 0x0100: NOP; JP 0x0100
    rom[0x0100] = 0x00;
    rom[0x0101] = 0xC3;
    rom[0x0102] = 0x00;
    rom[0x0103] = 0x01;
    Cartridge::load(rom).unwrap()
}

#[test]
fn step_frame_advances_one_frame_of_cycles() {
    let mut gb = GameBoy::new();
    gb.load_cart(looping_cart());
    gb.mmu.if_reg = 0;

    gb.step_frame().unwrap();

    // the PPU crossed into VBlank exactly once during the frame
    assert_eq!(gb.mmu.if_reg & 0x01, 0x01);
    assert!(gb.mmu.read(0xFF44) >= 144);
}

#[test]
fn step_frame_is_bounded() {
    let mut gb = GameBoy::new();
    gb.load_cart(looping_cart());

    let mut total = 0u32;
    let start = std::time::Instant::now();
    while total < CYCLES_PER_FRAME {
        total += gb.step().unwrap();
    }
    // one frame of emulated work stays comfortably under a host second
    assert!(start.elapsed().as_secs() < 1);
    // the overshoot past the frame budget is at most one instruction plus
    // one dispatch
    assert!(total < CYCLES_PER_FRAME + 44);
}

#[test]
fn frames_are_deterministic() {
    let mut a = GameBoy::new();
    let mut b = GameBoy::new();
    a.load_cart(looping_cart());
    b.load_cart(looping_cart());

    for _ in 0..3 {
        a.step_frame().unwrap();
        b.step_frame().unwrap();
    }

    assert_eq!(a.cpu.pc, b.cpu.pc);
    assert!(a
        .framebuffer()
        .iter()
        .zip(b.framebuffer().iter())
        .all(|(x, y)| x == y));
}

#[test]
fn illegal_opcode_stops_the_frame() {
    let mut gb = GameBoy::new();
    let mut rom = vec![0u8; 0x8000];
    write_header(&mut rom, "BAD");
    rom[0x0100] = 0xD3;
    gb.load_cart(Cartridge::load(rom).unwrap());

    let err = gb.step_frame().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("0xd3"), "diagnostic names the opcode: {msg}");
    assert!(msg.contains("0x0100"), "diagnostic names the PC: {msg}");
}

#[test]
fn vblank_interrupt_reaches_the_vector_end_to_end() {
    let mut gb = GameBoy::new();
    let mut rom = vec![0u8; 0x8000];
    write_header(&mut rom, "IRQ");
    // 0x0100: EI; then spin
    rom[0x0100] = 0xFB;
    rom[0x0101] = 0xC3;
    rom[0x0102] = 0x01;
    rom[0x0103] = 0x01;
    // 0x0040 (VBlank vector): EI; JP 0x0040 -- keep re-enabling and spinning
    rom[0x0040] = 0xFB;
    rom[0x0041] = 0xC3;
    rom[0x0042] = 0x40;
    rom[0x0043] = 0x00;
    gb.load_cart(Cartridge::load(rom).unwrap());
    gb.mmu.if_reg = 0;
    gb.mmu.ie_reg = 0x01;

    gb.step_frame().unwrap();

    assert!(
        (0x0040..0x0100).contains(&gb.cpu.pc),
        "PC {:04X} should be in the VBlank handler",
        gb.cpu.pc
    );
}

#[test]
fn timer_interrupt_fires_through_the_frame_driver() {
    let mut gb = GameBoy::new();
    let mut rom = vec![0u8; 0x8000];
    write_header(&mut rom, "TMR");
    rom[0x0100] = 0xFB; // EI
    rom[0x0101] = 0xC3; // JP 0x0101
    rom[0x0102] = 0x01;
    rom[0x0103] = 0x01;
    // timer vector: LD A,0x42 then spin in place
    rom[0x0050] = 0x3E;
    rom[0x0051] = 0x42;
    rom[0x0052] = 0x18;
    rom[0x0053] = 0xFE; // JR -2
    gb.load_cart(Cartridge::load(rom).unwrap());
    gb.mmu.if_reg = 0;
    gb.mmu.ie_reg = 0x04;
    gb.mmu.write(0xFF07, 0x05); // enable, 16 T period

    gb.step_frame().unwrap();

    assert_eq!(gb.cpu.a, 0x42, "timer handler ran");
    assert_eq!(gb.cpu.pc, 0x0052, "handler parked in its spin loop");
}
