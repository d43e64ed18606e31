use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use log::info;
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use dotmatrix_core::cartridge::Cartridge;
use dotmatrix_core::error::CoreError;
use dotmatrix_core::gameboy::GameBoy;
use dotmatrix_core::input::Button;
use dotmatrix_core::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

const SCALE: u32 = 3;
const GB_FPS: f64 = 59.7275;
const FRAME_TIME: Duration = Duration::from_nanos((1e9_f64 / GB_FPS) as u64);

#[derive(Parser)]
struct Args {
    /// Path to the cartridge file
    rom: std::path::PathBuf,

    /// Run without opening a window
    #[arg(long)]
    headless: bool,

    /// Number of frames to run in headless mode
    #[arg(long, default_value_t = 60)]
    frames: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let cart = Cartridge::from_file(&args.rom)?;
    info!("loaded {:?} (title {:?})", args.rom, cart.title);

    let title = if cart.title.is_empty() {
        "dotmatrix".to_string()
    } else {
        format!("dotmatrix \u{2013} {}", cart.title)
    };

    let mut gb = GameBoy::new();
    gb.load_cart(cart);

    if args.headless {
        for _ in 0..args.frames {
            gb.step_frame().inspect_err(|e| dump_crash(&gb, e))?;
        }
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let mut app = App {
        gb,
        title,
        window: None,
        pixels: None,
        next_frame: Instant::now(),
        crashed: false,
    };
    event_loop.run_app(&mut app)?;

    if app.crashed {
        return Err("emulation aborted".into());
    }
    Ok(())
}

/// Emulation crash diagnostic: the failing location, the fetched bytes and
/// the full register state.
fn dump_crash(gb: &GameBoy, err: &CoreError) {
    let pc = gb.cpu.pc;
    let bytes = gb.mmu.fetch3(pc);
    eprintln!("fatal: {err}");
    eprintln!(
        "  at PC={:04X}: {:02X} {:02X} {:02X}",
        pc, bytes[0], bytes[1], bytes[2]
    );
    eprintln!("  {}", gb.cpu.debug_state());
}

fn joypad_button(code: KeyCode) -> Option<Button> {
    match code {
        KeyCode::ArrowRight => Some(Button::Right),
        KeyCode::ArrowLeft => Some(Button::Left),
        KeyCode::ArrowUp => Some(Button::Up),
        KeyCode::ArrowDown => Some(Button::Down),
        KeyCode::KeyA => Some(Button::A),
        KeyCode::KeyS => Some(Button::B),
        KeyCode::Tab => Some(Button::Select),
        KeyCode::Enter => Some(Button::Start),
        _ => None,
    }
}

struct App {
    gb: GameBoy,
    title: String,
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    next_frame: Instant,
    crashed: bool,
}

impl App {
    fn draw(&mut self) {
        let Some(pixels) = self.pixels.as_mut() else {
            return;
        };

        for (dst, &px) in pixels
            .frame_mut()
            .chunks_exact_mut(4)
            .zip(self.gb.framebuffer().iter())
        {
            dst[0] = (px >> 16) as u8;
            dst[1] = (px >> 8) as u8;
            dst[2] = px as u8;
            dst[3] = 0xFF;
        }

        if let Err(err) = pixels.render() {
            eprintln!("render failed: {err}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(
                (SCREEN_WIDTH as u32 * SCALE) as f64,
                (SCREEN_HEIGHT as u32 * SCALE) as f64,
            ))
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("failed to create window"),
        );

        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface)
            .expect("failed to create pixel surface");

        self.window = Some(window);
        self.pixels = Some(pixels);
        self.next_frame = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(button) = joypad_button(code) {
                        self.gb.mmu.input.set_button(
                            button,
                            event.state.is_pressed(),
                            &mut self.gb.mmu.if_reg,
                        );
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(pixels) = self.pixels.as_mut() {
                    let _ = pixels.resize_surface(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.draw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            if let Err(err) = self.gb.step_frame() {
                dump_crash(&self.gb, &err);
                self.crashed = true;
                event_loop.exit();
                return;
            }

            self.next_frame += FRAME_TIME;
            if now > self.next_frame + FRAME_TIME {
                // Fell behind (window drag, suspend): drop the backlog
                // instead of fast-forwarding through it.
                self.next_frame = now + FRAME_TIME;
            }

            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
