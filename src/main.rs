use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use packed_raycaster::config::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use packed_raycaster::display::{Display, Target, present};
use packed_raycaster::palette::Palette;
use packed_raycaster::scaler::{ScaleLut, blit_indexed_stretch, build_scale_lut, unpack_indices};
use packed_raycaster::{Camera, Map, Point, RenderConfig, Surface, render_frame};

/// Desktop stand-in for the device display: expands the packed frame through the palette
/// and stretches it onto the window.
struct WindowDisplay {
    window: Rc<Window>,
    surface: softbuffer::Surface<Rc<Window>, Rc<Window>>,
    table: [u32; 16],
    indices: Vec<u8>,
    src_w: usize,
    src_h: usize,
    scale_lut: ScaleLut,
    pending: bool,
}

impl WindowDisplay {
    fn new(window: Rc<Window>, palette: &Palette) -> Result<Self> {
        let context = softbuffer::Context::new(window.clone())
            .map_err(|e| anyhow!("creating softbuffer context: {e}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|e| anyhow!("creating softbuffer surface: {e}"))?;
        Ok(Self {
            window,
            surface,
            table: palette.to_xrgb_table(),
            indices: Vec::new(),
            src_w: 0,
            src_h: 0,
            scale_lut: ScaleLut::empty(),
            pending: false,
        })
    }
}

impl Display for WindowDisplay {
    type Error = anyhow::Error;

    fn submit(&mut self, _target: Target, frame: &Surface) -> Result<()> {
        // single window buffer, both targets land in the same staging copy
        unpack_indices(frame, &mut self.indices);
        self.src_w = frame.width() as usize;
        self.src_h = frame.height() as usize;
        self.pending = true;
        Ok(())
    }

    fn wait_ready(&mut self) -> Result<()> {
        // swap presents synchronously, nothing is ever in flight
        Ok(())
    }

    fn swap(&mut self) -> Result<()> {
        if !self.pending {
            return Ok(());
        }
        let size = self.window.inner_size();
        let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dw, dh) = (size.width as usize, size.height as usize);

        self.surface
            .resize(w, h)
            .map_err(|e| anyhow!("resizing softbuffer surface: {e}"))?;

        if !self.scale_lut.fits(dw, dh, self.src_w, self.src_h) {
            debug!(dw, dh, sw = self.src_w, sh = self.src_h, "rebuilding scale table");
            self.scale_lut = build_scale_lut(dw, dh, self.src_w, self.src_h);
        }

        let mut buf = self
            .surface
            .buffer_mut()
            .map_err(|e| anyhow!("mapping window buffer: {e}"))?;
        blit_indexed_stretch(
            &mut buf,
            dw,
            &self.indices,
            self.src_w,
            &self.table,
            &self.scale_lut,
        );
        buf.present()
            .map_err(|e| anyhow!("presenting window buffer: {e}"))?;
        self.pending = false;
        Ok(())
    }
}

struct App {
    window: Option<Rc<Window>>,
    display: Option<WindowDisplay>,
    map: Map,
    camera: Camera,
    config: RenderConfig,
    palette: Palette,

    frame: Surface,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    move_speed: f32, // map units per second
    turn_speed: f32, // degrees per second
    turn_accum: f32, // fractional degrees not yet applied
}

impl App {
    fn new(map: Map) -> Self {
        Self {
            window: None,
            display: None,
            map,
            camera: Camera::new(Point::new(0.0, 0.0), 1.0, 0.5, 0),
            config: RenderConfig::default(),
            palette: Palette::grayscale(),

            frame: Surface::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),

            frame_counter: 0,
            last_fps_print: Instant::now(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            move_speed: 1.5,
            turn_speed: 90.0,
            turn_accum: 0.0,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Packed Raycaster")
            .with_inner_size(LogicalSize::new(640.0, 480.0));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match WindowDisplay::new(window.clone(), &self.palette) {
            Ok(display) => self.display = Some(display),
            Err(err) => {
                error!("failed to set up display: {err:#}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
        self.last_tick = Instant::now();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                    } else if code == KeyCode::Tab && !repeat {
                        self.config.debug_overlay = !self.config.debug_overlay;
                        info!(enabled = self.config.debug_overlay, "debug overlay toggled");
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if !matches!(&self.window, Some(w) if w.id() == id) {
                    return;
                }
                self.tick();

                let stats = render_frame(&mut self.frame, &self.map, &self.camera, &self.config);

                if let Some(display) = self.display.as_mut() {
                    if let Err(err) = present(display, &self.frame) {
                        error!("failed to present frame: {err:#}");
                        event_loop.exit();
                        return;
                    }
                }

                // Log FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    let fps = self.frame_counter as f32 / elapsed;
                    info!(
                        fps,
                        hits = stats.hits,
                        x = self.camera.position().x,
                        y = self.camera.position().y,
                        angle = self.camera.angle(),
                        "frame rate"
                    );
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::Resized(_) => {
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl App {
    fn pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.keys_down.contains(k))
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let mut dt = now.duration_since(self.last_tick);
        self.last_tick = now;
        if dt > Duration::from_millis(100) {
            dt = Duration::from_millis(100);
        }
        let dt_s = dt.as_secs_f32();

        // Turn with Q/E, whole degrees only
        let mut turn = 0.0;
        if self.pressed(&[KeyCode::KeyQ]) {
            turn += 1.0;
        }
        if self.pressed(&[KeyCode::KeyE]) {
            turn -= 1.0;
        }
        if turn == 0.0 {
            self.turn_accum = 0.0;
        } else {
            self.turn_accum += turn * self.turn_speed * dt_s;
            let whole = self.turn_accum.trunc();
            if whole != 0.0 {
                self.camera.turn(whole as i32);
                self.turn_accum -= whole;
            }
        }

        // Movement relative to the heading
        let mut fwd: f32 = 0.0;
        let mut strafe: f32 = 0.0;
        if self.pressed(&[KeyCode::ArrowUp, KeyCode::KeyW]) {
            fwd += 1.0;
        }
        if self.pressed(&[KeyCode::ArrowDown, KeyCode::KeyS]) {
            fwd -= 1.0;
        }
        if self.pressed(&[KeyCode::ArrowLeft, KeyCode::KeyA]) {
            strafe += 1.0;
        }
        if self.pressed(&[KeyCode::ArrowRight, KeyCode::KeyD]) {
            strafe -= 1.0;
        }

        if fwd != 0.0 || strafe != 0.0 {
            // Normalize diagonal speed
            let inv = 1.0 / fwd.hypot(strafe);
            let step = self.move_speed * dt_s * inv;
            self.camera.step(fwd * step, strafe * step);
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "starting packed raycaster {} ({}x{}, Tab toggles the map overlay)",
        env!("CARGO_PKG_VERSION"),
        VIEWPORT_WIDTH,
        VIEWPORT_HEIGHT
    );

    let event_loop = EventLoop::new().map_err(|e| anyhow!("creating event loop: {e}"))?;
    // Redraws are requested continuously, like a game loop
    event_loop.set_control_flow(ControlFlow::Poll);

    let map = Map::demo().context("building demo map")?;
    let mut app = App::new(map);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow!("running event loop: {e}"))?;
    Ok(())
}
