use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use sdf_maze::config::{Config, DEFAULT_RAY_COUNT};
use sdf_maze::frame::{BACKGROUND, Controls, Simulation};
use sdf_maze::maze::Maze;
use sdf_maze::raster::{self, Target, pack_rgb};
use sdf_maze::scaler::{ScaleLut, blit_letterboxed, build_scale_lut};

/// First-person maze rendered by sphere tracing a signed distance field.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of rays in the view fan
    #[arg(long, default_value_t = DEFAULT_RAY_COUNT)]
    rays: usize,

    /// Horizontal field of view
    #[arg(long, default_value_t = 90.0)]
    fov_degrees: f32,

    /// March rays on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    sim: Simulation,
    failure: Option<anyhow::Error>,

    // HUD
    frame_counter: u32,
    last_fps_log: Instant,

    // Internal framebuffer, one pixel per world unit
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl App {
    fn new(sim: Simulation) -> Self {
        let (fb_w, fb_h) = sim.canvas_size();
        Self {
            window: None,
            surface: None,
            sim,
            failure: None,
            frame_counter: 0,
            last_fps_log: Instant::now(),
            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,
            scale_lut: ScaleLut::empty(),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title("SDF Maze")
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .context("creating window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(softbuffer_error)
            .context("creating softbuffer context")?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(softbuffer_error)
            .context("creating softbuffer surface")?;

        let size = window.inner_size();
        self.rebuild_lut(size.width as usize, size.height as usize);

        window.request_redraw();
        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.sim.tick(&controls_from_keys(&self.keys_down), elapsed);

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // minimized
        };
        surface
            .resize(dw, dh)
            .map_err(softbuffer_error)
            .context("resizing surface")?;

        let commands = self.sim.render();
        raster::draw(
            &mut Target::new(&mut self.fb, self.fb_w, self.fb_h),
            &commands,
        );

        let mut buf = surface
            .buffer_mut()
            .map_err(softbuffer_error)
            .context("mapping surface buffer")?;
        blit_letterboxed(
            &mut buf,
            dw.get() as usize,
            &self.fb,
            self.fb_w,
            &self.scale_lut,
            pack_rgb(BACKGROUND),
        );
        buf.present()
            .map_err(softbuffer_error)
            .context("presenting frame")?;

        self.frame_counter += 1;
        let since = now.duration_since(self.last_fps_log).as_secs_f32();
        if since >= 1.0 {
            let pose = self.sim.pose();
            log::info!(
                "{:.1} fps at ({:.0}, {:.0}) heading {:.2}",
                self.frame_counter as f32 / since,
                pose.position[0],
                pose.position[1],
                pose.heading
            );
            self.frame_counter = 0;
            self.last_fps_log = now;
        }

        window.request_redraw();
        Ok(())
    }

    fn rebuild_lut(&mut self, dst_w: usize, dst_h: usize) {
        self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb_w, self.fb_h);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_surface(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(new_size) => {
                self.rebuild_lut(new_size.width as usize, new_size.height as usize);
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

/// `SoftBufferError` may hold a non-`Send` source, so it can't be wrapped
/// directly; keep its message as the root of the chain.
fn softbuffer_error(err: softbuffer::SoftBufferError) -> anyhow::Error {
    anyhow!("{err}")
}

/// Arrow keys and WASD map onto the same logical controls.
fn controls_from_keys(keys: &HashSet<KeyCode>) -> Controls {
    let held = |a: KeyCode, b: KeyCode| keys.contains(&a) || keys.contains(&b);
    Controls {
        rotate_left: held(KeyCode::ArrowLeft, KeyCode::KeyA),
        rotate_right: held(KeyCode::ArrowRight, KeyCode::KeyD),
        move_forward: held(KeyCode::ArrowUp, KeyCode::KeyW),
        move_backward: held(KeyCode::ArrowDown, KeyCode::KeyS),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    sdf_maze::logging::init(args.verbose);

    let config = Config {
        ray_count: args.rays,
        fov: args.fov_degrees.to_radians(),
        parallel_rays: args.parallel,
        ..Config::default()
    };
    let sim = Simulation::new(config, Maze::default_layout()?)?;

    let event_loop = EventLoop::new().context("creating event loop")?;
    // Redraws are requested back to back; Poll keeps input latency low.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(sim);
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
