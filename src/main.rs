use std::collections::HashSet;
use std::error::Error;
use std::f32::consts::FRAC_PI_2;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{LevelFilter, error, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use raycaster::demo::{self, demo_level, demo_textures};
use raycaster::geometry::vector_at;
use raycaster::texture::Filter;
use raycaster::{
    Camera, Framebuffer, Level, PixelFormat, RenderConfig, RenderPipeline, SurfaceLayout,
};

use crate::cli::CLIOptions;
use crate::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};

mod cli;
mod scaler;

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,

    pipeline: RenderPipeline,
    level: Level,
    camera: Camera,
    config: RenderConfig,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal buffer the pipeline draws into, stretched to the window
    framebuffer: Framebuffer,
    scale_lut: ScaleLut,

    // Input and movement
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    move_speed: f32,
    turn_speed: f32,
}

impl App {
    fn new(
        pipeline: RenderPipeline,
        level: Level,
        camera: Camera,
        config: RenderConfig,
        framebuffer: Framebuffer,
    ) -> Self {
        Self {
            window: None,
            surface: None,
            pipeline,
            level,
            camera,
            config,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            framebuffer,
            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            move_speed: 2.0,                  // units/s
            turn_speed: std::f32::consts::PI, // rad/s
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes()
            .with_title("Raycaster")
            .with_inner_size(LogicalSize::new(960.0, 540.0));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!("Couldn't create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let surface = softbuffer::Context::new(window.clone())
            .and_then(|context| softbuffer::Surface::new(&context, window.clone()));
        match surface {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                error!("Couldn't create drawing surface: {e}");
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
                info!("The close button was pressed; stopping");
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
                    self.keys_down.insert(code);
                    if !repeat {
                        self.key_pressed(code, event_loop);
                    }
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();

                let (window, surface) = match (&self.window, &mut self.surface) {
                    (Some(w), Some(s)) if w.id() == id => (w, s),
                    _ => return,
                };

                let size = window.inner_size();
                let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                else {
                    return; // Minimized window, skip drawing
                };
                let (dw, dh) = (size.width as usize, size.height as usize);

                if let Err(e) = surface.resize(w, h) {
                    error!("Couldn't resize surface: {e}");
                    event_loop.exit();
                    return;
                }

                if let Err(e) = self.pipeline.render(
                    &self.level,
                    &self.camera,
                    &mut self.framebuffer,
                    &self.config,
                ) {
                    error!("Frame failed: {e}");
                    event_loop.exit();
                    return;
                }

                if !self.scale_lut.fits(dw, dh) {
                    self.scale_lut =
                        build_scale_lut(dw, dh, self.framebuffer.width(), self.framebuffer.height());
                }

                let presented = surface.buffer_mut().and_then(|mut buf| {
                    blit_nearest_stretch(
                        &mut buf,
                        dw,
                        self.framebuffer.pixels(),
                        self.framebuffer.width(),
                        &self.scale_lut,
                    );
                    buf.present()
                });
                if let Err(e) = presented {
                    error!("Couldn't present frame: {e}");
                    event_loop.exit();
                    return;
                }

                // Log FPS
                self.frame_counter += 1;
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
                if elapsed >= 1.0 {
                    info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
                    self.frame_counter = 0;
                    self.last_fps_print = now;
                }

                window.request_redraw();
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
    /// One-shot actions. Runs between frames, so the level and config can
    /// be changed freely.
    fn key_pressed(&mut self, code: KeyCode, event_loop: &ActiveEventLoop) {
        let config = &mut self.config;
        match code {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Digit1 => config.fog = !config.fog,
            KeyCode::Digit2 => {
                config.filter = match config.filter {
                    Filter::Nearest => Filter::Bilinear,
                    Filter::Bilinear => Filter::Nearest,
                }
            }
            KeyCode::Digit3 => config.dither_fog = !config.dither_fog,
            KeyCode::Digit4 => config.textures = !config.textures,
            KeyCode::Digit5 => config.draw_floor = !config.draw_floor,
            KeyCode::KeyF => {
                let pos = self.camera.position() + self.camera.forward();
                self.level.spawn_sprite(pos, demo::BARREL);
                info!("Spawned sprite at {pos}");
                return;
            }
            _ => return,
        }
        info!("Render config: {:?}", self.config);
    }

    fn tick(&mut self) {
        // Compute dt with cap to avoid huge jumps if the app was paused
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).min(Duration::from_millis(100));
        self.last_tick = now;
        let dt_s = dt.as_secs_f32();

        let held = |code: KeyCode| self.keys_down.contains(&code);
        let axis = |pos: KeyCode, neg: KeyCode| held(pos) as i8 as f32 - held(neg) as i8 as f32;

        // Turning left is counter-clockwise, so a positive yaw change
        let turn = axis(KeyCode::KeyQ, KeyCode::KeyE) + axis(KeyCode::ArrowLeft, KeyCode::ArrowRight);
        let fwd = axis(KeyCode::KeyW, KeyCode::KeyS);
        let strafe = axis(KeyCode::KeyD, KeyCode::KeyA);

        self.camera.rotate(turn.clamp(-1.0, 1.0) * self.turn_speed * dt_s);

        let yaw = self.camera.yaw();
        let step = vector_at(yaw, fwd) + vector_at(yaw - FRAC_PI_2, strafe);
        // Normalize diagonal speed
        if step != glam::Vec2::ZERO {
            self.camera.move_by(step.normalize() * self.move_speed * dt_s);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(LevelFilter::Info),
        simplelog::ConfigBuilder::default().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let format = PixelFormat::detect(&SurfaceLayout::SOFTBUFFER)?;
    let config = options.render_config()?;
    let level = demo_level();
    let camera = Camera::new(
        level.player_start,
        0.0,
        options.near,
        options.far,
        options.right,
    )?;
    let pipeline = RenderPipeline::new(demo_textures(), options.threads)?;
    let framebuffer = Framebuffer::new(options.width.max(1), options.height.max(1), format);
    info!(
        "Rendering {}x{} on {} threads",
        framebuffer.width(),
        framebuffer.height(),
        pipeline.workers()
    );

    let event_loop = EventLoop::new()?;
    // Redraws are requested continuously, as a game does
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(pipeline, level, camera, config, framebuffer);
    event_loop.run_app(&mut app)?;
    Ok(())
}
