// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod autopilot;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod input;
pub mod panel;
pub mod raster;
pub mod shader;
pub mod vehicle;

// External crate imports
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::sync::Arc;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

pub use autopilot::Autopilot;
pub use config::{ClusterConfig, Color, GaugeLayout};
pub use dashboard::Dashboard;
pub use error::ClusterError;
pub use gauge::{Gauge, GaugeStyle};
pub use geometry::{GaugeSpec, SweepType};
pub use input::{KeyboardState, CONTROLS_HELP};
pub use raster::{Canvas, SoftwareShader};
pub use shader::{BufferPool, DrawMode, ShaderContext, VertexBuffer};
pub use vehicle::{advance, Controls, VehicleState};

/// Longest simulation step taken in one frame, seconds.
const MAX_FRAME_DT: f32 = 0.1;

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Where the frame's controls come from.
enum Driver {
    Keyboard,
    Autopilot(Autopilot),
}

pub struct Cluster {
    config: ClusterConfig,
}

impl Cluster {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs the simulation until it is closed.
    pub fn run(self) -> Result<(), ClusterError> {
        let config = self.config;
        config.validate()?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        // Buffers live as long as the dashboard; the pool outlives both.
        let pool = BufferPool::new();
        let dashboard = Dashboard::new(&pool, &config)?;

        let mut state = VehicleState::default();
        let mut keyboard = KeyboardState::new();
        let mut driver = match config.demo_seed {
            Some(seed) => {
                log::info!("Demo mode, autopilot seed {}", seed);
                Driver::Autopilot(Autopilot::new(seed))
            }
            None => Driver::Keyboard,
        };

        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();
        let mut last_update = Instant::now();
        let window_clone = window.clone();

        log::info!(
            "Cluster running at {}x{} ({} fps cap)",
            fb_width,
            fb_height,
            config.max_framerate
        );

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                            window_target.exit();
                        } else {
                            keyboard.handle_event(&event);
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                            log::error!("Failed to resize buffer: {}", e);
                        }
                        if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::error!("Failed to resize surface: {}", e);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = now
                            .duration_since(last_update)
                            .as_secs_f32()
                            .min(MAX_FRAME_DT);
                        last_update = now;

                        let mut controls = keyboard.take_controls();
                        if let Driver::Autopilot(ref mut pilot) = driver {
                            controls = pilot.controls(&state, dt);
                        }
                        let next = advance(&state, &controls, dt);
                        log_transitions(&state, &next);
                        state = next;

                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        canvas.clear(state.display_mode.background());
                        let mut shader = SoftwareShader::new(canvas, config.line_width);
                        dashboard.draw(&mut shader, &state);

                        if let Err(e) = pixels.render() {
                            log::error!("Render failed: {}", e);
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                Event::LoopExiting => {
                    log::info!(
                        "Cluster closed: odometer {:.1} km, trip A {:.1} km",
                        state.odometer,
                        state.trip_a
                    );
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn log_transitions(before: &VehicleState, after: &VehicleState) {
    if before.engine_running != after.engine_running {
        if after.engine_running {
            log::info!("Engine started");
        } else {
            log::info!("Engine stopped");
        }
    }
    if before.display_mode != after.display_mode {
        log::info!("Display mode: {:?}", after.display_mode);
    }
    if before.gear != after.gear {
        log::debug!("Gear: {:?}", after.gear);
    }
}
