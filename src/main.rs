//! Spins a convex solid in a window, ray casting every pixel on the CPU
//! against the solid's face planes.

use std::process::exit;
use std::sync::{Arc, Mutex};
use std::thread::{JoinHandle, spawn};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use hull_caster::camera::Camera;
use hull_caster::config::AppConfig;
use hull_caster::picture::Picture;
use hull_caster::polytope::{extract_planes, Polytope};
use hull_caster::render::render_into;
use hull_caster::shade::Lighting;

use crate::gpu::{Frame, Gpu, Renderer};

mod gpu;

/// Everything a worker needs to draw a frame. Immutable once built.
struct Scene {
    polytope: Polytope,
    camera: Camera,
    lighting: Lighting,
    angular_speed: f64,
}

/// Counts frames and reports the rate once per interval.
struct FpsCounter {
    interval: Duration,
    frames: u32,
    last_report: Instant,
}

impl FpsCounter {
    fn new(interval: Duration) -> Self {
        FpsCounter { interval, frames: 0, last_report: Instant::now() }
    }

    fn frame(&mut self, angle: f64, planes: usize) {
        self.frames += 1;
        let elapsed = self.last_report.elapsed();
        if elapsed >= self.interval {
            let fps = self.frames as f64 / elapsed.as_secs_f64();
            info!(target: "app", "FPS: {:.2} | Angle: {:.2} rad | Frames: {} | Planes: {}", fps, angle, self.frames, planes);
            self.frames = 0;
            self.last_report = Instant::now();
        }
    }
}

/// Renders frames until the frame it draws into is dropped.
fn spawn_worker(frame: &Arc<Mutex<Frame>>, scene: Arc<Scene>, start: Instant, fps_interval: Duration) -> JoinHandle<()> {
    let frame = Arc::downgrade(frame);

    info!(target: "app", "Spawning worker thread");
    spawn(move || {
        let mut fps = FpsCounter::new(fps_interval);
        let mut pixels = Vec::new();
        while let Some(frame) = frame.upgrade() {
            let size = {
                let frame = frame.lock().expect("frame lock");
                (frame.width(), frame.height())
            };
            pixels.resize(size.0 as usize * size.1 as usize, scene.lighting.background);

            let angle = start.elapsed().as_secs_f64() * scene.angular_speed;
            render_into(Picture::new(pixels.as_mut_slice(), size), &scene.polytope, angle, &scene.camera, &scene.lighting);

            {
                let mut frame = frame.lock().expect("frame submission lock");
                frame.picture_mut().buffer_mut().copy_from_slice(&pixels);
            }
            fps.frame(angle, scene.polytope.len());
        }
        info!(target: "app", "Worker lost frame, stopping");
    })
}

fn build_scene(config: &AppConfig) -> Scene {
    let solid = config.scene.solid;
    let vertices = solid.vertices(config.scene.model_scale);
    let (polytope, stats) = extract_planes(&vertices, config.scene.max_faces, &config.tolerances);
    info!(
        target: "app",
        "{:?}: {} vertices, {} planes ({} triples examined)",
        solid, vertices.len(), polytope.len(), stats.triples,
    );
    if polytope.check_face_count(solid.expected_faces()).is_err() {
        info!(target: "app", "Rendering continues with {} planes", polytope.len());
    }

    let camera = config.camera.camera();
    if polytope.contains(&camera.position) {
        warn!(target: "app", "Camera at {} starts inside the solid, faces will use the fallback shade", camera.position);
    }

    Scene {
        polytope,
        camera,
        lighting: config.lighting.lighting(),
        angular_speed: config.animation.angular_speed,
    }
}

fn main() {
    let config = AppConfig::load();
    let log_level = config.as_ref()
        .map(|config| config.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stdout)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!(target: "app", "{}", err);
            exit(1);
        }
    };

    let scene = Arc::new(build_scene(&config));
    let frame_size = (config.window.width, config.window.height);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(&config.window.title)
        .with_inner_size(LogicalSize::new(frame_size.0, frame_size.1))
        .build(&event_loop)
        .expect("window");

    let mut renderer = smol::block_on(async {
        let gpu = Gpu::new().await;
        let surface = gpu.surface(&window);
        let size = window.inner_size();
        Renderer::new(gpu, surface, (size.width, size.height), frame_size, scene.lighting.background)
    });

    let start = Instant::now();
    spawn_worker(&renderer.frame(), scene, start, Duration::from_millis(config.debug.fps_interval_ms));

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_poll();

        match event {
            Event::RedrawRequested(window_id) if window.id() == window_id => {
                renderer.render();
            }
            Event::RedrawEventsCleared => {
                window.request_redraw();
            }
            Event::WindowEvent { event, window_id } if window.id() == window_id => match event {
                WindowEvent::Resized(size) => {
                    renderer.surface_resize((size.width, size.height));
                }
                WindowEvent::CloseRequested => control_flow.set_exit(),
                _ => {}
            }
            _ => {}
        }
    });
}
