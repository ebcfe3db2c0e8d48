#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Pledge Lungs.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Macroquad offers neither lighting nor model matrices without unsafe access
//! to its internal GL state, so the `mesh` module shades and transforms the
//! model on the CPU and the `overlay` module keeps all text and 2D drawing in
//! one place.

mod mesh;
mod overlay;

use self::{
    mesh::{batch_meshes, shade_asset},
    overlay::draw_overlay,
};
use anyhow::Result;
use log::info;
use macroquad::{
    camera::{set_camera, set_default_camera, Camera3D},
    input::{is_key_pressed, KeyCode},
    math::vec3,
    models::{draw_mesh, draw_sphere},
};
use pledge_lungs_rendering::{
    Color, Frame, FrameInput, Gradient, Presentation, RenderingBackend, Scene,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Number of horizontal bands used to approximate the background gradient.
const GRADIENT_BANDS: u32 = 64;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    pub quit_requested: bool,
    /// `Up` or `Right` adds a single pledge.
    pub add_one: bool,
    /// `Down` or `Left` removes a single pledge.
    pub remove_one: bool,
    /// `PageUp` adds ten pledges.
    pub add_ten: bool,
    /// `PageDown` removes ten pledges.
    pub remove_ten: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            add_one: is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::Right),
            remove_one: is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::Left),
            add_ten: is_key_pressed(KeyCode::PageUp),
            remove_ten: is_key_pressed(KeyCode::PageDown),
        }
    }

    /// Net pledge adjustment requested by the pressed shortcuts.
    #[must_use]
    pub fn pledge_delta(&self) -> i32 {
        let mut delta = 0;
        if self.add_one {
            delta += 1;
        }
        if self.remove_one {
            delta -= 1;
        }
        if self.add_ten {
            delta += 10;
        }
        if self.remove_ten {
            delta -= 10;
        }
        delta
    }

    /// Converts the shortcuts into the backend-agnostic frame input.
    #[must_use]
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            pledge_delta: self.pledge_delta(),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Timing of a single rendered frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let render_accum = self.render_accum;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;

        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = if frames == 0 {
            Duration::ZERO
        } else {
            render_accum / frames
        };

        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Frame) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_width,
            window_height,
            background,
            frame,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_width).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_height).unwrap_or(i32::MAX),
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }
        let region_height = window_height as f32;

        info!("opening {window_width}x{window_height} window");
        macroquad::Window::from_config(config, async move {
            let mut frame = frame;
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    info!("quit requested");
                    break;
                }

                let elapsed = Duration::from_secs_f64(macroquad::time::get_time().max(0.0));
                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                update_frame(elapsed, keyboard.frame_input(), &mut frame);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height().min(region_height);

                let render_start = Instant::now();
                macroquad::window::clear_background(to_macroquad_color(background.bottom));
                draw_background(background, screen_width, screen_height);
                draw_scene(&frame.scene);
                draw_overlay(&frame.overlay, screen_width, screen_height);
                let render = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    render,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            "FPS: {:.2} (10s avg: {:.2}) | render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_background(gradient: Gradient, width: f32, height: f32) {
    let band_height = height / GRADIENT_BANDS as f32;
    for band in 0..GRADIENT_BANDS {
        let t = (band as f32 + 0.5) / GRADIENT_BANDS as f32;
        macroquad::shapes::draw_rectangle(
            0.0,
            band as f32 * band_height,
            width,
            // Overlap neighbouring bands to hide seams from rounding.
            band_height + 1.0,
            to_macroquad_color(gradient.color_at(t)),
        );
    }
}

fn draw_scene(scene: &Scene) {
    let camera = scene.camera;
    set_camera(&Camera3D {
        position: vec3(camera.position.x, camera.position.y, camera.position.z),
        target: vec3(camera.target.x, camera.target.y, camera.target.z),
        up: vec3(0.0, 1.0, 0.0),
        fovy: camera.fov_y_degrees.to_radians(),
        ..Camera3D::default()
    });

    let vertices = shade_asset(&scene.asset, &scene.lighting);
    for mesh in batch_meshes(&vertices) {
        draw_mesh(&mesh);
    }

    let model_matrix = scene.asset.model_matrix();
    let marker_color = to_macroquad_color(scene.marker_style.color);
    for marker in &scene.markers {
        let position = model_matrix.transform_point3(marker.position);
        draw_sphere(
            vec3(position.x, position.y, position.z),
            scene.marker_style.radius,
            None,
            marker_color,
        );
    }

    set_default_camera();
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
