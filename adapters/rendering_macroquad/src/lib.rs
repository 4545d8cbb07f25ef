#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Walk.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.
//!
//! The adapter presents the first-person maze view with a `Camera3D`,
//! gathers keyboard, mouse and touch input into [`FrameInput`]
//! snapshots, and keeps the minimap on a persistent render target so
//! the projector's incremental updates survive between frames.

mod config;

pub use config::{BackendConfig, SETTINGS_FILE};

use anyhow::Result;
use macroquad::camera::{set_camera, set_default_camera, Camera2D, Camera3D};
use macroquad::color::Color as MqColor;
use macroquad::input::{is_key_down, is_key_pressed, mouse_position, touches, KeyCode};
use macroquad::input::TouchPhase as MqTouchPhase;
use macroquad::math::{vec2, vec3, Rect};
use macroquad::models::{draw_cube, draw_plane};
use macroquad::shapes::{draw_circle, draw_line, draw_rectangle};
use macroquad::texture::{draw_texture, render_target, RenderTarget};
use maze_walk_core::{Direction, MazeGrid, MinimapSurface, MoveIntent, Rgb, Viewport};
use maze_walk_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, TouchInput, TouchPhase, WALL_HEIGHT,
};
use maze_walk_system_minimap::Minimap;
use std::time::Duration;

/// Thickness of a rendered wall slab in world units.
const WALL_THICKNESS: f32 = 2.0;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    config: BackendConfig,
}

impl MacroquadBackend {
    /// Creates a backend that requests the platform's default swap interval.
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

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Applies window and input settings, typically loaded from
    /// [`SETTINGS_FILE`].
    #[must_use]
    pub fn with_config(mut self, config: BackendConfig) -> Self {
        self.config = config;
        self
    }
}

/// Collects the movement intents whose keys are held this frame.
fn held_intents(forward: bool, backward: bool, left: bool, right: bool) -> Vec<MoveIntent> {
    let mut intents = Vec::new();
    if forward {
        intents.push(MoveIntent::Forward);
    }
    if backward {
        intents.push(MoveIntent::Backward);
    }
    if left {
        intents.push(MoveIntent::Left);
    }
    if right {
        intents.push(MoveIntent::Right);
    }
    intents
}

fn gather_frame_input(screen_width: f32, screen_height: f32, sensitivity: f32) -> FrameInput {
    let forward = is_key_down(KeyCode::W) || is_key_down(KeyCode::Up);
    let backward = is_key_down(KeyCode::S) || is_key_down(KeyCode::Down);
    let left = is_key_down(KeyCode::A) || is_key_down(KeyCode::Left);
    let right = is_key_down(KeyCode::D) || is_key_down(KeyCode::Right);

    let (mouse_x, mouse_y) = mouse_position();
    let pointer_offset = vec2(
        mouse_x - screen_width / 2.0,
        mouse_y - screen_height / 2.0,
    ) * sensitivity;

    let touch = touches().first().map(|touch| TouchInput {
        phase: match touch.phase {
            MqTouchPhase::Started => TouchPhase::Started,
            MqTouchPhase::Ended | MqTouchPhase::Cancelled => TouchPhase::Ended,
            _ => TouchPhase::Moved,
        },
        offset: glam::Vec2::new(
            (touch.position.x - screen_width / 2.0) * sensitivity,
            (touch.position.y - screen_height / 2.0) * sensitivity,
        ),
    });

    FrameInput {
        held_intents: held_intents(forward, backward, left, right),
        free_look_toggle: is_key_pressed(KeyCode::F),
        pointer_offset: glam::Vec2::new(pointer_offset.x, pointer_offset.y),
        touch,
        viewport: Viewport::new(screen_width, screen_height),
    }
}

fn to_macroquad_color(color: Color) -> MqColor {
    MqColor::new(color.red, color.green, color.blue, color.alpha)
}

fn rgb_to_macroquad_color(color: Rgb) -> MqColor {
    MqColor::new(
        color.red() as f32 / 255.0,
        color.green() as f32 / 255.0,
        color.blue() as f32 / 255.0,
        1.0,
    )
}

/// Persistent offscreen raster the minimap projector draws onto.
struct RenderTargetSurface {
    target: RenderTarget,
    side: f32,
}

impl RenderTargetSurface {
    fn new(side: f32) -> Self {
        Self {
            target: render_target(side.max(1.0) as u32, side.max(1.0) as u32),
            side,
        }
    }

    fn with_canvas(&self, draw: impl FnOnce()) {
        let mut camera = Camera2D::from_display_rect(Rect::new(0.0, 0.0, self.side, self.side));
        camera.render_target = Some(self.target);
        set_camera(&camera);
        draw();
        set_default_camera();
    }
}

impl MinimapSurface for RenderTargetSurface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.with_canvas(|| draw_rectangle(x, y, width, height, rgb_to_macroquad_color(color)));
    }

    fn draw_line(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, color: Rgb) {
        self.with_canvas(|| {
            draw_line(from_x, from_y, to_x, to_y, 1.0, rgb_to_macroquad_color(color));
        });
    }

    fn fill_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Rgb) {
        self.with_canvas(|| draw_circle(center_x, center_y, radius, rgb_to_macroquad_color(color)));
    }
}

/// Minimap raster plus the grid it was built from, so maze changes
/// trigger a rebuild.
struct MinimapRaster {
    grid: MazeGrid,
    surface: RenderTargetSurface,
    minimap: Minimap,
}

impl MinimapRaster {
    fn build(grid: &MazeGrid, viewport: Viewport) -> Self {
        let mut surface = RenderTargetSurface::new(viewport.minimap_side());
        let minimap = Minimap::build(grid, viewport, &mut surface);
        Self {
            grid: grid.clone(),
            surface,
            minimap,
        }
    }

    fn is_stale(&self, grid: &MazeGrid, viewport: Viewport) -> bool {
        self.grid != *grid || (self.surface.side - viewport.minimap_side()).abs() > f32::EPSILON
    }
}

fn draw_first_person(scene: &Scene) {
    let camera = scene.camera;
    let eye = vec3(camera.position.x, 0.0, camera.position.z);
    let look = vec3(
        -camera.yaw.sin() * camera.pitch.cos(),
        camera.pitch.sin(),
        -camera.yaw.cos() * camera.pitch.cos(),
    );

    set_camera(&Camera3D {
        position: eye,
        target: eye + look,
        up: vec3(0.0, 1.0, 0.0),
        ..Default::default()
    });

    let floor = scene.floor;
    let floor_center = vec3(
        floor.width / 2.0 - scene.wall_length / 2.0,
        -WALL_HEIGHT / 2.0,
        floor.depth / 2.0 - scene.wall_length / 2.0,
    );
    draw_plane(
        floor_center,
        vec2(floor.width / 2.0, floor.depth / 2.0),
        None,
        to_macroquad_color(floor.color),
    );

    let wall_color = to_macroquad_color(scene.wall_color);
    for wall in &scene.walls {
        let dimensions = match wall.facing {
            Direction::North | Direction::South => {
                vec3(scene.wall_length, WALL_HEIGHT, WALL_THICKNESS)
            }
            Direction::East | Direction::West => {
                vec3(WALL_THICKNESS, WALL_HEIGHT, scene.wall_length)
            }
        };
        draw_cube(
            vec3(wall.center.x, 0.0, wall.center.z),
            dimensions,
            None,
            wall_color,
        );
    }

    set_default_camera();
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a frame and returns the rate once per elapsed second.
    fn record_frame(&mut self, dt: Duration) -> Option<f64> {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f64 / self.elapsed.as_secs_f64();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            config,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut window_config = macroquad::window::Conf {
            window_title: config.window_title.clone().unwrap_or(window_title),
            window_width: config.window_width,
            window_height: config.window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            window_config.platform.swap_interval = Some(swap_interval);
        }

        let sensitivity = config.look_sensitivity;

        macroquad::Window::from_config(window_config, async move {
            let mut scene = scene;
            let mut raster: Option<MinimapRaster> = None;
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                macroquad::window::clear_background(to_macroquad_color(clear_color));

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let viewport = Viewport::new(screen_width, screen_height);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(screen_width, screen_height, sensitivity);

                update_scene(frame_dt, frame_input, &mut scene);

                draw_first_person(&scene);

                let rebuild = raster
                    .as_ref()
                    .map_or(true, |raster| raster.is_stale(&scene.minimap.grid, viewport));
                if rebuild {
                    raster = Some(MinimapRaster::build(&scene.minimap.grid, viewport));
                }
                if let Some(raster) = raster.as_mut() {
                    raster
                        .minimap
                        .update(scene.minimap.cell, &mut raster.surface);
                    draw_texture(
                        raster.surface.target.texture,
                        0.0,
                        0.0,
                        macroquad::color::WHITE,
                    );
                }

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}
