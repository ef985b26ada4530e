#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Stonefall.
//!
//! Macroquad is pulled in without its default `audio` feature so the crate
//! builds on machines lacking native ALSA development libraries.

use anyhow::Result;
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_pressed, KeyCode};
use stonefall_core::Input;
use stonefall_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, TileGridPresentation, PLAYER_COLOR,
};
use std::time::Duration;

/// Keys mapped to each movement direction.
///
/// Macroquad only reports whether a key went down this frame, not when, so
/// simultaneous presses are emitted in this table's order.
const DIRECTION_KEYS: [(KeyCode, Input); 8] = [
    (KeyCode::Up, Input::Up),
    (KeyCode::W, Input::Up),
    (KeyCode::Down, Input::Down),
    (KeyCode::S, Input::Down),
    (KeyCode::Left, Input::Left),
    (KeyCode::A, Input::Left),
    (KeyCode::Right, Input::Right),
    (KeyCode::D, Input::Right),
];

/// Fraction of a tile left uncovered around the player square.
const PLAYER_INSET: f32 = 0.15;

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug, Default)]
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

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
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
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.tile_grid.width().ceil() as i32,
            window_height: scene.tile_grid.height().ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q) {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, gather_frame_input(), &mut scene);

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_grid(
                    &scene.tile_grid,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_scene(&scene, &metrics);

                if let Some(fps) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!("FPS: {fps:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input() -> FrameInput {
    FrameInput {
        directions: pressed_directions(is_key_pressed),
    }
}

fn pressed_directions(mut pressed: impl FnMut(KeyCode) -> bool) -> Vec<Input> {
    let mut directions = Vec::new();
    for (key, input) in DIRECTION_KEYS {
        if pressed(key) && !directions.contains(&input) {
            directions.push(input);
        }
    }
    directions
}

fn draw_scene(scene: &Scene, metrics: &SceneMetrics) {
    let tile_grid = &scene.tile_grid;
    for cell in &scene.cells {
        let origin = metrics.to_screen(tile_grid.cell_origin(cell.cell));
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            metrics.tile_step,
            metrics.tile_step,
            to_macroquad_color(cell.color),
        );
    }

    let inset = metrics.tile_step * PLAYER_INSET;
    let origin = metrics.to_screen(tile_grid.cell_origin(scene.player));
    let side = metrics.tile_step - 2.0 * inset;
    macroquad::shapes::draw_rectangle(
        origin.x + inset,
        origin.y + inset,
        side,
        side,
        to_macroquad_color(PLAYER_COLOR),
    );
}

/// Maps grid space onto the current window, preserving the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    tile_step: f32,
}

impl SceneMetrics {
    fn from_grid(tile_grid: &TileGridPresentation, screen_width: f32, screen_height: f32) -> Self {
        let world_width = tile_grid.width();
        let world_height = tile_grid.height();
        let scale = (screen_width / world_width).min(screen_height / world_height);
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };

        let offset = Vec2::new(
            ((screen_width - world_width * scale) * 0.5).max(0.0),
            ((screen_height - world_height * scale) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            tile_step: tile_grid.tile_length * scale,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average frame rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
