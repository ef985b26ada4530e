#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Stonefall, either in a window or headless.

mod headless;
mod level_file;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use stonefall_core::{Command, Event};
use stonefall_rendering::{Color, Presentation, RenderingBackend, Scene, TileGridPresentation};
use stonefall_rendering_macroquad::MacroquadBackend;
use stonefall_system_input::{parse_script, InputRelay};
use stonefall_system_pacing::{TickPacer, DEFAULT_TICK_RATE};
use stonefall_world::{self as world, query, LevelLayout, World};

const DEFAULT_TILE_SIZE: f32 = 30.0;

/// Push stones, collect keys and dodge falling rocks.
#[derive(Parser, Debug)]
#[command(name = "stonefall", version, about, long_about = None)]
struct CliArgs {
    /// TOML level file to play instead of the built-in level.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,
    /// Simulation ticks per second.
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    tick_rate: u32,
    /// Side length of a tile in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: f32,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run without a window and print the final grid as text.
    #[arg(long)]
    headless: bool,
    /// Directions to replay in headless mode, one tick per character (U, D, L, R).
    #[arg(long, value_name = "SEQUENCE", requires = "headless")]
    inputs: Option<String>,
    /// Idle ticks to run after the input sequence in headless mode.
    #[arg(long, value_name = "N", requires = "headless")]
    ticks: Option<u32>,
}

/// Entry point for the Stonefall command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let layout = match &args.level {
        Some(path) => level_file::load(path)?,
        None => LevelLayout::default_level(),
    };
    let world = World::load(&layout)
        .with_context(|| format!("failed to load level '{}'", layout.name()))?;
    println!("{}", query::welcome_banner(&world));

    if args.headless {
        run_headless(world, &args)
    } else {
        run_windowed(world, &args)
    }
}

fn run_headless(mut world: World, args: &CliArgs) -> Result<()> {
    let script = parse_script(args.inputs.as_deref().unwrap_or_default())
        .context("failed to parse input sequence")?;
    let events = headless::run(&mut world, &script, args.ticks.unwrap_or(0));
    info!(
        "headless run produced {} events over {} ticks",
        events.len(),
        query::tick_index(&world)
    );

    println!(
        "{} after {} ticks:",
        query::level_name(&world),
        query::tick_index(&world)
    );
    println!("{}", headless::render_text(&world));
    Ok(())
}

fn run_windowed(mut world: World, args: &CliArgs) -> Result<()> {
    let mut pacer = TickPacer::new(args.tick_rate).context("invalid tick rate")?;
    let (rows, columns) = query::dimensions(&world);
    let tile_grid = TileGridPresentation::new(columns, rows, args.tile_size)
        .context("invalid tile grid configuration")?;
    let scene = Scene::from_appearances(
        tile_grid,
        &query::appearances(&world),
        query::player_cell(&world),
    )
    .context("failed to build initial scene")?;
    let presentation = Presentation::new(
        format!("Stonefall: {}", query::level_name(&world)),
        Color::from_rgb_u8(0, 0, 0),
        scene,
    );

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if args.vsync {
        backend = backend.with_vsync(true);
    }

    let mut relay = InputRelay::new();
    let sender = relay.sender();
    let mut commands = Vec::new();
    let mut events: Vec<Event> = Vec::new();

    let vsync = args.vsync;
    info!(
        "starting window at {} ticks per second ({:?} per tick)",
        args.tick_rate,
        pacer.tick_duration()
    );
    backend.run(presentation, move |dt, frame_input, scene| {
        let frame_started = Instant::now();
        for input in frame_input.directions {
            let _ = sender.send(input);
        }

        events.clear();
        for _ in 0..pacer.advance(dt) {
            relay.handle(&mut commands);
            commands.push(Command::Tick);
            for command in commands.drain(..) {
                world::apply(&mut world, command, &mut events);
            }
        }

        if !events.is_empty() {
            if let Err(refresh_error) = scene.refresh(
                &query::appearances(&world),
                query::player_cell(&world),
            ) {
                error!("failed to refresh scene: {refresh_error}");
            }
        }

        let pause = frame_pause(&pacer, vsync, frame_started.elapsed());
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    })
}

/// Time to idle after a frame whose update took `frame_work`.
///
/// Frames are held to the tick cadence unless vsync paces presentation.
fn frame_pause(pacer: &TickPacer, vsync: bool, frame_work: Duration) -> Duration {
    if vsync {
        Duration::ZERO
    } else {
        pacer.delay_after(frame_work)
    }
}
