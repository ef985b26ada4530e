#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Stonefall.
//!
//! The world owns the tile grid, the player cursor and the stack of pending
//! inputs. Adapters mutate it exclusively through [`apply`] and observe it
//! through the [`query`] module.

mod falling;
mod grid;
mod keys;
mod level;
mod tile;

use log::{debug, info, warn};
use stonefall_core::{CellCoord, Command, Event, Input, WELCOME_BANNER};

use self::{grid::Board, keys::KeyRing};

pub use self::{
    keys::KeyConfiguration,
    level::{LevelError, LevelLayout},
};

/// Represents the authoritative Stonefall world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    level_name: String,
    board: Board,
    keys: KeyRing,
    inputs: Vec<Input>,
    tick_index: u64,
}

impl World {
    /// Loads a world from the provided level description.
    pub fn load(layout: &LevelLayout) -> Result<Self, LevelError> {
        let keys = KeyRing::standard();
        let (grid, player) = level::build(layout, &keys)?;
        let (rows, columns) = grid.dimensions();
        info!(
            "loaded level {:?} ({rows}x{columns}), player at {player:?}",
            layout.name()
        );
        Ok(Self {
            banner: WELCOME_BANNER,
            level_name: layout.name().to_owned(),
            board: Board::new(grid, player),
            keys,
            inputs: Vec::new(),
            tick_index: 0,
        })
    }

    fn handle_inputs(&mut self, out_events: &mut Vec<Event>) {
        while let Some(input) = self.inputs.pop() {
            out_events.push(Event::InputHandled { input });
            self.handle_input(input, out_events);
        }
    }

    fn handle_input(&mut self, input: Input, out_events: &mut Vec<Event>) {
        let player = self.board.player();
        let neighbour = player
            .step(input)
            .and_then(|cell| self.board.grid.get(cell).map(|tile| (cell, tile.clone())));
        let Some((target, tile)) = neighbour else {
            warn!("ignored {input:?} from {player:?}: the level border is open");
            return;
        };

        if input.is_horizontal() {
            tile.move_horizontal(&mut self.board, target, input, out_events);
        } else {
            tile.move_vertical(&mut self.board, target, out_events);
        }
    }

    /// Resolves gravity from the bottom row upward, left to right within a row.
    ///
    /// Each block reads the tile beneath it after that tile has already been
    /// settled this tick.
    fn update_map(&mut self, out_events: &mut Vec<Event>) {
        let (rows, columns) = self.board.grid.dimensions();
        for row in (0..rows).rev() {
            for column in 0..columns {
                let cell = CellCoord::new(row, column);
                if let Some(tile) = self.board.grid.get(cell).cloned() {
                    tile.update(&mut self.board, cell, out_events);
                }
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::QueueInput { input } => world.inputs.push(input),
        Command::Tick => {
            let first_event = out_events.len();
            world.handle_inputs(out_events);
            world.update_map(out_events);
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TickCompleted {
                tick: world.tick_index,
            });
            debug!(
                "tick {} produced {} events",
                world.tick_index,
                out_events.len() - first_event
            );
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use stonefall_core::{Appearance, CellCoord, KeyClass, TileKind};

    use super::{KeyConfiguration, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Name of the loaded level.
    #[must_use]
    pub fn level_name(world: &World) -> &str {
        &world.level_name
    }

    /// Grid dimensions as `(rows, columns)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.board.grid.dimensions()
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.board.player()
    }

    /// Classification of the tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.board.grid.get(cell).map(|tile| tile.kind())
    }

    /// Every tile classification in row-major order.
    #[must_use]
    pub fn tile_kinds(world: &World) -> Vec<TileKind> {
        world.board.grid.cells().iter().map(|tile| tile.kind()).collect()
    }

    /// Draw request for every cell in row-major order.
    #[must_use]
    pub fn appearances(world: &World) -> Vec<Appearance> {
        world
            .board
            .grid
            .cells()
            .iter()
            .map(|tile| tile.appearance())
            .collect()
    }

    /// Shared configuration of the provided key family.
    #[must_use]
    pub fn key_configuration(world: &World, class: KeyClass) -> &KeyConfiguration {
        world.keys.configuration(class)
    }

    /// Number of ticks completed since the level was loaded.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of inputs waiting for the next tick.
    #[must_use]
    pub fn pending_inputs(world: &World) -> usize {
        world.inputs.len()
    }
}
