//! Tile variants and the per-variant movement, gravity and drawing rules.

use std::rc::Rc;

use log::info;
use stonefall_core::{
    Appearance, BlockKind, CellCoord, Event, FallingState, Input, KeyClass, TileColor, TileKind,
};

use crate::{falling, grid::Board, keys::KeyConfiguration};

const FLUX_COLOR: TileColor = TileColor::from_rgb(0xcc, 0xff, 0xcc);
const UNBREAKABLE_COLOR: TileColor = TileColor::from_rgb(0x99, 0x99, 0x99);
const STONE_COLOR: TileColor = TileColor::from_rgb(0x00, 0x00, 0xcc);
const BOX_COLOR: TileColor = TileColor::from_rgb(0x8b, 0x45, 0x13);

/// Occupant of a single grid cell.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Tile {
    Air,
    Flux,
    Unbreakable,
    PlayerMarker,
    Stone(FallingState),
    Box(FallingState),
    Key(Rc<KeyConfiguration>),
    Lock(Rc<KeyConfiguration>),
}

impl Tile {
    pub(crate) fn block(kind: BlockKind, state: FallingState) -> Self {
        match kind {
            BlockKind::Stone => Self::Stone(state),
            BlockKind::Box => Self::Box(state),
        }
    }

    pub(crate) fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }

    pub(crate) fn is_lock(&self, class: KeyClass) -> bool {
        match self {
            Self::Lock(config) => config.class() == class,
            _ => false,
        }
    }

    /// Support this tile gives to whatever sits directly above it.
    ///
    /// Only air lets a block fall; flux is walkable yet still holds blocks up.
    pub(crate) fn support_state(&self) -> FallingState {
        match self {
            Self::Air => FallingState::Falling,
            Self::Flux
            | Self::Unbreakable
            | Self::PlayerMarker
            | Self::Stone(_)
            | Self::Box(_)
            | Self::Key(_)
            | Self::Lock(_) => FallingState::Resting,
        }
    }

    pub(crate) fn kind(&self) -> TileKind {
        match self {
            Self::Air => TileKind::Air,
            Self::Flux => TileKind::Flux,
            Self::Unbreakable => TileKind::Unbreakable,
            Self::PlayerMarker => TileKind::PlayerMarker,
            Self::Stone(state) => TileKind::Block(BlockKind::Stone, *state),
            Self::Box(state) => TileKind::Block(BlockKind::Box, *state),
            Self::Key(config) => TileKind::Key(config.class()),
            Self::Lock(config) => TileKind::Lock(config.class()),
        }
    }

    /// Draw request handed to the rendering collaborator.
    ///
    /// The player marker draws nothing; adapters paint the player on top.
    pub(crate) fn appearance(&self) -> Appearance {
        match self {
            Self::Air | Self::PlayerMarker => Appearance::Nothing,
            Self::Flux => Appearance::Fill(FLUX_COLOR),
            Self::Unbreakable => Appearance::Fill(UNBREAKABLE_COLOR),
            Self::Stone(_) => Appearance::Fill(STONE_COLOR),
            Self::Box(_) => Appearance::Fill(BOX_COLOR),
            Self::Key(config) | Self::Lock(config) => Appearance::Fill(config.color()),
        }
    }

    /// Reacts to the player stepping sideways into `cell`, which holds this tile.
    pub(crate) fn move_horizontal(
        &self,
        board: &mut Board,
        cell: CellCoord,
        direction: Input,
        out: &mut Vec<Event>,
    ) {
        match self {
            Self::Air | Self::Flux => board.move_player_to(cell, out),
            Self::Stone(state) => {
                falling::push(*state, BlockKind::Stone, board, cell, direction, out);
            }
            Self::Box(state) => {
                falling::push(*state, BlockKind::Box, board, cell, direction, out);
            }
            Self::Key(config) => collect_key(config, board, cell, out),
            Self::Unbreakable | Self::PlayerMarker | Self::Lock(_) => {}
        }
    }

    /// Reacts to the player stepping vertically into `cell`, which holds this tile.
    pub(crate) fn move_vertical(&self, board: &mut Board, cell: CellCoord, out: &mut Vec<Event>) {
        match self {
            Self::Air | Self::Flux => board.move_player_to(cell, out),
            Self::Key(config) => collect_key(config, board, cell, out),
            Self::Unbreakable
            | Self::PlayerMarker
            | Self::Stone(_)
            | Self::Box(_)
            | Self::Lock(_) => {}
        }
    }

    /// Per-tick update of the tile stored at `cell`.
    pub(crate) fn update(&self, board: &mut Board, cell: CellCoord, out: &mut Vec<Event>) {
        match self {
            Self::Stone(_) => falling::settle(BlockKind::Stone, board, cell, out),
            Self::Box(_) => falling::settle(BlockKind::Box, board, cell, out),
            Self::Air
            | Self::Flux
            | Self::Unbreakable
            | Self::PlayerMarker
            | Self::Key(_)
            | Self::Lock(_) => {}
        }
    }
}

fn collect_key(
    config: &KeyConfiguration,
    board: &mut Board,
    cell: CellCoord,
    out: &mut Vec<Event>,
) {
    info!("collected {:?} key at {cell:?}", config.class());
    out.push(Event::KeyCollected {
        class: config.class(),
        cell,
    });
    config.remove_locks(&mut board.grid, out);
    board.move_player_to(cell, out);
}
