#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Stonefall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing every
//! tile that moved. Systems never touch the grid directly; they translate
//! external stimuli into new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Stonefall.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Pushes a directional input onto the world's pending input stack.
    QueueInput {
        /// Direction requested by the player.
        input: Input,
    },
    /// Runs one simulation step: drains pending inputs, then resolves gravity.
    Tick,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// A pending input was taken from the stack and dispatched.
    InputHandled {
        /// Direction that was dispatched.
        input: Input,
    },
    /// The player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving; it now holds air.
        from: CellCoord,
        /// Cell the player occupies after the move.
        to: CellCoord,
    },
    /// The player pushed a resting block sideways.
    BlockPushed {
        /// Kind of block that was pushed.
        block: BlockKind,
        /// Cell the block occupied before the push.
        from: CellCoord,
        /// Cell the block occupies after the push.
        to: CellCoord,
    },
    /// A push was refused and neither the block nor the player moved.
    PushRejected {
        /// Kind of block the player attempted to push.
        block: BlockKind,
        /// Cell holding the block.
        cell: CellCoord,
        /// Direction of the attempted push.
        direction: Input,
    },
    /// The player picked up a key.
    KeyCollected {
        /// Class of the collected key.
        class: KeyClass,
        /// Cell the key occupied.
        cell: CellCoord,
    },
    /// A lock was cleared to air after its key was collected.
    LockRemoved {
        /// Class of the removed lock.
        class: KeyClass,
        /// Cell the lock occupied.
        cell: CellCoord,
    },
    /// A falling block dropped one row.
    BlockFell {
        /// Kind of block that fell.
        block: BlockKind,
        /// Cell the block occupied before dropping.
        from: CellCoord,
        /// Cell directly below `from`.
        to: CellCoord,
    },
    /// The simulation step finished.
    TickCompleted {
        /// Number of ticks completed since the world was loaded.
        tick: u64,
    },
}

/// Directional inputs accepted from the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Input {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Input {
    /// Reports whether the input moves along a row rather than a column.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Signed `(row, column)` offset of a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell, counted from the top.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell, counted from the left.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the coordinate displaced by the provided signed offsets.
    ///
    /// Yields `None` when the result would have a negative component. Upper
    /// bounds are the grid's concern.
    #[must_use]
    pub fn offset(self, rows: i32, columns: i32) -> Option<Self> {
        let row = self.row.checked_add_signed(rows)?;
        let column = self.column.checked_add_signed(columns)?;
        Some(Self { row, column })
    }

    /// Cell directly below this one.
    #[must_use]
    pub fn below(self) -> Option<Self> {
        self.offset(1, 0)
    }

    /// Cell one step away in the provided direction.
    #[must_use]
    pub fn step(self, input: Input) -> Option<Self> {
        let (rows, columns) = input.offset();
        self.offset(rows, columns)
    }
}

/// Identifies which of the two key/lock families a tile belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyClass {
    /// First family, drawn yellow.
    One,
    /// Second family, drawn purple.
    Two,
}

/// Whether a stone or box is dropping or stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallingState {
    /// The block has nothing beneath it and drops one row per tick.
    Falling,
    /// The block is supported and may be pushed sideways.
    Resting,
}

impl FallingState {
    /// Reports whether the state is [`FallingState::Falling`].
    #[must_use]
    pub const fn is_falling(self) -> bool {
        matches!(self, Self::Falling)
    }
}

/// Blocks subject to gravity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Heavy blue stone.
    Stone,
    /// Wooden box.
    Box,
}

/// Read-only classification of a tile, detached from the world's storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Empty space.
    Air,
    /// Walkable ground that still supports blocks.
    Flux,
    /// Permanent wall.
    Unbreakable,
    /// Marker occupying the player's cell.
    PlayerMarker,
    /// Block of the given kind in the given state.
    Block(BlockKind, FallingState),
    /// Collectible key.
    Key(KeyClass),
    /// Lock removed when the key of its class is collected.
    Lock(KeyClass),
}

/// Raw tile codes accepted in level descriptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileCode {
    /// Empty space.
    Air = 0,
    /// Walkable, supportive ground.
    Flux = 1,
    /// Permanent wall.
    Unbreakable = 2,
    /// Player start position.
    Player = 3,
    /// Resting stone.
    Stone = 4,
    /// Stone that starts in the falling state.
    FallingStone = 5,
    /// Resting box.
    Box = 6,
    /// Box that starts in the falling state.
    FallingBox = 7,
    /// Key of class one.
    KeyOne = 8,
    /// Lock of class one.
    LockOne = 9,
    /// Key of class two.
    KeyTwo = 10,
    /// Lock of class two.
    LockTwo = 11,
}

impl TileCode {
    /// Numeric value used in level descriptions.
    #[must_use]
    pub const fn get(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TileCode {
    type Error = InvalidTileCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Air,
            1 => Self::Flux,
            2 => Self::Unbreakable,
            3 => Self::Player,
            4 => Self::Stone,
            5 => Self::FallingStone,
            6 => Self::Box,
            7 => Self::FallingBox,
            8 => Self::KeyOne,
            9 => Self::LockOne,
            10 => Self::KeyTwo,
            11 => Self::LockTwo,
            other => return Err(InvalidTileCode(other)),
        };
        Ok(code)
    }
}

/// Raised when a level description contains a code outside the tile table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unrecognised tile code {0}")]
pub struct InvalidTileCode(pub u8);

/// Opaque color assigned to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TileColor {
    /// Creates a new tile color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Semantic draw request for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    /// Fill the cell with a solid color.
    Fill(TileColor),
    /// Leave the cell untouched.
    Nothing,
}
