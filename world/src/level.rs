//! Level descriptions and their translation into tiles.

use stonefall_core::{CellCoord, FallingState, InvalidTileCode, KeyClass, TileCode};
use thiserror::Error;

use crate::{grid::Grid, keys::KeyRing, tile::Tile};

const DEFAULT_LEVEL_NAME: &str = "Quarry";

const DEFAULT_LEVEL: [[u8; 8]; 6] = [
    [2, 2, 2, 2, 2, 2, 2, 2],
    [2, 3, 0, 1, 1, 2, 0, 2],
    [2, 4, 2, 6, 1, 2, 0, 2],
    [2, 8, 4, 1, 1, 2, 0, 2],
    [2, 4, 1, 1, 1, 9, 0, 2],
    [2, 2, 2, 2, 2, 2, 2, 2],
];

/// Rectangular array of raw tile codes, listed top row first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    name: String,
    rows: Vec<Vec<u8>>,
}

impl LevelLayout {
    /// Creates a layout from named rows of raw tile codes.
    #[must_use]
    pub fn new<T>(name: T, rows: Vec<Vec<u8>>) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Built-in level played when no level file is supplied.
    #[must_use]
    pub fn default_level() -> Self {
        Self::new(
            DEFAULT_LEVEL_NAME,
            DEFAULT_LEVEL.iter().map(|row| row.to_vec()).collect(),
        )
    }

    /// Human readable name of the level.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw tile codes, top row first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

/// Reasons a level description cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The layout contains no rows or no columns.
    #[error("level contains no tiles")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} tiles but the first row has {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell holds a code outside the tile table.
    #[error("invalid tile at row {}, column {}", .cell.row(), .cell.column())]
    UnknownTile {
        /// Location of the offending code.
        cell: CellCoord,
        /// Underlying decoding failure.
        #[source]
        source: InvalidTileCode,
    },
    /// No cell holds the player marker.
    #[error("level has no player start")]
    MissingPlayer,
    /// More than one cell holds the player marker.
    #[error("level has several player starts, at {first:?} and {second:?}")]
    MultiplePlayers {
        /// First player start in row-major order.
        first: CellCoord,
        /// Second player start in row-major order.
        second: CellCoord,
    },
    /// The layout exceeds the addressable grid size.
    #[error("level dimensions exceed the supported grid size")]
    TooLarge,
}

/// Translates a layout into tiles, returning the grid and the player start.
pub(crate) fn build(layout: &LevelLayout, keys: &KeyRing) -> Result<(Grid, CellCoord), LevelError> {
    let rows = layout.rows();
    let expected = rows.first().map_or(0, Vec::len);
    if expected == 0 {
        return Err(LevelError::Empty);
    }

    let row_count = u32::try_from(rows.len()).map_err(|_| LevelError::TooLarge)?;
    let column_count = u32::try_from(expected).map_err(|_| LevelError::TooLarge)?;

    let mut cells = Vec::with_capacity(rows.len() * expected);
    let mut player: Option<CellCoord> = None;
    for (row_index, row) in (0..row_count).zip(rows) {
        if row.len() != expected {
            return Err(LevelError::Ragged {
                row: row_index as usize,
                expected,
                found: row.len(),
            });
        }

        for (column_index, &raw) in (0..column_count).zip(row) {
            let cell = CellCoord::new(row_index, column_index);
            let code =
                TileCode::try_from(raw).map_err(|source| LevelError::UnknownTile { cell, source })?;
            if code == TileCode::Player {
                if let Some(first) = player {
                    return Err(LevelError::MultiplePlayers {
                        first,
                        second: cell,
                    });
                }
                player = Some(cell);
            }
            cells.push(transform_tile(code, keys));
        }
    }

    let player = player.ok_or(LevelError::MissingPlayer)?;
    Ok((Grid::from_cells(row_count, column_count, cells), player))
}

fn transform_tile(code: TileCode, keys: &KeyRing) -> Tile {
    match code {
        TileCode::Air => Tile::Air,
        TileCode::Flux => Tile::Flux,
        TileCode::Unbreakable => Tile::Unbreakable,
        TileCode::Player => Tile::PlayerMarker,
        TileCode::Stone => Tile::Stone(FallingState::Resting),
        TileCode::FallingStone => Tile::Stone(FallingState::Falling),
        TileCode::Box => Tile::Box(FallingState::Resting),
        TileCode::FallingBox => Tile::Box(FallingState::Falling),
        TileCode::KeyOne => Tile::Key(keys.get(KeyClass::One)),
        TileCode::LockOne => Tile::Lock(keys.get(KeyClass::One)),
        TileCode::KeyTwo => Tile::Key(keys.get(KeyClass::Two)),
        TileCode::LockTwo => Tile::Lock(keys.get(KeyClass::Two)),
    }
}
