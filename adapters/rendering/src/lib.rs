#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Stonefall adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use stonefall_core::{Appearance, CellCoord, Input, TileColor};
use std::{error::Error, fmt, time::Duration};

/// Color used to paint the player on top of its marker cell.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<TileColor> for Color {
    fn from(color: TileColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directions pressed during the frame, at most one entry per direction.
    ///
    /// Backends report simultaneous presses in the fixed order Up, Down, Left,
    /// Right; the world drains inputs last-in-first-out, so within a frame
    /// Right is applied first.
    pub directions: Vec<Input>,
}

/// Describes the square tile grid that composes the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in world units.
    pub tile_length: f32,
}

impl TileGridPresentation {
    /// Creates a new tile grid descriptor.
    ///
    /// Returns an error when the grid is empty or the tile length is not a
    /// positive finite number.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::EmptyGrid { columns, rows });
        }
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Upper-left corner of `cell` in world units.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }

    fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// A single filled tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPresentation {
    /// Cell covered by the fill.
    pub cell: CellCoord,
    /// Fill color.
    pub color: Color,
}

/// Scene description combining the tile grid and its visible contents.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid that composes the play area.
    pub tile_grid: TileGridPresentation,
    /// Filled cells in row-major order; cells that draw nothing are omitted.
    pub cells: Vec<CellPresentation>,
    /// Cell currently occupied by the player.
    pub player: CellCoord,
}

impl Scene {
    /// Builds a scene from row-major draw requests reported by the world.
    pub fn from_appearances(
        tile_grid: TileGridPresentation,
        appearances: &[Appearance],
        player: CellCoord,
    ) -> Result<Self, RenderingError> {
        let mut scene = Self {
            tile_grid,
            cells: Vec::new(),
            player,
        };
        scene.refresh(appearances, player)?;
        Ok(scene)
    }

    /// Replaces the visible contents with a fresh set of draw requests.
    pub fn refresh(
        &mut self,
        appearances: &[Appearance],
        player: CellCoord,
    ) -> Result<(), RenderingError> {
        let expected = self.tile_grid.cell_count();
        if appearances.len() != expected {
            return Err(RenderingError::AppearanceCountMismatch {
                expected,
                found: appearances.len(),
            });
        }

        let columns = self.tile_grid.columns as usize;
        self.cells.clear();
        self.cells
            .extend(appearances.iter().enumerate().filter_map(|(index, appearance)| {
                match appearance {
                    Appearance::Fill(color) => Some(CellPresentation {
                        cell: CellCoord::new((index / columns) as u32, (index % columns) as u32),
                        color: Color::from(*color),
                    }),
                    Appearance::Nothing => None,
                }
            }));
        self.player = player;
        Ok(())
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Stonefall scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed frame time and
    /// the directions pressed during the frame, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The grid must contain at least one row and one column.
    EmptyGrid {
        /// Provided column count.
        columns: u32,
        /// Provided row count.
        rows: u32,
    },
    /// Tiles must have a positive, finite side length.
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
    /// The number of draw requests differs from the number of grid cells.
    AppearanceCountMismatch {
        /// Cells in the grid.
        expected: usize,
        /// Draw requests supplied.
        found: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { columns, rows } => {
                write!(f, "grid must not be empty (received {columns}x{rows})")
            }
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
            Self::AppearanceCountMismatch { expected, found } => {
                write!(
                    f,
                    "expected {expected} draw requests for the grid but received {found}"
                )
            }
        }
    }
}

impl Error for RenderingError {}
