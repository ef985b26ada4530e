//! Dense tile storage and the player cursor that walks it.

use log::warn;
use stonefall_core::{CellCoord, Event, FallingState};

use crate::tile::Tile;

/// Rectangular tile storage with dimensions fixed at load time.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    rows: u32,
    columns: u32,
    cells: Vec<Tile>,
}

impl Grid {
    /// Wraps row-major `cells`; callers guarantee `cells.len() == rows * columns`.
    pub(crate) fn from_cells(rows: u32, columns: u32, cells: Vec<Tile>) -> Self {
        debug_assert_eq!(
            cells.len() as u64,
            u64::from(rows) * u64::from(columns),
            "cell storage must match grid dimensions"
        );
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub(crate) const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    pub(crate) fn get(&self, cell: CellCoord) -> Option<&Tile> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Replaces the tile at `cell`.
    ///
    /// Every write targets a cell that was read through [`Grid::get`] earlier in
    /// the same operation, so an out-of-range write is an engine defect.
    pub(crate) fn set(&mut self, cell: CellCoord, tile: Tile) {
        let slot = self
            .index(cell)
            .and_then(|index| self.cells.get_mut(index));
        match slot {
            Some(slot) => *slot = tile,
            None => {
                debug_assert!(false, "write outside the grid at {cell:?}");
                warn!("discarded tile write outside the grid at {cell:?}");
            }
        }
    }

    /// Resolves a neighbour of `from` that a push or fall must inspect.
    ///
    /// Levels are bordered by unbreakable tiles, so every such neighbour lies
    /// inside the grid. Reaching past the edge asserts in debug builds and is
    /// logged and refused otherwise.
    pub(crate) fn neighbour_within(
        &self,
        from: CellCoord,
        neighbour: Option<CellCoord>,
    ) -> Option<CellCoord> {
        let inside = neighbour.filter(|cell| self.contains(*cell));
        if inside.is_none() {
            debug_assert!(false, "lookup past the grid edge from {from:?}");
            warn!("refused lookup past the grid edge from {from:?}");
        }
        inside
    }

    /// Reports whether the cell holds air.
    pub(crate) fn is_air(&self, cell: CellCoord) -> bool {
        self.get(cell).map_or(false, Tile::is_air)
    }

    /// Support offered by the tile at `cell` to whatever sits above it.
    pub(crate) fn support_at(&self, cell: CellCoord) -> FallingState {
        self.get(cell)
            .map_or(FallingState::Resting, Tile::support_state)
    }

    /// Replaces every tile matching `predicate` with air, in row-major order,
    /// returning the cleared coordinates.
    pub(crate) fn clear_where<P>(&mut self, mut predicate: P) -> Vec<CellCoord>
    where
        P: FnMut(&Tile) -> bool,
    {
        let columns = self.columns;
        let mut cleared = Vec::new();
        for (index, slot) in self.cells.iter_mut().enumerate() {
            if predicate(slot) {
                *slot = Tile::Air;
                cleared.push(coord_for_index(index, columns));
            }
        }
        cleared
    }

    pub(crate) fn cells(&self) -> &[Tile] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

fn coord_for_index(index: usize, columns: u32) -> CellCoord {
    let width = columns.max(1) as usize;
    CellCoord::new((index / width) as u32, (index % width) as u32)
}

/// Grid paired with the player cursor; the unit every tile behavior mutates.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    pub(crate) grid: Grid,
    player: CellCoord,
}

impl Board {
    pub(crate) fn new(grid: Grid, player: CellCoord) -> Self {
        Self { grid, player }
    }

    pub(crate) const fn player(&self) -> CellCoord {
        self.player
    }

    /// Relocates the player, leaving air behind and the marker at `destination`.
    pub(crate) fn move_player_to(&mut self, destination: CellCoord, out: &mut Vec<Event>) {
        let from = self.player;
        self.grid.set(from, Tile::Air);
        self.grid.set(destination, Tile::PlayerMarker);
        self.player = destination;
        out.push(Event::PlayerMoved {
            from,
            to: destination,
        });
    }
}
