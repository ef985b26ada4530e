//! Key and lock families.

use std::rc::Rc;

use stonefall_core::{Event, KeyClass, TileColor};

use crate::{grid::Grid, tile::Tile};

const CLASS_ONE_COLOR: TileColor = TileColor::from_rgb(0xff, 0xcc, 0x00);
const CLASS_TWO_COLOR: TileColor = TileColor::from_rgb(0xcc, 0x00, 0xff);

/// Lock removal rule fired when a key is collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RemovalRule {
    class: KeyClass,
}

impl RemovalRule {
    fn should_remove(self, tile: &Tile) -> bool {
        tile.is_lock(self.class)
    }
}

/// Shared definition of a key/lock family.
///
/// One instance exists per class and world; every key and lock tile of the
/// class holds a reference to it.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyConfiguration {
    color: TileColor,
    class: KeyClass,
    removal: RemovalRule,
}

impl KeyConfiguration {
    fn new(color: TileColor, class: KeyClass) -> Self {
        Self {
            color,
            class,
            removal: RemovalRule { class },
        }
    }

    /// Color used for both the key and its locks.
    #[must_use]
    pub const fn color(&self) -> TileColor {
        self.color
    }

    /// Family this configuration describes.
    #[must_use]
    pub const fn class(&self) -> KeyClass {
        self.class
    }

    /// Clears every lock of this family across the whole grid.
    pub(crate) fn remove_locks(&self, grid: &mut Grid, out: &mut Vec<Event>) {
        let rule = self.removal;
        let class = self.class;
        out.extend(
            grid.clear_where(|tile| rule.should_remove(tile))
                .into_iter()
                .map(|cell| Event::LockRemoved { class, cell }),
        );
    }
}

/// The two key configurations owned by a world.
#[derive(Clone, Debug)]
pub(crate) struct KeyRing {
    one: Rc<KeyConfiguration>,
    two: Rc<KeyConfiguration>,
}

impl KeyRing {
    pub(crate) fn standard() -> Self {
        Self {
            one: Rc::new(KeyConfiguration::new(CLASS_ONE_COLOR, KeyClass::One)),
            two: Rc::new(KeyConfiguration::new(CLASS_TWO_COLOR, KeyClass::Two)),
        }
    }

    pub(crate) fn get(&self, class: KeyClass) -> Rc<KeyConfiguration> {
        Rc::clone(self.configuration(class))
    }

    pub(crate) fn configuration(&self, class: KeyClass) -> &Rc<KeyConfiguration> {
        match class {
            KeyClass::One => &self.one,
            KeyClass::Two => &self.two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stonefall_core::CellCoord;

    #[test]
    fn removal_clears_only_matching_locks() {
        let keys = KeyRing::standard();
        let mut grid = Grid::from_cells(
            2,
            3,
            vec![
                Tile::Lock(keys.get(KeyClass::One)),
                Tile::Lock(keys.get(KeyClass::Two)),
                Tile::Key(keys.get(KeyClass::One)),
                Tile::Flux,
                Tile::Lock(keys.get(KeyClass::One)),
                Tile::Unbreakable,
            ],
        );
        let mut events = Vec::new();

        keys.configuration(KeyClass::One)
            .remove_locks(&mut grid, &mut events);

        assert_eq!(
            events,
            vec![
                Event::LockRemoved {
                    class: KeyClass::One,
                    cell: CellCoord::new(0, 0),
                },
                Event::LockRemoved {
                    class: KeyClass::One,
                    cell: CellCoord::new(1, 1),
                },
            ]
        );
        assert_eq!(grid.get(CellCoord::new(0, 0)), Some(&Tile::Air));
        assert_eq!(
            grid.get(CellCoord::new(0, 1)),
            Some(&Tile::Lock(keys.get(KeyClass::Two)))
        );
        assert_eq!(
            grid.get(CellCoord::new(0, 2)),
            Some(&Tile::Key(keys.get(KeyClass::One)))
        );
        assert_eq!(grid.get(CellCoord::new(1, 1)), Some(&Tile::Air));
    }

    #[test]
    fn removal_without_locks_is_a_no_op() {
        let keys = KeyRing::standard();
        let mut grid = Grid::from_cells(1, 2, vec![Tile::Flux, Tile::Air]);
        let mut events = Vec::new();

        keys.configuration(KeyClass::Two)
            .remove_locks(&mut grid, &mut events);

        assert!(events.is_empty());
        assert_eq!(grid.cells(), &[Tile::Flux, Tile::Air]);
    }
}
