//! Gravity and push rules for stones and boxes.
//!
//! A block's [`FallingState`] is never advanced incrementally. Every update
//! re-derives it from the support offered by the tile directly below, so the
//! state self-corrects once whatever sat underneath moves away.

use log::debug;
use stonefall_core::{BlockKind, CellCoord, Event, FallingState, Input};

use crate::{grid::Board, tile::Tile};

/// Re-derives the state of the block at `cell` and drops it when unsupported.
pub(crate) fn settle(block: BlockKind, board: &mut Board, cell: CellCoord, out: &mut Vec<Event>) {
    let Some(below) = board.grid.neighbour_within(cell, cell.below()) else {
        board.grid.set(cell, Tile::block(block, FallingState::Resting));
        return;
    };

    match board.grid.support_at(below) {
        FallingState::Falling => {
            board.grid.set(below, Tile::block(block, FallingState::Falling));
            board.grid.set(cell, Tile::Air);
            out.push(Event::BlockFell {
                block,
                from: cell,
                to: below,
            });
        }
        FallingState::Resting => board.grid.set(cell, Tile::block(block, FallingState::Resting)),
    }
}

/// Attempts to shove the block at `cell` one step further in `direction`.
///
/// Falling blocks never move sideways. A resting block moves only into air
/// that itself has something other than air beneath it; the player then
/// takes the block's former cell.
pub(crate) fn push(
    state: FallingState,
    block: BlockKind,
    board: &mut Board,
    cell: CellCoord,
    direction: Input,
    out: &mut Vec<Event>,
) {
    let grid = &board.grid;
    let accepted = match state {
        FallingState::Falling => None,
        FallingState::Resting => grid
            .neighbour_within(cell, cell.step(direction))
            .filter(|target| {
                grid.is_air(*target)
                    && grid
                        .neighbour_within(*target, target.below())
                        .is_some_and(|floor| !grid.is_air(floor))
            }),
    };

    let Some(destination) = accepted else {
        debug!("rejected {block:?} push {direction:?} at {cell:?} while {state:?}");
        out.push(Event::PushRejected {
            block,
            cell,
            direction,
        });
        return;
    };

    board.grid.set(destination, Tile::block(block, state));
    out.push(Event::BlockPushed {
        block,
        from: cell,
        to: destination,
    });
    board.move_player_to(cell, out);
}
