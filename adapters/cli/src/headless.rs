//! Windowless driver that replays a fixed input script and prints the grid as text.

use stonefall_core::{BlockKind, Command, Event, Input, KeyClass, TileKind};
use stonefall_system_input::InputRelay;
use stonefall_world::{self as world, query, World};

/// Feeds one scripted input per tick, then runs `extra_ticks` idle ticks.
pub(crate) fn run(world: &mut World, script: &[Input], extra_ticks: u32) -> Vec<Event> {
    let mut relay = InputRelay::new();
    let sender = relay.sender();
    let mut events = Vec::new();

    for &input in script {
        let _ = sender.send(input);
        step(world, &mut relay, &mut events);
    }
    for _ in 0..extra_ticks {
        step(world, &mut relay, &mut events);
    }

    events
}

fn step(world: &mut World, relay: &mut InputRelay, events: &mut Vec<Event>) {
    let mut commands = Vec::new();
    relay.handle(&mut commands);
    commands.push(Command::Tick);
    for command in commands {
        world::apply(world, command, events);
    }
}

/// Renders the grid one text line per row.
pub(crate) fn render_text(world: &World) -> String {
    let (_, columns) = query::dimensions(world);
    let columns = columns as usize;
    let mut text = String::new();
    for (index, kind) in query::tile_kinds(world).into_iter().enumerate() {
        if index > 0 && index % columns == 0 {
            text.push('\n');
        }
        text.push(glyph(kind));
    }
    text
}

fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Air => '.',
        TileKind::Flux => ':',
        TileKind::Unbreakable => '#',
        TileKind::PlayerMarker => '@',
        TileKind::Block(BlockKind::Stone, state) => {
            if state.is_falling() {
                'o'
            } else {
                'O'
            }
        }
        TileKind::Block(BlockKind::Box, state) => {
            if state.is_falling() {
                'b'
            } else {
                'B'
            }
        }
        TileKind::Key(KeyClass::One) => 'k',
        TileKind::Lock(KeyClass::One) => 'K',
        TileKind::Key(KeyClass::Two) => 'j',
        TileKind::Lock(KeyClass::Two) => 'J',
    }
}
