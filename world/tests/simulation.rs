use stonefall_core::{BlockKind, CellCoord, Command, Event, FallingState, Input, KeyClass, TileKind};
use stonefall_world::{self as world, query, LevelLayout, World};

fn load(rows: Vec<Vec<u8>>) -> World {
    World::load(&LevelLayout::new("test", rows)).expect("test level is valid")
}

fn tick(world: &mut World, inputs: &[Input]) -> Vec<Event> {
    let mut events = Vec::new();
    for &input in inputs {
        world::apply(world, Command::QueueInput { input }, &mut events);
    }
    world::apply(world, Command::Tick, &mut events);
    events
}

fn resting(block: BlockKind) -> Option<TileKind> {
    Some(TileKind::Block(block, FallingState::Resting))
}

fn falling(block: BlockKind) -> Option<TileKind> {
    Some(TileKind::Block(block, FallingState::Falling))
}

fn assert_single_player_marker(world: &World) {
    let (_, columns) = query::dimensions(world);
    let markers: Vec<CellCoord> = query::tile_kinds(world)
        .into_iter()
        .enumerate()
        .filter(|(_, kind)| *kind == TileKind::PlayerMarker)
        .map(|(index, _)| CellCoord::new(index as u32 / columns, index as u32 % columns))
        .collect();

    assert_eq!(
        markers,
        vec![query::player_cell(world)],
        "exactly one marker must sit under the player"
    );
}

#[test]
fn push_moves_stone_onto_supported_air() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2, 2, 2],
        vec![2, 3, 4, 0, 0, 0, 0, 2],
        vec![2, 1, 1, 2, 1, 1, 1, 2],
        vec![2, 1, 1, 1, 1, 1, 1, 2],
        vec![2, 1, 1, 1, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 2));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(TileKind::Air));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 3)),
        resting(BlockKind::Stone)
    );
    assert_eq!(
        events,
        vec![
            Event::InputHandled {
                input: Input::Right
            },
            Event::BlockPushed {
                block: BlockKind::Stone,
                from: CellCoord::new(1, 2),
                to: CellCoord::new(1, 3),
            },
            Event::PlayerMoved {
                from: CellCoord::new(1, 1),
                to: CellCoord::new(1, 2),
            },
            Event::TickCompleted { tick: 1 },
        ]
    );
    assert_single_player_marker(&world);
}

#[test]
fn push_into_occupied_cell_leaves_everything_in_place() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2],
        vec![2, 3, 6, 1, 0, 2],
        vec![2, 1, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 2)),
        resting(BlockKind::Box)
    );
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 3)), Some(TileKind::Flux));
    assert!(events.contains(&Event::PushRejected {
        block: BlockKind::Box,
        cell: CellCoord::new(1, 2),
        direction: Input::Right,
    }));
}

#[test]
fn push_into_unsupported_air_leaves_everything_in_place() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2],
        vec![2, 3, 4, 0, 1, 2],
        vec![2, 1, 1, 0, 1, 2],
        vec![2, 1, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 2)),
        resting(BlockKind::Stone)
    );
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 3)), Some(TileKind::Air));
}

#[test]
fn push_to_the_left_mirrors_push_to_the_right() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2],
        vec![2, 0, 6, 3, 1, 2],
        vec![2, 1, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[Input::Left]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 2));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 1)),
        resting(BlockKind::Box)
    );
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 3)), Some(TileKind::Air));
}

#[test]
fn falling_block_refuses_push_and_drops_instead() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2],
        vec![2, 3, 5, 0, 0, 2],
        vec![2, 1, 0, 2, 1, 2],
        vec![2, 1, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 2)), Some(TileKind::Air));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(2, 2)),
        falling(BlockKind::Stone)
    );
    assert_eq!(
        events,
        vec![
            Event::InputHandled {
                input: Input::Right
            },
            Event::PushRejected {
                block: BlockKind::Stone,
                cell: CellCoord::new(1, 2),
                direction: Input::Right,
            },
            Event::BlockFell {
                block: BlockKind::Stone,
                from: CellCoord::new(1, 2),
                to: CellCoord::new(2, 2),
            },
            Event::TickCompleted { tick: 1 },
        ]
    );
}

#[test]
fn blocks_fall_one_row_per_tick_until_supported() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 3, 4, 1, 2],
        vec![2, 1, 0, 1, 2],
        vec![2, 1, 0, 1, 2],
        vec![2, 1, 0, 1, 2],
        vec![2, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    for row in 2..=4 {
        let events = tick(&mut world, &[]);
        assert_eq!(
            query::tile_at(&world, CellCoord::new(row, 2)),
            falling(BlockKind::Stone),
            "stone should be on row {row}"
        );
        assert_eq!(
            query::tile_at(&world, CellCoord::new(row - 1, 2)),
            Some(TileKind::Air)
        );
        let drops = events
            .iter()
            .filter(|event| matches!(event, Event::BlockFell { .. }))
            .count();
        assert_eq!(drops, 1, "a block never falls more than one row per tick");
    }

    let events = tick(&mut world, &[]);

    assert_eq!(
        query::tile_at(&world, CellCoord::new(4, 2)),
        resting(BlockKind::Stone)
    );
    assert_eq!(events, vec![Event::TickCompleted { tick: 4 }]);
}

#[test]
fn stacked_blocks_fall_together_when_swept_bottom_up() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 3, 6, 1, 2],
        vec![2, 1, 4, 1, 2],
        vec![2, 1, 0, 1, 2],
        vec![2, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[]);

    assert_eq!(
        query::tile_at(&world, CellCoord::new(3, 2)),
        falling(BlockKind::Stone)
    );
    assert_eq!(
        query::tile_at(&world, CellCoord::new(2, 2)),
        falling(BlockKind::Box)
    );
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 2)), Some(TileKind::Air));
    assert_eq!(
        events,
        vec![
            Event::BlockFell {
                block: BlockKind::Stone,
                from: CellCoord::new(2, 2),
                to: CellCoord::new(3, 2),
            },
            Event::BlockFell {
                block: BlockKind::Box,
                from: CellCoord::new(1, 2),
                to: CellCoord::new(2, 2),
            },
            Event::TickCompleted { tick: 1 },
        ]
    );

    let _ = tick(&mut world, &[]);

    assert_eq!(
        query::tile_at(&world, CellCoord::new(3, 2)),
        resting(BlockKind::Stone)
    );
    assert_eq!(
        query::tile_at(&world, CellCoord::new(2, 2)),
        resting(BlockKind::Box)
    );
}

#[test]
fn block_falls_into_the_cell_the_player_vacates() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 4, 1, 1, 2],
        vec![2, 3, 1, 1, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(2, 2));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(2, 1)),
        falling(BlockKind::Stone)
    );
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(TileKind::Air));
    assert_single_player_marker(&world);
}

#[test]
fn flux_supports_blocks_while_air_does_not() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 5, 3, 7, 2],
        vec![2, 1, 1, 0, 2],
        vec![2, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[]);

    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 1)),
        resting(BlockKind::Stone)
    );
    assert_eq!(
        query::tile_at(&world, CellCoord::new(2, 3)),
        falling(BlockKind::Box)
    );
}

#[test]
fn collecting_a_key_removes_matching_locks_in_the_same_tick() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2, 2, 2],
        vec![2, 3, 8, 1, 9, 11, 2],
        vec![2, 9, 1, 1, 10, 1, 2],
        vec![2, 2, 2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 2));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(TileKind::Air));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 4)), Some(TileKind::Air));
    assert_eq!(query::tile_at(&world, CellCoord::new(2, 1)), Some(TileKind::Air));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 5)),
        Some(TileKind::Lock(KeyClass::Two))
    );
    assert_eq!(
        events,
        vec![
            Event::InputHandled {
                input: Input::Right
            },
            Event::KeyCollected {
                class: KeyClass::One,
                cell: CellCoord::new(1, 2),
            },
            Event::LockRemoved {
                class: KeyClass::One,
                cell: CellCoord::new(1, 4),
            },
            Event::LockRemoved {
                class: KeyClass::One,
                cell: CellCoord::new(2, 1),
            },
            Event::PlayerMoved {
                from: CellCoord::new(1, 1),
                to: CellCoord::new(1, 2),
            },
            Event::TickCompleted { tick: 1 },
        ]
    );
    assert_single_player_marker(&world);
}

#[test]
fn keys_can_be_collected_vertically() {
    let mut world = load(vec![
        vec![2, 2, 2, 2],
        vec![2, 3, 11, 2],
        vec![2, 10, 1, 2],
        vec![2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[Input::Down]);

    assert_eq!(query::player_cell(&world), CellCoord::new(2, 1));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 2)), Some(TileKind::Air));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(TileKind::Air));
}

#[test]
fn locks_block_the_player_until_removed() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 3, 9, 8, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    let _ = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(1, 1));
    assert_eq!(
        query::tile_at(&world, CellCoord::new(1, 2)),
        Some(TileKind::Lock(KeyClass::One))
    );
}

#[test]
fn inputs_are_drained_last_in_first_out() {
    let mut world = load(vec![
        vec![2, 2, 2, 2, 2],
        vec![2, 1, 1, 1, 2],
        vec![2, 1, 3, 1, 2],
        vec![2, 1, 1, 1, 2],
        vec![2, 2, 2, 2, 2],
    ]);

    let events = tick(&mut world, &[Input::Up, Input::Left, Input::Right]);

    let handled: Vec<Input> = events
        .iter()
        .filter_map(|event| match event {
            Event::InputHandled { input } => Some(*input),
            _ => None,
        })
        .collect();
    let moves: Vec<CellCoord> = events
        .iter()
        .filter_map(|event| match event {
            Event::PlayerMoved { to, .. } => Some(*to),
            _ => None,
        })
        .collect();

    assert_eq!(handled, vec![Input::Right, Input::Left, Input::Up]);
    assert_eq!(
        moves,
        vec![
            CellCoord::new(2, 3),
            CellCoord::new(2, 2),
            CellCoord::new(1, 2),
        ]
    );
    assert_eq!(query::pending_inputs(&world), 0);
}

#[test]
fn player_marker_stays_unique_across_a_play_session() {
    let mut world = World::load(&LevelLayout::default_level()).expect("default level");
    let script = [
        Input::Right,
        Input::Right,
        Input::Right,
        Input::Right,
        Input::Down,
        Input::Left,
        Input::Down,
        Input::Left,
        Input::Left,
        Input::Down,
        Input::Right,
        Input::Up,
        Input::Up,
        Input::Left,
    ];

    for input in script {
        let _ = tick(&mut world, &[input]);
        assert_single_player_marker(&world);
    }
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "lookup past the grid edge"))]
fn push_over_an_unbordered_floor_fails_loudly() {
    let mut world = load(vec![vec![3, 4, 0]]);

    let events = tick(&mut world, &[Input::Right]);

    assert_eq!(query::player_cell(&world), CellCoord::new(0, 0));
    assert_eq!(query::tile_at(&world, CellCoord::new(0, 2)), Some(TileKind::Air));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::BlockPushed { .. })));
}
