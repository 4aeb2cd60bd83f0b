use std::collections::HashSet;

use dungeon_core::TileCoord;
use dungeon_system_pathfinding::{find_path, find_path_bounded, DEFAULT_MAX_EXPANSIONS};
use dungeon_world::{ObjectLayer, TerrainGrid, WorldConfig, WorldMap};

fn open(_: TileCoord) -> bool {
    false
}

fn assert_contiguous(start: TileCoord, path: &[TileCoord]) {
    let mut previous = start;
    for step in path {
        assert_eq!(
            previous.manhattan_distance(*step),
            1,
            "path jumps from {previous:?} to {step:?}"
        );
        previous = *step;
    }
}

#[test]
fn open_grid_paths_are_manhattan_optimal() {
    let cases = [
        (TileCoord::new(0, 0), TileCoord::new(9, 9)),
        (TileCoord::new(7, 2), TileCoord::new(1, 8)),
        (TileCoord::new(4, 4), TileCoord::new(4, 0)),
        (TileCoord::new(0, 5), TileCoord::new(1, 5)),
    ];

    for (start, goal) in cases {
        let path = find_path(start, goal, 10, 10, open);
        assert_eq!(
            path.len(),
            usize::try_from(start.manhattan_distance(goal)).expect("fits"),
            "non-optimal path from {start:?} to {goal:?}"
        );
        assert_eq!(path.last(), Some(&goal));
        assert!(!path.contains(&start));
        assert_contiguous(start, &path);
    }
}

#[test]
fn identical_endpoints_yield_empty_path() {
    let tile = TileCoord::new(3, 3);
    assert!(find_path(tile, tile, 10, 10, open).is_empty());
}

#[test]
fn blocked_goal_yields_empty_path() {
    let goal = TileCoord::new(5, 5);
    let path = find_path(TileCoord::new(0, 0), goal, 10, 10, |tile| tile == goal);
    assert!(path.is_empty());
}

#[test]
fn out_of_bounds_endpoints_yield_empty_path() {
    let inside = TileCoord::new(2, 2);
    for outside in [
        TileCoord::new(-1, 0),
        TileCoord::new(0, -1),
        TileCoord::new(10, 3),
        TileCoord::new(3, 10),
    ] {
        assert!(find_path(inside, outside, 10, 10, open).is_empty());
        assert!(find_path(outside, inside, 10, 10, open).is_empty());
    }
}

#[test]
fn blocked_start_may_still_plan_out() {
    let start = TileCoord::new(0, 0);
    let path = find_path(start, TileCoord::new(2, 0), 5, 5, |tile| tile == start);
    assert_eq!(path, vec![TileCoord::new(1, 0), TileCoord::new(2, 0)]);
}

#[test]
fn unreachable_goal_yields_empty_path() {
    let wall: HashSet<_> = (0..10).map(|row| TileCoord::new(5, row)).collect();
    let path = find_path(TileCoord::new(0, 0), TileCoord::new(9, 9), 10, 10, |tile| {
        wall.contains(&tile)
    });
    assert!(path.is_empty());
}

#[test]
fn expansion_budget_aborts_without_partial_path() {
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(30, 30);
    assert!(find_path_bounded(start, goal, 40, 40, open, 10).is_empty());
    assert_eq!(
        find_path_bounded(start, goal, 40, 40, open, DEFAULT_MAX_EXPANSIONS).len(),
        60
    );
}

#[test]
fn routes_around_wall_through_gap() {
    // Wall along row 5 with a single gap at column 8.
    let wall: HashSet<_> = (0..10)
        .filter(|column| *column != 8)
        .map(|column| TileCoord::new(column, 5))
        .collect();
    let start = TileCoord::new(1, 8);
    let goal = TileCoord::new(1, 1);

    let path = find_path(start, goal, 10, 10, |tile| wall.contains(&tile));

    assert!(path.contains(&TileCoord::new(8, 5)));
    assert!(path.iter().all(|tile| !wall.contains(tile)));
    assert_contiguous(start, &path);
    assert_eq!(path.len(), 7 + 7 + 7);
}

#[test]
fn search_is_deterministic() {
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(6, 6);
    let first = find_path(start, goal, 8, 8, open);
    for _ in 0..5 {
        assert_eq!(find_path(start, goal, 8, 8, open), first);
    }
}

#[test]
fn plans_against_world_inflated_set() {
    let rows = [
        "..........",
        "..........",
        "..........",
        "..........",
        "#######...",
        "..........",
        "..........",
        "..........",
    ];
    let world = WorldMap::new(
        TerrainGrid::from_rows(rows),
        ObjectLayer::new(),
        WorldConfig::default(),
    );
    let start = TileCoord::new(1, 7);
    let goal = TileCoord::new(1, 1);

    let path = find_path(start, goal, world.width(), world.height(), |tile| {
        world.is_blocked_tile(tile)
    });

    assert_eq!(path.last(), Some(&goal));
    assert!(path.iter().all(|tile| !world.is_blocked_tile(*tile)));
    assert!(path.iter().any(|tile| tile.column() >= 8 && tile.row() == 4));
}
