#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless 4-connected A* search over a tile grid.
//!
//! The planner holds no map state: callers supply the grid dimensions and a
//! blocked-tile predicate (normally backed by the world's inflated blocked
//! set). Every failure mode degrades to an empty path.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use dungeon_core::TileCoord;
use tracing::debug;

/// Default number of heap pops allowed before a search gives up.
pub const DEFAULT_MAX_EXPANSIONS: usize = 4000;

/// Finds a shortest 4-connected path using the default expansion budget.
///
/// See [`find_path_bounded`] for the full contract.
pub fn find_path<F>(
    start: TileCoord,
    goal: TileCoord,
    width: u32,
    height: u32,
    is_blocked: F,
) -> Vec<TileCoord>
where
    F: Fn(TileCoord) -> bool,
{
    find_path_bounded(start, goal, width, height, is_blocked, DEFAULT_MAX_EXPANSIONS)
}

/// Finds a shortest 4-connected path from `start` to `goal`.
///
/// The returned sequence excludes `start` and ends with `goal`. It is empty
/// when the endpoints coincide, when either endpoint lies outside the grid,
/// when the goal is blocked, when the goal is unreachable, or when the search
/// pops `max_expansions` nodes without reaching the goal. The start tile is
/// never tested against `is_blocked`, so an agent standing in a wall margin can
/// still plan its way out.
///
/// Equal-priority nodes are expanded in insertion order, which makes the
/// result fully deterministic for a given predicate.
pub fn find_path_bounded<F>(
    start: TileCoord,
    goal: TileCoord,
    width: u32,
    height: u32,
    is_blocked: F,
    max_expansions: usize,
) -> Vec<TileCoord>
where
    F: Fn(TileCoord) -> bool,
{
    if start == goal {
        return Vec::new();
    }
    let (Some(start_index), Some(goal_index)) = (
        index(start, width, height),
        index(goal, width, height),
    ) else {
        return Vec::new();
    };
    if is_blocked(goal) {
        return Vec::new();
    }

    let node_count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
    let mut best_g = vec![u32::MAX; node_count];
    let mut parent: Vec<Option<usize>> = vec![None; node_count];
    let mut open = BinaryHeap::new();
    let mut next_sequence = 0_u64;

    best_g[start_index] = 0;
    open.push(OpenNode {
        f_cost: start.manhattan_distance(goal),
        g_cost: 0,
        sequence: next_sequence,
        tile: start,
    });
    next_sequence += 1;

    let mut expansions = 0_usize;
    while expansions < max_expansions {
        let Some(current) = open.pop() else {
            return Vec::new();
        };
        expansions += 1;

        if current.tile == goal {
            return reconstruct(&parent, start_index, goal_index, width);
        }

        let Some(current_index) = index(current.tile, width, height) else {
            continue;
        };
        if current.g_cost > best_g[current_index] {
            continue;
        }

        for neighbor in cardinal_neighbors(current.tile, width, height) {
            if is_blocked(neighbor) {
                continue;
            }
            let Some(neighbor_index) = index(neighbor, width, height) else {
                continue;
            };

            let tentative_g = current.g_cost.saturating_add(1);
            if tentative_g >= best_g[neighbor_index] {
                continue;
            }

            best_g[neighbor_index] = tentative_g;
            parent[neighbor_index] = Some(current_index);
            open.push(OpenNode {
                f_cost: tentative_g.saturating_add(neighbor.manhattan_distance(goal)),
                g_cost: tentative_g,
                sequence: next_sequence,
                tile: neighbor,
            });
            next_sequence += 1;
        }
    }

    debug!(
        ?start,
        ?goal,
        max_expansions,
        "path search exhausted its expansion budget"
    );
    Vec::new()
}

#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f_cost: u32,
    g_cost: u32,
    sequence: u64,
    tile: TileCoord,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    // `BinaryHeap` is a max-heap: lower f, then earlier insertion, ranks higher.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn index(tile: TileCoord, width: u32, height: u32) -> Option<usize> {
    if !tile.in_bounds(width, height) {
        return None;
    }
    let column = usize::try_from(tile.column()).ok()?;
    let row = usize::try_from(tile.row()).ok()?;
    let width = usize::try_from(width).ok()?;
    Some(row * width + column)
}

fn tile_at(index: usize, width: u32) -> TileCoord {
    let width = usize::try_from(width).unwrap_or(1).max(1);
    TileCoord::new(
        i32::try_from(index % width).unwrap_or(i32::MAX),
        i32::try_from(index / width).unwrap_or(i32::MAX),
    )
}

fn reconstruct(
    parent: &[Option<usize>],
    start_index: usize,
    goal_index: usize,
    width: u32,
) -> Vec<TileCoord> {
    let mut path = Vec::new();
    let mut cursor = goal_index;
    while cursor != start_index {
        path.push(tile_at(cursor, width));
        match parent.get(cursor).copied().flatten() {
            Some(previous) => cursor = previous,
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Neighbours in expansion order: east, west, south, north.
fn cardinal_neighbors(tile: TileCoord, width: u32, height: u32) -> NeighborIter {
    let mut neighbors = NeighborIter::default();
    let (column, row) = (tile.column(), tile.row());

    for candidate in [
        TileCoord::new(column + 1, row),
        TileCoord::new(column - 1, row),
        TileCoord::new(column, row + 1),
        TileCoord::new(column, row - 1),
    ] {
        if candidate.in_bounds(width, height) {
            neighbors.push(candidate);
        }
    }

    neighbors
}

#[derive(Clone, Debug, Default)]
struct NeighborIter {
    buffer: [Option<TileCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, tile: TileCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(tile);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
