#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recursive-backtracker maze generation.
//!
//! Carving starts at the origin cell and repeatedly walks into a
//! randomly chosen unvisited neighbor, opening the bidirectional
//! passage on the way in. The recursion of the textbook algorithm is
//! replaced by an explicit work stack so generation depth never
//! depends on the call stack; naive recursion would otherwise grow
//! linearly with the cell count.

use maze_walk_core::{CellCoord, Direction, GridSize, MazeGrid};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Reasons maze generation can be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Both dimensions must be at least one cell.
    #[error("maze dimensions must be positive (received {columns}x{rows})")]
    EmptyDimensions {
        /// Column count provided by the caller.
        columns: u32,
        /// Row count provided by the caller.
        rows: u32,
    },
}

/// One pending cell on the carve stack together with the directions
/// still left to try from it.
#[derive(Clone, Copy, Debug)]
struct CarveFrame {
    cell: CellCoord,
    directions: [Direction; 4],
    cursor: usize,
}

impl CarveFrame {
    fn enter(cell: CellCoord, rng: &mut impl Rng) -> Self {
        // A fresh fair permutation per visited cell; reusing one
        // global shuffle would bias corridors toward straight runs.
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            cursor: 0,
        }
    }
}

/// Generates a spanning-tree maze of the given size.
///
/// Every cell ends up reachable from the origin through exactly
/// `columns * rows - 1` bidirectional passages. Generation is a single
/// deterministic pass over the supplied random source; it only fails
/// on empty dimensions.
pub fn generate(size: GridSize, rng: &mut impl Rng) -> Result<MazeGrid, GenerationError> {
    if size.columns() == 0 || size.rows() == 0 {
        return Err(GenerationError::EmptyDimensions {
            columns: size.columns(),
            rows: size.rows(),
        });
    }

    let mut grid = MazeGrid::new(size);

    // Visit state is tracked separately from the passage masks: the
    // origin cell has no incoming passage yet must never be re-entered.
    let mut visited = vec![false; size.cell_count()];
    let origin = CellCoord::new(0, 0);
    if let Some(index) = size.index_of(origin) {
        visited[index] = true;
    }

    let mut stack = Vec::with_capacity(size.cell_count());
    stack.push(CarveFrame::enter(origin, rng));

    while let Some(frame) = stack.last_mut() {
        if frame.cursor == frame.directions.len() {
            let _ = stack.pop();
            continue;
        }

        let direction = frame.directions[frame.cursor];
        frame.cursor += 1;
        let cell = frame.cell;

        let Some(next) = cell.neighbor(direction) else {
            continue;
        };
        let Some(next_index) = size.index_of(next) else {
            continue;
        };
        if visited[next_index] {
            continue;
        }

        let _ = grid.open_passage(cell, direction);
        visited[next_index] = true;
        stack.push(CarveFrame::enter(next, rng));
    }

    Ok(grid)
}

/// Generates a maze from a numeric seed using a ChaCha stream, so the
/// same seed always reproduces the same grid.
pub fn generate_seeded(size: GridSize, seed: u64) -> Result<MazeGrid, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(size, &mut rng)
}
