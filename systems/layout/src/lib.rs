#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic mapping from a maze grid to wall placements.
//!
//! Each cell contributes a wall for every closed south and east edge;
//! the first row and column additionally gain the outer north and west
//! boundary walls. Walls are indexed per owning cell so collision
//! queries can be scoped to a small neighborhood around the player.

use glam::Vec3;
use maze_walk_core::{CellCoord, Direction, GridSize, MazeGrid, WallId};

/// A single wall derived from the maze grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPlacement {
    /// Identifier assigned to the wall by the layout builder.
    pub id: WallId,
    /// Cell that owns the wall.
    pub cell: CellCoord,
    /// Side of the owning cell the wall closes off.
    pub direction: Direction,
    /// World-space center of the wall plane; `y` stays at zero.
    pub center: Vec3,
}

/// Complete wall layout for one generated maze.
#[derive(Clone, Debug)]
pub struct WallLayout {
    size: GridSize,
    cell_length: f32,
    placements: Vec<WallPlacement>,
    per_cell: Vec<Vec<WallId>>,
}

impl WallLayout {
    /// Derives the wall layout for the given grid.
    ///
    /// The mapping is purely deterministic: a spanning-tree maze of
    /// `R x C` cells always yields `R*C + R + C + 1` walls.
    #[must_use]
    pub fn build(grid: &MazeGrid, cell_length: f32) -> Self {
        let size = grid.size();
        let mut layout = Self {
            size,
            cell_length,
            placements: Vec::new(),
            per_cell: vec![Vec::new(); size.cell_count()],
        };

        for row in 0..size.rows() {
            for column in 0..size.columns() {
                let cell = CellCoord::new(column, row);

                if row == 0 {
                    layout.place(cell, Direction::North);
                }
                if column == 0 {
                    layout.place(cell, Direction::West);
                }

                let mask = grid.passages(cell);
                if !mask.contains(Direction::South) {
                    layout.place(cell, Direction::South);
                }
                if !mask.contains(Direction::East) {
                    layout.place(cell, Direction::East);
                }
            }
        }

        layout
    }

    fn place(&mut self, cell: CellCoord, direction: Direction) {
        let id = WallId::new(self.placements.len() as u32);
        let half = self.cell_length / 2.0;
        let x = cell.column() as f32 * self.cell_length;
        let z = cell.row() as f32 * self.cell_length;
        let center = match direction {
            Direction::North => Vec3::new(x, 0.0, z - half),
            Direction::South => Vec3::new(x, 0.0, z + half),
            Direction::East => Vec3::new(x + half, 0.0, z),
            Direction::West => Vec3::new(x - half, 0.0, z),
        };

        self.placements.push(WallPlacement {
            id,
            cell,
            direction,
            center,
        });
        if let Some(index) = self.size.index_of(cell) {
            self.per_cell[index].push(id);
        }
    }

    /// Grid dimensions the layout was derived from.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// All wall placements in identifier order.
    #[must_use]
    pub fn placements(&self) -> &[WallPlacement] {
        &self.placements
    }

    /// Total number of walls in the layout.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.placements.len()
    }

    /// Looks up a placement by its identifier.
    #[must_use]
    pub fn placement(&self, id: WallId) -> Option<&WallPlacement> {
        self.placements.get(id.get() as usize)
    }

    /// Walls owned by the cells within `radius` of the given cell.
    ///
    /// A radius of one yields the 3x3 neighborhood that bounds
    /// per-frame raycast cost; callers moving faster than one cell
    /// per frame must widen it.
    #[must_use]
    pub fn walls_near(&self, cell: CellCoord, radius: u32) -> Vec<WallId> {
        let mut walls = Vec::new();
        let row_start = cell.row().saturating_sub(radius);
        let row_end = cell.row().saturating_add(radius);
        let column_start = cell.column().saturating_sub(radius);
        let column_end = cell.column().saturating_add(radius);

        for row in row_start..=row_end {
            for column in column_start..=column_end {
                let Some(index) = self.size.index_of(CellCoord::new(column, row)) else {
                    continue;
                };
                walls.extend_from_slice(&self.per_cell[index]);
            }
        }
        walls
    }
}
