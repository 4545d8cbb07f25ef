#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Walk workspace.
//!
//! This crate defines the vocabulary that connects the maze generator,
//! the authoritative world, the movement and minimap systems, and the
//! rendering adapters: grid coordinates and passage masks, the
//! [`Command`]/[`Event`] message surface, and the capability traits
//! ([`RayCaster`], [`MinimapSurface`]) through which the excluded
//! renderer collaborates with the core.

use std::{fmt, time::Duration};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Walk.";

/// Side length of a single maze cell expressed in world units.
///
/// Wall placement, collision clearance and the derivation of the
/// player's discrete cell all share this constant.
pub const CELL_LENGTH: f32 = 100.0;

/// Cardinal directions used for passages, walls and movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices (negative world `z`).
    North,
    /// Toward increasing row indices (positive world `z`).
    South,
    /// Toward increasing column indices (positive world `x`).
    East,
    /// Toward decreasing column indices (negative world `x`).
    West,
}

impl Direction {
    /// All directions in the canonical N/S/E/W order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bit assigned to the direction within a [`PassageMask`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::North => 1,
            Self::South => 2,
            Self::East => 4,
            Self::West => 8,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Column delta incurred by stepping one cell in the direction.
    #[must_use]
    pub const fn column_delta(self) -> i32 {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    /// Row delta incurred by stepping one cell in the direction.
    #[must_use]
    pub const fn row_delta(self) -> i32 {
        match self {
            Self::South => 1,
            Self::North => -1,
            Self::East | Self::West => 0,
        }
    }
}

/// Four-bit field recording which neighbors of a cell are reachable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassageMask(u8);

impl PassageMask {
    /// Mask of a fully closed cell.
    pub const EMPTY: PassageMask = PassageMask(0);

    /// Raw bit representation of the mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether the passage toward the given direction is open.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Reports whether no passage has been carved yet.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of open passages recorded in the mask.
    #[must_use]
    pub const fn open_count(self) -> u32 {
        self.0.count_ones()
    }

    fn insert(&mut self, direction: Direction) {
        self.0 |= direction.bit();
    }
}

/// Location of a single grid cell expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell one step away in the given direction, if it stays within
    /// the non-negative quadrant. Grid bounds are the caller's concern.
    #[must_use]
    pub fn neighbor(self, direction: Direction) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(direction.column_delta())?;
        let row = self.row.checked_add_signed(direction.row_delta())?;
        Some(CellCoord::new(column, row))
    }
}

/// Dimensions of a maze grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Dense row-major index of the cell, if it lies within the grid.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Dense grid of passage masks produced by the maze generator.
///
/// Mutual consistency between neighboring cells holds by construction:
/// the only mutation path, [`MazeGrid::open_passage`], always carves
/// both sides of an edge. Once generation finishes the grid is treated
/// as immutable for the rest of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeGrid {
    size: GridSize,
    cells: Vec<PassageMask>,
}

impl MazeGrid {
    /// Creates a fully closed grid of the given size.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![PassageMask::EMPTY; size.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Passage mask of the given cell; out-of-bounds cells read as
    /// fully closed.
    #[must_use]
    pub fn passages(&self, cell: CellCoord) -> PassageMask {
        self.size
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(PassageMask::EMPTY)
    }

    /// Opens the bidirectional passage between `cell` and its neighbor
    /// in `direction`. Returns `false` and leaves the grid untouched
    /// when either end falls outside the grid.
    pub fn open_passage(&mut self, cell: CellCoord, direction: Direction) -> bool {
        let Some(neighbor) = cell.neighbor(direction) else {
            return false;
        };
        let Some(cell_index) = self.size.index_of(cell) else {
            return false;
        };
        let Some(neighbor_index) = self.size.index_of(neighbor) else {
            return false;
        };

        self.cells[cell_index].insert(direction);
        self.cells[neighbor_index].insert(direction.opposite());
        true
    }

    /// Number of bidirectional passages carved into the grid.
    ///
    /// A spanning-tree maze over `R*C` cells holds exactly `R*C - 1`.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        let open_bits: u32 = self.cells.iter().map(|mask| mask.open_count()).sum();
        (open_bits / 2) as usize
    }
}

/// Renders a maze grid as the classic underscore-and-pipe ASCII art.
///
/// Closed south edges draw as `_`, closed east edges as `|`.
#[derive(Clone, Copy, Debug)]
pub struct AsciiMaze<'a>(pub &'a MazeGrid);

impl fmt::Display for AsciiMaze<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.0.size();
        if size.columns() == 0 || size.rows() == 0 {
            return Ok(());
        }

        write!(f, " ")?;
        for _ in 0..(size.columns() * 2 - 1) {
            write!(f, "_")?;
        }
        writeln!(f)?;

        for row in 0..size.rows() {
            write!(f, "|")?;
            for column in 0..size.columns() {
                let mask = self.0.passages(CellCoord::new(column, row));
                if mask.contains(Direction::South) {
                    write!(f, " ")?;
                } else {
                    write!(f, "_")?;
                }

                if mask.contains(Direction::East) {
                    let east = self.0.passages(CellCoord::new(column + 1, row));
                    if mask.contains(Direction::South) || east.contains(Direction::South) {
                        write!(f, " ")?;
                    } else {
                        write!(f, "_")?;
                    }
                } else {
                    write!(f, "|")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Unique identifier assigned to a wall placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Logical movement directions a player can intend simultaneously.
///
/// `Left` and `Right` turn the view in keyboard mode and strafe while
/// free-look is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveIntent {
    /// Drive along the current view direction.
    Forward,
    /// Drive against the current view direction.
    Backward,
    /// Turn left, or strafe left in free-look mode.
    Left,
    /// Turn right, or strafe right in free-look mode.
    Right,
}

/// Current viewport metrics reported by the rendering adapter.
///
/// Recomputed on every resize by the adapter; consumers never cache
/// derived values across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a new viewport descriptor from pixel dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Half of the viewport width; pointer and touch offsets are
    /// expressed relative to this center.
    #[must_use]
    pub fn half_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Half of the viewport height.
    #[must_use]
    pub fn half_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Horizontal extent of the inner touch dead region.
    #[must_use]
    pub fn quarter_x(&self) -> f32 {
        self.half_x() / 2.0
    }

    /// Vertical extent of the inner touch dead region.
    #[must_use]
    pub fn quarter_y(&self) -> f32 {
        self.half_y() / 2.0
    }

    /// Side length of the square minimap raster: a tenth of the
    /// viewport width.
    #[must_use]
    pub fn minimap_side(&self) -> f32 {
        (self.width / 10.0).floor()
    }
}

/// Nearest-first intersection reported by a ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the intersection point.
    pub distance: f32,
    /// Wall that was struck.
    pub wall: WallId,
}

/// Obstacle-query capability supplied by the rendering collaborator.
///
/// Implementations intersect a ray against the given candidate walls
/// and return the hits sorted by ascending distance. An empty result
/// means the path is unobstructed.
pub trait RayCaster {
    /// Casts a ray from `origin` along `direction` against `walls`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, walls: &[WallId]) -> Vec<RayHit>;
}

/// Eight-bit RGB color used by the minimap drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Raster surface the minimap projector draws onto.
///
/// The surface persists between calls so the projector can update the
/// position marker incrementally instead of redrawing the static
/// layout every frame.
pub trait MinimapSurface {
    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb);

    /// Strokes a straight line segment.
    fn draw_line(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, color: Rgb);

    /// Fills a circle centered at the given point.
    fn fill_circle(&mut self, center_x: f32, center_y: f32, radius: f32, color: Rgb);
}

/// Immutable view of the player pose used for queries and systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous world-space position; `y` stays fixed at zero.
    pub position: Vec3,
    /// Discrete cell derived by rounding the position to cell units.
    pub cell: CellCoord,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Regenerates the maze with the given dimensions and seed,
    /// resetting the player to the origin cell.
    ConfigureMaze {
        /// Number of cell columns in the maze.
        columns: u32,
        /// Number of cell rows in the maze.
        rows: u32,
        /// Seed driving the deterministic carve order.
        seed: u64,
    },
    /// Enables or disables the simulation without tearing state down.
    SetEnabled {
        /// Whether per-frame updates should take effect.
        enabled: bool,
    },
    /// Applies a collision-gated displacement to the player position.
    TranslatePlayer {
        /// World-space displacement along the `x` axis.
        dx: f32,
        /// World-space displacement along the `z` axis.
        dz: f32,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time since the previous frame.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a maze was generated and the session reset.
    MazeConfigured {
        /// Number of cell columns in the new maze.
        columns: u32,
        /// Number of cell rows in the new maze.
        rows: u32,
    },
    /// Reports that a maze configuration request was rejected.
    MazeRejected {
        /// Column count provided in the rejected request.
        columns: u32,
        /// Row count provided in the rejected request.
        rows: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the player's discrete cell changed.
    PlayerCellChanged {
        /// Cell the player occupied before the move.
        from: CellCoord,
        /// Cell the player occupies now.
        to: CellCoord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn open_passage_carves_both_sides() {
        let mut grid = MazeGrid::new(GridSize::new(2, 2));
        assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));

        assert!(grid.passages(CellCoord::new(0, 0)).contains(Direction::East));
        assert!(grid.passages(CellCoord::new(1, 0)).contains(Direction::West));
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn open_passage_rejects_out_of_bounds_edges() {
        let mut grid = MazeGrid::new(GridSize::new(2, 2));

        assert!(!grid.open_passage(CellCoord::new(0, 0), Direction::North));
        assert!(!grid.open_passage(CellCoord::new(0, 0), Direction::West));
        assert!(!grid.open_passage(CellCoord::new(1, 1), Direction::South));
        assert!(grid.passages(CellCoord::new(0, 0)).is_empty());
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn neighbor_stops_at_the_quadrant_boundary() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.neighbor(Direction::North), None);
        assert_eq!(origin.neighbor(Direction::West), None);
        assert_eq!(
            origin.neighbor(Direction::South),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(origin.neighbor(Direction::East), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn passages_read_as_closed_outside_the_grid() {
        let grid = MazeGrid::new(GridSize::new(1, 1));
        assert!(grid.passages(CellCoord::new(5, 5)).is_empty());
    }

    #[test]
    fn ascii_art_draws_closed_edges() {
        let mut grid = MazeGrid::new(GridSize::new(2, 2));
        assert!(grid.open_passage(CellCoord::new(0, 0), Direction::South));
        assert!(grid.open_passage(CellCoord::new(0, 1), Direction::East));
        assert!(grid.open_passage(CellCoord::new(1, 1), Direction::North));

        let art = AsciiMaze(&grid).to_string();
        assert_eq!(art, " ___\n| | |\n|___|\n");
    }

    #[test]
    fn viewport_derives_touch_and_minimap_metrics() {
        let viewport = Viewport::new(1280.0, 720.0);
        assert_eq!(viewport.half_x(), 640.0);
        assert_eq!(viewport.quarter_x(), 320.0);
        assert_eq!(viewport.half_y(), 360.0);
        assert_eq!(viewport.quarter_y(), 180.0);
        assert_eq!(viewport.minimap_side(), 128.0);
    }

    #[test]
    fn direction_bits_match_the_wire_values() {
        assert_eq!(Direction::North.bit(), 1);
        assert_eq!(Direction::South.bit(), 2);
        assert_eq!(Direction::East.bit(), 4);
        assert_eq!(Direction::West.bit(), 8);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(3, 7));
    }

    #[test]
    fn wall_id_round_trips_through_bincode() {
        assert_round_trip(&WallId::new(42));
    }

    #[test]
    fn maze_grid_round_trips_through_bincode() {
        let mut grid = MazeGrid::new(GridSize::new(3, 2));
        assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));
        assert!(grid.open_passage(CellCoord::new(1, 0), Direction::South));
        assert_round_trip(&grid);
    }
}
