#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Maze Walk.
//!
//! The world owns the maze grid, the derived wall layout and the
//! player pose. All mutation flows through [`apply`] as commands;
//! reads go through the [`query`] module. Orientation and input state
//! live in the movement system, which proposes translations that the
//! world applies here.

use glam::Vec3;
use maze_walk_core::{CellCoord, Command, Event, GridSize, MazeGrid, CELL_LENGTH, WELCOME_BANNER};
use maze_walk_system_generation::generate_seeded;
use maze_walk_system_layout::WallLayout;

const DEFAULT_COLUMNS: u32 = 8;
const DEFAULT_ROWS: u32 = 8;
const MAZE_GENERATION_SEED: u64 = 0x9d3c_77a1_52e8_4b06;

/// Authoritative state of a walk session.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: MazeGrid,
    layout: WallLayout,
    position: Vec3,
    cell: CellCoord,
    enabled: bool,
    tick_index: u64,
}

impl World {
    /// Creates a new world around a default-sized maze.
    #[must_use]
    pub fn new() -> Self {
        let size = GridSize::new(DEFAULT_COLUMNS, DEFAULT_ROWS);
        let grid = generate_seeded(size, MAZE_GENERATION_SEED)
            .unwrap_or_else(|_| MazeGrid::new(GridSize::new(1, 1)));
        Self::from_grid(grid)
    }

    /// Creates a world around an explicitly provided maze grid, used
    /// when a layout is imported rather than generated.
    #[must_use]
    pub fn from_grid(grid: MazeGrid) -> Self {
        let layout = WallLayout::build(&grid, CELL_LENGTH);
        Self {
            banner: WELCOME_BANNER,
            grid,
            layout,
            position: Vec3::ZERO,
            cell: CellCoord::new(0, 0),
            enabled: true,
            tick_index: 0,
        }
    }

    fn reset_player(&mut self) {
        self.position = Vec3::ZERO;
        self.cell = CellCoord::new(0, 0);
    }

    /// Derives the discrete cell occupied at a world-space position by
    /// rounding each coordinate to cell units and clamping into the
    /// grid.
    fn cell_at(&self, position: Vec3) -> CellCoord {
        let size = self.grid.size();
        let column = (position.x / CELL_LENGTH)
            .round()
            .clamp(0.0, size.columns().saturating_sub(1) as f32) as u32;
        let row = (position.z / CELL_LENGTH)
            .round()
            .clamp(0.0, size.rows().saturating_sub(1) as f32) as u32;
        CellCoord::new(column, row)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMaze {
            columns,
            rows,
            seed,
        } => match generate_seeded(GridSize::new(columns, rows), seed) {
            Ok(grid) => {
                world.layout = WallLayout::build(&grid, CELL_LENGTH);
                world.grid = grid;
                world.reset_player();
                out_events.push(Event::MazeConfigured { columns, rows });
            }
            Err(_) => out_events.push(Event::MazeRejected { columns, rows }),
        },
        Command::SetEnabled { enabled } => {
            world.enabled = enabled;
        }
        Command::TranslatePlayer { dx, dz } => {
            if !world.enabled {
                return;
            }

            world.position.x += dx;
            world.position.z += dz;

            let cell = world.cell_at(world.position);
            if cell != world.cell {
                let from = world.cell;
                world.cell = cell;
                out_events.push(Event::PlayerCellChanged { from, to: cell });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec3;
    use maze_walk_core::{CellCoord, MazeGrid, PlayerSnapshot, WallId};
    use maze_walk_system_layout::WallLayout;

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the maze grid.
    #[must_use]
    pub fn maze_grid(world: &World) -> &MazeGrid {
        &world.grid
    }

    /// Provides read-only access to the derived wall layout.
    #[must_use]
    pub fn wall_layout(world: &World) -> &WallLayout {
        &world.layout
    }

    /// Captures the player's current pose.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.position,
            cell: world.cell,
        }
    }

    /// Walls within `radius` cells of the player, for collision scoping.
    #[must_use]
    pub fn walls_near_player(world: &World, radius: u32) -> Vec<WallId> {
        world.layout.walls_near(world.cell, radius)
    }

    /// Whether the simulation currently reacts to movement commands.
    #[must_use]
    pub fn is_enabled(world: &World) -> bool {
        world.enabled
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Convenience alias used by adapters to place the camera.
    #[must_use]
    pub fn player_position(world: &World) -> Vec3 {
        world.position
    }
}
