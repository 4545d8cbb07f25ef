#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Walk adapters.
//!
//! Backends consume a declarative [`Scene`] and feed per-frame
//! [`FrameInput`] snapshots back to the simulation. The obstacle-query
//! half of the renderer boundary is covered by [`SlabRayCaster`],
//! which intersects rays against the wall layout's plane segments.

use anyhow::Result as AnyResult;
use glam::{Vec2, Vec3};
use maze_walk_core::{
    CellCoord, Direction, MazeGrid, MoveIntent, RayCaster, RayHit, Viewport, WallId,
};
use maze_walk_system_layout::WallLayout;
use std::time::Duration;

/// Height of a rendered wall segment in world units.
pub const WALL_HEIGHT: f32 = 100.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Phase of a touch gesture observed during one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// A finger made contact this frame.
    Started,
    /// An existing contact moved.
    Moved,
    /// The contact lifted this frame.
    Ended,
}

/// Touch sample gathered by an adapter, offset from the viewport center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchInput {
    /// Phase the gesture is in on this frame.
    pub phase: TouchPhase,
    /// Contact point relative to the viewport center, in pixels.
    pub offset: Vec2,
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameInput {
    /// Movement intents whose keys are held this frame.
    pub held_intents: Vec<MoveIntent>,
    /// Whether the adapter detected a free-look toggle press this frame.
    pub free_look_toggle: bool,
    /// Pointer position relative to the viewport center, in pixels.
    pub pointer_offset: Vec2,
    /// Touch gesture sample, when a touch is active or just ended.
    pub touch: Option<TouchInput>,
    /// Window dimensions the offsets were measured against.
    pub viewport: Viewport,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            held_intents: Vec::new(),
            free_look_toggle: false,
            pointer_offset: Vec2::ZERO,
            touch: None,
            viewport: Viewport::new(0.0, 0.0),
        }
    }
}

/// Camera pose presented by the first-person view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Eye position in world units; `y` stays at zero.
    pub position: Vec3,
    /// Heading around the vertical axis in radians.
    pub yaw: f32,
    /// Tilt above or below the horizon in radians.
    pub pitch: f32,
}

impl CameraPresentation {
    /// Creates a new camera pose descriptor.
    #[must_use]
    pub const fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }
}

/// Single textured wall slab rendered inside the maze.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPresentation {
    /// Identifier of the wall in the layout.
    pub id: WallId,
    /// World-space center of the wall plane.
    pub center: Vec3,
    /// Side of the owning cell the wall closes off; north and south
    /// walls face along `z`, east and west walls along `x`.
    pub facing: Direction,
}

impl WallPresentation {
    /// Creates a new wall slab descriptor.
    #[must_use]
    pub const fn new(id: WallId, center: Vec3, facing: Direction) -> Self {
        Self { id, center, facing }
    }
}

/// Flat floor spanning the maze footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorPresentation {
    /// Total extent along the `x` axis in world units.
    pub width: f32,
    /// Total extent along the `z` axis in world units.
    pub depth: f32,
    /// Fill color of the floor plane.
    pub color: Color,
}

/// Maze overview data consumed by the backend's minimap raster.
///
/// The grid changes only when a new maze is configured; backends key
/// their static-raster rebuild on that.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimapPresentation {
    /// Passage grid the static layout is projected from.
    pub grid: MazeGrid,
    /// Cell the player marker should sit at this frame.
    pub cell: CellCoord,
}

/// Scene description combining the camera, the walls and the floor.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// First-person camera pose for this frame.
    pub camera: CameraPresentation,
    /// Wall slabs visible within the maze.
    pub walls: Vec<WallPresentation>,
    /// Side length of a wall slab in world units.
    pub wall_length: f32,
    /// Color applied to wall slabs.
    pub wall_color: Color,
    /// Floor plane underneath the maze.
    pub floor: FloorPresentation,
    /// Overview data for the backend-driven minimap.
    pub minimap: MinimapPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        camera: CameraPresentation,
        walls: Vec<WallPresentation>,
        wall_length: f32,
        wall_color: Color,
        floor: FloorPresentation,
        minimap: MinimapPresentation,
    ) -> Self {
        Self {
            camera,
            walls,
            wall_length,
            wall_color,
            floor,
            minimap,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Walk scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame
    /// delta, per-frame input captured by the adapter, and may mutate
    /// the scene before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Capabilities reported by a backend before a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RendererCapabilities {
    /// Whether the backend can draw the full perspective maze. Reduced
    /// backends get a smaller maze to keep the projection legible.
    pub advanced_3d: bool,
}

/// Largest maze dimension offered to reduced backends.
pub const FALLBACK_MAZE_SIDE: u32 = 4;

/// Clamps a requested maze size to what the backend can present.
#[must_use]
pub fn clamp_maze_size(capabilities: RendererCapabilities, columns: u32, rows: u32) -> (u32, u32) {
    if capabilities.advanced_3d {
        (columns, rows)
    } else {
        (
            columns.min(FALLBACK_MAZE_SIDE),
            rows.min(FALLBACK_MAZE_SIDE),
        )
    }
}

/// Ray caster intersecting against the wall layout's plane segments.
///
/// Walls are axis-aligned slabs: north and south walls lie in a plane
/// of constant `z`, east and west walls in a plane of constant `x`,
/// each spanning half a cell length to either side of its center. Rays
/// are horizontal, so the vertical extent never filters a hit.
#[derive(Debug)]
pub struct SlabRayCaster<'a> {
    layout: &'a WallLayout,
}

impl<'a> SlabRayCaster<'a> {
    /// Creates a caster borrowing the given layout.
    #[must_use]
    pub const fn new(layout: &'a WallLayout) -> Self {
        Self { layout }
    }

    fn intersect(&self, origin: Vec3, direction: Vec3, id: WallId) -> Option<RayHit> {
        let placement = self.layout.placement(id)?;
        let half = self.layout.cell_length() / 2.0;
        let center = placement.center;

        let (plane, origin_axis, along, lateral_origin, lateral_delta, lateral_center) =
            match placement.direction {
                Direction::North | Direction::South => (
                    center.z,
                    origin.z,
                    direction.z,
                    origin.x,
                    direction.x,
                    center.x,
                ),
                Direction::East | Direction::West => (
                    center.x,
                    origin.x,
                    direction.x,
                    origin.z,
                    direction.z,
                    center.z,
                ),
            };

        if along.abs() <= f32::EPSILON {
            return None;
        }

        let distance = (plane - origin_axis) / along;
        if distance <= 0.0 {
            return None;
        }

        let lateral = lateral_origin + distance * lateral_delta;
        if (lateral - lateral_center).abs() > half {
            return None;
        }

        Some(RayHit { distance, wall: id })
    }
}

impl RayCaster for SlabRayCaster<'_> {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, walls: &[WallId]) -> Vec<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RayHit> = walls
            .iter()
            .filter_map(|id| self.intersect(origin, direction, *id))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_walk_core::{CellCoord, GridSize, MazeGrid, CELL_LENGTH};

    fn closed_cell_layout() -> WallLayout {
        WallLayout::build(&MazeGrid::new(GridSize::new(1, 1)), CELL_LENGTH)
    }

    #[test]
    fn rays_hit_the_facing_wall_at_half_a_cell() {
        let layout = closed_cell_layout();
        let caster = SlabRayCaster::new(&layout);
        let walls = layout.walls_near(CellCoord::new(0, 0), 0);

        for direction in [
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ] {
            let hits = caster.cast_ray(Vec3::ZERO, direction, &walls);
            let first = hits.first().expect("closed cell blocks every axis");
            assert!((first.distance - CELL_LENGTH / 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn hits_are_sorted_by_ascending_distance() {
        let grid = MazeGrid::new(GridSize::new(3, 1));
        let layout = WallLayout::build(&grid, CELL_LENGTH);
        let caster = SlabRayCaster::new(&layout);
        let walls: Vec<WallId> = layout.placements().iter().map(|p| p.id).collect();

        let hits = caster.cast_ray(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &walls);
        assert!(hits.len() >= 2);
        for pair in hits.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert!((hits[0].distance - CELL_LENGTH / 2.0).abs() < 1e-4);
    }

    #[test]
    fn open_passages_do_not_produce_hits() {
        let mut grid = MazeGrid::new(GridSize::new(2, 1));
        assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));
        let layout = WallLayout::build(&grid, CELL_LENGTH);
        let caster = SlabRayCaster::new(&layout);
        let walls = layout.walls_near(CellCoord::new(0, 0), 1);

        let hits = caster.cast_ray(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), &walls);
        // The next obstacle east is the far wall of the neighbor cell.
        let first = hits.first().expect("far wall still blocks");
        assert!((first.distance - CELL_LENGTH * 1.5).abs() < 1e-4);
    }

    #[test]
    fn rays_miss_walls_outside_their_lateral_extent() {
        let layout = closed_cell_layout();
        let caster = SlabRayCaster::new(&layout);
        let walls = layout.walls_near(CellCoord::new(0, 0), 0);

        // From well outside the cell, the north wall plane is crossed
        // beyond the wall's span, so nothing is struck.
        let origin = Vec3::new(CELL_LENGTH * 2.0, 0.0, 0.0);
        let hits = caster.cast_ray(origin, Vec3::new(0.0, 0.0, -1.0), &walls);
        assert!(hits.is_empty());
    }

    #[test]
    fn zero_direction_rays_never_hit() {
        let layout = closed_cell_layout();
        let caster = SlabRayCaster::new(&layout);
        let walls = layout.walls_near(CellCoord::new(0, 0), 0);

        assert!(caster.cast_ray(Vec3::ZERO, Vec3::ZERO, &walls).is_empty());
    }

    #[test]
    fn reduced_backends_clamp_the_maze_size() {
        let reduced = RendererCapabilities { advanced_3d: false };
        let full = RendererCapabilities { advanced_3d: true };

        assert_eq!(clamp_maze_size(reduced, 12, 9), (4, 4));
        assert_eq!(clamp_maze_size(reduced, 3, 2), (3, 2));
        assert_eq!(clamp_maze_size(full, 12, 9), (12, 9));
    }

    #[test]
    fn byte_colors_convert_to_unit_channels() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert!((color.red - 1.0).abs() < 1e-6);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < 1e-6);
    }
}
