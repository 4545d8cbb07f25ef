#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Top-down minimap projection of the maze and player position.
//!
//! The projector paints the static layout once onto a persistent
//! [`MinimapSurface`] and afterwards only touches the two cells
//! involved in a position change: the previous marker is painted over
//! in the background color and the new one drawn on top. Wall lines
//! are drawn for closed south and east edges only, which covers every
//! interior wall exactly once.

use maze_walk_core::{CellCoord, Direction, MazeGrid, MinimapSurface, Rgb, Viewport};

/// Background fill behind the maze lines.
const BACKGROUND: Rgb = Rgb::new(255, 255, 255);
/// Stroke color for wall lines.
const WALL: Rgb = Rgb::new(0, 0, 0);
/// Fill color of the player marker.
const MARKER: Rgb = Rgb::new(0, 0, 255);

/// Incremental minimap state bound to one drawn layout.
///
/// Holds the cell the marker was last drawn at together with the
/// raster metrics fixed at build time. Rebuild after a viewport or
/// maze change; update on every player cell change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimap {
    current: CellCoord,
    side: f32,
    span: f32,
}

impl Minimap {
    /// Paints the full static layout and the initial origin marker,
    /// returning the state needed for incremental updates.
    ///
    /// The raster is a square of `viewport.minimap_side()` pixels and
    /// each cell spans `side / rows` of it.
    pub fn build(grid: &MazeGrid, viewport: Viewport, surface: &mut impl MinimapSurface) -> Self {
        let side = viewport.minimap_side();
        let span = side / grid.size().rows() as f32;

        surface.fill_rect(0.0, 0.0, side, side, BACKGROUND);

        for row in 0..grid.size().rows() {
            let y = row as f32 * span;
            for column in 0..grid.size().columns() {
                let x = column as f32 * span;
                let passages = grid.passages(CellCoord::new(column, row));

                if !passages.contains(Direction::South) {
                    surface.draw_line(x, y + span, x + span, y + span, WALL);
                }
                if !passages.contains(Direction::East) {
                    surface.draw_line(x + span, y, x + span, y + span, WALL);
                }
            }
        }

        let minimap = Self {
            current: CellCoord::new(0, 0),
            side,
            span,
        };
        minimap.draw_marker(minimap.current, MARKER, span / 4.0, surface);
        minimap
    }

    /// Moves the marker to `cell`, erasing it at the previous cell.
    ///
    /// A repeated cell is a no-op so callers can feed every frame's
    /// pose without redundant drawing. The erase radius is slightly
    /// larger than the marker to cover antialiased fringes.
    pub fn update(&mut self, cell: CellCoord, surface: &mut impl MinimapSurface) {
        if cell == self.current {
            return;
        }

        self.draw_marker(self.current, BACKGROUND, self.span / 3.0, surface);
        self.current = cell;
        self.draw_marker(self.current, MARKER, self.span / 4.0, surface);
    }

    /// Cell the marker is currently drawn at.
    #[must_use]
    pub const fn current(&self) -> CellCoord {
        self.current
    }

    /// Side length of the square raster in pixels.
    #[must_use]
    pub const fn side(&self) -> f32 {
        self.side
    }

    /// Pixel span of a single cell.
    #[must_use]
    pub const fn span(&self) -> f32 {
        self.span
    }

    fn draw_marker(
        &self,
        cell: CellCoord,
        color: Rgb,
        radius: f32,
        surface: &mut impl MinimapSurface,
    ) {
        let center_x = cell.column() as f32 * self.span + self.span / 2.0;
        let center_y = cell.row() as f32 * self.span + self.span / 2.0;
        surface.fill_circle(center_x, center_y, radius, color);
    }
}
