#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player movement and collision controller.
//!
//! The controller fuses three input modalities into one orientation
//! and a collision-gated translation per frame. Orientation follows an
//! explicit precedence ladder evaluated on every update, highest
//! first:
//!
//! 1. an active touch drag turns yaw and pitch proportionally to its
//!    displacement from the viewport center;
//! 2. otherwise, free-look mode turns the same way from the pointer
//!    offset;
//! 3. otherwise, the discrete left/right keys turn yaw at a fixed
//!    rate (keys never adjust pitch).
//!
//! Translation resolves the four logical axes independently: each
//! intended axis casts a ray along its movement vector against the
//! nearby obstacle set and contributes its full displacement only when
//! the nearest hit lies beyond the clearance threshold. A blocked axis
//! zeroes only its own contribution; rotation is never blocked.

use std::{
    f32::consts::{FRAC_PI_2, FRAC_PI_6, PI},
    time::Duration,
};

use glam::{Vec2, Vec3};
use maze_walk_core::{
    CellCoord, Command, Direction, MazeGrid, MoveIntent, RayCaster, Viewport, WallId,
};

/// Movement speed in world units per second.
pub const MOVE_SPEED: f32 = 100.0;

/// Minimum unobstructed ray distance required to permit movement.
///
/// Keeps the player at a soft stand-off from walls instead of exact
/// contact resolution.
pub const CLEARANCE: f32 = 40.0;

/// Symmetric pitch bound; the camera can never look past this tilt.
pub const MAX_PITCH: f32 = FRAC_PI_6;

/// Turn increment in radians applied per update at full deflection.
pub const TURN_RATE: f32 = 0.03;

/// First-person controller owning orientation and input-intent state.
///
/// The authoritative position stays in the world; the controller reads
/// it each frame and proposes displacements through
/// [`Command::TranslatePlayer`].
#[derive(Clone, Debug)]
pub struct PlayerController {
    forward_key: bool,
    forward_touch: bool,
    backward: bool,
    left: bool,
    right: bool,
    free_look: bool,
    pointer: Vec2,
    touch: Vec2,
    yaw: f32,
    pitch: f32,
}

impl PlayerController {
    /// Creates a controller facing the origin cell's first opening.
    ///
    /// A spanning-tree maze opens the origin to the south or the east
    /// (or both); the view starts rotated 180 degrees for a south
    /// opening and -90 degrees otherwise.
    #[must_use]
    pub fn new(grid: &MazeGrid) -> Self {
        let origin = grid.passages(CellCoord::new(0, 0));
        let yaw = if origin.contains(Direction::South) {
            PI
        } else {
            -FRAC_PI_2
        };

        Self {
            forward_key: false,
            forward_touch: false,
            backward: false,
            left: false,
            right: false,
            free_look: false,
            pointer: Vec2::ZERO,
            touch: Vec2::ZERO,
            yaw,
            pitch: 0.0,
        }
    }

    /// Updates a single movement-intent flag. Writes are idempotent,
    /// so repeated key events within one frame are harmless.
    pub fn set_intent(&mut self, intent: MoveIntent, active: bool) {
        match intent {
            MoveIntent::Forward => self.forward_key = active,
            MoveIntent::Backward => self.backward = active,
            MoveIntent::Left => self.left = active,
            MoveIntent::Right => self.right = active,
        }
    }

    /// Records the pointer offset relative to the viewport center.
    pub fn pointer_moved(&mut self, offset: Vec2) {
        self.pointer = offset;
    }

    /// Begins a touch drag; a touch always drives forward intent until
    /// it ends, though the dead region decides whether it translates.
    pub fn touch_started(&mut self, offset: Vec2) {
        self.touch = offset;
        self.forward_touch = true;
    }

    /// Updates the active touch offset relative to the viewport center.
    pub fn touch_moved(&mut self, offset: Vec2) {
        if self.forward_touch {
            self.touch = offset;
        }
    }

    /// Ends the touch drag, stopping touch-driven motion and turning.
    pub fn touch_ended(&mut self) {
        self.forward_touch = false;
        self.touch = Vec2::ZERO;
    }

    /// Flips free-look mode. Pitch resets to neutral when leaving the
    /// mode so keyboard-only control never inherits a tilted camera.
    pub fn toggle_free_look(&mut self) {
        self.free_look = !self.free_look;
        if !self.free_look {
            self.pitch = 0.0;
        }
    }

    /// Whether free-look mode is currently active.
    #[must_use]
    pub const fn free_look(&self) -> bool {
        self.free_look
    }

    /// Current yaw angle in radians.
    #[must_use]
    pub const fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch angle in radians, clamped to [`MAX_PITCH`].
    #[must_use]
    pub const fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Horizontal view direction derived from yaw alone.
    ///
    /// Movement ignores pitch; yaw zero faces negative `z` (north).
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Advances orientation and proposes translation for one frame.
    ///
    /// `nearby` is the obstacle subset scoped to the player's current
    /// neighborhood; an empty slice reads as unobstructed. The composed
    /// displacement, when non-zero, is pushed as a
    /// [`Command::TranslatePlayer`] for the world to apply.
    pub fn update<R>(
        &mut self,
        dt: Duration,
        position: Vec3,
        viewport: Viewport,
        nearby: &[WallId],
        caster: &R,
        out: &mut Vec<Command>,
    ) where
        R: RayCaster,
    {
        self.turn(viewport);

        let step = MOVE_SPEED * dt.as_secs_f32();
        let forward = self.direction();
        // Forward rotated -90 degrees about the vertical axis.
        let right = Vec3::new(-forward.z, 0.0, forward.x);

        let mut dx = 0.0;
        let mut dz = 0.0;

        // A touch drives forward only from within the inner dead
        // region; beyond it the drag is a pure look-turn.
        let touch_drive = self.forward_touch
            && self.touch.x.abs() < viewport.quarter_x()
            && self.touch.y.abs() < viewport.quarter_y();

        if (self.forward_key || touch_drive) && self.axis_clear(position, forward, nearby, caster) {
            dx += forward.x * step;
            dz += forward.z * step;
        }

        if self.right && self.free_look && self.axis_clear(position, right, nearby, caster) {
            dx += right.x * step;
            dz += right.z * step;
        }

        if self.backward && self.axis_clear(position, -forward, nearby, caster) {
            dx -= forward.x * step;
            dz -= forward.z * step;
        }

        if self.left && self.free_look && self.axis_clear(position, -right, nearby, caster) {
            dx -= right.x * step;
            dz -= right.z * step;
        }

        if dx != 0.0 || dz != 0.0 {
            out.push(Command::TranslatePlayer { dx, dz });
        }
    }

    fn turn(&mut self, viewport: Viewport) {
        if self.touch != Vec2::ZERO {
            self.yaw -= self.touch.x / viewport.half_x() * TURN_RATE;
            self.pitch -= self.touch.y / viewport.half_y() * TURN_RATE;
        } else if self.free_look {
            self.yaw -= self.pointer.x / viewport.half_x() * TURN_RATE;
            self.pitch -= self.pointer.y / viewport.half_y() * TURN_RATE;
        } else if self.left {
            self.yaw += TURN_RATE;
        } else if self.right {
            self.yaw -= TURN_RATE;
        }

        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    fn axis_clear<R>(&self, position: Vec3, axis: Vec3, nearby: &[WallId], caster: &R) -> bool
    where
        R: RayCaster,
    {
        let hits = caster.cast_ray(position, axis, nearby);
        hits.first().map_or(true, |hit| hit.distance > CLEARANCE)
    }
}
