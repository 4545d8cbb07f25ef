use std::f32::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use glam::{Vec2, Vec3};
use maze_walk_core::{
    CellCoord, Command, Direction, GridSize, MazeGrid, MoveIntent, RayCaster, RayHit, Viewport,
    WallId,
};
use maze_walk_system_movement::{PlayerController, CLEARANCE, MAX_PITCH, MOVE_SPEED, TURN_RATE};

/// Reports every path as unobstructed.
struct OpenCaster;

impl RayCaster for OpenCaster {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _walls: &[WallId]) -> Vec<RayHit> {
        Vec::new()
    }
}

/// Reports a single hit at a fixed distance regardless of direction.
struct FixedCaster {
    distance: f32,
}

impl RayCaster for FixedCaster {
    fn cast_ray(&self, _origin: Vec3, _direction: Vec3, _walls: &[WallId]) -> Vec<RayHit> {
        vec![RayHit {
            distance: self.distance,
            wall: WallId::new(0),
        }]
    }
}

/// Blocks only rays closely aligned with one direction.
struct DirectionalCaster {
    blocked: Vec3,
    distance: f32,
}

impl RayCaster for DirectionalCaster {
    fn cast_ray(&self, _origin: Vec3, direction: Vec3, _walls: &[WallId]) -> Vec<RayHit> {
        if direction.normalize().dot(self.blocked.normalize()) > 0.99 {
            vec![RayHit {
                distance: self.distance,
                wall: WallId::new(0),
            }]
        } else {
            Vec::new()
        }
    }
}

fn east_opening_grid() -> MazeGrid {
    let mut grid = MazeGrid::new(GridSize::new(2, 1));
    assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));
    grid
}

fn south_opening_grid() -> MazeGrid {
    let mut grid = MazeGrid::new(GridSize::new(1, 2));
    assert!(grid.open_passage(CellCoord::new(0, 0), Direction::South));
    grid
}

fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0)
}

fn translation(commands: &[Command]) -> Option<(f32, f32)> {
    commands.iter().find_map(|command| match command {
        Command::TranslatePlayer { dx, dz } => Some((*dx, *dz)),
        _ => None,
    })
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn initial_yaw_faces_a_south_opening() {
    let controller = PlayerController::new(&south_opening_grid());
    assert_close(controller.yaw(), PI);
}

#[test]
fn initial_yaw_faces_an_east_only_opening() {
    let controller = PlayerController::new(&east_opening_grid());
    assert_close(controller.yaw(), -FRAC_PI_2);
}

#[test]
fn forward_moves_speed_times_elapsed_when_unobstructed() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Forward, true);

    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(500),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    let (dx, dz) = translation(&commands).expect("forward intent must translate");
    assert_close(dx, MOVE_SPEED * 0.5);
    assert_close(dz, 0.0);
}

#[test]
fn forward_is_blocked_within_the_clearance_threshold() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Forward, true);

    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(500),
        Vec3::ZERO,
        viewport(),
        &[],
        &FixedCaster {
            distance: CLEARANCE - 10.0,
        },
        &mut commands,
    );

    assert_eq!(translation(&commands), None);
}

#[test]
fn hits_beyond_the_clearance_threshold_permit_movement() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Forward, true);

    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(250),
        Vec3::ZERO,
        viewport(),
        &[],
        &FixedCaster {
            distance: CLEARANCE + 20.0,
        },
        &mut commands,
    );

    let (dx, _) = translation(&commands).expect("distant hits must not block");
    assert_close(dx, MOVE_SPEED * 0.25);
}

#[test]
fn blocked_axes_never_veto_other_axes() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.toggle_free_look();
    controller.set_intent(MoveIntent::Forward, true);
    controller.set_intent(MoveIntent::Right, true);

    // Forward faces east; block east but leave the southward strafe open.
    let caster = DirectionalCaster {
        blocked: Vec3::new(1.0, 0.0, 0.0),
        distance: 10.0,
    };

    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &caster,
        &mut commands,
    );

    let (dx, dz) = translation(&commands).expect("strafe axis must stay free");
    assert_close(dx, 0.0);
    assert_close(dz, MOVE_SPEED);
}

#[test]
fn strafing_requires_free_look() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Right, true);

    let yaw_before = controller.yaw();
    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    // Without free-look the right key turns instead of strafing.
    assert_eq!(translation(&commands), None);
    assert_close(controller.yaw(), yaw_before - TURN_RATE);
}

#[test]
fn backward_moves_against_the_view_direction() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Backward, true);

    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    let (dx, dz) = translation(&commands).expect("backward intent must translate");
    assert_close(dx, -MOVE_SPEED);
    assert_close(dz, 0.0);
}

#[test]
fn pitch_clamps_to_the_symmetric_bound() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.toggle_free_look();
    controller.pointer_moved(Vec2::new(0.0, -400.0));

    let mut commands = Vec::new();
    for _ in 0..200 {
        controller.update(
            Duration::from_millis(16),
            Vec3::ZERO,
            viewport(),
            &[],
            &OpenCaster,
            &mut commands,
        );
    }
    assert_close(controller.pitch(), MAX_PITCH);

    controller.pointer_moved(Vec2::new(0.0, 400.0));
    for _ in 0..400 {
        controller.update(
            Duration::from_millis(16),
            Vec3::ZERO,
            viewport(),
            &[],
            &OpenCaster,
            &mut commands,
        );
    }
    assert_close(controller.pitch(), -MAX_PITCH);
}

#[test]
fn touch_takes_precedence_over_the_pointer() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.toggle_free_look();
    controller.pointer_moved(Vec2::new(500.0, 0.0));
    controller.touch_started(Vec2::new(-500.0, 0.0));

    let yaw_before = controller.yaw();
    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(16),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    // The touch deflection turns left; the pointer would have turned right.
    let expected = yaw_before + 500.0 / viewport().half_x() * TURN_RATE;
    assert_close(controller.yaw(), expected);
}

#[test]
fn pointer_is_ignored_outside_free_look() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.pointer_moved(Vec2::new(500.0, 300.0));

    let yaw_before = controller.yaw();
    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(16),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    assert_close(controller.yaw(), yaw_before);
    assert_close(controller.pitch(), 0.0);
}

#[test]
fn touch_outside_the_dead_region_turns_without_driving() {
    let mut controller = PlayerController::new(&east_opening_grid());
    let viewport = viewport();
    controller.touch_started(Vec2::new(viewport.quarter_x() + 50.0, 0.0));

    let yaw_before = controller.yaw();
    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport,
        &[],
        &OpenCaster,
        &mut commands,
    );

    assert_eq!(translation(&commands), None);
    assert!(controller.yaw() < yaw_before);
}

#[test]
fn touch_inside_the_dead_region_drives_forward() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.touch_started(Vec2::new(10.0, 5.0));

    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    assert!(translation(&commands).is_some());
}

#[test]
fn touch_end_stops_touch_driven_motion() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.touch_started(Vec2::new(10.0, 5.0));
    controller.touch_ended();

    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );

    assert_eq!(translation(&commands), None);
}

#[test]
fn leaving_free_look_resets_pitch() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.toggle_free_look();
    controller.pointer_moved(Vec2::new(0.0, -200.0));

    let mut commands = Vec::new();
    controller.update(
        Duration::from_millis(16),
        Vec3::ZERO,
        viewport(),
        &[],
        &OpenCaster,
        &mut commands,
    );
    assert!(controller.pitch() > 0.0);

    controller.toggle_free_look();
    assert!(!controller.free_look());
    assert_close(controller.pitch(), 0.0);
}

#[test]
fn rotation_stays_free_while_blocked() {
    let mut controller = PlayerController::new(&east_opening_grid());
    controller.set_intent(MoveIntent::Forward, true);
    controller.set_intent(MoveIntent::Left, true);

    let yaw_before = controller.yaw();
    let mut commands = Vec::new();
    controller.update(
        Duration::from_secs(1),
        Vec3::ZERO,
        viewport(),
        &[],
        &FixedCaster { distance: 1.0 },
        &mut commands,
    );

    assert_eq!(translation(&commands), None);
    assert_close(controller.yaw(), yaw_before + TURN_RATE);
}
