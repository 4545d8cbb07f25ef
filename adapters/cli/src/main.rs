#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Walk experience.
//!
//! Wires the world, the movement controller and the minimap projector
//! to the macroquad backend, and offers offline modes for printing a
//! maze as ASCII art and sharing layouts as compact strings.

mod layout_transfer;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::Rng;

use layout_transfer::MazeLayoutSnapshot;
use maze_walk_core::{AsciiMaze, Command, Event, MoveIntent, Viewport, CELL_LENGTH};
use maze_walk_rendering::{
    clamp_maze_size, CameraPresentation, Color, FloorPresentation, FrameInput,
    MinimapPresentation, Presentation, RendererCapabilities, RenderingBackend, Scene,
    SlabRayCaster, TouchPhase, WallPresentation,
};
use maze_walk_rendering_macroquad::{BackendConfig, MacroquadBackend, SETTINGS_FILE};
use maze_walk_system_movement::PlayerController;
use maze_walk_world::{self as world, query, World};

/// First-person walk through a procedurally generated maze.
#[derive(Debug, Parser)]
#[command(name = "maze-walk", version, about)]
struct Args {
    /// Number of cell columns in the generated maze.
    #[arg(long, default_value_t = 8)]
    columns: u32,

    /// Number of cell rows in the generated maze.
    #[arg(long, default_value_t = 8)]
    rows: u32,

    /// Seed for deterministic generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the maze as ASCII art instead of opening a window.
    #[arg(long)]
    print: bool,

    /// Print the maze as a shareable layout string instead of opening
    /// a window.
    #[arg(long)]
    export_layout: bool,

    /// Walk an imported layout string instead of generating a maze.
    #[arg(long, value_name = "LAYOUT")]
    import_layout: Option<String>,

    /// Pretend the renderer lacks advanced 3D support, clamping the
    /// maze to the reduced fallback size.
    #[arg(long)]
    basic_renderer: bool,

    /// Render without waiting for the display refresh rate.
    #[arg(long)]
    no_vsync: bool,

    /// Print frame rate metrics once per second.
    #[arg(long)]
    show_fps: bool,
}

fn build_world(args: &Args) -> Result<World> {
    if let Some(encoded) = &args.import_layout {
        let snapshot = MazeLayoutSnapshot::decode(encoded)
            .map_err(|error| anyhow!("could not import layout: {error}"))?;
        return Ok(World::from_grid(snapshot.grid));
    }

    let capabilities = RendererCapabilities {
        advanced_3d: !args.basic_renderer,
    };
    let (columns, rows) = clamp_maze_size(capabilities, args.columns, args.rows);
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureMaze {
            columns,
            rows,
            seed,
        },
        &mut events,
    );
    if events
        .iter()
        .any(|event| matches!(event, Event::MazeRejected { .. }))
    {
        return Err(anyhow!("maze dimensions {columns}x{rows} were rejected"));
    }
    Ok(world)
}

fn build_scene(world: &World, controller: &PlayerController) -> Scene {
    let grid = query::maze_grid(world);
    let layout = query::wall_layout(world);
    let player = query::player(world);

    let walls = layout
        .placements()
        .iter()
        .map(|placement| WallPresentation::new(placement.id, placement.center, placement.direction))
        .collect();

    let size = grid.size();
    let floor = FloorPresentation {
        width: size.columns() as f32 * CELL_LENGTH,
        depth: size.rows() as f32 * CELL_LENGTH,
        color: Color::from_rgb_u8(60, 60, 60),
    };

    Scene::new(
        CameraPresentation::new(player.position, controller.yaw(), controller.pitch()),
        walls,
        CELL_LENGTH,
        Color::from_rgb_u8(170, 140, 90),
        floor,
        MinimapPresentation {
            grid: grid.clone(),
            cell: player.cell,
        },
    )
}

fn drive_frame(
    world: &mut World,
    controller: &mut PlayerController,
    dt: std::time::Duration,
    input: &FrameInput,
) {
    let viewport: Viewport = input.viewport;
    for intent in [
        MoveIntent::Forward,
        MoveIntent::Backward,
        MoveIntent::Left,
        MoveIntent::Right,
    ] {
        controller.set_intent(intent, input.held_intents.contains(&intent));
    }
    if input.free_look_toggle {
        controller.toggle_free_look();
    }
    controller.pointer_moved(input.pointer_offset);
    if let Some(touch) = input.touch {
        match touch.phase {
            TouchPhase::Started => controller.touch_started(touch.offset),
            TouchPhase::Moved => controller.touch_moved(touch.offset),
            TouchPhase::Ended => controller.touch_ended(),
        }
    }

    let mut commands = Vec::new();
    {
        let player = query::player(world);
        let nearby = query::walls_near_player(world, 1);
        let caster = SlabRayCaster::new(query::wall_layout(world));
        controller.update(dt, player.position, viewport, &nearby, &caster, &mut commands);
    }
    commands.push(Command::Tick { dt });

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
}

/// Entry point for the Maze Walk command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let mut world = build_world(&args)?;

    if args.print {
        print!("{}", AsciiMaze(query::maze_grid(&world)));
        return Ok(());
    }

    if args.export_layout {
        let snapshot = MazeLayoutSnapshot::from_grid(query::maze_grid(&world).clone());
        println!("{}", snapshot.encode());
        return Ok(());
    }

    println!("{}", query::welcome_banner(&world));

    let config =
        BackendConfig::load(Path::new(SETTINGS_FILE)).context("failed to load backend settings")?;
    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_config(config);

    let mut controller = PlayerController::new(query::maze_grid(&world));
    let scene = build_scene(&world, &controller);
    let presentation = Presentation::new("Maze Walk", Color::from_rgb_u8(10, 10, 14), scene);

    backend.run(presentation, move |dt, input, scene| {
        drive_frame(&mut world, &mut controller, dt, &input);

        let player = query::player(&world);
        scene.camera =
            CameraPresentation::new(player.position, controller.yaw(), controller.pitch());
        scene.minimap.cell = player.cell;
    })
}
