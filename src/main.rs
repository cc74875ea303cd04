use bevy::prelude::*;

use labyrinth::game::coord::Coord;
use labyrinth::game::pathfinding::{GridPosition, PathRequest, WalkPath, Walker};
use labyrinth::game::world::MazeWorld;
use labyrinth::game::MazeGamePlugin;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_WALK_TICKS: usize = 100_000;

fn setup_file_logging() -> String {
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory: {e}");
    }

    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("labyrinth_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path_str = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,labyrinth=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|s| s.starts_with("labyrinth") && s.ends_with(".log"))
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

/// Maze glyphs with the walked route drawn over them.
fn render_route(world: &MazeWorld, start: Coord) -> String {
    let route: HashSet<(i32, i32)> = world.path().iter().map(|c| (c.x, c.y)).collect();
    let mut out = String::new();
    for (column, line) in world.text().lines().enumerate() {
        for (row, glyph) in line.chars().enumerate() {
            let cell = (column as i32, row as i32);
            let shown = if cell == (start.x, start.y) {
                'S'
            } else if route.contains(&cell) {
                '*'
            } else if glyph == '@' {
                ' '
            } else {
                glyph
            };
            out.push(shown);
        }
        out.push('\n');
    }
    out
}

fn main() {
    let log_file = setup_file_logging();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Labyrinth - Logging to file                             ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Log file: {:<45} ║", log_file);
    println!("╚══════════════════════════════════════════════════════════╝");

    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(MazeGamePlugin);

    // Startup: config, maze, walker
    app.update();

    let mut walkers = app.world_mut().query_filtered::<(Entity, &GridPosition), With<Walker>>();
    let Some((walker, start)) = walkers.iter(app.world()).next().map(|(e, p)| (e, p.0)) else {
        error!("No walker was spawned; nothing to do");
        return;
    };

    let Some(goal) = app.world().resource::<MazeWorld>().entry_points().get(2).copied() else {
        error!("Maze has no exit entry point");
        return;
    };

    info!("Routing walker from {} to {}", start, goal);
    app.world_mut().write_message(PathRequest { entity: walker, goal: goal.to_world() });

    let mut ticks = 0;
    loop {
        app.world_mut().run_schedule(FixedUpdate);
        ticks += 1;
        if !app.world().entity(walker).contains::<WalkPath>() || ticks >= MAX_WALK_TICKS {
            break;
        }
    }

    let world = app.world().resource::<MazeWorld>();
    let end = app.world().get::<GridPosition>(walker).map(|p| p.0);
    if world.path().is_empty() {
        warn!("No route from {} to {}", start, goal);
    } else {
        info!("Walker finished at {:?} after {} ticks ({} steps)", end, ticks, world.path().len());
    }

    println!("{}", render_route(world, start));
}
