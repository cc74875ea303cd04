use bevy::prelude::*;
use labyrinth::game::config::MazeConfig;
use labyrinth::game::coord::Coord;
use labyrinth::game::pathfinding::{GridPosition, MoveTick, PathRequest, WalkPath, Walker};
use labyrinth::game::world::MazeWorld;
use labyrinth::game::MazeGamePlugin;

/// Helper to build a headless app around a fixed-seed maze and run Startup
fn maze_app(seed: u64) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(MazeConfig { seed: Some(seed), ..default() });
    app.add_plugins(MazeGamePlugin);

    // Runs Startup: config (preset kept), world generation, walker spawn
    app.update();
    app
}

fn walker(app: &mut App) -> (Entity, Coord) {
    let mut query = app.world_mut().query_filtered::<(Entity, &GridPosition), With<Walker>>();
    let (entity, position) = query
        .iter(app.world())
        .next()
        .expect("Startup should spawn a walker");
    (entity, position.0)
}

/// Run movement ticks until the walker's path is drained (or the limit is hit).
fn walk_until_idle(app: &mut App, entity: Entity, max_ticks: usize) -> usize {
    for tick in 1..=max_ticks {
        app.world_mut().run_schedule(FixedUpdate);
        if !app.world().entity(entity).contains::<WalkPath>() {
            return tick;
        }
    }
    panic!("walker still walking after {max_ticks} ticks");
}

#[test]
fn test_startup_builds_world_and_walker() {
    let mut app = maze_app(2016);

    let world = app.world().resource::<MazeWorld>();
    assert_eq!(world.seed(), Some(2016));
    let entry = world.entry_points()[0];
    assert!(world.graph().is_walkable(entry));

    let (_, position) = walker(&mut app);
    assert_eq!(position, entry.with_layer(-1));
}

#[test]
fn test_walker_reaches_far_entry() {
    let mut app = maze_app(7);
    let (entity, start) = walker(&mut app);
    let goal = app.world().resource::<MazeWorld>().entry_points()[2];

    app.world_mut().write_message(PathRequest { entity, goal: goal.to_world() });
    let ticks = walk_until_idle(&mut app, entity, 10_000);

    let final_pos = app.world().get::<GridPosition>(entity).unwrap().0;
    assert_eq!(final_pos, goal.with_layer(-1), "walker stopped short (started at {start})");

    let world = app.world().resource::<MazeWorld>();
    assert_eq!(world.path().len(), ticks, "one step per movement tick");
    assert_eq!(world.target().map(|t| t.position), Some(goal));
}

#[test]
fn test_goal_is_rounded_to_nearest_cell() {
    let mut app = maze_app(31);
    let (entity, _) = walker(&mut app);
    let goal = app.world().resource::<MazeWorld>().entry_points()[1];

    let fuzzy = goal.to_world() + Vec2::new(0.3, -0.4);
    app.world_mut().write_message(PathRequest { entity, goal: fuzzy });
    walk_until_idle(&mut app, entity, 10_000);

    assert_eq!(app.world().get::<GridPosition>(entity).unwrap().0, goal.with_layer(-1));
}

#[test]
fn test_wall_target_is_silently_declined() {
    let mut app = maze_app(99);
    let (entity, start) = walker(&mut app);

    // Corner posts are always walls.
    app.world_mut().write_message(PathRequest { entity, goal: Vec2::new(0.0, 0.0) });
    app.world_mut().run_schedule(FixedUpdate);

    assert!(!app.world().entity(entity).contains::<WalkPath>());
    assert_eq!(app.world().get::<GridPosition>(entity).unwrap().0, start);
    assert!(app.world().resource::<MazeWorld>().path().is_empty());
}

#[test]
fn test_target_outside_maze_is_declined() {
    let mut app = maze_app(5);
    let (entity, start) = walker(&mut app);

    app.world_mut().write_message(PathRequest { entity, goal: Vec2::new(-40.0, 500.0) });
    app.world_mut().run_schedule(FixedUpdate);

    assert!(!app.world().entity(entity).contains::<WalkPath>());
    assert_eq!(app.world().get::<GridPosition>(entity).unwrap().0, start);
}

#[test]
fn test_requests_while_walking_are_ignored() {
    let mut app = maze_app(12);
    let (entity, _) = walker(&mut app);
    let (first, second) = {
        let world = app.world().resource::<MazeWorld>();
        (world.entry_points()[3], world.entry_points()[1])
    };

    app.world_mut().write_message(PathRequest { entity, goal: first.to_world() });
    app.world_mut().run_schedule(FixedUpdate);
    assert!(app.world().entity(entity).contains::<WalkPath>(), "long path should still be in progress");

    app.world_mut().write_message(PathRequest { entity, goal: second.to_world() });
    walk_until_idle(&mut app, entity, 10_000);

    assert_eq!(app.world().get::<GridPosition>(entity).unwrap().0, first.with_layer(-1));
}

#[test]
fn test_move_tick_counts_fixed_updates() {
    let mut app = maze_app(1);
    let before = app.world().resource::<MoveTick>().0;
    for _ in 0..5 {
        app.world_mut().run_schedule(FixedUpdate);
    }
    assert_eq!(app.world().resource::<MoveTick>().0, before + 5);
}

#[test]
fn test_request_for_non_walker_is_ignored() {
    let mut app = maze_app(3);
    let stranger = app.world_mut().spawn(GridPosition(Coord::new(1, 1))).id();
    let goal = app.world().resource::<MazeWorld>().entry_points()[2];

    app.world_mut().write_message(PathRequest { entity: stranger, goal: goal.to_world() });
    app.world_mut().run_schedule(FixedUpdate);

    assert!(!app.world().entity(stranger).contains::<WalkPath>());
    assert!(app.world().resource::<MazeWorld>().path().is_empty());
}
