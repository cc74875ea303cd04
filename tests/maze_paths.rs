use labyrinth::game::config::MazeConfig;
use labyrinth::game::coord::Coord;
use labyrinth::game::maze::WallGrid;
use labyrinth::game::pathfinding::{NoPathError, Pathfinder, TileGraph};
use labyrinth::game::world::MazeWorld;

fn assert_valid_path(graph: &TileGraph, start: Coord, target: Coord, path: &[Coord]) {
    assert!(!path.contains(&start), "path includes the start {start}");
    assert_eq!(path.last(), Some(&target));

    let mut prev = start;
    for &step in path {
        assert!(prev.is_adjacent(step), "{prev} -> {step} is not a single move");
        assert!(graph.is_walkable(step), "{step} is a wall");
        if prev.is_diagonal_to(step) {
            for corner in [Coord::new(step.x, prev.y), Coord::new(prev.x, step.y)] {
                assert!(graph.is_walkable(corner), "{prev} -> {step} cuts the corner at {corner}");
            }
        }
        prev = step;
    }
}

fn random_walkable(graph: &TileGraph, rng: &mut fastrand::Rng) -> Coord {
    let walkable: Vec<Coord> = graph
        .iter()
        .filter(|(_, node)| node.is_walkable())
        .map(|(_, node)| node.position())
        .collect();
    walkable[rng.usize(..walkable.len())]
}

#[test]
fn test_entries_connect_for_many_mazes() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..25 {
        let config = MazeConfig {
            width: rng.usize(4..75),
            height: rng.usize(4..75),
            seed: Some(rng.u64(..)),
            ..MazeConfig::default()
        };
        let mut world = MazeWorld::generate(&config);
        let entries = world.entry_points().to_vec();
        assert_eq!(entries.len(), 4, "config {config:?}");

        for &(from, to) in &[(0, 2), (1, 3), (3, 0)] {
            assert!(
                world.pathfind(entries[from], entries[to]),
                "no path {} -> {} in maze {config:?}\n{}",
                entries[from],
                entries[to],
                world.text()
            );
            assert_valid_path(world.graph(), entries[from], entries[to], world.path());
        }
    }
}

#[test]
fn test_any_two_floor_tiles_are_connected() {
    let mut rng = fastrand::Rng::with_seed(7);
    let config = MazeConfig { width: 45, height: 45, seed: Some(77), ..MazeConfig::default() };
    let world = MazeWorld::generate(&config);
    let mut finder = Pathfinder::new();

    for _ in 0..200 {
        let start = random_walkable(world.graph(), &mut rng);
        let target = random_walkable(world.graph(), &mut rng);
        let path = finder
            .find_path(world.graph(), start, target)
            .unwrap_or_else(|_| panic!("{start} -> {target} unreachable"));
        if start == target {
            assert!(path.is_empty());
        } else {
            assert_valid_path(world.graph(), start, target, &path);
        }
    }
}

#[test]
fn test_rim_and_walls_are_never_targets() {
    let config = MazeConfig { seed: Some(3), ..MazeConfig::default() };
    let world = MazeWorld::generate(&config);
    let mut finder = Pathfinder::new();
    let start = world.entry_points()[0];

    for (_, node) in world.graph().iter().filter(|(_, n)| !n.is_walkable()).take(300) {
        assert_eq!(finder.find_path(world.graph(), start, node.position()), Err(NoPathError));
    }
    assert_eq!(finder.touched_count(), 0, "rejected targets must not start a search");
}

#[test]
fn test_paths_are_repeatable() {
    let config = MazeConfig { width: 90, height: 60, seed: Some(1_000_003), ..MazeConfig::default() };
    let mut world = MazeWorld::generate(&config);
    let entries = world.entry_points().to_vec();

    assert!(world.pathfind(entries[0], entries[2]));
    let first = world.path().to_vec();
    for _ in 0..5 {
        assert!(world.pathfind(entries[1], entries[3]));
        assert!(world.pathfind(entries[0], entries[2]));
        assert_eq!(world.path(), first.as_slice());
    }
}

#[test]
fn test_same_seed_same_level() {
    let config = MazeConfig { width: 66, height: 51, seed: Some(8), ..MazeConfig::default() };
    let a = MazeWorld::generate(&config);
    let b = MazeWorld::generate(&config);

    assert_eq!(a.text(), b.text());
    assert_eq!(a.graph().len(), b.graph().len());
    assert_eq!(a.text(), &WallGrid::generate(66, 51, 8).render());
}
