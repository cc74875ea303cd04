/// Path following.
///
/// Walkers consume their queued path one cell per movement tick. Smooth
/// interpolation between cells belongs to whatever renders the walker.

use bevy::prelude::*;
use super::types::{GridPosition, MoveTick, WalkPath};

pub fn follow_path(
    mut commands: Commands,
    mut tick: ResMut<MoveTick>,
    mut walkers: Query<(Entity, &mut GridPosition, &mut WalkPath)>,
) {
    tick.0 += 1;
    crate::profile_log!(tick, "[WALK] tick {}: {} walkers on a path", tick.0, walkers.iter().count());

    for (entity, mut position, mut path) in walkers.iter_mut() {
        if let Some(next) = path.0.pop_front() {
            position.0 = next;
        }
        if path.0.is_empty() {
            commands.entity(entity).remove::<WalkPath>();
        }
    }
}
