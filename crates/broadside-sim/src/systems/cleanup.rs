//! Cleanup system: removes spent projectiles and sunk autonomous vessels.

use hecs::{Entity, World};

use broadside_core::components::{Role, Vessel};

/// Despawn everything queued in `despawn_buffer` plus every bot or escort at
/// zero health. Player vessels are left for eviction. Returns the count.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) -> usize {
    for (entity, (vessel, role)) in world.query_mut::<(&Vessel, &Role)>() {
        if vessel.health <= 0.0 && !matches!(role, Role::Player(_)) {
            despawn_buffer.push(entity);
        }
    }

    let mut removed = 0;
    for entity in despawn_buffer.drain(..) {
        if world.despawn(entity).is_ok() {
            removed += 1;
        }
    }
    removed
}
