//! Vessel/terrain collision: push-out, overlap damage and damping.

use glam::DVec2;
use hecs::World;

use broadside_core::components::Vessel;
use broadside_core::constants::{TERRAIN_COLLISION_DAMPING, TERRAIN_DAMAGE_PER_OVERLAP, WORLD_H, WORLD_W};
use broadside_core::types::{Position, Velocity};

use crate::world_setup::{self, Obstacle};

/// Resolve every vessel against every island.
///
/// Overlapping islands are handled independently in one pass: push-out and
/// damage accumulate, with no iterative relaxation. Returns contact count.
pub fn run(world: &mut World) -> usize {
    let islands = world_setup::terrain(world);
    let mut contacts = 0;

    for (_entity, (pos, vel, vessel)) in world.query_mut::<(&mut Position, &mut Velocity, &mut Vessel)>() {
        for island in &islands {
            if resolve_contact(pos, vel, vessel, island) {
                contacts += 1;
            }
        }
        pos.clamp_to_world(WORLD_W, WORLD_H, vessel.collision_r);
    }
    contacts
}

fn resolve_contact(pos: &mut Position, vel: &mut Velocity, vessel: &mut Vessel, island: &Obstacle) -> bool {
    let combined = island.radius + vessel.collision_r;
    let offset = pos.as_vec() - island.position.as_vec();
    let distance = offset.length();
    if distance >= combined {
        return false;
    }

    let overlap = combined - distance;
    let normal = offset.try_normalize().unwrap_or(DVec2::X);
    *pos = Position::from_vec(pos.as_vec() + normal * overlap);
    vessel.health = (vessel.health - TERRAIN_DAMAGE_PER_OVERLAP * overlap).clamp(0.0, vessel.max_health);
    *vel = Velocity::from_vec(vel.as_vec() * TERRAIN_COLLISION_DAMPING);
    true
}
