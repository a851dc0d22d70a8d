//! Pickup population upkeep and collection.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use broadside_core::components::{Pickup, Role, Vessel};
use broadside_core::constants::*;
use broadside_core::enums::PickupKind;
use broadside_core::types::Position;

use crate::progression;
use crate::world_setup::{self, world_centre};

/// Population targets for the economy phase.
#[derive(Debug, Clone, Copy)]
pub struct PickupTargets {
    pub experience: usize,
    pub health: usize,
}

/// Counts for one economy phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyReport {
    pub spawned: usize,
    pub collected: usize,
    pub levels_gained: u32,
}

pub fn run(world: &mut World, rng: &mut ChaCha8Rng, targets: PickupTargets) -> EconomyReport {
    let spawned = replenish(world, rng, targets);
    let (collected, levels_gained) = collect(world);
    EconomyReport {
        spawned,
        collected,
        levels_gained,
    }
}

/// Top up each pickup kind to its target count.
pub fn replenish(world: &mut World, rng: &mut ChaCha8Rng, targets: PickupTargets) -> usize {
    let (mut experience, mut health) = (0, 0);
    for (_entity, pickup) in world.query::<&Pickup>().iter() {
        match pickup.kind {
            PickupKind::Experience => experience += 1,
            PickupKind::Health => health += 1,
        }
    }

    let experience_short = targets.experience.saturating_sub(experience);
    let health_short = targets.health.saturating_sub(health);
    if experience_short + health_short == 0 {
        return 0;
    }

    let islands = world_setup::terrain(world);
    for _ in 0..experience_short {
        let position = world_setup::find_clear_position(&islands, PICKUP_SPAWN_CLEARANCE, rng)
            .unwrap_or_else(world_centre);
        let points = rng.gen_range(EXPERIENCE_PICKUP_POINTS_MIN..=EXPERIENCE_PICKUP_POINTS_MAX);
        world_setup::spawn_pickup(world, PickupKind::Experience, points, position);
    }
    for _ in 0..health_short {
        let position = world_setup::find_clear_position(&islands, PICKUP_SPAWN_CLEARANCE, rng)
            .unwrap_or_else(world_centre);
        world_setup::spawn_pickup(world, PickupKind::Health, 0, position);
    }
    experience_short + health_short
}

/// Apply every pickup a player overlaps, then remove the collected pickups.
///
/// Returns `(pickups collected, levels gained)`.
pub fn collect(world: &mut World) -> (usize, u32) {
    let pickups: Vec<(Entity, Position, Pickup)> = world
        .query::<(&Position, &Pickup)>()
        .iter()
        .map(|(e, (pos, pickup))| (e, *pos, pickup.clone()))
        .collect();
    if pickups.is_empty() {
        return (0, 0);
    }

    let mut taken: Vec<Entity> = Vec::new();
    let mut levels = 0;
    for (_entity, (pos, vessel, role)) in world.query_mut::<(&Position, &mut Vessel, &mut Role)>() {
        let Role::Player(player) = role else {
            continue;
        };
        // Sunk players are evicted this tick; they collect nothing.
        if vessel.health <= 0.0 {
            continue;
        }
        for (pickup_entity, pickup_pos, pickup) in &pickups {
            if taken.contains(pickup_entity) {
                continue;
            }
            if pos.distance_sq_to(pickup_pos) >= (pickup.radius + vessel.collision_r).powi(2) {
                continue;
            }
            match pickup.kind {
                PickupKind::Health => {
                    let heal = (vessel.max_health * HEALTH_PICKUP_FRACTION).round();
                    vessel.health = (vessel.health + heal).clamp(0.0, vessel.max_health);
                }
                PickupKind::Experience => {
                    player.score += EXPERIENCE_PICKUP_SCORE;
                    levels += progression::grant_experience(player, pickup.points);
                }
            }
            taken.push(*pickup_entity);
        }
    }

    for entity in &taken {
        let _ = world.despawn(*entity);
    }
    (taken.len(), levels)
}
