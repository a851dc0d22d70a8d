//! Entity spawn factories for setting up the simulation world.
//!
//! Creates islands, vessels, pickups and projectiles with the component
//! bundles the systems query for, and generates a fresh match layout.

use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use broadside_ai::profiles::{get_profile, ProfileKind};
use broadside_core::components::*;
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::types::{PlayerId, Position, Velocity};

use crate::engine::SimConfig;

/// A circular terrain obstacle used for spawn rejection sampling.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub position: Position,
    pub radius: f64,
}

/// Layout of a freshly generated match.
#[derive(Debug, Clone, Copy)]
pub struct MatchLayout {
    pub islands: usize,
    pub bots: usize,
}

/// Populate an empty world with islands and bots.
pub fn generate_match(world: &mut World, rng: &mut ChaCha8Rng, config: &SimConfig) -> MatchLayout {
    let island_count = sample_count(rng, config.island_count_min, config.island_count_max);
    let bot_count = sample_count(rng, config.bot_count_min, config.bot_count_max);

    let mut obstacles = Vec::with_capacity(island_count);
    for _ in 0..island_count {
        let position = find_clear_position(&obstacles, ISLAND_CLEARANCE, rng).unwrap_or_else(world_centre);
        let radius = rng.gen_range(ISLAND_RADIUS_MIN..ISLAND_RADIUS_MAX);
        spawn_island(world, position, radius);
        obstacles.push(Obstacle { position, radius });
    }

    for _ in 0..bot_count {
        let position = find_clear_position(&obstacles, VESSEL_SPAWN_CLEARANCE, rng).unwrap_or_else(world_centre);
        spawn_bot(world, rng, position);
    }

    MatchLayout {
        islands: island_count,
        bots: bot_count,
    }
}

/// Inclusive count range; a reversed range collapses to its lower bound.
fn sample_count(rng: &mut ChaCha8Rng, min: usize, max: usize) -> usize {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

pub fn world_centre() -> Position {
    Position::new(WORLD_W / 2.0, WORLD_H / 2.0)
}

/// Every island in the world as a spawn obstacle.
pub fn terrain(world: &World) -> Vec<Obstacle> {
    world
        .query::<(&Position, &Island)>()
        .iter()
        .map(|(_, (pos, island))| Obstacle {
            position: *pos,
            radius: island.radius,
        })
        .collect()
}

/// Rejection-sample a point at least `clearance` beyond every island's edge.
///
/// Returns `None` after `SPAWN_ATTEMPTS` failed samples.
pub fn find_clear_position(obstacles: &[Obstacle], clearance: f64, rng: &mut ChaCha8Rng) -> Option<Position> {
    (0..SPAWN_ATTEMPTS).find_map(|_| {
        let p = Position::new(
            rng.gen_range(SPAWN_EDGE_MARGIN..WORLD_W - SPAWN_EDGE_MARGIN),
            rng.gen_range(SPAWN_EDGE_MARGIN..WORLD_H - SPAWN_EDGE_MARGIN),
        );
        obstacles
            .iter()
            .all(|o| p.distance_to(&o.position) >= o.radius + clearance)
            .then_some(p)
    })
}

pub fn spawn_island(world: &mut World, position: Position, radius: f64) -> Entity {
    world.spawn((
        position,
        Island {
            radius,
            color: ISLAND_COLOR.to_string(),
        },
    ))
}

/// Base vessel stats for a role, facing a random direction.
fn new_vessel(kind: ProfileKind, rng: &mut ChaCha8Rng) -> Vessel {
    let profile = get_profile(kind);
    Vessel {
        heading: rng.gen_range(0.0..TAU),
        collision_r: VESSEL_COLLISION_RADIUS,
        size: VESSEL_SIZE,
        health: VESSEL_MAX_HEALTH,
        max_health: VESSEL_MAX_HEALTH,
        reload: 0.0,
        reload_time_base: profile.reload_time,
        fire_rate_multiplier: 1.0,
        thrust: profile.thrust,
        turn_speed: profile.turn_speed,
    }
}

pub fn spawn_player(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    id: PlayerId,
    display_name: String,
    position: Position,
) -> Entity {
    let state = PlayerState {
        id,
        display_name,
        level: 1,
        ..Default::default()
    };
    world.spawn((
        position,
        Velocity::default(),
        new_vessel(ProfileKind::Player, rng),
        Helm::default(),
        Role::Player(state),
    ))
}

pub fn spawn_bot(world: &mut World, rng: &mut ChaCha8Rng, position: Position) -> Entity {
    world.spawn((
        position,
        Velocity::default(),
        new_vessel(ProfileKind::Bot, rng),
        Helm::default(),
        Role::Bot(BotState::default()),
    ))
}

pub fn spawn_escort(world: &mut World, rng: &mut ChaCha8Rng, owner: PlayerId, position: Position) -> Entity {
    world.spawn((
        position,
        Velocity::default(),
        new_vessel(ProfileKind::Escort, rng),
        Helm::default(),
        Role::Escort(EscortState {
            owner,
            roam: RoamState::default(),
        }),
    ))
}

pub fn spawn_pickup(world: &mut World, kind: PickupKind, points: u32, position: Position) -> Entity {
    world.spawn((
        position,
        Pickup {
            kind,
            points,
            radius: PICKUP_RADIUS,
        },
    ))
}

/// Spawn a projectile travelling along `angle` at projectile speed.
pub fn spawn_projectile(
    world: &mut World,
    position: Position,
    angle: f64,
    owner: Option<PlayerId>,
    owner_class: OwnerClass,
) -> Entity {
    world.spawn((
        position,
        Velocity::from_heading(angle, PROJECTILE_SPEED),
        Projectile {
            radius: PROJECTILE_RADIUS,
            life: PROJECTILE_LIFE,
            damage: PROJECTILE_DAMAGE,
            owner,
            owner_class,
        },
    ))
}

/// Scatter experience pickups around a sunk player vessel.
pub fn spawn_death_drop(world: &mut World, rng: &mut ChaCha8Rng, wreck: Position) {
    for _ in 0..DEATH_DROP_COUNT {
        let mut p = Position::new(
            wreck.x + rng.gen_range(-DEATH_DROP_SCATTER..=DEATH_DROP_SCATTER),
            wreck.y + rng.gen_range(-DEATH_DROP_SCATTER..=DEATH_DROP_SCATTER),
        );
        p.clamp_to_world(WORLD_W, WORLD_H, PICKUP_RADIUS);
        spawn_pickup(world, PickupKind::Experience, DEATH_DROP_POINTS, p);
    }
}
