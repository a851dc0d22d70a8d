//! Projectile flight and damage resolution.
//!
//! Combat uses direct pairwise distance checks against every live vessel.
//! Spent projectiles are pushed to the despawn buffer; dead vessels stay in
//! the world at health 0 until cleanup or eviction removes them.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use broadside_core::components::{Projectile, Role, Vessel};
use broadside_core::constants::{BOT_KILL_SCORE, PLAYER_KILL_SCORE, WORLD_H, WORLD_W};
use broadside_core::enums::OwnerClass;
use broadside_core::types::{PlayerId, Position, Velocity};

use crate::world_setup;

/// What a projectile struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Bot,
    Player(PlayerId),
    Escort { owner: PlayerId },
}

#[derive(Debug, Clone, Copy)]
struct Target {
    entity: Entity,
    position: Position,
    radius: f64,
    kind: TargetKind,
}

/// Tallies for one combat phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub hits: usize,
    pub kills: usize,
}

/// Friendly-fire and faction rules for one projectile against one target.
fn can_hit(projectile: &Projectile, target: TargetKind) -> bool {
    match target {
        TargetKind::Bot => matches!(projectile.owner_class, OwnerClass::Player | OwnerClass::Escort),
        TargetKind::Player(id) => match projectile.owner_class {
            OwnerClass::Bot => true,
            OwnerClass::Player | OwnerClass::Escort => projectile.owner != Some(id),
        },
        TargetKind::Escort { owner } => projectile.owner != Some(owner),
    }
}

/// Advance every projectile one tick and apply hits.
pub fn run(
    world: &mut World,
    players: &BTreeMap<PlayerId, Entity>,
    despawn_buffer: &mut Vec<Entity>,
) -> CombatReport {
    let mut in_flight: Vec<(Entity, Position, Projectile)> = Vec::new();
    for (entity, (pos, vel, projectile)) in world.query_mut::<(&mut Position, &Velocity, &mut Projectile)>() {
        pos.x += vel.x;
        pos.y += vel.y;
        projectile.life -= 1;
        if projectile.life <= 0 || !pos.in_bounds(WORLD_W, WORLD_H) {
            despawn_buffer.push(entity);
        } else {
            in_flight.push((entity, *pos, projectile.clone()));
        }
    }

    if in_flight.is_empty() {
        return CombatReport::default();
    }

    let islands = world_setup::terrain(world);
    let targets = collect_targets(world);
    let mut report = CombatReport::default();

    for (entity, pos, projectile) in in_flight {
        if islands
            .iter()
            .any(|isl| pos.distance_sq_to(&isl.position) < (isl.radius + projectile.radius).powi(2))
        {
            despawn_buffer.push(entity);
            continue;
        }

        for target in &targets {
            if !can_hit(&projectile, target.kind) {
                continue;
            }
            if pos.distance_sq_to(&target.position) >= (target.radius + projectile.radius).powi(2) {
                continue;
            }
            let Ok(mut vessel) = world.get::<&mut Vessel>(target.entity) else {
                continue;
            };
            if vessel.health <= 0.0 {
                continue;
            }

            vessel.health = (vessel.health - projectile.damage).clamp(0.0, vessel.max_health);
            let killed = vessel.health <= 0.0;
            drop(vessel);

            report.hits += 1;
            despawn_buffer.push(entity);
            if killed {
                report.kills += 1;
                credit_kill(world, players, &projectile, target.kind);
            }
            break;
        }
    }

    report
}

/// Live vessels in hit-test order: bots, then players, then escorts.
fn collect_targets(world: &World) -> Vec<Target> {
    let mut targets: Vec<Target> = world
        .query::<(&Position, &Vessel, &Role)>()
        .iter()
        .filter(|(_, (_, vessel, _))| vessel.health > 0.0)
        .map(|(entity, (pos, vessel, role))| Target {
            entity,
            position: *pos,
            radius: vessel.collision_r,
            kind: match role {
                Role::Bot(_) => TargetKind::Bot,
                Role::Player(p) => TargetKind::Player(p.id),
                Role::Escort(e) => TargetKind::Escort { owner: e.owner },
            },
        })
        .collect();
    targets.sort_by_key(|t| match t.kind {
        TargetKind::Bot => 0,
        TargetKind::Player(_) => 1,
        TargetKind::Escort { .. } => 2,
    });
    targets
}

/// Bots and players score for the shooter; escort wrecks score nothing.
fn credit_kill(
    world: &mut World,
    players: &BTreeMap<PlayerId, Entity>,
    projectile: &Projectile,
    victim: TargetKind,
) {
    let reward = match victim {
        TargetKind::Bot => BOT_KILL_SCORE,
        TargetKind::Player(_) => PLAYER_KILL_SCORE,
        TargetKind::Escort { .. } => return,
    };
    let Some(shooter) = projectile.owner.and_then(|id| players.get(&id)) else {
        return;
    };
    if let Ok(mut role) = world.get::<&mut Role>(*shooter) {
        if let Some(player) = role.as_player_mut() {
            player.score += reward;
            player.eliminations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use broadside_core::constants::{PROJECTILE_DAMAGE, VESSEL_MAX_HEALTH};

    use super::*;

    fn projectile(owner: Option<u64>, owner_class: OwnerClass) -> Projectile {
        Projectile {
            radius: 5.0,
            life: 10,
            damage: 20.0,
            owner: owner.map(PlayerId),
            owner_class,
        }
    }

    #[test]
    fn bots_only_hit_by_players_and_escorts() {
        assert!(can_hit(&projectile(Some(1), OwnerClass::Player), TargetKind::Bot));
        assert!(can_hit(&projectile(Some(1), OwnerClass::Escort), TargetKind::Bot));
        assert!(!can_hit(&projectile(None, OwnerClass::Bot), TargetKind::Bot));
    }

    #[test]
    fn players_never_hit_themselves() {
        let own = projectile(Some(1), OwnerClass::Player);
        assert!(!can_hit(&own, TargetKind::Player(PlayerId(1))));
        assert!(can_hit(&own, TargetKind::Player(PlayerId(2))));
        let escort_fire = projectile(Some(1), OwnerClass::Escort);
        assert!(!can_hit(&escort_fire, TargetKind::Player(PlayerId(1))));
        assert!(can_hit(&projectile(None, OwnerClass::Bot), TargetKind::Player(PlayerId(1))));
    }

    #[test]
    fn escorts_ignore_their_owners_fire() {
        let owner = PlayerId(1);
        assert!(!can_hit(&projectile(Some(1), OwnerClass::Player), TargetKind::Escort { owner }));
        assert!(!can_hit(&projectile(Some(1), OwnerClass::Escort), TargetKind::Escort { owner }));
        assert!(can_hit(&projectile(Some(2), OwnerClass::Player), TargetKind::Escort { owner }));
        assert!(can_hit(&projectile(None, OwnerClass::Bot), TargetKind::Escort { owner }));
    }

    #[test]
    fn projectile_stops_at_first_target() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let a = world_setup::spawn_bot(&mut world, &mut rng, Position::new(3000.0, 3000.0));
        let b = world_setup::spawn_bot(&mut world, &mut rng, Position::new(3004.0, 3000.0));
        let shot = world_setup::spawn_projectile(
            &mut world,
            Position::new(2994.0, 3000.0),
            0.0,
            Some(PlayerId(1)),
            OwnerClass::Player,
        );

        let mut despawn = Vec::new();
        let report = run(&mut world, &BTreeMap::new(), &mut despawn);

        assert_eq!(report.hits, 1);
        assert_eq!(despawn, vec![shot]);
        let mut healths = [a, b].map(|e| world.get::<&Vessel>(e).unwrap().health);
        healths.sort_by(f64::total_cmp);
        assert_eq!(healths, [VESSEL_MAX_HEALTH - PROJECTILE_DAMAGE, VESSEL_MAX_HEALTH]);
    }
}
