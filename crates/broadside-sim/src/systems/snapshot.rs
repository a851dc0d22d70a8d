//! Snapshot system: builds one filtered world view per connected player.
//!
//! This system is read-only. Bots, escorts, pickups and islands come from the
//! spatial grid's 3x3 neighborhood around the viewer; other players and
//! projectiles use an axis-aligned margin; the minimap and leaderboard are
//! shared unfiltered by every viewer.

use std::collections::{BTreeMap, BTreeSet};

use hecs::{Entity, World};

use broadside_core::components::*;
use broadside_core::constants::VIEW_MARGIN;
use broadside_core::enums::EntityKind;
use broadside_core::events::{Outbound, ServerMessage};
use broadside_core::state::*;
use broadside_core::types::{PlayerId, Position, SimTime, Velocity};

use crate::progression::exp_needed;
use crate::spatial::SpatialGrid;
use crate::systems::leaderboard;

/// Read-only inputs shared by every viewer this tick.
pub struct SnapshotContext<'a> {
    pub world: &'a World,
    pub grid: &'a SpatialGrid,
    pub time: SimTime,
    pub leaderboard: &'a [LeaderboardEntry],
    pub initial_bot_count: usize,
}

/// Build a `worldSnapshot` message for each player, in player id order.
pub fn publish(ctx: &SnapshotContext<'_>, players: &BTreeMap<PlayerId, Entity>) -> Vec<Outbound> {
    let escort_owners = live_escort_owners(ctx.world);
    let minimap = build_minimap(ctx.world);

    players
        .iter()
        .filter_map(|(id, entity)| {
            let you = vessel_view(ctx.world, *entity, &escort_owners)?;
            let snapshot = build_view(ctx, *id, *entity, you, &escort_owners, minimap.clone());
            Some(Outbound {
                to: *id,
                message: ServerMessage::WorldSnapshot(Box::new(snapshot)),
            })
        })
        .collect()
}

fn build_view(
    ctx: &SnapshotContext<'_>,
    viewer: PlayerId,
    viewer_entity: Entity,
    you: VesselView,
    escort_owners: &BTreeSet<PlayerId>,
    minimap: Vec<MinimapMarker>,
) -> WorldSnapshot {
    let origin = you.position;
    let nearby = |kind| ctx.grid.query_neighborhood(origin, Some(kind));

    let bots = nearby(EntityKind::Bot)
        .iter()
        .filter_map(|e| vessel_view(ctx.world, e.entity, escort_owners))
        .collect();
    let escorts = nearby(EntityKind::Escort)
        .iter()
        .filter_map(|e| vessel_view(ctx.world, e.entity, escort_owners))
        .collect();
    let pickups = nearby(EntityKind::Pickup)
        .iter()
        .filter_map(|e| pickup_view(ctx.world, e.entity))
        .collect();
    let islands = nearby(EntityKind::Island)
        .iter()
        .filter_map(|e| island_view(ctx.world, e.entity))
        .collect();

    let players = ctx
        .world
        .query::<(&Position, &Role)>()
        .iter()
        .filter(|(entity, (pos, role))| {
            *entity != viewer_entity
                && matches!(role, Role::Player(_))
                && pos.within_box(&origin, VIEW_MARGIN)
        })
        .filter_map(|(entity, _)| vessel_view(ctx.world, entity, escort_owners))
        .collect();

    let projectiles = ctx
        .world
        .query::<(&Position, &Velocity, &Projectile)>()
        .iter()
        .filter(|(_, (pos, _, _))| pos.within_box(&origin, VIEW_MARGIN))
        .map(|(_, (pos, vel, p))| ProjectileView {
            position: *pos,
            velocity: *vel,
            radius: p.radius,
            owner_class: p.owner_class,
            owner: p.owner,
        })
        .collect();

    WorldSnapshot {
        time: ctx.time,
        you,
        players,
        bots,
        escorts,
        pickups,
        islands,
        projectiles,
        leaderboard: ctx.leaderboard.to_vec(),
        own_rank: leaderboard::own_rank(ctx.leaderboard, viewer),
        minimap,
        initial_bot_count: ctx.initial_bot_count,
    }
}

fn live_escort_owners(world: &World) -> BTreeSet<PlayerId> {
    world
        .query::<(&Vessel, &Role)>()
        .iter()
        .filter(|(_, (vessel, _))| vessel.health > 0.0)
        .filter_map(|(_, (_, role))| role.escort_owner())
        .collect()
}

fn vessel_view(world: &World, entity: Entity, escort_owners: &BTreeSet<PlayerId>) -> Option<VesselView> {
    let mut query = world
        .query_one::<(&Position, &Velocity, &Vessel, &Role)>(entity)
        .ok()?;
    let (pos, vel, vessel, role) = query.get()?;

    let player = role.as_player().map(|p| PlayerView {
        id: p.id,
        display_name: p.display_name.clone(),
        level: p.level,
        exp: p.exp,
        exp_needed: exp_needed(p.level),
        upgrade_points: p.upgrade_points,
        score: p.score,
        eliminations: p.eliminations,
        multishot_count: p.multishot_count,
        fire_rate_multiplier: vessel.fire_rate_multiplier,
        reload: vessel.reload,
        has_escort: escort_owners.contains(&p.id),
    });

    Some(VesselView {
        entity_id: entity.to_bits().get(),
        position: *pos,
        velocity: *vel,
        heading: vessel.heading,
        health: vessel.health,
        max_health: vessel.max_health,
        collision_r: vessel.collision_r,
        size: vessel.size,
        player,
        owner: role.escort_owner(),
    })
}

fn pickup_view(world: &World, entity: Entity) -> Option<PickupView> {
    let mut query = world.query_one::<(&Position, &Pickup)>(entity).ok()?;
    let (pos, pickup) = query.get()?;
    Some(PickupView {
        position: *pos,
        kind: pickup.kind,
        points: pickup.points,
        radius: pickup.radius,
    })
}

fn island_view(world: &World, entity: Entity) -> Option<IslandView> {
    let mut query = world.query_one::<(&Position, &Island)>(entity).ok()?;
    let (pos, island) = query.get()?;
    Some(IslandView {
        position: *pos,
        radius: island.radius,
        color: island.color.clone(),
    })
}

/// Every entity in the world, unfiltered.
fn build_minimap(world: &World) -> Vec<MinimapMarker> {
    let marker = |kind, pos: &Position| MinimapMarker {
        kind,
        x: pos.x,
        y: pos.y,
    };

    let mut markers: Vec<MinimapMarker> = world
        .query::<(&Position, &Role)>()
        .iter()
        .map(|(_, (pos, role))| marker(role.kind(), pos))
        .collect();
    markers.extend(
        world
            .query::<(&Position, &Pickup)>()
            .iter()
            .map(|(_, (pos, _))| marker(EntityKind::Pickup, pos)),
    );
    markers.extend(
        world
            .query::<(&Position, &Island)>()
            .iter()
            .map(|(_, (pos, _))| marker(EntityKind::Island, pos)),
    );
    markers.extend(
        world
            .query::<(&Position, &Projectile)>()
            .iter()
            .map(|(_, (pos, _))| marker(EntityKind::Projectile, pos)),
    );
    markers
}
