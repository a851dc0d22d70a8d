//! Tests for the simulation engine: lifecycle, combat, progression and snapshots.

use std::f64::consts::FRAC_PI_2;

use hecs::Entity;

use broadside_core::commands::{ClientMessage, MoveInput, SessionEvent};
use broadside_core::components::{Pickup, PlayerState, Projectile, Role, Vessel};
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::events::{Outbound, ServerMessage};
use broadside_core::types::{PlayerId, Position, Velocity};

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup;

const P1: PlayerId = PlayerId(1);
const P2: PlayerId = PlayerId(2);

/// No islands, bots or pickups: every test places exactly what it needs.
fn empty_config() -> SimConfig {
    SimConfig {
        seed: 7,
        experience_pickup_target: 0,
        health_pickup_target: 0,
        bot_count_min: 0,
        bot_count_max: 0,
        island_count_min: 0,
        island_count_max: 0,
        ..Default::default()
    }
}

fn small_config(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        experience_pickup_target: 60,
        health_pickup_target: 10,
        ..Default::default()
    }
}

fn empty_engine_with(ids: &[PlayerId]) -> SimulationEngine {
    let mut engine = SimulationEngine::new(empty_config());
    for id in ids {
        engine.join(*id, format!("captain-{}", id.0));
    }
    engine
}

fn entity(engine: &SimulationEngine, id: PlayerId) -> Entity {
    engine.player_entity(id).expect("player registered")
}

fn place(engine: &mut SimulationEngine, id: PlayerId, pos: Position, heading: f64) {
    let e = entity(engine, id);
    let world = engine.world_mut();
    *world.get::<&mut Position>(e).unwrap() = pos;
    *world.get::<&mut Velocity>(e).unwrap() = Velocity::default();
    world.get::<&mut Vessel>(e).unwrap().heading = heading;
}

fn with_player<R>(engine: &mut SimulationEngine, id: PlayerId, f: impl FnOnce(&mut Vessel, &mut PlayerState) -> R) -> R {
    let e = entity(engine, id);
    let (vessel, role) = engine
        .world_mut()
        .query_one_mut::<(&mut Vessel, &mut Role)>(e)
        .unwrap();
    f(vessel, role.as_player_mut().unwrap())
}

fn player(engine: &SimulationEngine, id: PlayerId) -> PlayerState {
    let e = entity(engine, id);
    engine.world().get::<&Role>(e).unwrap().as_player().unwrap().clone()
}

fn vessel(engine: &SimulationEngine, e: Entity) -> Vessel {
    (*engine.world().get::<&Vessel>(e).unwrap()).clone()
}

fn projectile_count(engine: &SimulationEngine) -> usize {
    engine.world().query::<&Projectile>().iter().count()
}

fn escorts_of(engine: &SimulationEngine, owner: PlayerId) -> usize {
    engine
        .world()
        .query::<&Role>()
        .iter()
        .filter(|(_, r)| r.escort_owner() == Some(owner))
        .count()
}

fn match_overs(out: &[Outbound]) -> Vec<PlayerId> {
    out.iter()
        .filter(|o| matches!(o.message, ServerMessage::MatchOver { .. }))
        .map(|o| o.to)
        .collect()
}

// ---- Lifecycle ----

#[test]
fn test_inactive_until_first_join() {
    let mut engine = SimulationEngine::new(small_config(1));
    assert!(!engine.is_active());
    assert!(engine.tick().is_empty());
    assert_eq!(engine.time().tick, 0, "inactive ticks do not advance time");

    engine.queue_message(
        P1,
        ClientMessage::Join {
            display_name: "ahab".into(),
        },
    );
    let out = engine.tick();
    assert!(engine.is_active());
    assert!((BOT_COUNT_MIN..=BOT_COUNT_MAX).contains(&engine.initial_bot_count()));
    assert!(matches!(out[0].message, ServerMessage::WorldSnapshot(_)));
    assert_eq!(out[0].to, P1);
}

#[test]
fn test_disconnect_of_last_player_deactivates() {
    let mut engine = SimulationEngine::new(small_config(2));
    engine.join(P1, "ahab".into());
    engine.tick();
    engine.queue_event(P1, SessionEvent::Disconnected);
    assert!(engine.tick().is_empty());
    assert!(!engine.is_active());
    assert!(engine.player_ids().is_empty());
}

#[test]
fn test_rejoin_after_empty_regenerates_world() {
    let mut engine = SimulationEngine::new(small_config(3));
    engine.join(P1, "ahab".into());
    let first = engine.world().query::<&broadside_core::components::Island>().iter().count();
    engine.disconnect(P1);
    engine.join(P2, "queequeg".into());
    let second = engine.world().query::<&broadside_core::components::Island>().iter().count();
    assert!((ISLAND_COUNT_MIN..=ISLAND_COUNT_MAX).contains(&first));
    assert!((ISLAND_COUNT_MIN..=ISLAND_COUNT_MAX).contains(&second));
    assert_eq!(engine.player_ids(), vec![P2]);
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_second_join_keeps_world() {
    let mut engine = SimulationEngine::new(small_config(4));
    engine.join(P1, "ahab".into());
    let bots = engine.initial_bot_count();
    let islands = engine.world().query::<&broadside_core::components::Island>().iter().count();
    engine.join(P2, "queequeg".into());
    engine.join(P2, "duplicate".into());
    assert_eq!(engine.initial_bot_count(), bots);
    assert_eq!(
        engine.world().query::<&broadside_core::components::Island>().iter().count(),
        islands
    );
    assert_eq!(engine.player_ids(), vec![P1, P2]);
    assert_eq!(player(&engine, P2).display_name, "queequeg");
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut a = SimulationEngine::new(small_config(12345));
    let mut b = SimulationEngine::new(small_config(12345));
    for engine in [&mut a, &mut b] {
        engine.join(P1, "ahab".into());
        engine.join(P2, "queequeg".into());
    }

    for i in 0..200 {
        for engine in [&mut a, &mut b] {
            engine.queue_message(
                P1,
                ClientMessage::Move(MoveInput {
                    move_dir: MoveDir::Forward,
                    angle: i as f64 * 0.01,
                }),
            );
            engine.queue_message(P2, ClientMessage::Fire);
        }
        let out_a = serde_json::to_string(&a.tick()).unwrap();
        let out_b = serde_json::to_string(&b.tick()).unwrap();
        assert_eq!(out_a, out_b, "outputs diverged at tick {i}");
    }
}

// ---- Invariants ----

#[test]
fn test_vessel_invariants_hold_every_tick() {
    let mut engine = SimulationEngine::new(small_config(99));
    engine.join(P1, "ahab".into());
    engine.join(P2, "queequeg".into());

    for i in 0..400 {
        engine.queue_message(
            P1,
            ClientMessage::Move(MoveInput {
                move_dir: MoveDir::Forward,
                angle: (i / 40) as f64,
            }),
        );
        engine.queue_message(P1, ClientMessage::Fire);
        engine.queue_message(
            P2,
            ClientMessage::Move(MoveInput {
                move_dir: MoveDir::Backward,
                angle: 1.0,
            }),
        );
        engine.tick_scaled(if i % 3 == 0 { 5.0 } else { 1.0 });

        for (_, (pos, v)) in engine.world().query::<(&Position, &Vessel)>().iter() {
            assert!(v.health >= 0.0 && v.health <= v.max_health, "health out of range: {}", v.health);
            assert!(v.reload >= 0.0);
            assert!(pos.x >= v.collision_r && pos.x <= WORLD_W - v.collision_r, "x out of bounds: {}", pos.x);
            assert!(pos.y >= v.collision_r && pos.y <= WORLD_H - v.collision_r, "y out of bounds: {}", pos.y);
        }
    }
}

// ---- Projectiles ----

#[test]
fn test_projectile_life_counts_down_and_expires() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    engine.fire(P1);

    engine.tick();
    let life: Vec<i32> = engine.world().query::<&Projectile>().iter().map(|(_, p)| p.life).collect();
    assert_eq!(life, vec![PROJECTILE_LIFE - 1]);

    for (_, p) in engine.world_mut().query_mut::<&mut Projectile>() {
        p.life = 2;
    }
    engine.tick();
    assert_eq!(projectile_count(&engine), 1, "life 1 survives");
    engine.tick();
    assert_eq!(projectile_count(&engine), 0, "gone once life reaches 0");
}

#[test]
fn test_projectile_removed_after_leaving_world() {
    let mut engine = empty_engine_with(&[P1]);
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(WORLD_W - 3.0, 100.0),
        0.0,
        Some(P1),
        OwnerClass::Player,
    );
    engine.tick();
    assert_eq!(projectile_count(&engine), 0);
}

#[test]
fn test_projectile_stopped_by_terrain_without_damage() {
    let mut engine = empty_engine_with(&[P1, P2]);
    // Hull just touching the island edge, so terrain does no damage.
    place(&mut engine, P2, Position::new(1076.0, 1000.0), 0.0);
    world_setup::spawn_island(engine.world_mut(), Position::new(1000.0, 1000.0), 60.0);
    // Overlaps both the island edge and the target hull after one step.
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(1050.0, 1000.0),
        0.0,
        Some(P1),
        OwnerClass::Player,
    );
    let p2 = entity(&engine, P2);
    engine.tick();
    assert_eq!(projectile_count(&engine), 0);
    assert_eq!(vessel(&engine, p2).health, VESSEL_MAX_HEALTH);
}

#[test]
fn test_fire_gated_by_reload() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    engine.queue_message(P1, ClientMessage::Fire);
    engine.queue_message(P1, ClientMessage::Fire);
    engine.tick();
    assert_eq!(projectile_count(&engine), 1);
    let reload = vessel(&engine, entity(&engine, P1)).reload;
    assert!((reload - (PLAYER_RELOAD_TIME - 1.0)).abs() < 1e-9, "one countdown step per tick, got {reload}");
}

#[test]
fn test_multishot_is_idempotent() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P1, |_, p| p.upgrade_points = 3);
    for _ in 0..3 {
        engine.upgrade(P1, UpgradeKind::Multishot);
    }
    assert_eq!(player(&engine, P1).multishot_count, 1);
    assert_eq!(player(&engine, P1).upgrade_points, 0);

    engine.fire(P1);
    assert_eq!(projectile_count(&engine), 3);
    let mut angles: Vec<f64> = engine
        .world()
        .query::<(&Velocity, &Projectile)>()
        .iter()
        .map(|(_, (v, _))| v.y.atan2(v.x))
        .collect();
    angles.sort_by(f64::total_cmp);
    assert!((angles[0] + MULTISHOT_SPREAD).abs() < 1e-9);
    assert!(angles[1].abs() < 1e-9);
    assert!((angles[2] - MULTISHOT_SPREAD).abs() < 1e-9);
}

// ---- Combat & scoring ----

#[test]
fn test_bot_kill_credits_shooter_and_wins_match() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(500.0, 500.0), 0.0);
    let bot = engine.spawn_test_bot(Position::new(3000.0, 3000.0));
    engine.world_mut().get::<&mut Vessel>(bot).unwrap().health = 10.0;
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(2980.0, 3000.0),
        0.0,
        Some(P1),
        OwnerClass::Player,
    );

    let out = engine.tick();

    assert!(!engine.world().contains(bot), "sunk bot removed the same tick");
    let p = player(&engine, P1);
    assert_eq!(p.score, BOT_KILL_SCORE);
    assert_eq!(p.eliminations, 1);
    assert_eq!(match_overs(&out), vec![P1]);
    assert!(matches!(out.last().unwrap().message, ServerMessage::MatchOver { status: MatchStatus::Win }));

    let out = engine.tick();
    assert!(match_overs(&out).is_empty(), "match over is sent once");
}

#[test]
fn test_player_kill_credits_200() {
    let mut engine = empty_engine_with(&[P1, P2]);
    place(&mut engine, P1, Position::new(500.0, 500.0), 0.0);
    place(&mut engine, P2, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P2, |v, _| v.health = 5.0);
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(2980.0, 3000.0),
        0.0,
        Some(P1),
        OwnerClass::Player,
    );

    let out = engine.tick();

    let p = player(&engine, P1);
    assert_eq!(p.score, PLAYER_KILL_SCORE);
    assert_eq!(p.eliminations, 1);
    assert!(engine.player_entity(P2).is_none(), "sunk player evicted");
    let eliminated: Vec<_> = out
        .iter()
        .filter(|o| matches!(o.message, ServerMessage::Eliminated))
        .map(|o| o.to)
        .collect();
    assert_eq!(eliminated, vec![P2]);
}

#[test]
fn test_own_projectiles_never_hit_self() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(2990.0, 3000.0),
        0.0,
        Some(P1),
        OwnerClass::Player,
    );
    engine.tick();
    assert_eq!(vessel(&engine, entity(&engine, P1)).health, VESSEL_MAX_HEALTH);
    assert_eq!(projectile_count(&engine), 1);
}

#[test]
fn test_escort_immune_to_owner_fire() {
    let mut engine = empty_engine_with(&[P1, P2]);
    place(&mut engine, P1, Position::new(500.0, 500.0), 0.0);
    place(&mut engine, P2, Position::new(5000.0, 5000.0), 0.0);
    let escort = engine.spawn_test_escort(P1, Position::new(3000.0, 3000.0));

    for class in [OwnerClass::Player, OwnerClass::Escort] {
        world_setup::spawn_projectile(engine.world_mut(), Position::new(2990.0, 3000.0), 0.0, Some(P1), class);
    }
    engine.tick();
    assert_eq!(vessel(&engine, escort).health, VESSEL_MAX_HEALTH);

    let at = position(&engine, escort);
    world_setup::spawn_projectile(
        engine.world_mut(),
        Position::new(at.x - 10.0, at.y),
        0.0,
        Some(P2),
        OwnerClass::Player,
    );
    engine.tick();
    assert_eq!(vessel(&engine, escort).health, VESSEL_MAX_HEALTH - PROJECTILE_DAMAGE);
}

#[test]
fn test_bot_fire_hurts_players_not_bots() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    let bot = engine.spawn_test_bot(Position::new(1000.0, 1000.0));
    world_setup::spawn_projectile(engine.world_mut(), Position::new(990.0, 1000.0), 0.0, None, OwnerClass::Bot);
    world_setup::spawn_projectile(engine.world_mut(), Position::new(2990.0, 3000.0), 0.0, None, OwnerClass::Bot);
    engine.tick();
    assert_eq!(vessel(&engine, bot).health, VESSEL_MAX_HEALTH);
    assert_eq!(vessel(&engine, entity(&engine, P1)).health, VESSEL_MAX_HEALTH - PROJECTILE_DAMAGE);
    assert_eq!(player(&engine, P1).score, 0);
}

// ---- Progression & economy ----

#[test]
fn test_experience_pickup_levels_up() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P1, |_, p| p.exp = 9);
    world_setup::spawn_pickup(engine.world_mut(), PickupKind::Experience, 5, Position::new(3005.0, 3000.0));

    engine.tick();

    let p = player(&engine, P1);
    assert_eq!((p.level, p.exp, p.upgrade_points), (2, 4, 1));
    assert_eq!(p.score, EXPERIENCE_PICKUP_SCORE);
    assert_eq!(engine.world().query::<&Pickup>().iter().count(), 0, "collected pickup removed");
}

#[test]
fn test_large_experience_pickup_levels_twice() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    world_setup::spawn_pickup(engine.world_mut(), PickupKind::Experience, 35, Position::new(3000.0, 3005.0));
    engine.tick();
    let p = player(&engine, P1);
    assert_eq!((p.level, p.exp, p.upgrade_points), (3, 5, 2));
}

#[test]
fn test_health_pickup_heals_fraction_clamped() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P1, |v, _| v.health = 50.0);
    world_setup::spawn_pickup(engine.world_mut(), PickupKind::Health, 0, Position::new(3000.0, 3000.0));
    world_setup::spawn_pickup(engine.world_mut(), PickupKind::Health, 0, Position::new(3001.0, 3000.0));
    engine.tick();
    // 50 + 30 + 30 clamps at max.
    assert_eq!(vessel(&engine, entity(&engine, P1)).health, VESSEL_MAX_HEALTH);
}

#[test]
fn test_pickups_replenished_to_targets() {
    let mut engine = SimulationEngine::new(SimConfig {
        experience_pickup_target: 25,
        health_pickup_target: 5,
        ..empty_config()
    });
    engine.join(P1, "ahab".into());
    engine.tick();
    let counts = engine
        .world()
        .query::<&Pickup>()
        .iter()
        .fold((0, 0), |(xp, hp), (_, p)| match p.kind {
            PickupKind::Experience => (xp + 1, hp),
            PickupKind::Health => (xp, hp + 1),
        });
    // A pickup spawned under the player may already be collected.
    assert!(counts.0 >= 24 && counts.0 <= 25, "experience: {}", counts.0);
    assert!(counts.1 >= 4 && counts.1 <= 5, "health: {}", counts.1);
}

#[test]
fn test_upgrade_without_points_is_ignored() {
    let mut engine = empty_engine_with(&[P1]);
    engine.upgrade(P1, UpgradeKind::Health);
    assert_eq!(vessel(&engine, entity(&engine, P1)).max_health, VESSEL_MAX_HEALTH);
}

#[test]
fn test_health_upgrade_raises_max_and_heals() {
    let mut engine = empty_engine_with(&[P1]);
    with_player(&mut engine, P1, |v, p| {
        v.health = 70.0;
        p.upgrade_points = 1;
    });
    engine.upgrade(P1, UpgradeKind::Health);
    let v = vessel(&engine, entity(&engine, P1));
    assert_eq!(v.max_health, VESSEL_MAX_HEALTH + HEALTH_UPGRADE_AMOUNT);
    assert_eq!(v.health, 120.0);
}

#[test]
fn test_speedyfire_compounds_reload() {
    let mut engine = empty_engine_with(&[P1]);
    with_player(&mut engine, P1, |_, p| p.upgrade_points = 2);
    engine.upgrade(P1, UpgradeKind::Speedyfire);
    engine.upgrade(P1, UpgradeKind::Speedyfire);
    engine.fire(P1);
    let v = vessel(&engine, entity(&engine, P1));
    let expected = PLAYER_RELOAD_TIME * 0.9 * 0.9 / (1.2 * 1.2);
    assert!((v.reload - expected).abs() < 1e-9, "reload {}", v.reload);
}

#[test]
fn test_escort_gated_by_level() {
    let mut engine = empty_engine_with(&[P1]);
    with_player(&mut engine, P1, |_, p| p.upgrade_points = 1);
    engine.upgrade(P1, UpgradeKind::Escort);
    assert_eq!(escorts_of(&engine, P1), 0);
    assert_eq!(player(&engine, P1).upgrade_points, 0, "failed gate still spends the point");
}

#[test]
fn test_escort_limited_to_one_live_escort() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P1, |_, p| {
        p.level = ESCORT_LEVEL_REQUIREMENT;
        p.upgrade_points = 2;
    });
    engine.upgrade(P1, UpgradeKind::Escort);
    engine.upgrade(P1, UpgradeKind::Escort);
    assert_eq!(escorts_of(&engine, P1), 1);
    assert_eq!(player(&engine, P1).upgrade_points, 0);

    let (_, pos) = engine
        .world()
        .query::<(&Position, &Role)>()
        .iter()
        .find(|(_, (_, r))| r.escort_owner() == Some(P1))
        .map(|(e, (p, _))| (e, *p))
        .unwrap();
    let d = pos.distance_to(&Position::new(3000.0, 3000.0));
    assert!((ESCORT_SPAWN_DISTANCE_MIN..=ESCORT_SPAWN_DISTANCE_MAX).contains(&d), "spawned {d} away");
}

// ---- Input ----

#[test]
fn test_newer_move_overwrites_older() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    engine.queue_message(
        P1,
        ClientMessage::Move(MoveInput {
            move_dir: MoveDir::Forward,
            angle: 0.0,
        }),
    );
    engine.queue_message(
        P1,
        ClientMessage::Move(MoveInput {
            move_dir: MoveDir::Neutral,
            angle: FRAC_PI_2,
        }),
    );
    engine.tick();
    let e = entity(&engine, P1);
    assert_eq!(vessel(&engine, e).heading, FRAC_PI_2);
    assert_eq!(position(&engine, e), Position::new(3000.0, 3000.0), "neutral input adds no thrust");
    assert!(player(&engine, P1).pending_input.is_none(), "input consumed by physics");
}

#[test]
fn test_requests_from_unknown_players_ignored() {
    let mut engine = empty_engine_with(&[P1]);
    engine.fire(P2);
    engine.upgrade(P2, UpgradeKind::Health);
    engine.set_input(P2, MoveInput::default());
    engine.disconnect(P2);
    assert_eq!(projectile_count(&engine), 0);
    assert_eq!(engine.player_ids(), vec![P1]);
}

// ---- Elimination & win ----

#[test]
fn test_eliminated_sent_after_snapshot_then_removed() {
    let mut engine = empty_engine_with(&[P1, P2]);
    place(&mut engine, P2, Position::new(3000.0, 3000.0), 0.0);
    with_player(&mut engine, P2, |v, _| v.health = 0.0);

    let out = engine.tick();

    let to_p2: Vec<&ServerMessage> = out.iter().filter(|o| o.to == P2).map(|o| &o.message).collect();
    assert_eq!(to_p2.len(), 2);
    assert!(matches!(to_p2[0], ServerMessage::WorldSnapshot(_)));
    assert!(matches!(to_p2[1], ServerMessage::Eliminated));
    assert!(engine.player_entity(P2).is_none());
    assert_eq!(engine.world().query::<&Pickup>().iter().count(), DEATH_DROP_COUNT);
    assert!(engine.leaderboard().iter().all(|e| e.id != P2));
}

#[test]
fn test_win_needs_exactly_one_live_player() {
    let mut engine = SimulationEngine::new(small_config(5));
    engine.join(P1, "ahab".into());
    engine.join(P2, "queequeg".into());
    engine.clear_hostiles();

    let out = engine.tick();
    assert!(match_overs(&out).is_empty(), "two survivors, no winner yet");

    engine.disconnect(P2);
    let out = engine.tick();
    assert_eq!(match_overs(&out), vec![P1]);
    assert!(match_overs(&engine.tick()).is_empty());
}

#[test]
fn test_last_elimination_deactivates_world() {
    let mut engine = empty_engine_with(&[P1]);
    with_player(&mut engine, P1, |v, _| v.health = 0.0);
    engine.tick();
    assert!(!engine.is_active());
    assert!(engine.tick().is_empty());
}

// ---- Escort AI ----

#[test]
fn test_ownerless_escort_coasts() {
    let mut engine = empty_engine_with(&[P1, P2]);
    let escort = engine.spawn_test_escort(P2, Position::new(3000.0, 3000.0));
    engine.disconnect(P2);
    engine.tick();
    let helm = *engine.world().get::<&broadside_core::components::Helm>(escort).unwrap();
    assert!(helm.desired_heading.is_none());
    assert_eq!(position(&engine, escort), Position::new(3000.0, 3000.0));
}

#[test]
fn test_escort_engages_hostile_bot() {
    let mut engine = empty_engine_with(&[P1]);
    place(&mut engine, P1, Position::new(3000.0, 3000.0), 0.0);
    let escort = engine.spawn_test_escort(P1, Position::new(3050.0, 3000.0));
    let bot = engine.spawn_test_bot(Position::new(3350.0, 3000.0));
    engine.tick();
    let shot = engine
        .world()
        .query::<(&Position, &Projectile)>()
        .iter()
        .find(|(_, (_, p))| p.owner_class == OwnerClass::Escort && p.owner == Some(P1))
        .map(|(_, (pos, _))| *pos)
        .expect("escort fired at the bot");
    assert!((vessel(&engine, escort).reload - ESCORT_RELOAD_TIME).abs() < 1e-9);

    // Put the weakened bot in the shot's path: the kill belongs to the owner.
    {
        let world = engine.world_mut();
        *world.get::<&mut Position>(bot).unwrap() = shot;
        *world.get::<&mut Velocity>(bot).unwrap() = Velocity::default();
        world.get::<&mut Vessel>(bot).unwrap().health = PROJECTILE_DAMAGE;
    }
    engine.tick();

    assert!(!engine.world().contains(bot));
    let owner = player(&engine, P1);
    assert_eq!(owner.score, BOT_KILL_SCORE);
    assert_eq!(owner.eliminations, 1);
}

// ---- Snapshots ----

#[test]
fn test_snapshot_filters_by_distance_but_minimap_sees_all() {
    let mut engine = empty_engine_with(&[P1, P2]);
    place(&mut engine, P1, Position::new(500.0, 500.0), 0.0);
    place(&mut engine, P2, Position::new(5500.0, 5500.0), 0.0);
    engine.spawn_test_bot(Position::new(900.0, 900.0));
    engine.spawn_test_bot(Position::new(5000.0, 500.0));

    let out = engine.tick();
    let ServerMessage::WorldSnapshot(snap) = &out.iter().find(|o| o.to == P1).unwrap().message else {
        panic!("first message to a player is a snapshot");
    };

    assert_eq!(snap.you.player.as_ref().unwrap().id, P1);
    assert_eq!(snap.bots.len(), 1, "only the bot in the neighboring cells");
    assert!(snap.players.is_empty(), "other player is beyond the view margin");
    assert_eq!(
        snap.minimap.iter().filter(|m| m.kind == EntityKind::Bot).count(),
        2
    );
    assert_eq!(
        snap.minimap.iter().filter(|m| m.kind == EntityKind::Player).count(),
        2
    );
    assert!(snap.own_rank.is_none());
}

#[test]
fn test_leaderboard_ranks_by_score_and_eliminations() {
    let mut engine = empty_engine_with(&[P1, P2]);
    with_player(&mut engine, P1, |_, p| p.score = 150);
    with_player(&mut engine, P2, |_, p| {
        p.score = 100;
        p.eliminations = 1;
    });
    engine.tick();
    let board = engine.leaderboard();
    assert_eq!(board[0].id, P2);
    assert_eq!(board[0].rank_value, 200);
    assert_eq!(board[1].id, P1);
}

fn position(engine: &SimulationEngine, e: Entity) -> Position {
    *engine.world().get::<&Position>(e).unwrap()
}
