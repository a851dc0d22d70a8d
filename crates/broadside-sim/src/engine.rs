//! Simulation engine: the authoritative core of a match.
//!
//! `SimulationEngine` owns the hecs ECS world, applies session events, runs
//! every system in a fixed phase order, and returns the messages each
//! connection should receive. Completely headless (no transport dependency),
//! enabling deterministic testing.

use std::collections::{BTreeMap, VecDeque};
use std::f64::consts::TAU;

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use broadside_core::commands::{ClientMessage, MoveInput, SessionEvent};
use broadside_core::components::{Role, Vessel};
use broadside_core::constants::*;
use broadside_core::enums::{MatchStatus, OwnerClass, UpgradeKind};
use broadside_core::events::{Outbound, ServerMessage};
use broadside_core::state::LeaderboardEntry;
use broadside_core::types::{PlayerId, Position, SimTime};

use crate::progression;
use crate::spatial::SpatialGrid;
use crate::systems;
use crate::systems::economy::PickupTargets;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::weapons::{self, Volley};
use crate::world_setup;

/// Configuration for a simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same match.
    pub seed: u64,
    pub experience_pickup_target: usize,
    pub health_pickup_target: usize,
    /// Bots per match, inclusive.
    pub bot_count_min: usize,
    pub bot_count_max: usize,
    /// Islands per match, inclusive.
    pub island_count_min: usize,
    pub island_count_max: usize,
    /// Cap on the per-tick frame scale.
    pub max_frame_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            experience_pickup_target: EXPERIENCE_PICKUP_TARGET,
            health_pickup_target: HEALTH_PICKUP_TARGET,
            bot_count_min: BOT_COUNT_MIN,
            bot_count_max: BOT_COUNT_MAX,
            island_count_min: ISLAND_COUNT_MIN,
            island_count_max: ISLAND_COUNT_MAX,
            max_frame_scale: MAX_FRAME_SCALE,
        }
    }
}

/// The simulation engine. Owns the ECS world and all match state.
pub struct SimulationEngine {
    world: World,
    config: SimConfig,
    time: SimTime,
    /// False until the first join, and again whenever the last player leaves.
    active: bool,
    rng: ChaCha8Rng,
    players: BTreeMap<PlayerId, Entity>,
    command_queue: VecDeque<(PlayerId, SessionEvent)>,
    despawn_buffer: Vec<Entity>,
    grid: SpatialGrid,
    leaderboard: Vec<LeaderboardEntry>,
    initial_bot_count: usize,
    match_over_sent: bool,
    outbox: Vec<Outbound>,
}

impl SimulationEngine {
    /// Create a new, inactive engine. The world is generated on first join.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            time: SimTime::default(),
            active: false,
            players: BTreeMap::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            grid: SpatialGrid::new(GRID_CELL_SIZE),
            leaderboard: Vec::new(),
            initial_bot_count: 0,
            match_over_sent: false,
            outbox: Vec::new(),
        }
    }

    /// Queue a session event for processing at the next tick boundary.
    pub fn queue_event(&mut self, player: PlayerId, event: SessionEvent) {
        self.command_queue.push_back((player, event));
    }

    /// Queue a decoded client message.
    pub fn queue_message(&mut self, player: PlayerId, message: ClientMessage) {
        self.queue_event(player, SessionEvent::Message(message));
    }

    /// Advance one nominal tick.
    pub fn tick(&mut self) -> Vec<Outbound> {
        self.tick_scaled(1.0)
    }

    /// Advance one tick with physics thrust scaled by `scale`.
    ///
    /// Returns this tick's messages in phase order: snapshots, then the
    /// match-over notice, then eliminations. Inactive engines return nothing.
    pub fn tick_scaled(&mut self, scale: f64) -> Vec<Outbound> {
        self.process_commands();

        if !self.active {
            return Vec::new();
        }

        let scale = if scale.is_finite() {
            scale.clamp(0.0, self.config.max_frame_scale)
        } else {
            1.0
        };
        self.run_systems(scale);
        self.time.advance(scale);

        std::mem::take(&mut self.outbox)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Connected players in id order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys().copied().collect()
    }

    /// Bots at the start of the current match.
    pub fn initial_bot_count(&self) -> usize {
        self.initial_bot_count
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Leaderboard as of the last completed tick.
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    /// Entity of a connected player's vessel.
    pub fn player_entity(&self, id: PlayerId) -> Option<Entity> {
        self.players.get(&id).copied()
    }

    /// Mutable world access for test setup.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a bot at an exact position (for tests).
    #[cfg(test)]
    pub fn spawn_test_bot(&mut self, position: Position) -> Entity {
        world_setup::spawn_bot(&mut self.world, &mut self.rng, position)
    }

    /// Spawn an escort for `owner` at an exact position (for tests).
    #[cfg(test)]
    pub fn spawn_test_escort(&mut self, owner: PlayerId, position: Position) -> Entity {
        world_setup::spawn_escort(&mut self.world, &mut self.rng, owner, position)
    }

    /// Remove every bot, escort and island, leaving players and pickups.
    #[cfg(test)]
    pub fn clear_hostiles(&mut self) {
        let doomed: Vec<Entity> = self
            .world
            .query::<&Role>()
            .iter()
            .filter(|(_, role)| !matches!(role, Role::Player(_)))
            .map(|(e, _)| e)
            .chain(
                self.world
                    .query::<&broadside_core::components::Island>()
                    .iter()
                    .map(|(e, _)| e),
            )
            .collect();
        for entity in doomed {
            let _ = self.world.despawn(entity);
        }
    }

    /// Process all queued session events.
    fn process_commands(&mut self) {
        while let Some((player, event)) = self.command_queue.pop_front() {
            match event {
                SessionEvent::Message(message) => self.handle_message(player, message),
                SessionEvent::Disconnected => self.disconnect(player),
            }
        }
    }

    /// Apply a single client message immediately.
    pub fn handle_message(&mut self, player: PlayerId, message: ClientMessage) {
        match message {
            ClientMessage::Join { display_name } => self.join(player, display_name),
            ClientMessage::Move(input) => self.set_input(player, input),
            ClientMessage::Fire => self.fire(player),
            ClientMessage::Upgrade { kind } => self.upgrade(player, kind),
        }
    }

    /// Spawn a vessel for `id`, regenerating the world if it was empty.
    pub fn join(&mut self, id: PlayerId, display_name: String) {
        if self.players.contains_key(&id) {
            debug!(%id, "duplicate join ignored");
            return;
        }
        if self.players.is_empty() {
            self.regenerate();
        }

        let obstacles = world_setup::terrain(&self.world);
        let position = world_setup::find_clear_position(&obstacles, VESSEL_SPAWN_CLEARANCE, &mut self.rng)
            .unwrap_or_else(world_setup::world_centre);
        let entity = world_setup::spawn_player(&mut self.world, &mut self.rng, id, display_name.clone(), position);
        self.players.insert(id, entity);
        self.active = true;
        info!(%id, name = %display_name, x = position.x, y = position.y, "player joined");
    }

    /// Replace the buffered move input. Newer input always wins.
    pub fn set_input(&mut self, id: PlayerId, input: MoveInput) {
        let Some(entity) = self.players.get(&id) else {
            debug!(%id, "move from unknown player ignored");
            return;
        };
        if let Ok(mut role) = self.world.get::<&mut Role>(*entity) {
            if let Some(player) = role.as_player_mut() {
                player.pending_input = Some(input);
            }
        }
    }

    /// Fire along the current heading if the vessel has reloaded.
    pub fn fire(&mut self, id: PlayerId) {
        let Some(&entity) = self.players.get(&id) else {
            debug!(%id, "fire from unknown player ignored");
            return;
        };
        let volley = {
            let Ok(mut query) = self.world.query_one::<(&Position, &mut Vessel, &Role)>(entity) else {
                return;
            };
            let Some((pos, vessel, role)) = query.get() else {
                return;
            };
            if vessel.reload > 0.0 {
                debug!(%id, reload = vessel.reload, "fire while reloading ignored");
                return;
            }
            let mut volley = Volley::from_vessel(*pos, vessel, vessel.heading, Some(id), OwnerClass::Player);
            volley.spread = role.as_player().is_some_and(|p| p.multishot_count > 0);
            weapons::reset_reload(vessel);
            volley
        };
        weapons::spawn_volleys(&mut self.world, &[volley]);
    }

    /// Spend one upgrade point. Escort recruitment that fails its gate still
    /// spends the point.
    pub fn upgrade(&mut self, id: PlayerId, kind: UpgradeKind) {
        let Some(&entity) = self.players.get(&id) else {
            debug!(%id, "upgrade from unknown player ignored");
            return;
        };

        let has_escort = self.has_live_escort(id);
        let escort_at = {
            let Ok(mut query) = self.world.query_one::<(&Position, &mut Vessel, &mut Role)>(entity) else {
                return;
            };
            let Some((pos, vessel, role)) = query.get() else {
                return;
            };
            let Some(player) = role.as_player_mut() else {
                return;
            };
            if player.upgrade_points == 0 {
                debug!(%id, ?kind, "upgrade without points ignored");
                return;
            }
            player.upgrade_points -= 1;
            debug!(%id, ?kind, remaining = player.upgrade_points, "upgrade applied");

            match kind {
                UpgradeKind::Health => {
                    progression::apply_health(vessel);
                    None
                }
                UpgradeKind::Multishot => {
                    progression::apply_multishot(player);
                    None
                }
                UpgradeKind::Speedyfire => {
                    progression::apply_speedyfire(vessel);
                    None
                }
                UpgradeKind::Escort => {
                    if player.level >= ESCORT_LEVEL_REQUIREMENT && !has_escort {
                        Some(*pos)
                    } else {
                        debug!(%id, level = player.level, has_escort, "escort gate failed, point spent");
                        None
                    }
                }
            }
        };

        if let Some(owner_pos) = escort_at {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self.rng.gen_range(ESCORT_SPAWN_DISTANCE_MIN..ESCORT_SPAWN_DISTANCE_MAX);
            let mut position = owner_pos.offset(angle, distance);
            position.clamp_to_world(WORLD_W, WORLD_H, VESSEL_COLLISION_RADIUS);
            world_setup::spawn_escort(&mut self.world, &mut self.rng, id, position);
            info!(%id, "escort recruited");
        }
    }

    /// Deregister a connection's vessel.
    pub fn disconnect(&mut self, id: PlayerId) {
        let Some(entity) = self.players.remove(&id) else {
            return;
        };
        let _ = self.world.despawn(entity);
        info!(%id, remaining = self.players.len(), "player disconnected");
        if self.players.is_empty() {
            self.active = false;
        }
    }

    fn has_live_escort(&self, owner: PlayerId) -> bool {
        self.world
            .query::<(&Vessel, &Role)>()
            .iter()
            .any(|(_, (vessel, role))| vessel.health > 0.0 && role.escort_owner() == Some(owner))
    }

    /// Throw away the old world and lay out a new match.
    fn regenerate(&mut self) {
        self.world.clear();
        self.grid.clear();
        self.leaderboard.clear();
        self.despawn_buffer.clear();
        self.outbox.clear();
        self.match_over_sent = false;
        self.time = SimTime::default();

        let layout = world_setup::generate_match(&mut self.world, &mut self.rng, &self.config);
        self.initial_bot_count = layout.bots;
        info!(islands = layout.islands, bots = layout.bots, "match generated");
    }

    /// Run all systems in order.
    fn run_systems(&mut self, scale: f64) {
        // 1. Reload countdown + AI decisions
        let ai_shots = systems::ai::run(&mut self.world, &mut self.rng, &self.players);
        // 2. Movement integration
        systems::movement::run(&mut self.world, scale);
        // 3. Vessel/terrain collision
        let contacts = systems::collision::run(&mut self.world);
        // 4. Projectile flight + damage
        let combat = systems::combat::run(&mut self.world, &self.players, &mut self.despawn_buffer);
        // 5. Cleanup (spent projectiles, sunk bots and escorts)
        let removed = systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 6. Pickup replenishment + collection
        let economy = systems::economy::run(
            &mut self.world,
            &mut self.rng,
            PickupTargets {
                experience: self.config.experience_pickup_target,
                health: self.config.health_pickup_target,
            },
        );
        // 7. Spatial index rebuild
        self.grid.rebuild(&self.world);
        // 8. Per-viewer snapshots
        let snapshots = systems::snapshot::publish(
            &SnapshotContext {
                world: &self.world,
                grid: &self.grid,
                time: self.time,
                leaderboard: &self.leaderboard,
                initial_bot_count: self.initial_bot_count,
            },
            &self.players,
        );
        self.outbox.extend(snapshots);
        // 9. Win condition
        self.check_win();
        // 10. Dead player eviction
        self.evict_dead_players();
        // 11. Leaderboard
        self.leaderboard = systems::leaderboard::build(&self.world);

        trace!(
            tick = self.time.tick,
            ai_shots,
            contacts,
            hits = combat.hits,
            kills = combat.kills,
            removed,
            spawned = economy.spawned,
            collected = economy.collected,
            levels = economy.levels_gained,
            indexed = self.grid.len(),
            "tick complete"
        );
    }

    fn check_win(&mut self) {
        if self.match_over_sent {
            return;
        }
        let bots = self
            .world
            .query::<&Role>()
            .iter()
            .filter(|(_, role)| matches!(role, Role::Bot(_)))
            .count();
        if bots > 0 {
            return;
        }

        let live: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|(_, entity)| {
                self.world
                    .get::<&Vessel>(**entity)
                    .is_ok_and(|vessel| vessel.health > 0.0)
            })
            .map(|(id, _)| *id)
            .collect();

        if let [winner] = live[..] {
            self.match_over_sent = true;
            info!(id = %winner, "match won");
            self.outbox.push(Outbound {
                to: winner,
                message: ServerMessage::MatchOver {
                    status: MatchStatus::Win,
                },
            });
        }
    }

    /// Remove sunk players, iterating a snapshot of ids.
    fn evict_dead_players(&mut self) {
        let ids: Vec<(PlayerId, Entity)> = self.players.iter().map(|(id, e)| (*id, *e)).collect();
        for (id, entity) in ids {
            let wreck = match self.world.query_one::<(&Position, &Vessel)>(entity) {
                Ok(mut query) => match query.get() {
                    Some((pos, vessel)) if vessel.health <= 0.0 => *pos,
                    _ => continue,
                },
                Err(_) => continue,
            };

            self.outbox.push(Outbound {
                to: id,
                message: ServerMessage::Eliminated,
            });
            world_setup::spawn_death_drop(&mut self.world, &mut self.rng, wreck);
            let _ = self.world.despawn(entity);
            self.players.remove(&id);
            info!(%id, remaining = self.players.len(), "player eliminated");
        }

        if self.players.is_empty() {
            self.active = false;
        }
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}
