//! Simulation constants and tuning parameters.
//!
//! Distances are world units, times are ticks unless stated otherwise.

/// Nominal simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Upper bound on the per-tick frame scale factor (spiral-of-death guard).
pub const MAX_FRAME_SCALE: f64 = 2.0;

// --- World bounds ---

/// World width.
pub const WORLD_W: f64 = 6000.0;

/// World height.
pub const WORLD_H: f64 = 6000.0;

// --- Vessels ---

/// Collision radius shared by every vessel.
pub const VESSEL_COLLISION_RADIUS: f64 = 16.0;

/// Hull size; projectiles leave the muzzle at `VESSEL_SIZE + MUZZLE_CLEARANCE`.
pub const VESSEL_SIZE: f64 = 22.0;

/// Extra distance ahead of the hull where projectiles spawn.
pub const MUZZLE_CLEARANCE: f64 = 8.0;

/// Starting max health for every vessel.
pub const VESSEL_MAX_HEALTH: f64 = 100.0;

/// Velocity multiplier applied every tick (implicit drag).
pub const FRICTION: f64 = 0.98;

/// Player thrust per tick at frame scale 1.0.
pub const PLAYER_THRUST: f64 = 1.48;

/// Backward thrust as a fraction of forward thrust.
pub const PLAYER_REVERSE_FACTOR: f64 = 0.5;

/// Bot thrust per tick.
pub const BOT_THRUST: f64 = 0.12;

/// Escort thrust per tick.
pub const ESCORT_THRUST: f64 = 0.016;

/// Bot turn rate (radians per tick).
pub const BOT_TURN_SPEED: f64 = 0.04;

/// Escort turn rate (radians per tick).
pub const ESCORT_TURN_SPEED: f64 = 0.05;

/// Player reload baseline (ticks, before fire-rate multiplier).
pub const PLAYER_RELOAD_TIME: f64 = 50.0;

/// Bot reload time (ticks).
pub const BOT_RELOAD_TIME: f64 = 25.0;

/// Escort reload time (ticks).
pub const ESCORT_RELOAD_TIME: f64 = 200.0;

// --- Projectiles ---

/// Projectile speed (units per tick).
pub const PROJECTILE_SPEED: f64 = 8.0;

/// Projectile collision radius.
pub const PROJECTILE_RADIUS: f64 = 5.0;

/// Projectile lifetime (ticks).
pub const PROJECTILE_LIFE: i32 = 500;

/// Damage dealt by one projectile.
pub const PROJECTILE_DAMAGE: f64 = 20.0;

/// Angular offset of the two extra multishot projectiles (radians).
pub const MULTISHOT_SPREAD: f64 = 0.1;

// --- Terrain ---

/// Health lost per unit of vessel/island overlap.
pub const TERRAIN_DAMAGE_PER_OVERLAP: f64 = 0.04;

/// Velocity multiplier applied on terrain contact.
pub const TERRAIN_COLLISION_DAMPING: f64 = 0.5;

/// Island radius range.
pub const ISLAND_RADIUS_MIN: f64 = 30.0;
pub const ISLAND_RADIUS_MAX: f64 = 75.0;

/// Clearance between islands when generating terrain.
pub const ISLAND_CLEARANCE: f64 = 68.0;

/// Display color for islands.
pub const ISLAND_COLOR: &str = "#155";

// --- Spawning ---

/// Attempts made by rejection sampling before falling back to world centre.
pub const SPAWN_ATTEMPTS: u32 = 50;

/// Sampling margin from the world edge.
pub const SPAWN_EDGE_MARGIN: f64 = 30.0;

/// Clearance from islands when spawning vessels.
pub const VESSEL_SPAWN_CLEARANCE: f64 = 50.0;

/// Clearance from islands when spawning pickups.
pub const PICKUP_SPAWN_CLEARANCE: f64 = 13.0;

// --- Bot AI ---

/// Distance within which a bot chases a player.
pub const BOT_AGGRO_RADIUS: f64 = 1000.0;

/// Distance within which a chasing bot fires.
pub const BOT_FIRE_RANGE: f64 = 400.0;

/// Minimum roam timer (ticks); a random extra of up to the same amount is added.
pub const BOT_ROAM_TIMER_BASE: i32 = 120;

/// Axis-aligned tolerance for reaching a roam target.
pub const BOT_ARRIVAL_TOLERANCE: f64 = 20.0;

// --- Escort AI ---

/// Distance from the owner beyond which an escort follows.
pub const ESCORT_LEASH_DISTANCE: f64 = 120.0;

/// Max axis offset of a wander point from the owner.
pub const ESCORT_WANDER_OFFSET: f64 = 80.0;

/// Minimum wander timer (ticks); a random extra of up to the same amount is added.
pub const ESCORT_WANDER_TIMER_BASE: i32 = 60;

/// Axis-aligned tolerance for reaching a wander point.
pub const ESCORT_ARRIVAL_TOLERANCE: f64 = 10.0;

/// Distance within which an escort fires at its target.
pub const ESCORT_ENGAGEMENT_RANGE: f64 = 400.0;

/// Escort spawn distance range from its owner.
pub const ESCORT_SPAWN_DISTANCE_MIN: f64 = 80.0;
pub const ESCORT_SPAWN_DISTANCE_MAX: f64 = 120.0;

// --- Economy ---

/// Target number of experience pickups in the world.
pub const EXPERIENCE_PICKUP_TARGET: usize = 1000;

/// Target number of health pickups in the world.
pub const HEALTH_PICKUP_TARGET: usize = 200;

/// Pickup collision radius.
pub const PICKUP_RADIUS: f64 = 8.0;

/// Experience points range of a spawned experience pickup (inclusive).
pub const EXPERIENCE_PICKUP_POINTS_MIN: u32 = 1;
pub const EXPERIENCE_PICKUP_POINTS_MAX: u32 = 2;

/// Fraction of max health restored by a health pickup.
pub const HEALTH_PICKUP_FRACTION: f64 = 0.3;

/// Flat score granted per experience pickup.
pub const EXPERIENCE_PICKUP_SCORE: u64 = 5;

/// Experience required for level 1; doubles every level after.
pub const LEVEL_POINTS_BASE: u32 = 10;

/// Experience pickups dropped by an eliminated player.
pub const DEATH_DROP_COUNT: usize = 6;

/// Experience points per death-drop pickup.
pub const DEATH_DROP_POINTS: u32 = 2;

/// Scatter radius of death-drop pickups around the wreck.
pub const DEATH_DROP_SCATTER: f64 = 40.0;

// --- Upgrades ---

/// Max health (and heal) granted by the health upgrade.
pub const HEALTH_UPGRADE_AMOUNT: f64 = 50.0;

/// Fire-rate multiplier factor applied by speedyfire.
pub const SPEEDYFIRE_RATE_FACTOR: f64 = 1.2;

/// Reload baseline factor applied by speedyfire.
pub const SPEEDYFIRE_RELOAD_FACTOR: f64 = 0.9;

/// Minimum level to recruit an escort.
pub const ESCORT_LEVEL_REQUIREMENT: u32 = 5;

// --- Scoring ---

/// Score for eliminating a bot.
pub const BOT_KILL_SCORE: u64 = 100;

/// Score for eliminating another player.
pub const PLAYER_KILL_SCORE: u64 = 200;

/// Rank value weight of one elimination.
pub const ELIMINATION_RANK_WEIGHT: u64 = 100;

/// Number of leaderboard rows shown to a viewer.
pub const LEADERBOARD_DISPLAY: usize = 5;

// --- Match generation ---

/// Island count range (inclusive).
pub const ISLAND_COUNT_MIN: usize = 20;
pub const ISLAND_COUNT_MAX: usize = 49;

/// Bot count range (inclusive).
pub const BOT_COUNT_MIN: usize = 5;
pub const BOT_COUNT_MAX: usize = 9;

// --- Visibility ---

/// Edge length of a spatial grid cell.
pub const GRID_CELL_SIZE: f64 = 1000.0;

/// Axis-aligned visibility margin for players and projectiles.
pub const VIEW_MARGIN: f64 = 1200.0;
