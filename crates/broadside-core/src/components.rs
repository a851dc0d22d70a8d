//! ECS components for hecs entities.
//!
//! Components are plain data. Game logic lives in systems, not components.
//! A vessel entity carries `(Position, Velocity, Vessel, Helm, Role)`; the
//! `Role` tag selects which AI, combat and progression rules apply to it.

use serde::{Deserialize, Serialize};

use crate::commands::MoveInput;
use crate::enums::*;
use crate::types::{PlayerId, Position};

/// Capabilities shared by every vessel, whatever its role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vessel {
    /// Heading in radians (atan2 convention).
    pub heading: f64,
    pub collision_r: f64,
    pub size: f64,
    pub health: f64,
    pub max_health: f64,
    /// Ticks until the next shot is allowed. Never negative.
    pub reload: f64,
    /// Reload baseline before the fire-rate multiplier.
    pub reload_time_base: f64,
    pub fire_rate_multiplier: f64,
    /// Thrust per tick at frame scale 1.0.
    pub thrust: f64,
    /// Max heading change per tick for autonomous vessels.
    pub turn_speed: f64,
}

/// Steering intent written by the AI phase, consumed by the physics phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Helm {
    /// Heading the vessel is turning toward. `None` means coast.
    pub desired_heading: Option<f64>,
}

/// Role-specific payload of a vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Role {
    Player(PlayerState),
    Bot(BotState),
    Escort(EscortState),
}

/// Progression and input state of a human-controlled vessel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub display_name: String,
    pub level: u32,
    pub exp: u32,
    pub upgrade_points: u32,
    pub score: u64,
    pub eliminations: u32,
    /// 0 = single shot, 1 = multishot active.
    pub multishot_count: u32,
    /// Latest unconsumed move input; newer input overwrites it.
    pub pending_input: Option<MoveInput>,
}

/// A transient point an autonomous vessel travels toward.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RoamState {
    pub target: Option<Position>,
    /// Ticks until the target is re-picked.
    pub timer: i32,
}

/// Hostile bot AI state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotState {
    pub roam: RoamState,
}

/// Escort AI state. `owner` is a weak reference, resolved by id every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscortState {
    pub owner: PlayerId,
    pub roam: RoamState,
}

impl Role {
    pub fn kind(&self) -> EntityKind {
        match self {
            Role::Player(_) => EntityKind::Player,
            Role::Bot(_) => EntityKind::Bot,
            Role::Escort(_) => EntityKind::Escort,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match self {
            Role::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerState> {
        match self {
            Role::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Owning player of an escort.
    pub fn escort_owner(&self) -> Option<PlayerId> {
        match self {
            Role::Escort(e) => Some(e.owner),
            _ => None,
        }
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub radius: f64,
    /// Remaining lifetime in ticks.
    pub life: i32,
    pub damage: f64,
    /// Player credited for hits. `None` for bot fire.
    pub owner: Option<PlayerId>,
    pub owner_class: OwnerClass,
}

/// Static terrain obstacle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Island {
    pub radius: f64,
    pub color: String,
}

/// Collectible pickup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    /// Experience value; unused for health pickups.
    pub points: u32,
    pub radius: f64,
}
