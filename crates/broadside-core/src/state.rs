//! World snapshot: the per-viewer state sent to a connection each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{PlayerId, Position, SimTime, Velocity};

/// Filtered world view for one viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub time: SimTime,
    /// The viewer's own vessel, always present.
    pub you: VesselView,
    /// Other players within the visibility margin.
    pub players: Vec<VesselView>,
    pub bots: Vec<VesselView>,
    pub escorts: Vec<VesselView>,
    pub pickups: Vec<PickupView>,
    pub islands: Vec<IslandView>,
    pub projectiles: Vec<ProjectileView>,
    /// Full leaderboard, best first.
    pub leaderboard: Vec<LeaderboardEntry>,
    /// The viewer's own row when it falls outside the displayed top rows.
    pub own_rank: Option<RankedEntry>,
    /// Unfiltered positions of every entity.
    pub minimap: Vec<MinimapMarker>,
    pub initial_bot_count: usize,
}

/// A vessel as seen by a viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselView {
    /// Stable entity id for client-side interpolation.
    pub entity_id: u64,
    pub position: Position,
    pub velocity: Velocity,
    pub heading: f64,
    pub health: f64,
    pub max_health: f64,
    pub collision_r: f64,
    pub size: f64,
    /// Present for player vessels only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerView>,
    /// Present for escorts only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlayerId>,
}

/// Progression fields of a player vessel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub display_name: String,
    pub level: u32,
    pub exp: u32,
    pub exp_needed: u32,
    pub upgrade_points: u32,
    pub score: u64,
    pub eliminations: u32,
    pub multishot_count: u32,
    pub fire_rate_multiplier: f64,
    pub reload: f64,
    pub has_escort: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupView {
    pub position: Position,
    pub kind: PickupKind,
    pub points: u32,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandView {
    pub position: Position,
    pub radius: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileView {
    pub position: Position,
    pub velocity: Velocity,
    pub radius: f64,
    pub owner_class: OwnerClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlayerId>,
}

/// Read-only leaderboard projection, recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub display_name: String,
    pub score: u64,
    pub eliminations: u32,
    /// `score + 100 * eliminations`.
    pub rank_value: u64,
}

/// A leaderboard row with its 1-based rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub rank: usize,
    pub entry: LeaderboardEntry,
}

/// Minimal per-entity minimap data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimapMarker {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
}
