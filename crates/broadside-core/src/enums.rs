//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of a collectible pickup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupKind {
    #[default]
    Experience,
    Health,
}

/// Which class of vessel fired a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerClass {
    #[default]
    Player,
    Bot,
    Escort,
}

/// Upgrade a player can spend an upgrade point on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKind {
    /// Raise max health and heal by the same amount.
    Health,
    /// Two extra angled projectiles per shot. Buying it again has no effect.
    Multishot,
    /// Faster fire rate; compounds with repeated purchase.
    Speedyfire,
    /// Recruit an escort vessel (level-gated, one at a time).
    Escort,
}

/// Forward / neutral / backward thrust request. Encoded as `1`, `0`, `-1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum MoveDir {
    Backward,
    #[default]
    Neutral,
    Forward,
}

impl TryFrom<i8> for MoveDir {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(MoveDir::Backward),
            0 => Ok(MoveDir::Neutral),
            1 => Ok(MoveDir::Forward),
            other => Err(format!("moveDir must be -1, 0 or 1, got {other}")),
        }
    }
}

impl From<MoveDir> for i8 {
    fn from(dir: MoveDir) -> Self {
        match dir {
            MoveDir::Backward => -1,
            MoveDir::Neutral => 0,
            MoveDir::Forward => 1,
        }
    }
}

/// Outcome carried by a match-over message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Win,
}

/// Entity category used by the spatial grid and the minimap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Bot,
    Escort,
    Pickup,
    Island,
    Projectile,
}
