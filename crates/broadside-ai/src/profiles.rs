//! Role-specific behavioral profiles.
//!
//! Consolidates per-role movement and weapon parameters for the vessel factories.

use broadside_core::constants::*;

/// Movement and weapon profile of a vessel role.
pub struct RoleProfile {
    /// Thrust per tick at frame scale 1.0.
    pub thrust: f64,
    /// Max heading change per tick (radians). Players snap instead of turning.
    pub turn_speed: f64,
    /// Reload baseline (ticks).
    pub reload_time: f64,
}

/// Which profile to use for a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Player,
    Bot,
    Escort,
}

/// Get the behavioral profile for a given role.
pub fn get_profile(kind: ProfileKind) -> RoleProfile {
    match kind {
        ProfileKind::Player => RoleProfile {
            thrust: PLAYER_THRUST,
            turn_speed: 0.0,
            reload_time: PLAYER_RELOAD_TIME,
        },
        ProfileKind::Bot => RoleProfile {
            thrust: BOT_THRUST,
            turn_speed: BOT_TURN_SPEED,
            reload_time: BOT_RELOAD_TIME,
        },
        ProfileKind::Escort => RoleProfile {
            thrust: ESCORT_THRUST,
            turn_speed: ESCORT_TURN_SPEED,
            reload_time: ESCORT_RELOAD_TIME,
        },
    }
}
