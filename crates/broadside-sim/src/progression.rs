//! Leveling and stat upgrades for player vessels.
//!
//! Escort recruitment needs world access and lives in the engine; everything
//! here only touches one vessel's own components.

use broadside_core::components::{PlayerState, Vessel};
use broadside_core::constants::*;

/// Experience required to leave `level`. Level 0 needs nothing.
pub fn exp_needed(level: u32) -> u32 {
    match level {
        0 => 0,
        n => 1u32
            .checked_shl(n - 1)
            .and_then(|m| m.checked_mul(LEVEL_POINTS_BASE))
            .unwrap_or(u32::MAX),
    }
}

/// Add experience and level up as many times as it pays for.
///
/// Returns the number of levels gained; each grants one upgrade point.
pub fn grant_experience(player: &mut PlayerState, points: u32) -> u32 {
    player.exp = player.exp.saturating_add(points);
    let mut gained = 0;
    loop {
        let needed = exp_needed(player.level);
        if needed == 0 || player.exp < needed {
            break;
        }
        player.exp -= needed;
        player.level += 1;
        player.upgrade_points += 1;
        gained += 1;
    }
    gained
}

/// Raise max health and heal by the same amount.
pub fn apply_health(vessel: &mut Vessel) {
    vessel.max_health += HEALTH_UPGRADE_AMOUNT;
    vessel.health = (vessel.health + HEALTH_UPGRADE_AMOUNT).clamp(0.0, vessel.max_health);
}

/// Enable the two angled side shots. Buying it again changes nothing.
pub fn apply_multishot(player: &mut PlayerState) {
    player.multishot_count = 1;
}

/// Faster fire rate; compounds with every purchase.
pub fn apply_speedyfire(vessel: &mut Vessel) {
    vessel.fire_rate_multiplier *= SPEEDYFIRE_RATE_FACTOR;
    vessel.reload_time_base *= SPEEDYFIRE_RELOAD_FACTOR;
}

/// Reload time after a shot.
pub fn effective_reload(vessel: &Vessel) -> f64 {
    vessel.reload_time_base / vessel.fire_rate_multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_one() -> PlayerState {
        PlayerState {
            level: 1,
            ..Default::default()
        }
    }

    #[test]
    fn exp_curve_doubles() {
        assert_eq!(exp_needed(0), 0);
        assert_eq!(exp_needed(1), 10);
        assert_eq!(exp_needed(2), 20);
        assert_eq!(exp_needed(5), 160);
        assert_eq!(exp_needed(40), u32::MAX);
    }

    #[test]
    fn single_level_up_keeps_remainder() {
        let mut p = level_one();
        p.exp = 9;
        assert_eq!(grant_experience(&mut p, 5), 1);
        assert_eq!((p.level, p.exp, p.upgrade_points), (2, 4, 1));
    }

    #[test]
    fn large_grant_levels_repeatedly() {
        let mut p = level_one();
        assert_eq!(grant_experience(&mut p, 35), 2);
        assert_eq!((p.level, p.exp, p.upgrade_points), (3, 5, 2));
    }

    #[test]
    fn level_zero_never_levels() {
        let mut p = PlayerState::default();
        assert_eq!(grant_experience(&mut p, 100), 0);
        assert_eq!(p.exp, 100);
    }
}
