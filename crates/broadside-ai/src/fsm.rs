//! Autonomous vessel behavior state machines.
//!
//! Pure functions that compute a steering intent, a fire decision and the
//! next roam state for one bot or escort from a snapshot of its situation.
//! No ECS dependency; the caller gathers the context and applies the result.

use rand::Rng;

use broadside_core::components::RoamState;
use broadside_core::constants::*;
use broadside_core::types::Position;

/// Bot behavior state, re-evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotMode {
    /// A player is within the aggro radius.
    Chase,
    /// No player nearby; travel between roam targets.
    Roam,
}

/// Escort movement state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscortMode {
    /// Beyond the leash: head straight for the owner.
    Follow,
    /// Inside the leash: drift between random points near the owner.
    Wander,
}

/// Input to the bot FSM for a single vessel.
pub struct BotContext {
    pub position: Position,
    pub reload: f64,
    pub roam: RoamState,
    /// Nearest player, if any exist.
    pub nearest_player: Option<Position>,
    /// Nearest experience pickup, if any exist.
    pub nearest_experience: Option<Position>,
}

/// Output from the bot FSM.
#[derive(Debug, Clone, Copy)]
pub struct BotDecision {
    pub mode: BotMode,
    pub desired_heading: Option<f64>,
    /// Fire along the current heading.
    pub fire: bool,
    pub roam: RoamState,
}

/// Input to the escort FSM for a single vessel.
pub struct EscortContext {
    pub position: Position,
    pub reload: f64,
    pub roam: RoamState,
    /// Owner position, `None` when the owner is gone.
    pub owner: Option<Position>,
    /// Nearest hostile (bot or non-owner player).
    pub nearest_target: Option<Position>,
}

/// Output from the escort FSM.
#[derive(Debug, Clone, Copy)]
pub struct EscortDecision {
    /// `None` when the escort has no owner this tick.
    pub mode: Option<EscortMode>,
    pub desired_heading: Option<f64>,
    /// Fire at this absolute angle.
    pub fire_at: Option<f64>,
    pub roam: RoamState,
}

/// Evaluate the FSM for one bot.
pub fn evaluate_bot(ctx: &BotContext, rng: &mut impl Rng) -> BotDecision {
    let mut roam = ctx.roam;

    let chase_target = ctx
        .nearest_player
        .filter(|p| ctx.position.distance_to(p) < BOT_AGGRO_RADIUS);

    let decision = match chase_target {
        Some(player) => {
            let in_range = ctx.position.distance_to(&player) < BOT_FIRE_RANGE;
            BotDecision {
                mode: BotMode::Chase,
                desired_heading: Some(ctx.position.angle_to(&player)),
                fire: in_range && ctx.reload <= 0.0,
                roam,
            }
        }
        None => {
            if roam.target.is_none() || roam.timer <= 0 {
                let target = ctx.nearest_experience.unwrap_or_else(|| {
                    Position::new(rng.gen_range(0.0..WORLD_W), rng.gen_range(0.0..WORLD_H))
                });
                roam.target = Some(target);
                roam.timer = BOT_ROAM_TIMER_BASE + rng.gen_range(0..BOT_ROAM_TIMER_BASE);
            }

            let desired_heading = roam.target.map(|t| ctx.position.angle_to(&t));
            if roam
                .target
                .is_some_and(|t| ctx.position.within_box(&t, BOT_ARRIVAL_TOLERANCE))
            {
                roam.target = None;
            }

            BotDecision {
                mode: BotMode::Roam,
                desired_heading,
                fire: false,
                roam,
            }
        }
    };

    // The roam clock runs in both modes so a stale target expires while chasing.
    BotDecision {
        roam: RoamState {
            timer: (decision.roam.timer - 1).max(0),
            ..decision.roam
        },
        ..decision
    }
}

/// Evaluate the FSM for one escort.
pub fn evaluate_escort(ctx: &EscortContext, rng: &mut impl Rng) -> EscortDecision {
    let Some(owner) = ctx.owner else {
        return EscortDecision {
            mode: None,
            desired_heading: None,
            fire_at: None,
            roam: ctx.roam,
        };
    };

    let mut roam = ctx.roam;
    let (mode, destination) = if ctx.position.distance_to(&owner) < ESCORT_LEASH_DISTANCE {
        if roam.target.is_none() || roam.timer <= 0 {
            roam.target = Some(Position::new(
                owner.x + rng.gen_range(-ESCORT_WANDER_OFFSET..ESCORT_WANDER_OFFSET),
                owner.y + rng.gen_range(-ESCORT_WANDER_OFFSET..ESCORT_WANDER_OFFSET),
            ));
            roam.timer = ESCORT_WANDER_TIMER_BASE + rng.gen_range(0..ESCORT_WANDER_TIMER_BASE);
        }
        roam.timer -= 1;

        let destination = roam.target.unwrap_or(owner);
        if ctx.position.within_box(&destination, ESCORT_ARRIVAL_TOLERANCE) {
            roam.target = None;
        }
        (EscortMode::Wander, destination)
    } else {
        (EscortMode::Follow, owner)
    };

    let fire_at = ctx
        .nearest_target
        .filter(|t| ctx.position.distance_to(t) < ESCORT_ENGAGEMENT_RANGE && ctx.reload <= 0.0)
        .map(|t| ctx.position.angle_to(&t));

    EscortDecision {
        mode: Some(mode),
        desired_heading: Some(ctx.position.angle_to(&destination)),
        fire_at,
        roam,
    }
}
