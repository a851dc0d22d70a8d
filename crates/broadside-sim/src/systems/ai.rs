//! Reload countdown and autonomous vessel decisions.
//!
//! Gathers a context per bot and escort, runs the behavior machines from
//! `broadside_ai`, and writes back the steering intent and roam state.
//! Shots are collected and spawned once the decision pass is done.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use broadside_ai::fsm::{evaluate_bot, evaluate_escort, BotContext, EscortContext};
use broadside_core::components::{Helm, Pickup, Role, Vessel};
use broadside_core::enums::{OwnerClass, PickupKind};
use broadside_core::types::{PlayerId, Position};

use super::weapons::{self, Volley};

/// Live vessel seen by the target scans.
struct Contact {
    position: Position,
    kind: ContactKind,
}

enum ContactKind {
    Player(PlayerId),
    Bot,
    Escort,
}

/// Run the AI phase. Returns the number of projectiles fired.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, players: &BTreeMap<PlayerId, Entity>) -> usize {
    // Every vessel's countdown moves exactly once per tick, here.
    for (_entity, vessel) in world.query_mut::<&mut Vessel>() {
        vessel.reload = (vessel.reload - 1.0).max(0.0);
    }

    let contacts: Vec<Contact> = world
        .query::<(&Position, &Vessel, &Role)>()
        .iter()
        .filter(|(_, (_, vessel, _))| vessel.health > 0.0)
        .map(|(_, (pos, _, role))| Contact {
            position: *pos,
            kind: match role {
                Role::Player(p) => ContactKind::Player(p.id),
                Role::Bot(_) => ContactKind::Bot,
                Role::Escort(_) => ContactKind::Escort,
            },
        })
        .collect();

    let experience: Vec<Position> = world
        .query::<(&Position, &Pickup)>()
        .iter()
        .filter(|(_, (_, pickup))| pickup.kind == PickupKind::Experience)
        .map(|(_, (pos, _))| *pos)
        .collect();

    let owner_positions: BTreeMap<PlayerId, Position> = players
        .iter()
        .filter_map(|(id, entity)| world.get::<&Position>(*entity).ok().map(|p| (*id, *p)))
        .collect();

    let mut volleys = Vec::new();

    for (_entity, (pos, vessel, helm, role)) in
        world.query_mut::<(&Position, &mut Vessel, &mut Helm, &mut Role)>()
    {
        match role {
            Role::Bot(state) => {
                let ctx = BotContext {
                    position: *pos,
                    reload: vessel.reload,
                    roam: state.roam,
                    nearest_player: nearest(pos, &contacts, |c| matches!(c.kind, ContactKind::Player(_))),
                    nearest_experience: nearest_point(pos, &experience),
                };
                let decision = evaluate_bot(&ctx, rng);
                state.roam = decision.roam;
                helm.desired_heading = decision.desired_heading;
                if decision.fire {
                    volleys.push(Volley::from_vessel(*pos, vessel, vessel.heading, None, OwnerClass::Bot));
                    weapons::reset_reload(vessel);
                }
            }
            Role::Escort(state) => {
                let owner = state.owner;
                let ctx = EscortContext {
                    position: *pos,
                    reload: vessel.reload,
                    roam: state.roam,
                    owner: owner_positions.get(&owner).copied(),
                    nearest_target: nearest(pos, &contacts, |c| match c.kind {
                        ContactKind::Bot => true,
                        ContactKind::Player(id) => id != owner,
                        ContactKind::Escort => false,
                    }),
                };
                let decision = evaluate_escort(&ctx, rng);
                state.roam = decision.roam;
                helm.desired_heading = decision.desired_heading;
                if let Some(angle) = decision.fire_at {
                    volleys.push(Volley::from_vessel(*pos, vessel, angle, Some(owner), OwnerClass::Escort));
                    weapons::reset_reload(vessel);
                }
            }
            Role::Player(_) => {}
        }
    }

    weapons::spawn_volleys(world, &volleys)
}

fn nearest(from: &Position, contacts: &[Contact], accept: impl Fn(&Contact) -> bool) -> Option<Position> {
    contacts
        .iter()
        .filter(|c| accept(c))
        .map(|c| c.position)
        .min_by(|a, b| from.distance_sq_to(a).total_cmp(&from.distance_sq_to(b)))
}

fn nearest_point(from: &Position, points: &[Position]) -> Option<Position> {
    points
        .iter()
        .copied()
        .min_by(|a, b| from.distance_sq_to(a).total_cmp(&from.distance_sq_to(b)))
}
