//! Kinematic integration for vessels.
//!
//! Thrust along the heading, friction damping, then position += velocity,
//! clamped to the world with the collision radius as margin.

use hecs::World;

use broadside_ai::steering::turn_toward;
use broadside_core::components::{Helm, Role, Vessel};
use broadside_core::constants::{FRICTION, PLAYER_REVERSE_FACTOR, WORLD_H, WORLD_W};
use broadside_core::enums::MoveDir;
use broadside_core::types::{Position, Velocity};

/// Integrate every vessel for one tick at the given frame scale.
pub fn run(world: &mut World, scale: f64) {
    for (_entity, (pos, vel, vessel, helm, role)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Vessel, &Helm, &mut Role)>()
    {
        let throttle = match role {
            Role::Player(player) => match player.pending_input.take() {
                Some(input) => {
                    vessel.heading = input.angle;
                    match input.move_dir {
                        MoveDir::Forward => 1.0,
                        MoveDir::Backward => -PLAYER_REVERSE_FACTOR,
                        MoveDir::Neutral => 0.0,
                    }
                }
                None => 0.0,
            },
            Role::Bot(_) | Role::Escort(_) => match helm.desired_heading {
                Some(desired) => {
                    vessel.heading = turn_toward(vessel.heading, desired, vessel.turn_speed);
                    1.0
                }
                None => 0.0,
            },
        };

        let thrust = Velocity::from_heading(vessel.heading, vessel.thrust * throttle * scale);
        *vel = Velocity::from_vec((vel.as_vec() + thrust.as_vec()) * FRICTION);

        pos.x += vel.x;
        pos.y += vel.y;
        pos.clamp_to_world(WORLD_W, WORLD_H, vessel.collision_r);
    }
}
