//! Shot construction shared by player fire requests and AI gunnery.

use hecs::World;

use broadside_core::components::Vessel;
use broadside_core::constants::{MULTISHOT_SPREAD, MUZZLE_CLEARANCE};
use broadside_core::enums::OwnerClass;
use broadside_core::types::{PlayerId, Position};

use crate::progression::effective_reload;
use crate::world_setup;

/// A shot waiting to be materialized as projectiles.
#[derive(Debug, Clone, Copy)]
pub struct Volley {
    pub muzzle: Position,
    pub angle: f64,
    pub owner: Option<PlayerId>,
    pub owner_class: OwnerClass,
    /// Add the two angled side shots.
    pub spread: bool,
}

impl Volley {
    /// A volley leaving `vessel` at `origin` along `angle`.
    pub fn from_vessel(
        origin: Position,
        vessel: &Vessel,
        angle: f64,
        owner: Option<PlayerId>,
        owner_class: OwnerClass,
    ) -> Self {
        Self {
            muzzle: origin.offset(angle, vessel.size + MUZZLE_CLEARANCE),
            angle,
            owner,
            owner_class,
            spread: false,
        }
    }

    pub fn angles(&self) -> Vec<f64> {
        if self.spread {
            vec![self.angle, self.angle + MULTISHOT_SPREAD, self.angle - MULTISHOT_SPREAD]
        } else {
            vec![self.angle]
        }
    }
}

/// Start the reload countdown after a shot.
pub fn reset_reload(vessel: &mut Vessel) {
    vessel.reload = effective_reload(vessel);
}

/// Spawn every projectile of every volley. Returns the projectile count.
pub fn spawn_volleys(world: &mut World, volleys: &[Volley]) -> usize {
    let mut spawned = 0;
    for volley in volleys {
        for angle in volley.angles() {
            world_setup::spawn_projectile(world, volley.muzzle, angle, volley.owner, volley.owner_class);
            spawned += 1;
        }
    }
    spawned
}
