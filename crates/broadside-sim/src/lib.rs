//! Simulation engine for BROADSIDE.
//!
//! Owns the hecs ECS world, runs every tick phase in a fixed order,
//! and produces per-connection world snapshots and match events.

pub mod clock;
pub mod engine;
pub mod progression;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use broadside_core as core;
pub use clock::FrameClock;
pub use engine::{SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
