//! Autonomous vessel AI for BROADSIDE.
//!
//! Implements the hostile bot and escort behavior state machines,
//! heading steering, and role-driven tuning profiles.

pub mod fsm;
pub mod profiles;
pub mod steering;

pub use broadside_core as core;
