//! BROADSIDE match server.
//!
//! Hosts one simulation engine on a dedicated game loop thread and bridges
//! it to connections over a JSON-lines transport on stdin/stdout.

pub mod config;
pub mod game_loop;
pub mod transport;

pub use broadside_core as core;
