//! Client messages sent from a connection to the simulation.
//!
//! Messages are applied between ticks. Requests that fail their
//! preconditions are ignored, never rejected with an error.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Buffered steering input for one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInput {
    pub move_dir: MoveDir,
    /// Absolute heading in radians.
    pub angle: f64,
}

/// All possible client actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Spawn a vessel for this connection.
    #[serde(rename_all = "camelCase")]
    Join { display_name: String },
    /// Replace the buffered move input.
    Move(MoveInput),
    /// Fire along the current heading if reloaded.
    Fire,
    /// Spend one upgrade point.
    Upgrade { kind: UpgradeKind },
}

/// Everything a transport can report about one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Message(ClientMessage),
    /// The connection dropped; its vessel is deregistered.
    Disconnected,
}
