//! Messages emitted by the simulation to individual connections.

use serde::{Deserialize, Serialize};

use crate::enums::MatchStatus;
use crate::state::WorldSnapshot;
use crate::types::PlayerId;

/// A message for one connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Filtered world view for this tick.
    WorldSnapshot(Box<WorldSnapshot>),
    /// Sent once to the sole survivor when every bot is gone.
    MatchOver { status: MatchStatus },
    /// The recipient's vessel was destroyed and removed.
    Eliminated,
}

/// Addressed outbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outbound {
    pub to: PlayerId,
    pub message: ServerMessage,
}
