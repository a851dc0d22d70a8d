//! Heading steering for autonomous vessels.

use broadside_core::types::angle_delta;

/// Turn `current` toward `desired` by at most `max_turn` radians,
/// taking the shorter way around.
pub fn turn_toward(current: f64, desired: f64, max_turn: f64) -> f64 {
    current + angle_delta(current, desired).clamp(-max_turn, max_turn)
}
