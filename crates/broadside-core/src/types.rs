//! Fundamental geometric and simulation types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in world space. x grows right, y grows down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in world units per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Transport-assigned identity of a connected player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated tick).
    pub tick: u64,
    /// Accumulated frame scale, i.e. elapsed time in nominal ticks.
    pub elapsed_ticks: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_vec().distance(other.as_vec())
    }

    pub fn distance_sq_to(&self, other: &Position) -> f64 {
        self.as_vec().distance_squared(other.as_vec())
    }

    /// Angle (radians, atan2 convention) from this position to another.
    pub fn angle_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point `distance` units away along `angle`.
    pub fn offset(&self, angle: f64, distance: f64) -> Position {
        Position::from_vec(self.as_vec() + DVec2::from_angle(angle) * distance)
    }

    /// True when both axis deltas to `other` are below `tolerance`.
    pub fn within_box(&self, other: &Position, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }

    /// Clamp into `[margin, width - margin] x [margin, height - margin]`.
    pub fn clamp_to_world(&mut self, width: f64, height: f64, margin: f64) {
        self.x = self.x.clamp(margin, width - margin);
        self.y = self.y.clamp(margin, height - margin);
    }

    pub fn in_bounds(&self, width: f64, height: f64) -> bool {
        (0.0..=width).contains(&self.x) && (0.0..=height).contains(&self.y)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_vec(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Velocity of magnitude `speed` along `angle`.
    pub fn from_heading(angle: f64, speed: f64) -> Self {
        Self::from_vec(DVec2::from_angle(angle) * speed)
    }

    pub fn speed(&self) -> f64 {
        self.as_vec().length()
    }
}

impl SimTime {
    /// Advance by one tick of the given frame scale.
    pub fn advance(&mut self, scale: f64) {
        self.tick += 1;
        self.elapsed_ticks += scale;
    }
}

/// Shortest signed angular difference `to - from`, in `[-PI, PI)`.
pub fn angle_delta(from: f64, to: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (to - from + PI).rem_euclid(TAU) - PI
}
