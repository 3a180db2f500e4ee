//! Errors raised when callers hand the simulation bad input
//!
//! The physics itself never fails; these cover construction and config only.

use std::fmt;

use glam::Vec2;

pub type SimResult<T> = Result<T, SimError>;

/// Rejected input
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Mass must be finite and positive
    InvalidMass(f32),
    /// Size must be finite and positive
    InvalidSize(f32),
    /// Positions (shape or blast center) must be finite
    InvalidPosition(Vec2),
    /// Velocity components must be finite
    InvalidVelocity(Vec2),
    /// Removal fraction must lie in [0, 1]
    InvalidFraction(f32),
    /// Velocity cap must be finite and positive
    InvalidVelocityCap(f32),
    /// Canvas must have finite, positive dimensions
    InvalidCanvas { width: f32, height: f32 },
    /// Settings JSON could not be parsed
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidMass(m) => write!(f, "invalid mass {m}: must be finite and > 0"),
            SimError::InvalidSize(s) => write!(f, "invalid size {s}: must be finite and > 0"),
            SimError::InvalidPosition(p) => {
                write!(f, "invalid position ({}, {}): must be finite", p.x, p.y)
            }
            SimError::InvalidVelocity(v) => {
                write!(f, "invalid velocity ({}, {}): must be finite", v.x, v.y)
            }
            SimError::InvalidFraction(p) => write!(f, "invalid fraction {p}: must be in [0, 1]"),
            SimError::InvalidVelocityCap(c) => {
                write!(f, "invalid velocity cap {c}: must be finite and > 0")
            }
            SimError::InvalidCanvas { width, height } => {
                write!(f, "invalid canvas {width}x{height}")
            }
            SimError::Config(msg) => write!(f, "bad settings: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}
