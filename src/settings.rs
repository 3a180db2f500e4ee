//! Simulation switches and the velocity cap
//!
//! The UI flips these between frames; the simulation only reads them, once
//! per frame, through a [`crate::sim::Frame`] snapshot.

use serde::{Deserialize, Serialize};

use crate::consts::{BLAST_VELOCITY_CAP, DEFAULT_VELOCITY_CAP};
use crate::error::{SimError, SimResult};

/// User-adjustable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Constant downward pull
    pub gravity: bool,
    /// Tint shapes by speed after bounces and collisions
    pub energy_transfer: bool,
    /// Soft repulsion near the canvas edges
    pub wall_push: bool,
    /// Record recent positions for trail drawing
    pub trails: bool,
    /// Mass/speed labels (drawn by the UI)
    pub annotations: bool,
    /// Add a batch of random shapes periodically
    pub auto_spawn: bool,
    /// Live velocity cap (UI slider, 1..=10)
    pub velocity_cap: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: false,
            energy_transfer: false,
            wall_push: false,
            trails: false,
            annotations: false,
            auto_spawn: false,
            velocity_cap: DEFAULT_VELOCITY_CAP,
        }
    }
}

impl SimParams {
    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        let params: SimParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> SimResult<()> {
        check_velocity_cap(self.velocity_cap)
    }

    /// Cap applied to velocities this frame
    pub fn active_cap(&self, aftershock: bool) -> f32 {
        if aftershock {
            BLAST_VELOCITY_CAP
        } else {
            self.velocity_cap
        }
    }

    /// Position integration multiplier (`cap / default cap`)
    pub fn speed_scale(&self) -> f32 {
        self.velocity_cap / DEFAULT_VELOCITY_CAP
    }
}

pub(crate) fn check_velocity_cap(cap: f32) -> SimResult<()> {
    if cap.is_finite() && cap > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidVelocityCap(cap))
    }
}
