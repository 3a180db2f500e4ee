//! Shape entities and the read-only views handed to the renderer

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Outline drawn for a shape. Physics treats every kind as a circle of
/// radius `size / 2`; only restitution looks at the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
    ];
}

/// Collision-indicator tint
///
/// The core only records how fast a shape was moving when it was last
/// energized; turning that into a color is the renderer's job.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    Neutral,
    /// Speed divided by the blast velocity cap, clamped to [0, 1]
    /// (0 = at rest, 1 = at or above the blast cap)
    Energized { level: f32 },
}

/// A moving rigid body
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    mass: f32,
    size: f32,
    pub kind: ShapeKind,
    pub tint: Tint,
    /// Frames left before `tint` returns to neutral
    pub tint_ticks: u32,
    /// Oldest first
    pub trail: VecDeque<Vec2>,
}

impl Shape {
    /// Build a shape, rejecting non-positive or non-finite mass and size and
    /// non-finite position or velocity
    pub fn new(
        id: u32,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        kind: ShapeKind,
        size: f32,
    ) -> SimResult<Self> {
        if !(size.is_finite() && size > 0.0) {
            return Err(SimError::InvalidSize(size));
        }
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidMass(mass));
        }
        if !pos.is_finite() {
            return Err(SimError::InvalidPosition(pos));
        }
        if !vel.is_finite() {
            return Err(SimError::InvalidVelocity(vel));
        }
        Ok(Self::from_parts(id, pos, vel, mass, kind, size))
    }

    /// Caller guarantees `mass` and `size` are finite and positive
    pub(crate) fn from_parts(
        id: u32,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        kind: ShapeKind,
        size: f32,
    ) -> Self {
        Self {
            id,
            pos,
            vel,
            mass,
            size,
            kind,
            tint: Tint::Neutral,
            tint_ticks: 0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// One of `pieces` equal fragments of this shape: mass split evenly,
    /// size scaled by `1 / sqrt(pieces)`, same kind
    pub(crate) fn piece(&self, id: u32, pos: Vec2, vel: Vec2, pieces: u32) -> Shape {
        let n = pieces.max(1) as f32;
        Self::from_parts(id, pos, vel, self.mass / n, self.kind, self.size / n.sqrt())
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Diameter
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Tint keyed to current speed, held for `TINT_FRAMES`
    pub fn energize(&mut self) {
        self.tint = Tint::Energized {
            level: (self.speed() / BLAST_VELOCITY_CAP).min(1.0),
        };
        self.tint_ticks = TINT_FRAMES;
    }

    /// Count down the tint; neutral once it runs out
    pub fn decay_tint(&mut self) {
        if self.tint_ticks > 0 {
            self.tint_ticks -= 1;
        }
        if self.tint_ticks == 0 {
            self.tint = Tint::Neutral;
        }
    }

    /// Append the current position, evicting the oldest past capacity
    pub fn record_trail(&mut self) {
        self.trail.push_back(self.pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    pub fn clamp_velocity(&mut self, cap: f32) {
        self.vel = self.vel.clamp(Vec2::splat(-cap), Vec2::splat(cap));
    }

    pub fn view(&self) -> ShapeView {
        ShapeView {
            id: self.id,
            pos: self.pos,
            vel: self.vel,
            size: self.size,
            mass: self.mass,
            kind: self.kind,
            speed: self.speed(),
            tint: self.tint,
            trail: self.trail.iter().copied().collect(),
        }
    }
}

/// Snapshot of a shape for drawing and annotations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub mass: f32,
    pub kind: ShapeKind,
    pub speed: f32,
    pub tint: Tint,
    /// Oldest first
    pub trail: Vec<Vec2>,
}
