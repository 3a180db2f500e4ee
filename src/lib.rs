//! Shape Storm - a 2D bouncing-shapes toy
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (kinematics, collisions, blasts, timers)
//! - `settings`: User-facing switches read once per frame
//! - `error`: Construction/config errors
//!
//! Rendering, widgets and pointer capture live outside this crate. A host
//! calls [`sim::World::tick`] at a fixed cadence and reads back
//! [`sim::ShapeView`] snapshots for drawing.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{SimError, SimResult};
pub use settings::SimParams;

/// Simulation constants
pub mod consts {
    /// Frame period of the host loop (seconds)
    pub const FRAME_SECS: f64 = 1.0 / 60.0;

    /// Vertical velocity added per frame when gravity is on
    pub const GRAVITY_STEP: f32 = 0.1;
    /// Distance from an edge at which wall push starts
    pub const WALL_PUSH_BAND: f32 = 50.0;
    /// Velocity added per unit of wall-band penetration
    pub const WALL_PUSH_STRENGTH: f32 = 0.05;
    /// Velocity retained (and reversed) on a wall bounce
    pub const DAMPING: f32 = 0.9;

    /// Baseline velocity cap; positions integrate at `cap / DEFAULT_VELOCITY_CAP`
    pub const DEFAULT_VELOCITY_CAP: f32 = 4.0;
    /// Velocity cap while an aftershock is active
    pub const BLAST_VELOCITY_CAP: f32 = 10.0;

    /// Recent positions kept per shape
    pub const TRAIL_LENGTH: usize = 20;
    /// Frames a speed tint stays before fading to neutral
    pub const TINT_FRAMES: u32 = 30;

    /// Restitution when either body is a circle
    pub const CIRCLE_RESTITUTION: f32 = 1.1;
    /// Restitution between two polygons
    pub const POLYGON_RESTITUTION: f32 = 0.9;

    /// Blast effect radius
    pub const BLAST_RADIUS: f32 = 200.0;
    /// Radius of the armed blast ball as drawn
    pub const BLAST_BALL_RADIUS: f32 = 80.0;
    /// Numerator of the blast boost factor (`strength / distance`)
    pub const BLAST_STRENGTH: f32 = 15.0;
    /// Shapes at or below this size never fragment
    pub const MIN_FRAGMENT_SIZE: f32 = 20.0;
    /// Chance a large enough shape shatters instead of being pushed
    pub const FRAGMENT_CHANCE: f64 = 0.5;
    /// Smallest and largest piece count (inclusive)
    pub const MIN_PIECES: u32 = 2;
    pub const MAX_PIECES: u32 = 4;

    /// Countdown from arming to detonation (seconds)
    pub const BLAST_COUNTDOWN_SECS: f64 = 3.0;
    /// Raised-cap window after detonation (seconds)
    pub const AFTERSHOCK_SECS: f64 = 1.0;
    /// Blink period of an armed blast (seconds)
    pub const BLINK_SECS: f64 = 0.3;
    /// Keep armed blasts this far from the canvas edge when placed randomly
    pub const BLAST_EDGE_MARGIN: f32 = 100.0;

    /// Shapes spawned by `reset`
    pub const INITIAL_SHAPES: usize = 5;
    /// Auto-spawn period (seconds) and batch size
    pub const AUTO_SPAWN_SECS: f64 = 30.0;
    pub const AUTO_SPAWN_BATCH: usize = 5;
    /// Keep random spawns this far from the canvas edge
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Default canvas size for headless runs
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
}

/// Linear remap of `value` from `[from_lo, from_hi]` to `[to_lo, to_hi]` (unclamped)
#[inline]
pub fn remap(value: f32, from_lo: f32, from_hi: f32, to_lo: f32, to_hi: f32) -> f32 {
    to_lo + (value - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}
