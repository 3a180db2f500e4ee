//! Timed blasts: radial push and fragmentation
//!
//! A blast is armed at a point, counts down, then detonates once. Every
//! shape within [`BLAST_RADIUS`] of the center is either pushed away or,
//! if it is big enough and the coin flip says so, shattered into 2-4
//! smaller pieces of the same kind.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::shape::Shape;
use crate::consts::*;

/// Lifecycle of a blast. Detonation itself is instantaneous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlastState {
    /// Counting down, drawn blinking
    Armed,
    /// Detonated; further detonation requests do nothing
    Spent,
}

/// A single blast
#[derive(Debug, Clone)]
pub struct Blast {
    /// Generation id; timers carry it so superseded blasts can be ignored
    pub id: u32,
    pub center: Vec2,
    pub state: BlastState,
    pub blink_on: bool,
}

/// What a detonation did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlastReport {
    /// Shapes whose velocity was boosted
    pub pushed: usize,
    /// Shapes that were replaced by pieces
    pub shattered: usize,
    /// Pieces added to the collection
    pub pieces: usize,
}

/// Read-only blast snapshot for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlastView {
    pub center: Vec2,
    /// Radius of the drawn ball
    pub ball_radius: f32,
    /// Radius within which shapes are affected
    pub effect_radius: f32,
    pub state: BlastState,
    pub blink_on: bool,
}

impl Blast {
    pub fn new(id: u32, center: Vec2) -> Self {
        Self {
            id,
            center,
            state: BlastState::Armed,
            blink_on: true,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state == BlastState::Armed
    }

    pub fn toggle_blink(&mut self) {
        self.blink_on = !self.blink_on;
    }

    pub fn view(&self) -> BlastView {
        BlastView {
            center: self.center,
            ball_radius: BLAST_BALL_RADIUS,
            effect_radius: BLAST_RADIUS,
            state: self.state,
            blink_on: self.blink_on,
        }
    }

    /// Apply the blast to every shape in `shapes`.
    ///
    /// Decisions are made against the collection as it stood on entry:
    /// shattered parents are removed and their pieces appended only after the
    /// scan. Returns `None` if this blast has already gone off.
    pub fn detonate<R: Rng>(
        &mut self,
        shapes: &mut Vec<Shape>,
        next_id: &mut u32,
        energy_transfer: bool,
        rng: &mut R,
    ) -> Option<BlastReport> {
        if !self.is_armed() {
            return None;
        }
        self.state = BlastState::Spent;

        let mut report = BlastReport::default();
        let mut shattered: Vec<u32> = Vec::new();
        let mut debris: Vec<Shape> = Vec::new();

        for shape in shapes.iter_mut() {
            let offset = shape.pos - self.center;
            let dist = offset.length();
            // Dead center has no direction to push in
            if dist.is_nan() || dist >= BLAST_RADIUS || dist == 0.0 {
                continue;
            }
            // boost * offset always has length BLAST_STRENGTH; jitter shrinks with distance
            let boost = BLAST_STRENGTH / dist;

            if shape.size() > MIN_FRAGMENT_SIZE && rng.random_bool(FRAGMENT_CHANCE) {
                let pieces = rng.random_range(MIN_PIECES..=MAX_PIECES);
                let r = shape.radius();
                for _ in 0..pieces {
                    let pos = shape.pos
                        + Vec2::new(rng.random_range(-r..r), rng.random_range(-r..r));
                    let jitter = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                    let vel = shape.vel + boost * (offset + jitter);

                    let id = *next_id;
                    *next_id += 1;
                    let mut piece = shape.piece(id, pos, vel, pieces);
                    if energy_transfer {
                        piece.energize();
                    }
                    debris.push(piece);
                }
                shattered.push(shape.id);
                report.shattered += 1;
                report.pieces += pieces as usize;
            } else {
                shape.vel += boost * offset;
                if energy_transfer {
                    shape.energize();
                }
                report.pushed += 1;
            }
        }

        if !shattered.is_empty() {
            shapes.retain(|s| !shattered.contains(&s.id));
        }
        shapes.extend(debris);

        Some(report)
    }
}
