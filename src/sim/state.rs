//! World state: the shape collection, switches, timers and RNG
//!
//! The world exclusively owns its shapes. Callers add and remove them through
//! the population methods here and read them back as [`ShapeView`] snapshots;
//! the per-frame step lives in `tick.rs`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::blast::{Blast, BlastReport, BlastView};
use super::events::{EventQueue, SimEvent};
use super::shape::{Shape, ShapeKind, ShapeView};
use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::remap;
use crate::settings::{SimParams, check_velocity_cap};

/// The whole simulation
#[derive(Debug, Clone)]
pub struct World {
    /// Seed the RNG was built from
    seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) params: SimParams,
    pub(crate) width: f32,
    pub(crate) height: f32,
    /// Live shapes; order only matters for draw layering and pair order
    pub(crate) shapes: Vec<Shape>,
    /// Most recent blast (armed or spent)
    pub(crate) blast: Option<Blast>,
    /// Raised velocity cap in effect
    pub(crate) aftershock: bool,
    /// Virtual wall clock (seconds)
    pub(crate) clock: f64,
    pub(crate) frame_count: u64,
    pub(crate) events: EventQueue,
    next_id: u32,
    next_blast_id: u32,
    auto_spawn_run: u32,
}

impl World {
    /// Empty world on a `width` x `height` canvas
    pub fn new(seed: u64, width: f32, height: f32) -> SimResult<Self> {
        Self::with_params(seed, width, height, SimParams::default())
    }

    pub fn with_params(seed: u64, width: f32, height: f32, params: SimParams) -> SimResult<Self> {
        check_canvas(width, height)?;
        params.validate()?;

        let auto_spawn = params.auto_spawn;
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            params: SimParams {
                auto_spawn: false,
                ..params
            },
            width,
            height,
            shapes: Vec::new(),
            blast: None,
            aftershock: false,
            clock: 0.0,
            frame_count: 0,
            events: EventQueue::new(),
            next_id: 1,
            next_blast_id: 1,
            auto_spawn_run: 0,
        };
        world.set_auto_spawn(auto_spawn);
        Ok(world)
    }

    fn next_shape_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Clear everything and start over with a handful of random shapes.
    /// Switches (including auto-spawn) are kept; a pending blast is dropped.
    pub fn reset(&mut self) {
        self.shapes.clear();
        self.disarm_blast();
        self.spawn_shapes(INITIAL_SHAPES);
        log::info!("World reset with {} shapes", self.shapes.len());
    }

    /// Add a shape with explicit state. Returns its id.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        kind: ShapeKind,
        size: f32,
    ) -> SimResult<u32> {
        let id = self.next_id;
        let shape = Shape::new(id, pos, vel, mass, kind, size)?;
        self.next_id += 1;
        self.shapes.push(shape);
        Ok(id)
    }

    /// Add one shape of random kind, position, velocity, mass and size
    pub fn spawn_random_shape(&mut self) -> u32 {
        let kind = ShapeKind::ALL[self.rng.random_range(0..ShapeKind::ALL.len())];
        let x = random_between(&mut self.rng, SPAWN_MARGIN, self.width - SPAWN_MARGIN);
        let y = random_between(&mut self.rng, SPAWN_MARGIN, self.height - SPAWN_MARGIN);
        let vel = Vec2::new(
            self.rng.random_range(-2.0..2.0),
            self.rng.random_range(-2.0..2.0),
        );
        let mass = self.rng.random_range(1.0..3.0);
        let size = self.rng.random_range(20.0..40.0);

        let id = self.next_shape_id();
        // mass and size ranges are strictly positive
        self.shapes
            .push(Shape::from_parts(id, Vec2::new(x, y), vel, mass, kind, size));
        id
    }

    pub fn spawn_shapes(&mut self, count: usize) {
        for _ in 0..count {
            self.spawn_random_shape();
        }
    }

    /// Drop a circle at `(x, y)`; mass follows size linearly (20 -> 1, 100 -> 5)
    pub fn spawn_at(&mut self, x: f32, y: f32, size: f32) -> SimResult<u32> {
        if !(size.is_finite() && size > 0.0) {
            return Err(SimError::InvalidSize(size));
        }
        check_position(x, y)?;
        let mass = remap(size, 20.0, 100.0, 1.0, 5.0);
        let vel = Vec2::new(
            self.rng.random_range(-2.0..2.0),
            self.rng.random_range(-2.0..2.0),
        );
        self.spawn(Vec2::new(x, y), vel, mass, ShapeKind::Circle, size)
    }

    /// Remove `floor(len * fraction)` shapes picked at random.
    /// Returns how many were removed.
    pub fn remove_fraction(&mut self, fraction: f32) -> SimResult<usize> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(SimError::InvalidFraction(fraction));
        }
        let count = (self.shapes.len() as f32 * fraction).floor() as usize;
        for _ in 0..count {
            let idx = self.rng.random_range(0..self.shapes.len());
            self.shapes.remove(idx);
        }
        log::debug!("Removed {} shapes, {} left", count, self.shapes.len());
        Ok(count)
    }

    /// Remove one shape by id. Returns false if no such shape.
    pub fn remove_shape(&mut self, id: u32) -> bool {
        match self.shapes.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.shapes.remove(idx);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Blasts
    // ------------------------------------------------------------------

    /// Arm a blast at `(x, y)`, superseding any blast still counting down.
    /// It goes off `BLAST_COUNTDOWN_SECS` of clock time later.
    pub fn arm_blast(&mut self, x: f32, y: f32) -> SimResult<u32> {
        check_position(x, y)?;
        Ok(self.arm_blast_at(Vec2::new(x, y)))
    }

    /// Arm a blast somewhere away from the edges
    pub fn arm_random_blast(&mut self) -> u32 {
        let x = random_between(&mut self.rng, BLAST_EDGE_MARGIN, self.width - BLAST_EDGE_MARGIN);
        let y = random_between(&mut self.rng, BLAST_EDGE_MARGIN, self.height - BLAST_EDGE_MARGIN);
        self.arm_blast_at(Vec2::new(x, y))
    }

    /// `center` must be finite
    fn arm_blast_at(&mut self, center: Vec2) -> u32 {
        if self.blast.as_ref().is_some_and(Blast::is_armed) {
            log::debug!("Superseding armed blast");
        }
        self.disarm_blast();

        let id = self.next_blast_id;
        self.next_blast_id += 1;
        self.blast = Some(Blast::new(id, center));
        self.events
            .schedule(self.clock + BLAST_COUNTDOWN_SECS, SimEvent::Detonate { blast: id });
        self.events
            .schedule(self.clock + BLINK_SECS, SimEvent::BlinkToggle { blast: id });

        log::info!("Blast {} armed at ({:.0}, {:.0})", id, center.x, center.y);
        id
    }

    /// Set off the current blast now. `None` if there is no armed blast.
    pub fn detonate_blast(&mut self) -> Option<BlastReport> {
        let blast = self.blast.as_mut()?;
        let id = blast.id;
        let report = blast.detonate(
            &mut self.shapes,
            &mut self.next_id,
            self.params.energy_transfer,
            &mut self.rng,
        )?;

        self.events.cancel_where(|e| {
            *e == SimEvent::BlinkToggle { blast: id } || *e == SimEvent::Detonate { blast: id }
        });
        self.aftershock = true;
        self.events
            .schedule(self.clock + AFTERSHOCK_SECS, SimEvent::AftershockEnd);

        log::info!(
            "Blast {} detonated: {} pushed, {} shattered into {} pieces ({} shapes)",
            id,
            report.pushed,
            report.shattered,
            report.pieces,
            self.shapes.len()
        );
        Some(report)
    }

    /// Cancel the current blast's timers and forget it
    fn disarm_blast(&mut self) {
        if let Some(old) = self.blast.take() {
            let old_id = old.id;
            self.events.cancel_where(|e| {
                matches!(e, SimEvent::Detonate { blast } | SimEvent::BlinkToggle { blast } if *blast == old_id)
            });
        }
    }

    // ------------------------------------------------------------------
    // Switches
    // ------------------------------------------------------------------

    /// Replace every switch at once
    pub fn set_params(&mut self, params: SimParams) -> SimResult<()> {
        params.validate()?;
        let auto_spawn = params.auto_spawn;
        self.params = SimParams {
            auto_spawn: self.params.auto_spawn,
            ..params
        };
        self.set_auto_spawn(auto_spawn);
        Ok(())
    }

    pub fn set_gravity(&mut self, on: bool) {
        self.params.gravity = on;
    }

    pub fn set_wall_push(&mut self, on: bool) {
        self.params.wall_push = on;
    }

    pub fn set_trails(&mut self, on: bool) {
        self.params.trails = on;
    }

    pub fn set_energy_transfer(&mut self, on: bool) {
        self.params.energy_transfer = on;
    }

    pub fn set_annotations(&mut self, on: bool) {
        self.params.annotations = on;
    }

    pub fn set_velocity_cap(&mut self, cap: f32) -> SimResult<()> {
        check_velocity_cap(cap)?;
        self.params.velocity_cap = cap;
        Ok(())
    }

    /// Start or stop adding `AUTO_SPAWN_BATCH` shapes every `AUTO_SPAWN_SECS`
    pub fn set_auto_spawn(&mut self, on: bool) {
        if on == self.params.auto_spawn {
            return;
        }
        self.params.auto_spawn = on;
        self.events
            .cancel_where(|e| matches!(e, SimEvent::AutoSpawn { .. }));
        if on {
            self.auto_spawn_run += 1;
            self.events.schedule(
                self.clock + AUTO_SPAWN_SECS,
                SimEvent::AutoSpawn {
                    run: self.auto_spawn_run,
                },
            );
        }
        log::debug!("Auto-spawn {}", if on { "on" } else { "off" });
    }

    pub(crate) fn auto_spawn_run(&self) -> u32 {
        self.auto_spawn_run
    }

    pub fn resize(&mut self, width: f32, height: f32) -> SimResult<()> {
        check_canvas(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn canvas(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Snapshots of every shape, in draw order
    pub fn shapes(&self) -> Vec<ShapeView> {
        self.shapes.iter().map(Shape::view).collect()
    }

    pub fn shape(&self, id: u32) -> Option<ShapeView> {
        self.shapes.iter().find(|s| s.id == id).map(Shape::view)
    }

    /// Current blast, if one has been armed since the last reset
    pub fn blast(&self) -> Option<BlastView> {
        self.blast.as_ref().map(Blast::view)
    }

    pub fn aftershock_active(&self) -> bool {
        self.aftershock
    }

    /// Virtual clock (seconds)
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Sum of kinetic energy over all shapes
    pub fn kinetic_energy(&self) -> f32 {
        self.shapes
            .iter()
            .map(|s| 0.5 * s.mass() * s.vel.length_squared())
            .sum()
    }
}

fn check_canvas(width: f32, height: f32) -> SimResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidCanvas { width, height })
    }
}

fn check_position(x: f32, y: f32) -> SimResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidPosition(Vec2::new(x, y)))
    }
}

/// Uniform in `[lo, hi)`, or the midpoint when the range is empty
fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}
