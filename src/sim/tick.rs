//! Fixed-cadence frame step
//!
//! One call to [`World::tick`] runs, in order: due timer events (blink,
//! detonation, aftershock expiry, auto-spawn), kinematics for every shape,
//! then pairwise collision detection and response.

use super::blast::BlastReport;
use super::collision::resolve_all;
use super::events::SimEvent;
use super::kinematics::advance;
use super::state::World;
use crate::consts::*;
use crate::settings::SimParams;

/// Settings as seen by one frame. Built once per tick so no switch can change
/// halfway through a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub gravity: bool,
    pub wall_push: bool,
    pub trails: bool,
    pub energy_transfer: bool,
    /// Position step multiplier (`velocity_cap / DEFAULT_VELOCITY_CAP`)
    pub speed_scale: f32,
    /// Velocity clamp for this frame (raised during an aftershock)
    pub active_cap: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(params: &SimParams, width: f32, height: f32, aftershock: bool) -> Self {
        Self {
            gravity: params.gravity,
            wall_push: params.wall_push,
            trails: params.trails,
            energy_transfer: params.energy_transfer,
            speed_scale: params.speed_scale(),
            active_cap: params.active_cap(aftershock),
            width,
            height,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Impulses applied between shapes
    pub collisions: usize,
    /// Set if a blast went off at the start of this tick
    pub blast: Option<BlastReport>,
}

impl World {
    /// Advance one frame at the nominal frame period
    pub fn tick(&mut self) -> TickReport {
        self.step(FRAME_SECS)
    }

    /// Advance one frame after `elapsed` seconds of wall-clock time.
    ///
    /// Physics always moves exactly one frame; `elapsed` only drives the
    /// timers, so countdowns keep wall-clock pace at any frame rate.
    /// Negative or non-finite `elapsed` leaves the clock where it is.
    pub fn step(&mut self, elapsed: f64) -> TickReport {
        if elapsed.is_finite() {
            self.clock += elapsed.max(0.0);
        } else {
            log::warn!("Ignoring non-finite frame time {elapsed}");
        }
        self.frame_count += 1;

        let blast = self.run_due_events();

        let frame = self.frame();
        for shape in &mut self.shapes {
            advance(shape, &frame);
        }

        let collisions = resolve_all(&mut self.shapes, frame.energy_transfer);
        // Collision impulses can overshoot the cap; hold it at the frame boundary
        for shape in &mut self.shapes {
            shape.clamp_velocity(frame.active_cap);
        }

        TickReport { collisions, blast }
    }

    /// Snapshot of the switches for this frame
    pub fn frame(&self) -> Frame {
        Frame::new(&self.params, self.width, self.height, self.aftershock)
    }

    /// Drain and apply every event due by the current clock
    fn run_due_events(&mut self) -> Option<BlastReport> {
        let mut blast = None;
        while let Some((at, event)) = self.events.pop_due(self.clock) {
            match event {
                SimEvent::Detonate { blast: id } => {
                    if self.blast.as_ref().is_some_and(|b| b.id == id) {
                        blast = self.detonate_blast().or(blast);
                    }
                }
                SimEvent::BlinkToggle { blast: id } => {
                    if let Some(b) = self.blast.as_mut().filter(|b| b.id == id && b.is_armed()) {
                        b.toggle_blink();
                        self.events
                            .schedule(at + BLINK_SECS, SimEvent::BlinkToggle { blast: id });
                    }
                }
                SimEvent::AftershockEnd => {
                    self.aftershock = false;
                    log::debug!("Aftershock over");
                }
                SimEvent::AutoSpawn { run } => {
                    if self.params.auto_spawn && run == self.auto_spawn_run() {
                        self.spawn_shapes(AUTO_SPAWN_BATCH);
                        log::debug!("Auto-spawned {} shapes ({} total)", AUTO_SPAWN_BATCH, self.len());
                        // From now, not from `at`: a long stall yields one batch
                        self.events
                            .schedule(self.clock + AUTO_SPAWN_SECS, SimEvent::AutoSpawn { run });
                    }
                }
            }
        }
        blast
    }
}
