//! Single-threaded timer queue
//!
//! Stands in for wall-clock callbacks (blast countdown, blink, aftershock
//! expiry, auto-spawn). Events are only ever drained at a tick boundary, so
//! nothing they do can interleave with a physics step.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Something scheduled to happen at a given clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Countdown for blast `blast` ran out
    Detonate { blast: u32 },
    /// Flip the blink flag of blast `blast`
    BlinkToggle { blast: u32 },
    /// Aftershock window has closed
    AftershockEnd,
    /// Periodic batch of random shapes for auto-spawn run `run`
    AutoSpawn { run: u32 },
}

#[derive(Debug, Clone)]
struct Scheduled {
    at: f64,
    seq: u64,
    event: SimEvent,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed so the max-heap yields the earliest, then first-scheduled, event
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Events ordered by due time, ties in scheduling order
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: f64, event: SimEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { at, seq, event });
    }

    /// Pop the earliest event due at or before `now`
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, SimEvent)> {
        if self.heap.peek().is_some_and(|s| s.at <= now) {
            self.heap.pop().map(|s| (s.at, s.event))
        } else {
            None
        }
    }

    /// Drop every pending event matching `pred`
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&SimEvent) -> bool) {
        self.heap.retain(|s| !pred(&s.event));
    }

    pub fn contains(&self, event: &SimEvent) -> bool {
        self.heap.iter().any(|s| &s.event == event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
