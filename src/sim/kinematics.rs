//! Per-shape motion for one frame
//!
//! Gravity, wall push, position integration, wall bounce, velocity clamp,
//! tint decay and trail bookkeeping, in that order.

use glam::Vec2;

use super::shape::Shape;
use super::tick::Frame;
use crate::consts::*;

/// Advance one shape by one frame
pub fn advance(shape: &mut Shape, frame: &Frame) {
    if frame.gravity {
        shape.vel.y += GRAVITY_STEP;
    }

    if frame.wall_push {
        shape.vel += wall_push(shape.pos, shape.radius(), frame.width, frame.height);
    }

    // Step scales with the live cap; stored velocity is untouched
    shape.pos += shape.vel * frame.speed_scale;

    let r = shape.radius();
    if shape.pos.x - r < 0.0 || shape.pos.x + r > frame.width {
        shape.vel.x = -shape.vel.x * DAMPING;
        if frame.energy_transfer {
            shape.energize();
        }
    }
    if shape.pos.y - r < 0.0 || shape.pos.y + r > frame.height {
        shape.vel.y = -shape.vel.y * DAMPING;
        if frame.energy_transfer {
            shape.energize();
        }
    }

    shape.clamp_velocity(frame.active_cap);

    shape.decay_tint();

    if frame.trails {
        shape.record_trail();
    } else {
        shape.clear_trail();
    }
}

/// Velocity increment pushing a shape out of the band near each edge.
/// Edges are independent, so corners get both pushes.
pub fn wall_push(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    let mut push = Vec2::ZERO;

    let left = pos.x - radius;
    if left < WALL_PUSH_BAND {
        push.x += WALL_PUSH_STRENGTH * (WALL_PUSH_BAND - left);
    }
    let right = pos.x + radius;
    if right > width - WALL_PUSH_BAND {
        push.x -= WALL_PUSH_STRENGTH * (right - (width - WALL_PUSH_BAND));
    }
    let top = pos.y - radius;
    if top < WALL_PUSH_BAND {
        push.y += WALL_PUSH_STRENGTH * (WALL_PUSH_BAND - top);
    }
    let bottom = pos.y + radius;
    if bottom > height - WALL_PUSH_BAND {
        push.y -= WALL_PUSH_STRENGTH * (bottom - (height - WALL_PUSH_BAND));
    }

    push
}
