//! Shape-shape collision detection and impulse response
//!
//! Every shape collides as a circle of radius `size / 2`. Detection is a
//! plain O(n²) scan after all shapes have moved; response is a single
//! impulse along the contact normal with no positional correction, so
//! overlapping shapes may stay visibly interpenetrated for a frame or two.

use glam::Vec2;

use super::shape::{Shape, ShapeKind};
use crate::consts::{CIRCLE_RESTITUTION, POLYGON_RESTITUTION};

/// Whether two shapes overlap (center distance strictly below the radius sum)
#[inline]
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    a.pos.distance_squared(b.pos) < (a.radius() + b.radius()).powi(2)
}

/// All overlapping index pairs `(i, j)` with `i < j`, in ascending order
pub fn detect_pairs(shapes: &[Shape]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for i in 0..shapes.len() {
        for j in (i + 1)..shapes.len() {
            if overlaps(&shapes[i], &shapes[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Restitution for a pair: circles bounce harder than polygons
pub fn restitution(a: ShapeKind, b: ShapeKind) -> f32 {
    if a == ShapeKind::Circle || b == ShapeKind::Circle {
        CIRCLE_RESTITUTION
    } else {
        POLYGON_RESTITUTION
    }
}

/// Impulse applied to a pair, if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    /// Unit normal from `a` toward `b`
    pub normal: Vec2,
    /// Scalar impulse along `normal`
    pub magnitude: f32,
}

/// Resolve a collision between two shapes by exchanging velocity along the
/// contact normal. Returns `None` (and leaves both untouched) when the
/// centers coincide or the shapes are already separating.
pub fn resolve(a: &mut Shape, b: &mut Shape, energy_transfer: bool) -> Option<Impulse> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist == 0.0 {
        return None;
    }
    let normal = delta / dist;

    let vel_along_normal = (b.vel - a.vel).dot(normal);
    if vel_along_normal >= 0.0 {
        return None;
    }

    let e = restitution(a.kind, b.kind);
    let magnitude = -(1.0 + e) * vel_along_normal / (1.0 / a.mass() + 1.0 / b.mass());

    let impulse = normal * magnitude;
    a.vel -= impulse / a.mass();
    b.vel += impulse / b.mass();

    if energy_transfer {
        a.energize();
        b.energize();
    }

    Some(Impulse { normal, magnitude })
}

/// Resolve every overlapping pair in ascending index order.
/// Returns the number of impulses applied.
pub fn resolve_all(shapes: &mut [Shape], energy_transfer: bool) -> usize {
    let mut applied = 0;
    for (i, j) in detect_pairs(shapes) {
        let (head, tail) = shapes.split_at_mut(j);
        if resolve(&mut head[i], &mut tail[0], energy_transfer).is_some() {
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Tint;
    use proptest::prelude::*;

    fn shape(kind: ShapeKind, pos: Vec2, vel: Vec2, mass: f32, size: f32) -> Shape {
        Shape::new(0, pos, vel, mass, kind, size).unwrap()
    }

    fn momentum(a: &Shape, b: &Shape) -> Vec2 {
        a.vel * a.mass() + b.vel * b.mass()
    }

    #[test]
    fn test_detect_pairs_ascending() {
        let shapes = vec![
            shape(ShapeKind::Circle, Vec2::new(0.0, 0.0), Vec2::ZERO, 1.0, 10.0),
            shape(ShapeKind::Square, Vec2::new(100.0, 0.0), Vec2::ZERO, 1.0, 10.0),
            shape(ShapeKind::Star, Vec2::new(8.0, 0.0), Vec2::ZERO, 1.0, 10.0),
            shape(ShapeKind::Triangle, Vec2::new(104.0, 0.0), Vec2::ZERO, 1.0, 10.0),
        ];
        assert_eq!(detect_pairs(&shapes), vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        let a = shape(ShapeKind::Circle, Vec2::ZERO, Vec2::ZERO, 1.0, 10.0);
        let b = shape(ShapeKind::Circle, Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0, 10.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_head_on_circles() {
        let mut a = shape(ShapeKind::Circle, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 1.0, 10.0);
        let mut b = shape(ShapeKind::Circle, Vec2::new(109.0, 100.0), Vec2::new(-2.0, 0.0), 1.0, 10.0);

        let impulse = resolve(&mut a, &mut b, false).unwrap();
        assert_eq!(impulse.normal, Vec2::X);
        assert!((a.vel.x + 2.2).abs() < 1e-5);
        assert!((b.vel.x - 2.2).abs() < 1e-5);
        assert_eq!(a.vel.y, 0.0);
        assert_eq!(b.vel.y, 0.0);
    }

    #[test]
    fn test_polygons_lose_speed() {
        let mut a = shape(ShapeKind::Square, Vec2::new(0.0, 0.0), Vec2::new(2.0, 0.0), 1.0, 10.0);
        let mut b = shape(ShapeKind::Star, Vec2::new(9.0, 0.0), Vec2::new(-2.0, 0.0), 1.0, 10.0);
        resolve(&mut a, &mut b, false).unwrap();
        assert!((a.vel.x + 1.8).abs() < 1e-5);
        assert!((b.vel.x - 1.8).abs() < 1e-5);
    }

    #[test]
    fn test_restitution_rule() {
        assert_eq!(restitution(ShapeKind::Circle, ShapeKind::Star), CIRCLE_RESTITUTION);
        assert_eq!(restitution(ShapeKind::Square, ShapeKind::Circle), CIRCLE_RESTITUTION);
        assert_eq!(restitution(ShapeKind::Square, ShapeKind::Triangle), POLYGON_RESTITUTION);
    }

    #[test]
    fn test_coincident_centers_noop() {
        let mut a = shape(ShapeKind::Circle, Vec2::ONE, Vec2::new(1.0, 0.0), 1.0, 10.0);
        let mut b = shape(ShapeKind::Circle, Vec2::ONE, Vec2::new(-1.0, 0.0), 1.0, 10.0);
        assert!(resolve(&mut a, &mut b, true).is_none());
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(a.tint, Tint::Neutral);
    }

    #[test]
    fn test_energy_transfer_tints_both() {
        let mut a = shape(ShapeKind::Circle, Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, 10.0);
        let mut b = shape(ShapeKind::Square, Vec2::new(5.0, 0.0), Vec2::ZERO, 1.0, 10.0);
        resolve(&mut a, &mut b, true).unwrap();
        assert!(matches!(a.tint, Tint::Energized { .. }));
        assert!(matches!(b.tint, Tint::Energized { .. }));
    }

    #[test]
    fn test_resolve_all_counts_impulses() {
        let mut shapes = vec![
            shape(ShapeKind::Circle, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), 1.0, 10.0),
            shape(ShapeKind::Circle, Vec2::new(8.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 10.0),
            // Overlapping but drifting apart
            shape(ShapeKind::Star, Vec2::new(50.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 10.0),
            shape(ShapeKind::Star, Vec2::new(58.0, 0.0), Vec2::new(1.0, 0.0), 1.0, 10.0),
        ];
        assert_eq!(resolve_all(&mut shapes, false), 1);
        assert_eq!(shapes[2].vel.x, -1.0);
        assert_eq!(shapes[3].vel.x, 1.0);
    }

    fn kind() -> impl Strategy<Value = ShapeKind> {
        prop::sample::select(ShapeKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            ka in kind(),
            kb in kind(),
            ma in 0.5f32..5.0,
            mb in 0.5f32..5.0,
            angle in 0.0f32..std::f32::consts::TAU,
            va in (-4.0f32..4.0, -4.0f32..4.0),
            vb in (-4.0f32..4.0, -4.0f32..4.0),
        ) {
            let offset = Vec2::from_angle(angle) * 10.0;
            let mut a = shape(ka, Vec2::ZERO, Vec2::new(va.0, va.1), ma, 20.0);
            let mut b = shape(kb, offset, Vec2::new(vb.0, vb.1), mb, 20.0);
            let before = momentum(&a, &b);
            let rel_before = (b.vel - a.vel).dot(offset.normalize());

            if resolve(&mut a, &mut b, false).is_some() {
                let after = momentum(&a, &b);
                prop_assert!((after - before).length() < 1e-3);

                // Normal relative speed scales by the restitution
                let rel_after = (b.vel - a.vel).dot(offset.normalize());
                let e = restitution(ka, kb);
                prop_assert!((rel_after + e * rel_before).abs() < 1e-3);
            } else {
                prop_assert!(rel_before >= -1e-5);
            }
        }

        #[test]
        fn prop_separating_pairs_untouched(
            ka in kind(),
            kb in kind(),
            angle in 0.0f32..std::f32::consts::TAU,
            speed in 0.1f32..4.0,
            drift in (-4.0f32..4.0, -4.0f32..4.0),
        ) {
            let normal = Vec2::from_angle(angle);
            let shared = Vec2::new(drift.0, drift.1);
            // b moves away from a along the normal
            let va = shared;
            let vb = shared + normal * speed;
            let mut a = shape(ka, Vec2::ZERO, va, 1.0, 20.0);
            let mut b = shape(kb, normal * 10.0, vb, 2.0, 20.0);

            prop_assert!(resolve(&mut a, &mut b, true).is_none());
            prop_assert_eq!(a.vel, va);
            prop_assert_eq!(b.vel, vb);
            prop_assert_eq!(a.tint, Tint::Neutral);
        }
    }
}
