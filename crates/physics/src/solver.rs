//! # Constraint Projection
//!
//! Position-based projection of slider and pivot joints. Joints are rigid
//! (zero compliance).
//!
//! A slider is a distance-to-segment constraint, corrected along the
//! violation direction with the body's generalized inverse mass. A pivot is
//! a 2D point constraint: the correction solves the 2x2 effective inverse
//! mass system `K·p = C` of both anchors, so rotation and translation are
//! corrected together instead of along the current violation only.

use crate::types::{PivotJoint, RigidBody, SliderJoint, Vec2};

/// Violations below this are treated as satisfied.
const SOLVER_EPSILON: f64 = 1e-12;

/// Inverse mass of `body` felt along `n` at world offset `r`.
fn generalized_inverse_mass(body: &RigidBody, r: Vec2, n: Vec2) -> f64 {
    let rn = r.cross(n);
    body.inv_mass() + body.inv_inertia() * rn * rn
}

/// Effective inverse mass of the point at world offset `r`, as the
/// symmetric matrix `[k11, k12, k22]`.
fn point_inverse_mass(body: &RigidBody, r: Vec2) -> [f64; 3] {
    let m = body.inv_mass();
    let i = body.inv_inertia();
    [m + i * r.y * r.y, -i * r.x * r.y, m + i * r.x * r.x]
}

/// Move `body` by the positional impulse `impulse` acting at offset `r`.
fn apply_correction(body: &mut RigidBody, r: Vec2, impulse: Vec2) {
    body.pos += impulse * body.inv_mass();
    body.angle += body.inv_inertia() * r.cross(impulse);
}

/// Borrow two distinct bodies mutably.
fn pair_mut(bodies: &mut [RigidBody], a: usize, b: usize) -> Option<(&mut RigidBody, &mut RigidBody)> {
    if a == b || a >= bodies.len() || b >= bodies.len() {
        return None;
    }
    if a < b {
        let (head, tail) = bodies.split_at_mut(b);
        Some((&mut head[a], &mut tail[0]))
    } else {
        let (head, tail) = bodies.split_at_mut(a);
        Some((&mut tail[0], &mut head[b]))
    }
}

/// Closest point to `p` on the segment `a`-`b`.
#[must_use]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= SOLVER_EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Project one pivot joint. Returns the violation measured before projection.
pub fn solve_pivot(bodies: &mut [RigidBody], joint: &PivotJoint) -> f64 {
    let Some((a, b)) = pair_mut(bodies, joint.body_a, joint.body_b) else {
        return 0.0;
    };

    let ra = a.world_offset(joint.anchor_a);
    let rb = b.world_offset(joint.anchor_b);
    let delta = (b.pos + rb) - (a.pos + ra);
    let violation = delta.length();
    if violation <= SOLVER_EPSILON {
        return violation;
    }

    let [a11, a12, a22] = point_inverse_mass(a, ra);
    let [b11, b12, b22] = point_inverse_mass(b, rb);
    let (k11, k12, k22) = (a11 + b11, a12 + b12, a22 + b22);
    let det = k11 * k22 - k12 * k12;
    if det <= SOLVER_EPSILON {
        return violation;
    }

    let impulse = Vec2::new(
        (k22 * delta.x - k12 * delta.y) / det,
        (k11 * delta.y - k12 * delta.x) / det,
    );
    apply_correction(a, ra, impulse);
    apply_correction(b, rb, -impulse);
    violation
}

/// Project one slider joint against the static world.
pub fn solve_slider(bodies: &mut [RigidBody], joint: &SliderJoint) -> f64 {
    let Some(body) = bodies.get_mut(joint.body) else {
        return 0.0;
    };

    let r = body.world_offset(joint.anchor);
    let anchor = body.pos + r;
    let target = closest_point_on_segment(anchor, joint.groove_a, joint.groove_b);
    let delta = target - anchor;
    let violation = delta.length();
    if violation <= SOLVER_EPSILON {
        return violation;
    }

    let n = delta / violation;
    let w = generalized_inverse_mass(body, r, n);
    if w <= 0.0 {
        return violation;
    }
    apply_correction(body, r, n * (violation / w));
    violation
}

/// Current violation of a pivot joint, in world units.
#[must_use]
pub fn pivot_violation(bodies: &[RigidBody], joint: &PivotJoint) -> f64 {
    match (bodies.get(joint.body_a), bodies.get(joint.body_b)) {
        (Some(a), Some(b)) => (b.local_to_world(joint.anchor_b) - a.local_to_world(joint.anchor_a)).length(),
        _ => 0.0,
    }
}

/// Current violation of a slider joint, in world units.
#[must_use]
pub fn slider_violation(bodies: &[RigidBody], joint: &SliderJoint) -> f64 {
    bodies.get(joint.body).map_or(0.0, |body| {
        let anchor = body.local_to_world(joint.anchor);
        (closest_point_on_segment(anchor, joint.groove_a, joint.groove_b) - anchor).length()
    })
}
