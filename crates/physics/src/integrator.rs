//! # Physics Integration
//!
//! Explicit prediction of body poses from gravity and applied forces, and the
//! matching velocity update once constraints have moved the bodies.

use crate::types::{RigidBody, Vec2};

/// Predict new poses for one substep of length `h`.
///
/// Stores the current pose in `prev_pos`/`prev_angle` so velocities can be
/// recovered by [`update_velocities`] after the constraint pass.
pub fn integrate_bodies(bodies: &mut [RigidBody], gravity: Vec2, h: f64) {
    for body in bodies.iter_mut() {
        body.prev_pos = body.pos;
        body.prev_angle = body.angle;

        let inv_mass = body.inv_mass();
        if inv_mass > 0.0 {
            let acceleration = gravity + body.force * inv_mass;
            body.vel += acceleration * h;
        }
        body.pos += body.vel * h;

        if body.inv_inertia() > 0.0 {
            body.angle += body.angular_vel * h;
        }
    }
}

/// Derive velocities from the pose change of the last substep.
pub fn update_velocities(bodies: &mut [RigidBody], h: f64) {
    for body in bodies.iter_mut() {
        body.vel = (body.pos - body.prev_pos) / h;
        body.angular_vel = (body.angle - body.prev_angle) / h;
    }
}

pub fn clear_forces(bodies: &mut [RigidBody]) {
    for body in bodies.iter_mut() {
        body.force = Vec2::ZERO;
    }
}
