//! # Physics Simulation Builder
//!
//! Builder methods for adding bodies and joints to a [`PhysicsSim`].
//! Joint anchors are captured in each body's local frame at creation time.

use crate::error::PhysicsError;
use crate::types::{moment_for_box, PivotJoint, RigidBody, SliderJoint, Vec2};
use crate::PhysicsSim;

/// Builder methods for adding rigid bodies to the simulation
impl PhysicsSim {
    /// Add a body with explicit mass and moment of inertia.
    ///
    /// Either may be `f64::INFINITY`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidBody`] for non-positive or NaN mass or
    /// inertia, or a non-finite position.
    pub fn add_body(&mut self, mass: f64, inertia: f64, pos: Vec2) -> Result<usize, PhysicsError> {
        if mass.is_nan() || mass <= 0.0 {
            return Err(PhysicsError::InvalidBody("mass must be positive"));
        }
        if inertia.is_nan() || inertia <= 0.0 {
            return Err(PhysicsError::InvalidBody("moment of inertia must be positive"));
        }
        if !pos.is_finite() {
            return Err(PhysicsError::InvalidBody("position must be finite"));
        }
        self.bodies.push(RigidBody::new(mass, inertia, pos));
        Ok(self.bodies.len() - 1)
    }

    /// Add a rectangular body whose inertia is computed from its extents.
    ///
    /// # Errors
    ///
    /// See [`PhysicsSim::add_body`].
    pub fn add_box(&mut self, mass: f64, width: f64, height: f64, pos: Vec2) -> Result<usize, PhysicsError> {
        self.add_body(mass, moment_for_box(mass, width, height), pos)
    }
}

/// Builder methods for adding constraints/joints
impl PhysicsSim {
    /// Constrain the body's centre to the world segment `groove_a`-`groove_b`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if `body` does not exist.
    pub fn add_slider(&mut self, body: usize, groove_a: Vec2, groove_b: Vec2) -> Result<usize, PhysicsError> {
        if body >= self.bodies.len() {
            return Err(PhysicsError::UnknownBody(body));
        }
        self.sliders.push(SliderJoint {
            body,
            groove_a,
            groove_b,
            anchor: Vec2::ZERO,
        });
        Ok(self.sliders.len() - 1)
    }

    /// Pin `body_a` and `body_b` together at the world point `pivot`.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if either body does not exist.
    pub fn add_pivot(&mut self, body_a: usize, body_b: usize, pivot: Vec2) -> Result<usize, PhysicsError> {
        let a = self.bodies.get(body_a).ok_or(PhysicsError::UnknownBody(body_a))?;
        let b = self.bodies.get(body_b).ok_or(PhysicsError::UnknownBody(body_b))?;
        let joint = PivotJoint {
            body_a,
            body_b,
            anchor_a: a.world_to_local(pivot),
            anchor_b: b.world_to_local(pivot),
        };
        self.pivots.push(joint);
        Ok(self.pivots.len() - 1)
    }
}
