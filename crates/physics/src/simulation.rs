//! # Physics Simulation Core
//!
//! This module provides the main physics simulation structure and its
//! stepping loop. Each step is split into substeps; every substep predicts
//! poses, projects joints, then derives velocities from the corrected poses.

use crate::error::PhysicsError;
use crate::integrator::{clear_forces, integrate_bodies, update_velocities};
use crate::solver::{pivot_violation, slider_violation, solve_pivot, solve_slider};
use crate::types::{PhysParams, PivotJoint, RigidBody, SliderJoint, Vec2};

/// Main physics simulation container
#[derive(Clone, Debug)]
pub struct PhysicsSim {
    pub bodies: Vec<RigidBody>,
    pub sliders: Vec<SliderJoint>,
    pub pivots: Vec<PivotJoint>,
    pub params: PhysParams,
    step_count: u64,
}

impl PhysicsSim {
    /// Create a new empty simulation with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(PhysParams::default())
    }

    #[must_use]
    pub fn with_params(params: PhysParams) -> Self {
        Self {
            bodies: Vec::new(),
            sliders: Vec::new(),
            pivots: Vec::new(),
            params,
            step_count: 0,
        }
    }

    /// Number of completed calls to [`PhysicsSim::step`].
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Replace the force applied to a body during the next step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if `body_index` is out of range.
    pub fn set_force(&mut self, body_index: usize, force: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(body_index)
            .ok_or(PhysicsError::UnknownBody(body_index))?;
        body.force = force;
        Ok(())
    }

    /// Add to the force applied to a body during the next step.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::UnknownBody`] if `body_index` is out of range.
    pub fn apply_force(&mut self, body_index: usize, force: Vec2) -> Result<(), PhysicsError> {
        let body = self
            .bodies
            .get_mut(body_index)
            .ok_or(PhysicsError::UnknownBody(body_index))?;
        body.force += force;
        Ok(())
    }

    /// Advance the simulation by `dt`, then clear applied forces.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidTimestep`] for a non-positive or
    /// non-finite `dt`, and [`PhysicsError::Diverged`] if any body ends the
    /// step with a non-finite pose or velocity.
    pub fn step(&mut self, dt: f64) -> Result<(), PhysicsError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep(dt));
        }

        let substeps = self.params.substeps.max(1);
        #[allow(clippy::cast_precision_loss)]
        let h = dt / substeps as f64;

        for _ in 0..substeps {
            // 1. Predict poses from gravity and applied forces
            integrate_bodies(&mut self.bodies, self.params.gravity, h);

            // 2. Project joints
            for _ in 0..self.params.iterations.max(1) {
                self.solve_constraints();
            }

            // 3. Velocities follow the corrected poses
            update_velocities(&mut self.bodies, h);
        }

        clear_forces(&mut self.bodies);
        self.step_count += 1;

        if let Some(body) = self.bodies.iter().position(|b| !b.is_finite()) {
            return Err(PhysicsError::Diverged {
                body,
                step: self.step_count,
            });
        }
        Ok(())
    }

    /// Run the simulation for a fixed number of steps.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by [`PhysicsSim::step`].
    pub fn run(&mut self, dt: f64, steps: usize) -> Result<(), PhysicsError> {
        for _ in 0..steps {
            self.step(dt)?;
        }
        Ok(())
    }

    /// Largest joint violation in the current configuration.
    #[must_use]
    pub fn max_constraint_error(&self) -> f64 {
        let sliders = self
            .sliders
            .iter()
            .map(|joint| slider_violation(&self.bodies, joint));
        let pivots = self
            .pivots
            .iter()
            .map(|joint| pivot_violation(&self.bodies, joint));
        sliders.chain(pivots).fold(0.0, f64::max)
    }

    fn solve_constraints(&mut self) {
        for joint in &self.sliders {
            solve_slider(&mut self.bodies, joint);
        }
        for joint in &self.pivots {
            solve_pivot(&mut self.bodies, joint);
        }
    }
}

impl Default for PhysicsSim {
    fn default() -> Self {
        Self::new()
    }
}
