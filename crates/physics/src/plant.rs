//! Cart-and-pendulum plants
//!
//! This module builds the two fixed mechanical topologies on top of
//! [`PhysicsSim`]: a cart on a horizontal groove carrying one inverted link,
//! or two links pivoted in series. The cart is purely translational and the
//! links move only through the pivots; the horizontal force on the cart is
//! the sole actuator.

use std::fmt;
use std::str::FromStr;

use crate::error::PhysicsError;
use crate::types::{PhysParams, RigidBody, Vec2};
use crate::PhysicsSim;

/// The mechanical layout of a plant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlantTopology {
    /// Cart with one link: state `[x, vx, θ1, ω1]`.
    SinglePendulum,
    /// Cart with two links in series: state `[x, vx, θ1, ω1, θ2, ω2]`.
    DoublePendulum,
}

impl PlantTopology {
    #[must_use]
    pub const fn link_count(self) -> usize {
        match self {
            Self::SinglePendulum => 1,
            Self::DoublePendulum => 2,
        }
    }

    /// Length of the state and error vectors for this topology.
    #[must_use]
    pub const fn state_dim(self) -> usize {
        2 * (self.link_count() + 1)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SinglePendulum => "single",
            Self::DoublePendulum => "double",
        }
    }
}

impl fmt::Display for PlantTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlantTopology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "single-pendulum" => Ok(Self::SinglePendulum),
            "double" | "double-pendulum" => Ok(Self::DoublePendulum),
            other => Err(format!("unknown topology '{other}', expected 'single' or 'double'")),
        }
    }
}

/// One pendulum link, modelled as a solid rectangle pivoted at its base.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkConfig {
    pub mass: f64,
    /// Pivot-to-tip length; the centre of mass sits at half of it.
    pub length: f64,
    pub width: f64,
}

/// Configuration for a plant
#[derive(Clone, Debug, PartialEq)]
pub struct PlantConfig {
    pub gravity: Vec2,
    pub cart_mass: f64,
    /// Cart centre at t = 0; the groove runs through its height.
    pub cart_position: Vec2,
    pub groove_min_x: f64,
    pub groove_max_x: f64,
    /// Links from the cart upwards.
    pub links: Vec<LinkConfig>,
    pub substeps: usize,
    pub iterations: usize,
}

impl PlantConfig {
    #[must_use]
    pub fn for_topology(topology: PlantTopology) -> Self {
        let defaults = PhysParams::default();
        match topology {
            PlantTopology::SinglePendulum => Self {
                gravity: defaults.gravity,
                cart_mass: 1.0,
                cart_position: Vec2::new(340.0, 300.0),
                groove_min_x: 10.0,
                groove_max_x: 670.0,
                links: vec![LinkConfig {
                    mass: 5.0,
                    length: 150.0,
                    width: 10.0,
                }],
                substeps: defaults.substeps,
                iterations: defaults.iterations,
            },
            PlantTopology::DoublePendulum => Self {
                gravity: defaults.gravity,
                cart_mass: 10.0,
                cart_position: Vec2::new(340.0, 400.0),
                groove_min_x: 10.0,
                groove_max_x: 670.0,
                links: vec![
                    LinkConfig {
                        mass: 1.0,
                        length: 100.0,
                        width: 10.0,
                    },
                    LinkConfig {
                        mass: 1.0,
                        length: 50.0,
                        width: 10.0,
                    },
                ],
                substeps: defaults.substeps,
                iterations: defaults.iterations,
            },
        }
    }
}

/// A cart-and-pendulum plant owning its own simulation.
#[derive(Clone, Debug)]
pub struct PlantModel {
    sim: PhysicsSim,
    topology: PlantTopology,
    cart_idx: usize,
    link_indices: Vec<usize>,
}

impl PlantModel {
    /// Build the plant for `topology` with its default configuration.
    ///
    /// # Errors
    ///
    /// See [`PlantModel::with_config`].
    pub fn create(topology: PlantTopology) -> Result<Self, PhysicsError> {
        Self::with_config(topology, &PlantConfig::for_topology(topology))
    }

    /// Build the plant from an explicit configuration.
    ///
    /// The cart gets infinite rotational inertia and rides a slider along
    /// the groove. Links start upright, stacked above the cart.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::LinkCount`] when `config.links` does not match
    /// the topology, or [`PhysicsError::InvalidBody`] for bad masses/extents.
    pub fn with_config(topology: PlantTopology, config: &PlantConfig) -> Result<Self, PhysicsError> {
        if config.links.len() != topology.link_count() {
            return Err(PhysicsError::LinkCount {
                topology: topology.name(),
                expected: topology.link_count(),
                actual: config.links.len(),
            });
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if config.links.iter().any(|link| !positive(link.length) || !positive(link.width)) {
            return Err(PhysicsError::InvalidBody("link extents must be positive"));
        }

        let mut sim = PhysicsSim::with_params(PhysParams {
            gravity: config.gravity,
            substeps: config.substeps,
            iterations: config.iterations,
        });

        let cart_pos = config.cart_position;
        let cart_idx = sim.add_body(config.cart_mass, f64::INFINITY, cart_pos)?;
        sim.add_slider(
            cart_idx,
            Vec2::new(config.groove_min_x, cart_pos.y),
            Vec2::new(config.groove_max_x, cart_pos.y),
        )?;

        let mut link_indices = Vec::with_capacity(config.links.len());
        let mut parent = cart_idx;
        let mut joint_pos = cart_pos;
        for link in &config.links {
            let centre = joint_pos + Vec2::new(0.0, link.length / 2.0);
            let idx = sim.add_box(link.mass, link.width, link.length, centre)?;
            sim.add_pivot(parent, idx, joint_pos)?;
            link_indices.push(idx);
            parent = idx;
            joint_pos += Vec2::new(0.0, link.length);
        }

        Ok(Self {
            sim,
            topology,
            cart_idx,
            link_indices,
        })
    }

    #[must_use]
    pub fn topology(&self) -> PlantTopology {
        self.topology
    }

    /// Generalized coordinates `[cart_x, θ1, (θ2)]`.
    ///
    /// Angles are measured from upright and are not wrapped. They are
    /// clockwise positive, the negation of the body orientation in this
    /// y-up frame, so a link leaning towards +x reads positive. Velocities
    /// are deliberately absent: callers estimate them by finite differences
    /// between ticks.
    #[must_use]
    pub fn extract_state(&self) -> Vec<f64> {
        let mut coords = Vec::with_capacity(self.link_indices.len() + 1);
        coords.push(self.cart().pos.x);
        coords.extend(self.link_indices.iter().map(|&idx| -self.sim.bodies[idx].angle));
        coords
    }

    /// Push the cart horizontally during the next step.
    ///
    /// # Errors
    ///
    /// Only fails if the cart body is missing, which indicates a corrupted plant.
    pub fn apply_horizontal_force(&mut self, force: f64) -> Result<(), PhysicsError> {
        self.sim.apply_force(self.cart_idx, Vec2::new(force, 0.0))
    }

    /// Advance the plant by `dt`.
    ///
    /// # Errors
    ///
    /// See [`PhysicsSim::step`].
    pub fn step(&mut self, dt: f64) -> Result<(), PhysicsError> {
        self.sim.step(dt)
    }

    #[must_use]
    pub fn cart(&self) -> &RigidBody {
        &self.sim.bodies[self.cart_idx]
    }

    pub fn links(&self) -> impl Iterator<Item = &RigidBody> + '_ {
        self.link_indices.iter().map(move |&idx| &self.sim.bodies[idx])
    }

    /// Every body, cart first, for renderers and recorders.
    #[must_use]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.sim.bodies
    }

    #[must_use]
    pub fn constraint_error(&self) -> f64 {
        self.sim.max_constraint_error()
    }

    #[must_use]
    pub fn sim(&self) -> &PhysicsSim {
        &self.sim
    }
}
