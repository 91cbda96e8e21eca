#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Arena Physics
//!
//! A small planar rigid-body engine for the cart-and-pendulum plants that
//! the arena evaluates controllers against.
//!
//! ## Key Components
//!
//! -   **Rigid Bodies:** [`RigidBody`] carries mass, inertia and pose. Mass or
//!     inertia may be infinite, which is how the cart is kept from rotating.
//! -   **Joints:** [`SliderJoint`] keeps a body on a world groove and
//!     [`PivotJoint`] pins two bodies together. Both are defined in body-local
//!     coordinates when they are created.
//! -   **Simulation:** [`PhysicsSim`] advances all bodies by a fixed `dt` with
//!     a position-based scheme: predict, project joints, derive velocities.
//!     Stepping is sequential and allocation-free, so identical inputs give
//!     bit-identical trajectories.
//! -   **Plants:** [`PlantModel`] assembles one of the two [`PlantTopology`]
//!     layouts and exposes state extraction and the cart force input.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{PlantModel, PlantTopology};
//!
//! let mut plant = PlantModel::create(PlantTopology::SinglePendulum)?;
//! plant.apply_horizontal_force(20.0)?;
//! plant.step(1.0 / 90.0)?;
//! let coords = plant.extract_state();
//! assert_eq!(coords.len(), 2);
//! # Ok::<(), physics::PhysicsError>(())
//! ```

pub mod builder;
pub mod error;
pub mod integrator;
pub mod plant;
pub mod simulation;
pub mod solver;
pub mod types;

pub use error::PhysicsError;
pub use plant::{LinkConfig, PlantConfig, PlantModel, PlantTopology};
pub use simulation::PhysicsSim;
pub use types::{moment_for_box, PhysParams, PivotJoint, RigidBody, SliderJoint, Vec2};
