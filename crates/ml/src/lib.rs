#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Controllers evaluated by the arena.
//!
//! The episode loop depends only on the [`Controller`] capability: a map
//! from the current error vector to a control vector. [`ControllerFactory`]
//! lets a batch hand each worker a representation from which it builds its
//! own instance. [`FeedForward`] is the concrete policy evolved by the
//! search, and [`artifact`] persists the best one.

pub mod artifact;
pub mod controller;
pub mod error;
pub mod nn;

pub use controller::{from_fn, Constant, Controller, ControllerFactory, FnController};
pub use error::ControllerError;
pub use nn::{Dense, FeedForward};
