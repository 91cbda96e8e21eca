#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Arena Evaluation
//!
//! Scores controllers by running them against a cart-and-pendulum plant for
//! a fixed horizon, then reducing the accumulated error to one fitness value.
//!
//! ## Key Components
//!
//! -   **Configuration:** [`EpisodeConfig`] holds per-topology constants
//!     (setpoint, error scales, force gain, warm-up, weights) and
//!     [`SchedulerConfig`] sizes the worker pool.
//! -   **Episodes:** [`run_episode`] runs one deterministic rollout and
//!     returns a [`CumulativeError`]. [`run_episode_observed`] also reports
//!     every tick to an [`EpisodeObserver`].
//! -   **Fitness:** [`fitness::reduce`] maps cumulative error to
//!     `-10000 - Σ wᵢ·|eᵢ|`.
//! -   **Scheduling:** [`Evaluator`] evaluates a batch of
//!     [`EvaluationTask`]s in parallel. Failed or panicking candidates get
//!     the configured failure fitness without affecting the others.
//!
//! ## Usage
//!
//! ```rust
//! use evaluation::{EpisodeConfig, EvaluationTask, Evaluator, SchedulerConfig};
//! use ml::Constant;
//! use physics::PlantTopology;
//!
//! let mut episode = EpisodeConfig::for_topology(PlantTopology::SinglePendulum);
//! episode.duration = 0.2;
//! let evaluator = Evaluator::new(episode, SchedulerConfig::default().with_workers(2))?;
//! let tasks = vec![
//!     EvaluationTask::new("idle", Constant::scalar(0.0)),
//!     EvaluationTask::new("push", Constant::scalar(0.1)),
//! ];
//! let results = evaluator.evaluate_batch(tasks)?;
//! assert_eq!(results.len(), 2);
//! # Ok::<(), evaluation::EvaluationError>(())
//! ```

pub mod config;
pub mod episode;
pub mod error;
pub mod fitness;
pub mod scheduler;
pub mod state;

pub use config::{EpisodeConfig, SchedulerConfig, MAX_FORCE, WORKERS_ENV_VAR};
pub use episode::{run_episode, run_episode_observed, EpisodeObserver, NoopObserver, TickRecord, TrajectoryRecorder};
pub use error::EvaluationError;
pub use fitness::{FITNESS_OFFSET, SENTINEL_FITNESS};
pub use scheduler::{
    assign_fitness, evaluate_batch, evaluate_one, merge_results, BatchSummary, EvaluationResult, EvaluationTask, Evaluator,
};
pub use state::{CumulativeError, ErrorVector, StateVector, VelocityEstimator};
