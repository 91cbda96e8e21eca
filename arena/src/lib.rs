//! # Arena
//!
//! Evaluates feedback controllers on simulated cart-and-pendulum plants.
//!
//! ## The Crates
//!
//! -   **[`physics`]:** A planar rigid-body integrator with slider and pivot
//!     joints, and the single and double inverted pendulum plants built on it.
//! -   **[`ml`]:** The controller capability, the feed-forward networks that
//!     implement it, and the JSON artifact format for saved networks.
//! -   **[`evaluation`]:** Episode configuration, the episode runner, fitness
//!     reduction and the parallel batch evaluator.
//! -   **`arena`:** This crate. It hosts the command-line binary; [`app`]
//!     holds the logic behind its subcommands.
//!
//! ## Getting Started
//!
//! ```text
//! arena evaluate --topology double --population 64 --save-best best.json
//! arena replay --topology double --controller best.json --trace
//! ```
//!
//! Set `ARENA_WORKERS` to fix the pool size and `RUST_LOG` to adjust logging.

pub mod app;

pub use evaluation;
pub use ml;
pub use physics;
