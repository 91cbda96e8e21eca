//! Reduction of cumulative error to a scalar fitness.
//!
//! Fitness is `FITNESS_OFFSET - Σ wᵢ·|eᵢ|`. With non-negative weights it
//! never exceeds the offset, and less error never scores worse.

use physics::PlantTopology;

use crate::config::EpisodeConfig;

/// Supremum of every successful fitness; reached only with zero error.
pub const FITNESS_OFFSET: f64 = -10_000.0;

/// Fitness of an episode that failed.
///
/// Note that this is greater than any successful fitness (all of which are
/// at most [`FITNESS_OFFSET`]). See
/// [`SchedulerConfig::failure_fitness`](crate::SchedulerConfig::failure_fitness).
pub const SENTINEL_FITNESS: f64 = 0.0;

/// Weighted reduction with explicit per-channel weights.
///
/// Extra entries in either slice are ignored.
#[must_use]
pub fn reduce_weighted(error: &[f64], weights: &[f64]) -> f64 {
    let penalty: f64 = error
        .iter()
        .zip(weights)
        .map(|(e, w)| w * e.abs())
        .sum();
    FITNESS_OFFSET - penalty
}

/// Reduce with the default weights for `topology`.
#[must_use]
pub fn reduce(error: &[f64], topology: PlantTopology) -> f64 {
    reduce_weighted(error, &EpisodeConfig::for_topology(topology).weights)
}
