//! Per-tick state, error and accumulated error vectors.

use std::ops::Deref;

/// Full plant state `[x, vx, θ1, ω1, (θ2, ω2)]` for one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector(Vec<f64>);

impl StateVector {
    /// Normalized deviation from `setpoint`, `(state - setpoint) / scale`.
    ///
    /// All three slices must have the same length; the episode config is
    /// validated for that before any tick runs.
    #[must_use]
    pub fn error_against(&self, setpoint: &[f64], scale: &[f64]) -> ErrorVector {
        ErrorVector(
            self.0
                .iter()
                .zip(setpoint)
                .zip(scale)
                .map(|((s, target), k)| (s - target) / k)
                .collect(),
        )
    }
}

impl Deref for StateVector {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Normalized error fed to the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorVector(Vec<f64>);

impl Deref for ErrorVector {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Running sum of `|error|` per channel over an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct CumulativeError(Vec<f64>);

impl CumulativeError {
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self(vec![0.0; dim])
    }

    pub fn accumulate(&mut self, error: &ErrorVector) {
        for (total, e) in self.0.iter_mut().zip(error.iter()) {
            *total += e.abs();
        }
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for CumulativeError {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Deref for CumulativeError {
    type Target = [f64];
    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Builds state vectors from generalized coordinates by finite differences.
///
/// The previous coordinates start out equal to the initial ones, so the
/// first observed state always has zero velocity in every channel.
#[derive(Clone, Debug)]
pub struct VelocityEstimator {
    previous: Vec<f64>,
    dt: f64,
}

impl VelocityEstimator {
    #[must_use]
    pub fn new(initial: Vec<f64>, dt: f64) -> Self {
        Self { previous: initial, dt }
    }

    /// Interleave `coords` with their rates of change since the last call.
    pub fn observe(&mut self, coords: &[f64]) -> StateVector {
        let mut state = Vec::with_capacity(coords.len() * 2);
        for (current, previous) in coords.iter().zip(&self.previous) {
            state.push(*current);
            state.push((current - previous) / self.dt);
        }
        self.previous.clear();
        self.previous.extend_from_slice(coords);
        StateVector(state)
    }
}
