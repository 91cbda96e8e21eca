//! # Episode Runner
//!
//! One fixed-horizon rollout of a controller against a freshly built plant.
//! Each tick extracts the state, accumulates the normalized error, asks the
//! controller for a signal, turns it into a cart force and steps the plant.
//! The loop always runs the full horizon; the only early exit is an error
//! from the controller or the integrator, which aborts the episode.

use ml::{Controller, ControllerError};
use physics::{PlantModel, Vec2};
use tracing::debug;

use crate::config::EpisodeConfig;
use crate::error::EvaluationError;
use crate::state::{CumulativeError, ErrorVector, VelocityEstimator};

/// What happened during one tick, reported after the integrator step.
#[derive(Clone, Debug, PartialEq)]
pub struct TickRecord {
    pub tick: usize,
    /// Elapsed time at the start of the tick.
    pub elapsed: f64,
    pub error: ErrorVector,
    /// Force actually applied to the cart.
    pub force: f64,
    /// Centre of mass and orientation of every body, cart first.
    pub poses: Vec<(Vec2, f64)>,
}

/// Receives every tick of an episode.
pub trait EpisodeObserver {
    fn on_tick(&mut self, record: &TickRecord);
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl EpisodeObserver for NoopObserver {
    fn on_tick(&mut self, _record: &TickRecord) {}
}

/// Keeps every tick for later inspection or display.
#[derive(Default, Debug)]
pub struct TrajectoryRecorder {
    pub ticks: Vec<TickRecord>,
}

impl EpisodeObserver for TrajectoryRecorder {
    fn on_tick(&mut self, record: &TickRecord) {
        self.ticks.push(record.clone());
    }
}

/// Run one episode and return the per-channel cumulative error.
///
/// # Errors
///
/// Returns [`EvaluationError::Config`] for an invalid configuration, and
/// [`EvaluationError::Controller`] or [`EvaluationError::Physics`] when the
/// controller or integrator fails mid-episode.
pub fn run_episode<C>(controller: &mut C, config: &EpisodeConfig) -> Result<CumulativeError, EvaluationError>
where
    C: Controller + ?Sized,
{
    run_episode_observed(controller, config, &mut NoopObserver)
}

/// [`run_episode`] with an observer called after every integrator step.
///
/// # Errors
///
/// See [`run_episode`].
pub fn run_episode_observed<C>(
    controller: &mut C,
    config: &EpisodeConfig,
    observer: &mut dyn EpisodeObserver,
) -> Result<CumulativeError, EvaluationError>
where
    C: Controller + ?Sized,
{
    config.validate()?;
    let mut plant = PlantModel::with_config(config.topology, &config.plant)
        .map_err(|e| EvaluationError::Config(format!("plant: {e}")))?;

    let dt = config.dt;
    let mut velocities = VelocityEstimator::new(plant.extract_state(), dt);
    let mut cumulative = CumulativeError::zeros(config.state_dim());
    let mut elapsed = 0.0;
    let mut tick = 0;

    debug!(topology = %config.topology, duration = config.duration, dt, "episode started");

    loop {
        let state = velocities.observe(&plant.extract_state());
        let error = state.error_against(&config.setpoint, &config.error_scale);
        cumulative.accumulate(&error);

        let signal = first_output(&controller.activate(&error)?)?;
        let force = config.control_force(signal, elapsed);
        plant.apply_horizontal_force(force)?;
        plant.step(dt)?;

        observer.on_tick(&TickRecord {
            tick,
            elapsed,
            error,
            force,
            poses: plant.bodies().iter().map(|b| (b.pos, b.angle)).collect(),
        });

        elapsed += dt;
        tick += 1;
        if elapsed > config.duration {
            break;
        }
    }

    debug!(ticks = tick, cumulative = ?&*cumulative, "episode finished");
    Ok(cumulative)
}

fn first_output(output: &[f64]) -> Result<f64, ControllerError> {
    let signal = *output.first().ok_or(ControllerError::EmptyOutput)?;
    if signal.is_finite() {
        Ok(signal)
    } else {
        Err(ControllerError::NonFinite)
    }
}
