//! Episode and scheduler configuration.
//!
//! Everything here is plain data with topology-specific defaults. It is
//! shared read-only by all workers; [`EpisodeConfig::validate`] is the single
//! gate that turns bad constants into a fatal [`EvaluationError::Config`].

use physics::{PlantConfig, PlantModel, PlantTopology};
use tracing::warn;

use crate::error::EvaluationError;
use crate::fitness::SENTINEL_FITNESS;

/// Largest force magnitude ever applied to the cart.
pub const MAX_FORCE: f64 = 20_000.0;
/// Episode horizon in simulated seconds.
pub const DEFAULT_DURATION: f64 = 15.0;
/// Control and integration rate.
pub const DEFAULT_RATE_HZ: f64 = 90.0;
/// Environment variable overriding the worker count.
pub const WORKERS_ENV_VAR: &str = "ARENA_WORKERS";

/// Configuration for one episode
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeConfig {
    pub topology: PlantTopology,
    pub plant: PlantConfig,
    /// Simulated seconds; the loop stops once elapsed time exceeds this.
    pub duration: f64,
    pub dt: f64,
    /// Target state, `[x, vx, θ1, ω1, (θ2, ω2)]`.
    pub setpoint: Vec<f64>,
    /// Per-channel divisor applied to `state - setpoint`.
    pub error_scale: Vec<f64>,
    /// Controller output to force multiplier.
    pub force_gain: f64,
    pub max_force: f64,
    /// While elapsed time is below this, the cart receives `warmup_force`
    /// regardless of the controller.
    pub warmup_duration: f64,
    pub warmup_force: f64,
    /// Fitness weight per cumulative error channel.
    pub weights: Vec<f64>,
}

impl EpisodeConfig {
    #[must_use]
    pub fn for_topology(topology: PlantTopology) -> Self {
        let plant = PlantConfig::for_topology(topology);
        let dt = 1.0 / DEFAULT_RATE_HZ;
        match topology {
            PlantTopology::SinglePendulum => Self {
                topology,
                plant,
                duration: DEFAULT_DURATION,
                dt,
                setpoint: vec![150.0, 0.0, 0.0, 0.0],
                error_scale: vec![100.0, 100.0, 1.0, 1.0],
                force_gain: 20_000.0,
                max_force: MAX_FORCE,
                warmup_duration: 0.5,
                warmup_force: 20.0,
                weights: vec![0.05, 0.05, 1.0, 0.05],
            },
            PlantTopology::DoublePendulum => Self {
                topology,
                plant,
                duration: DEFAULT_DURATION,
                dt,
                setpoint: vec![150.0, 0.0, 0.0, 0.0, 0.0, 0.0],
                error_scale: vec![100.0, 100.0, 1.0, 1.0, 1.0, 1.0],
                force_gain: 2_000.0,
                max_force: MAX_FORCE,
                warmup_duration: 0.03,
                warmup_force: 100.0,
                weights: vec![0.05, 0.05, 1.0, 0.05, 0.2, 0.05],
            },
        }
    }

    /// Length of every per-channel vector.
    #[must_use]
    pub fn state_dim(&self) -> usize {
        self.topology.state_dim()
    }

    /// Check every constant before any episode runs.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let dim = self.state_dim();
        let config_err = |msg: String| Err(EvaluationError::Config(msg));

        if !self.dt.is_finite() || self.dt <= 0.0 {
            return config_err(format!("dt must be finite and positive, got {}", self.dt));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return config_err(format!("duration must be finite and positive, got {}", self.duration));
        }
        for (name, values) in [
            ("setpoint", &self.setpoint),
            ("error_scale", &self.error_scale),
            ("weights", &self.weights),
        ] {
            if values.len() != dim {
                return config_err(format!(
                    "{name} has {} entries, {} needs {dim}",
                    values.len(),
                    self.topology
                ));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return config_err(format!("{name} contains a non-finite value"));
            }
        }
        if self.error_scale.iter().any(|&s| s == 0.0) {
            return config_err("error_scale entries must be non-zero".into());
        }
        if self.weights.iter().any(|&w| w < 0.0) {
            return config_err("fitness weights must be non-negative".into());
        }
        if !self.max_force.is_finite() || self.max_force <= 0.0 {
            return config_err(format!("max_force must be finite and positive, got {}", self.max_force));
        }
        if !self.force_gain.is_finite() {
            return config_err("force_gain must be finite".into());
        }
        if !self.warmup_duration.is_finite() || !self.warmup_force.is_finite() {
            return config_err("warm-up window and force must be finite".into());
        }

        PlantModel::with_config(self.topology, &self.plant)
            .map(|_| ())
            .map_err(|e| EvaluationError::Config(format!("plant: {e}")))
    }

    /// Force applied to the cart for a controller `signal` at `elapsed` seconds.
    ///
    /// Inside the warm-up window the fixed perturbation wins; afterwards the
    /// scaled signal is clamped to `±max_force`.
    #[must_use]
    pub fn control_force(&self, signal: f64, elapsed: f64) -> f64 {
        if elapsed < self.warmup_duration {
            return self.warmup_force;
        }
        (signal * self.force_gain).clamp(-self.max_force, self.max_force)
    }
}

/// Worker pool configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub workers: usize,
    /// Fitness reported for a failed episode.
    ///
    /// Defaults to [`SENTINEL_FITNESS`] (0), which is *higher* than every
    /// successful fitness. A maximizing search will prefer failing
    /// controllers unless it treats this value specially or it is changed
    /// here.
    pub failure_fitness: f64,
}

impl SchedulerConfig {
    /// Default configuration with the worker count taken from
    /// `ARENA_WORKERS` when it holds a positive integer.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(workers) = configured_worker_count() {
            config.workers = workers;
        }
        config
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// # Errors
    ///
    /// Returns [`EvaluationError::Config`] for zero workers or a non-finite
    /// failure fitness.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.workers == 0 {
            return Err(EvaluationError::Config("worker count must be positive".into()));
        }
        if !self.failure_fitness.is_finite() {
            return Err(EvaluationError::Config("failure fitness must be finite".into()));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: available_workers(),
            failure_fitness: SENTINEL_FITNESS,
        }
    }
}

fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(|parallelism| parallelism.get().max(1))
        .unwrap_or(1)
}

fn configured_worker_count() -> Option<usize> {
    let raw_value = std::env::var(WORKERS_ENV_VAR).ok()?;
    match raw_value.trim().parse::<usize>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => {
            warn!("{WORKERS_ENV_VAR} must be a positive integer; got '{raw_value}'");
            None
        }
    }
}
