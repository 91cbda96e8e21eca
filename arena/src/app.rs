//! # Arena Application Logic
//!
//! The two things the binary can do: score a freshly sampled population of
//! feed-forward controllers, and replay a saved controller for one episode.
//! Both are plain functions over option structs so they can be driven from
//! the CLI or from tests.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use evaluation::{
    fitness, run_episode_observed, BatchSummary, CumulativeError, EpisodeConfig, EvaluationTask, Evaluator,
    SchedulerConfig, TrajectoryRecorder,
};
use ml::{artifact, FeedForward};
use physics::PlantTopology;
use tracing::{info, warn};

/// Options for [`evaluate`].
#[derive(Clone, Debug)]
pub struct EvaluateOptions {
    pub topology: PlantTopology,
    pub population: usize,
    pub hidden: usize,
    /// Overrides `ARENA_WORKERS` and the detected parallelism.
    pub workers: Option<usize>,
    pub seed: u64,
    pub duration: Option<f64>,
    /// Where to write the best network, if anywhere.
    pub save_best: Option<PathBuf>,
}

/// Outcome of [`evaluate`].
#[derive(Debug)]
pub struct EvaluateReport {
    pub summary: BatchSummary<usize>,
    pub best: Option<FeedForward>,
}

/// Options for [`replay`].
#[derive(Clone, Debug)]
pub struct ReplayOptions {
    pub topology: PlantTopology,
    pub controller: PathBuf,
    pub duration: Option<f64>,
}

/// Outcome of [`replay`].
#[derive(Debug)]
pub struct ReplayReport {
    pub cumulative: CumulativeError,
    pub fitness: f64,
    pub trajectory: TrajectoryRecorder,
}

fn episode_config(topology: PlantTopology, duration: Option<f64>) -> EpisodeConfig {
    let mut config = EpisodeConfig::for_topology(topology);
    if let Some(duration) = duration {
        config.duration = duration;
    }
    config
}

/// Sample `population` random networks and evaluate them as one batch.
///
/// # Errors
///
/// Fails on invalid options, a fatal batch error, or when the best network
/// cannot be written.
pub fn evaluate(options: &EvaluateOptions) -> Result<EvaluateReport> {
    let episode = episode_config(options.topology, options.duration);
    let mut scheduler = SchedulerConfig::from_env();
    if let Some(workers) = options.workers {
        scheduler = scheduler.with_workers(workers);
    }

    let mut rng = fastrand::Rng::with_seed(options.seed);
    let sizes = [options.topology.state_dim(), options.hidden, 1];
    let population = (0..options.population)
        .map(|_| FeedForward::random(&sizes, &mut rng))
        .collect::<Result<Vec<_>, _>>()
        .context("sampling the population")?;

    let evaluator = Evaluator::new(episode, scheduler)?;
    info!(
        topology = %options.topology,
        population = population.len(),
        workers = evaluator.workers(),
        seed = options.seed,
        "evaluating population"
    );

    let tasks = population
        .iter()
        .cloned()
        .enumerate()
        .map(|(id, net)| EvaluationTask::new(id, net))
        .collect();
    let started = Instant::now();
    let results = evaluator.evaluate_batch(tasks)?;
    let summary = BatchSummary::from_results(&results, started.elapsed());

    let best = summary
        .best
        .as_ref()
        .and_then(|(id, _)| population.get(*id).cloned());

    if let Some(path) = &options.save_best {
        match &best {
            Some(net) => {
                artifact::save_to_path(net, path).with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "saved best controller");
            }
            None => warn!("no candidate succeeded; nothing saved"),
        }
    }

    Ok(EvaluateReport { summary, best })
}

/// Load a saved network and run one recorded episode with it.
///
/// # Errors
///
/// Fails if the artifact cannot be loaded or the episode fails.
pub fn replay(options: &ReplayOptions) -> Result<ReplayReport> {
    let mut net = artifact::load_from_path(&options.controller)
        .with_context(|| format!("loading {}", options.controller.display()))?;
    let episode = episode_config(options.topology, options.duration);

    let mut trajectory = TrajectoryRecorder::default();
    let cumulative = run_episode_observed(&mut net, &episode, &mut trajectory)?;
    let fitness = fitness::reduce_weighted(&cumulative, &episode.weights);
    info!(ticks = trajectory.ticks.len(), fitness, "replay finished");

    Ok(ReplayReport {
        cumulative,
        fitness,
        trajectory,
    })
}
