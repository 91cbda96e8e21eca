//! # Parallel Evaluation
//!
//! Batches of `(identifier, controller)` tasks are spread over a fixed-size
//! rayon pool. Every task builds its own controller and plant inside the
//! worker, so nothing mutable is shared between concurrent episodes. A task
//! that fails, or panics, is reported with the failure fitness and never
//! takes the rest of the batch down with it.
//!
//! Results come back as an unordered collection. Callers match them to
//! their population by identifier, e.g. with [`merge_results`] and
//! [`assign_fitness`].

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use ml::ControllerFactory;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{EpisodeConfig, SchedulerConfig};
use crate::episode::run_episode;
use crate::error::EvaluationError;
use crate::fitness::{reduce_weighted, FITNESS_OFFSET};

/// One candidate to evaluate.
#[derive(Clone, Debug)]
pub struct EvaluationTask<K, S> {
    pub id: K,
    pub controller: S,
}

impl<K, S> EvaluationTask<K, S> {
    #[must_use]
    pub fn new(id: K, controller: S) -> Self {
        Self { id, controller }
    }
}

/// Fitness of one candidate. Always present, even for failed episodes.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationResult<K> {
    pub id: K,
    pub fitness: f64,
    /// Why the episode failed, if it did.
    pub failure: Option<String>,
}

impl<K> EvaluationResult<K> {
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Aggregate view of one batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchSummary<K> {
    pub evaluated: usize,
    pub failed: usize,
    /// Best successful candidate; failures never count.
    pub best: Option<(K, f64)>,
    pub mean_fitness: Option<f64>,
    pub elapsed: Duration,
}

impl<K: Clone> BatchSummary<K> {
    #[must_use]
    pub fn from_results(results: &[EvaluationResult<K>], elapsed: Duration) -> Self {
        let successes: Vec<&EvaluationResult<K>> = results.iter().filter(|r| !r.is_failure()).collect();
        let best = successes
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .map(|r| (r.id.clone(), r.fitness));
        #[allow(clippy::cast_precision_loss)]
        let mean_fitness = (!successes.is_empty())
            .then(|| successes.iter().map(|r| r.fitness).sum::<f64>() / successes.len() as f64);

        Self {
            evaluated: results.len(),
            failed: results.len() - successes.len(),
            best,
            mean_fitness,
            elapsed,
        }
    }
}

/// A worker pool bound to one episode configuration.
pub struct Evaluator {
    episode: EpisodeConfig,
    scheduler: SchedulerConfig,
    pool: rayon::ThreadPool,
}

impl Evaluator {
    /// Validate both configurations and start the worker pool.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Config`] for invalid configuration and
    /// [`EvaluationError::Pool`] if the threads cannot be started.
    pub fn new(episode: EpisodeConfig, scheduler: SchedulerConfig) -> Result<Self, EvaluationError> {
        episode.validate()?;
        scheduler.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(scheduler.workers)
            .thread_name(|i| format!("arena-eval-{i}"))
            .build()
            .map_err(|e| EvaluationError::Pool(e.to_string()))?;
        Ok(Self {
            episode,
            scheduler,
            pool,
        })
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    #[must_use]
    pub fn episode_config(&self) -> &EpisodeConfig {
        &self.episode
    }

    /// Evaluate every task and return exactly one result per task.
    ///
    /// # Errors
    ///
    /// Only fails, before any episode starts, when two tasks share an
    /// identifier. Per-task failures are reported in the results.
    pub fn evaluate_batch<K, S>(&self, tasks: Vec<EvaluationTask<K, S>>) -> Result<Vec<EvaluationResult<K>>, EvaluationError>
    where
        K: Eq + Hash + Clone + Debug + Send,
        S: ControllerFactory,
    {
        let mut seen = HashSet::with_capacity(tasks.len());
        if let Some(dup) = tasks.iter().find(|task| !seen.insert(&task.id)) {
            return Err(EvaluationError::Config(format!("duplicate task identifier {:?}", dup.id)));
        }

        let started = Instant::now();
        let results: Vec<EvaluationResult<K>> = self
            .pool
            .install(|| tasks.into_par_iter().map(|task| self.evaluate_task(task)).collect());

        let summary = BatchSummary::from_results(&results, started.elapsed());
        info!(
            evaluated = summary.evaluated,
            failed = summary.failed,
            best = ?summary.best,
            mean = ?summary.mean_fitness,
            elapsed_ms = summary.elapsed.as_millis(),
            "batch evaluated"
        );
        if summary.failed > 0 && self.scheduler.failure_fitness > FITNESS_OFFSET {
            warn!(
                failed = summary.failed,
                failure_fitness = self.scheduler.failure_fitness,
                "failed candidates received a fitness above every successful one"
            );
        }
        Ok(results)
    }

    fn evaluate_task<K, S>(&self, task: EvaluationTask<K, S>) -> EvaluationResult<K>
    where
        K: Debug,
        S: ControllerFactory,
    {
        match evaluate_one(&task.controller, &self.episode) {
            Ok(fitness) => EvaluationResult {
                id: task.id,
                fitness,
                failure: None,
            },
            Err(err) => {
                warn!(id = ?task.id, error = %err, "evaluation failed");
                EvaluationResult {
                    id: task.id,
                    fitness: self.scheduler.failure_fitness,
                    failure: Some(err.to_string()),
                }
            }
        }
    }
}

/// Build a controller, run one episode and reduce it to a fitness.
///
/// Panics raised while building or running the controller are caught and
/// reported as [`EvaluationError::Panicked`].
///
/// # Errors
///
/// Any failure of construction, controller or integrator.
pub fn evaluate_one<S>(factory: &S, config: &EpisodeConfig) -> Result<f64, EvaluationError>
where
    S: ControllerFactory + ?Sized,
{
    catch_unwind(AssertUnwindSafe(|| {
        let mut controller = factory.build()?;
        let cumulative = run_episode(&mut controller, config)?;
        Ok(reduce_weighted(&cumulative, &config.weights))
    }))
    .unwrap_or_else(|payload| Err(EvaluationError::Panicked(panic_message(payload.as_ref()))))
}

/// Evaluate a batch on a fresh pool.
///
/// # Errors
///
/// See [`Evaluator::new`] and [`Evaluator::evaluate_batch`].
pub fn evaluate_batch<K, S>(
    tasks: Vec<EvaluationTask<K, S>>,
    episode: &EpisodeConfig,
    scheduler: &SchedulerConfig,
) -> Result<Vec<EvaluationResult<K>>, EvaluationError>
where
    K: Eq + Hash + Clone + Debug + Send,
    S: ControllerFactory,
{
    Evaluator::new(episode.clone(), scheduler.clone())?.evaluate_batch(tasks)
}

/// Index results by identifier.
#[must_use]
pub fn merge_results<K: Eq + Hash>(results: Vec<EvaluationResult<K>>) -> HashMap<K, f64> {
    results.into_iter().map(|r| (r.id, r.fitness)).collect()
}

/// Write fitness into every population member that has a result.
///
/// Returns how many members were updated.
pub fn assign_fitness<K, T, H>(
    population: &mut [(K, T)],
    results: &HashMap<K, f64, H>,
    mut set: impl FnMut(&mut T, f64),
) -> usize
where
    K: Eq + Hash,
    H: BuildHasher,
{
    let mut assigned = 0;
    for (id, member) in population.iter_mut() {
        if let Some(&fitness) = results.get(id) {
            set(member, fitness);
            assigned += 1;
        }
    }
    assigned
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
