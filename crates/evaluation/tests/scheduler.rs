use std::collections::HashSet;

use evaluation::{
    assign_fitness, evaluate_batch, evaluate_one, merge_results, EpisodeConfig, EvaluationError, EvaluationTask,
    Evaluator, SchedulerConfig, FITNESS_OFFSET, SENTINEL_FITNESS,
};
use ml::{Controller, ControllerError, ControllerFactory};
use physics::{PhysicsError, PlantTopology};

/// Controller whose behaviour is fixed at construction, for exercising the
/// scheduler's failure handling.
#[derive(Clone, Debug)]
enum Scripted {
    Steady(f64),
    FailsAfter(u32),
    PanicsAfter(u32),
    Unbuildable,
}

struct Running {
    script: Scripted,
    calls: u32,
}

impl Controller for Running {
    fn activate(&mut self, _inputs: &[f64]) -> Result<Vec<f64>, ControllerError> {
        self.calls += 1;
        match self.script {
            Scripted::Steady(v) => Ok(vec![v]),
            Scripted::FailsAfter(n) if self.calls > n => Err(ControllerError::Failed("scripted failure".into())),
            Scripted::PanicsAfter(n) if self.calls > n => panic!("scripted panic"),
            _ => Ok(vec![0.0]),
        }
    }
}

impl ControllerFactory for Scripted {
    type Controller = Running;

    fn build(&self) -> Result<Running, ControllerError> {
        if matches!(self, Self::Unbuildable) {
            return Err(ControllerError::Shape("no layers".into()));
        }
        Ok(Running {
            script: self.clone(),
            calls: 0,
        })
    }
}

fn quick_episode() -> EpisodeConfig {
    let mut config = EpisodeConfig::for_topology(PlantTopology::SinglePendulum);
    config.duration = 0.3;
    config
}

fn scheduler(workers: usize) -> SchedulerConfig {
    SchedulerConfig::default().with_workers(workers)
}

#[test]
fn one_result_per_task_for_any_pool_size() {
    for workers in [1, 2, 4] {
        let evaluator = Evaluator::new(quick_episode(), scheduler(workers)).unwrap();
        assert_eq!(evaluator.workers(), workers);
        for n in [0_usize, 1, 5, 13] {
            let tasks = (0..n)
                .map(|i| EvaluationTask::new(i, Scripted::Steady(0.01 * i as f64)))
                .collect();
            let results = evaluator.evaluate_batch(tasks).unwrap();
            assert_eq!(results.len(), n);
            let ids: HashSet<usize> = results.iter().map(|r| r.id).collect();
            assert_eq!(ids, (0..n).collect());
            assert!(results.iter().all(|r| !r.is_failure() && r.fitness <= FITNESS_OFFSET));
        }
    }
}

#[test]
fn fitness_does_not_depend_on_pool_size() {
    let tasks = || -> Vec<_> {
        (0..6)
            .map(|i| EvaluationTask::new(i, Scripted::Steady(0.05 * f64::from(i) - 0.1)))
            .collect()
    };
    let serial = merge_results(evaluate_batch(tasks(), &quick_episode(), &scheduler(1)).unwrap());
    let parallel = merge_results(evaluate_batch(tasks(), &quick_episode(), &scheduler(4)).unwrap());
    assert_eq!(serial, parallel);
}

#[test]
fn failures_get_the_sentinel_and_do_not_disturb_others() {
    let config = quick_episode();
    let tasks = vec![
        EvaluationTask::new("good", Scripted::Steady(0.02)),
        EvaluationTask::new("fails-at-once", Scripted::FailsAfter(0)),
        EvaluationTask::new("fails-later", Scripted::FailsAfter(10)),
        EvaluationTask::new("panics", Scripted::PanicsAfter(5)),
        EvaluationTask::new("unbuildable", Scripted::Unbuildable),
        EvaluationTask::new("also-good", Scripted::Steady(-0.02)),
    ];
    let results = evaluate_batch(tasks, &config, &scheduler(3)).unwrap();
    assert_eq!(results.len(), 6);

    for result in &results {
        if result.id.contains("good") {
            assert!(!result.is_failure(), "{result:?}");
            assert!(result.fitness <= FITNESS_OFFSET);
        } else {
            assert!(result.is_failure(), "{result:?}");
            assert_eq!(result.fitness, SENTINEL_FITNESS);
        }
    }

    // a good candidate scores the same as when evaluated on its own
    let alone = evaluate_one(&Scripted::Steady(0.02), &config).unwrap();
    let fitness = merge_results(results);
    assert_eq!(fitness["good"], alone);
}

#[test]
fn diverging_episode_gets_the_sentinel() {
    // finite but absurd gain: any non-zero output flings the cart out of range
    let mut config = quick_episode();
    config.warmup_duration = 0.0;
    config.force_gain = f64::MAX;
    config.max_force = f64::MAX;
    config.validate().unwrap();

    let err = evaluate_one(&Scripted::Steady(1.0), &config).unwrap_err();
    assert!(matches!(err, EvaluationError::Physics(PhysicsError::Diverged { .. })), "{err:?}");
    assert!(!err.is_fatal());

    let tasks = vec![
        EvaluationTask::new(1, Scripted::Steady(0.0)),
        EvaluationTask::new(2, Scripted::Steady(1.0)),
        EvaluationTask::new(3, Scripted::Steady(0.0)),
    ];
    let results = evaluate_batch(tasks, &config, &scheduler(2)).unwrap();
    assert_eq!(results.len(), 3);

    let idle = evaluate_one(&Scripted::Steady(0.0), &config).unwrap();
    for result in &results {
        if result.id == 2 {
            assert!(result.is_failure(), "{result:?}");
            assert_eq!(result.fitness, SENTINEL_FITNESS);
        } else {
            assert!(!result.is_failure(), "{result:?}");
            assert_eq!(result.fitness, idle);
            assert!(result.fitness <= FITNESS_OFFSET);
        }
    }
}

#[test]
fn panics_are_reported_as_errors() {
    let err = evaluate_one(&Scripted::PanicsAfter(0), &quick_episode()).unwrap_err();
    match err {
        EvaluationError::Panicked(msg) => assert!(msg.contains("scripted panic")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn failure_fitness_is_configurable() {
    let mut config = scheduler(2);
    config.failure_fitness = -1.0e9;
    let tasks = vec![
        EvaluationTask::new(1, Scripted::FailsAfter(0)),
        EvaluationTask::new(2, Scripted::Steady(0.0)),
    ];
    let results = merge_results(evaluate_batch(tasks, &quick_episode(), &config).unwrap());
    assert_eq!(results[&1], -1.0e9);
    assert!(results[&2] > results[&1]);
}

#[test]
fn duplicate_identifiers_are_fatal() {
    let tasks = vec![
        EvaluationTask::new(3, Scripted::Steady(0.0)),
        EvaluationTask::new(3, Scripted::Steady(0.1)),
    ];
    let err = evaluate_batch(tasks, &quick_episode(), &scheduler(2)).unwrap_err();
    assert!(matches!(err, EvaluationError::Config(_)));
    assert!(err.is_fatal());
}

#[test]
fn invalid_configuration_is_fatal() {
    let mut episode = quick_episode();
    episode.weights.pop();
    let err = Evaluator::new(episode, scheduler(2)).err().unwrap();
    assert!(err.is_fatal());

    let err = Evaluator::new(quick_episode(), scheduler(0)).err().unwrap();
    assert!(err.is_fatal());
}

#[test]
fn results_feed_back_into_population_by_identifier() {
    let mut population: Vec<(u64, f64)> = (10..15).map(|id| (id, f64::NAN)).collect();
    let tasks = population
        .iter()
        .rev()
        .map(|(id, _)| EvaluationTask::new(*id, Scripted::Steady(0.0)))
        .collect();
    let results = merge_results(evaluate_batch(tasks, &quick_episode(), &scheduler(2)).unwrap());
    let assigned = assign_fitness(&mut population, &results, |slot, f| *slot = f);
    assert_eq!(assigned, 5);
    assert!(population.iter().all(|(_, f)| *f <= FITNESS_OFFSET));
}
