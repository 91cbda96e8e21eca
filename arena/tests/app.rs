use approx::assert_relative_eq;
use arena::app::{evaluate, replay, EvaluateOptions, ReplayOptions};
use evaluation::FITNESS_OFFSET;
use physics::PlantTopology;

fn temp_artifact(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("arena-{name}-{}.json", std::process::id()))
}

#[test]
fn best_network_replays_to_the_same_fitness() {
    let path = temp_artifact("best");
    let report = evaluate(&EvaluateOptions {
        topology: PlantTopology::DoublePendulum,
        population: 6,
        hidden: 4,
        workers: Some(2),
        seed: 11,
        duration: Some(0.5),
        save_best: Some(path.clone()),
    })
    .unwrap();

    assert_eq!(report.summary.evaluated, 6);
    let (_, best_fitness) = report.summary.best.unwrap();
    assert!(best_fitness <= FITNESS_OFFSET);
    assert!(report.best.is_some());

    let replayed = replay(&ReplayOptions {
        topology: PlantTopology::DoublePendulum,
        controller: path.clone(),
        duration: Some(0.5),
    })
    .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_relative_eq!(replayed.fitness, best_fitness, epsilon = 1e-9);
    assert_eq!(replayed.trajectory.ticks.len(), replayed.trajectory.ticks.last().unwrap().tick + 1);
}

#[test]
fn same_seed_same_summary() {
    let options = EvaluateOptions {
        topology: PlantTopology::SinglePendulum,
        population: 4,
        hidden: 3,
        workers: Some(1),
        seed: 5,
        duration: Some(0.3),
        save_best: None,
    };
    let a = evaluate(&options).unwrap();
    let b = evaluate(&EvaluateOptions {
        workers: Some(3),
        ..options
    })
    .unwrap();
    assert_eq!(a.summary.best, b.summary.best);
    assert_eq!(a.best, b.best);
}

#[test]
fn replaying_a_missing_file_fails() {
    let err = replay(&ReplayOptions {
        topology: PlantTopology::SinglePendulum,
        controller: temp_artifact("missing"),
        duration: None,
    })
    .unwrap_err();
    assert!(err.to_string().contains("loading"));
}

#[test]
fn network_trained_for_one_topology_fails_on_the_other() {
    let path = temp_artifact("mismatch");
    evaluate(&EvaluateOptions {
        topology: PlantTopology::SinglePendulum,
        population: 2,
        hidden: 2,
        workers: Some(1),
        seed: 3,
        duration: Some(0.2),
        save_best: Some(path.clone()),
    })
    .unwrap();

    let result = replay(&ReplayOptions {
        topology: PlantTopology::DoublePendulum,
        controller: path.clone(),
        duration: Some(0.2),
    });
    std::fs::remove_file(&path).unwrap();
    assert!(result.is_err());
}
