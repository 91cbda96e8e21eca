use approx::assert_relative_eq;
use evaluation::{
    fitness, run_episode, run_episode_observed, EpisodeConfig, EvaluationError, TrajectoryRecorder, FITNESS_OFFSET,
    MAX_FORCE,
};
use ml::{from_fn, Constant, ControllerError, FeedForward};
use physics::PlantTopology;

fn short(topology: PlantTopology, duration: f64) -> EpisodeConfig {
    let mut config = EpisodeConfig::for_topology(topology);
    config.duration = duration;
    config
}

#[test]
fn identical_inputs_give_identical_errors() {
    let mut rng = fastrand::Rng::with_seed(7);
    let net = FeedForward::random(&[6, 8, 1], &mut rng).unwrap();
    let config = short(PlantTopology::DoublePendulum, 2.0);

    let a = run_episode(&mut net.clone(), &config).unwrap();
    let b = run_episode(&mut net.clone(), &config).unwrap();
    assert_eq!(a.len(), 6);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-9);
    }
}

#[test]
fn idle_controller_still_accumulates_tilt() {
    for topology in [PlantTopology::SinglePendulum, PlantTopology::DoublePendulum] {
        let error = run_episode(&mut Constant::scalar(0.0), &short(topology, 2.0)).unwrap();
        assert!(error.iter().all(|e| e.is_finite() && *e >= 0.0), "{error:?}");
        assert!(error[2] > 0.0, "{topology}: warm-up push must tilt the first link");
        assert!(fitness::reduce(&error, topology) < FITNESS_OFFSET);
    }
}

#[test]
fn first_tick_sees_initial_state_with_zero_velocity() {
    let config = short(PlantTopology::SinglePendulum, 0.1);
    let mut recorder = TrajectoryRecorder::default();
    run_episode_observed(&mut Constant::scalar(0.0), &config, &mut recorder).unwrap();

    let first = &recorder.ticks[0];
    assert_eq!(first.tick, 0);
    assert_eq!(first.elapsed, 0.0);
    assert_relative_eq!(first.error[0], (340.0 - 150.0) / 100.0, epsilon = 1e-12);
    assert_eq!(first.error[1], 0.0);
    assert_eq!(first.error[2], 0.0);
    assert_eq!(first.error[3], 0.0);
}

#[test]
fn horizon_runs_until_elapsed_exceeds_duration() {
    let mut config = short(PlantTopology::SinglePendulum, 1.0);
    config.dt = 0.25;
    let mut recorder = TrajectoryRecorder::default();
    run_episode_observed(&mut Constant::scalar(0.0), &config, &mut recorder).unwrap();

    // ticks start at 0, 0.25, 0.5, 0.75 and 1.0
    assert_eq!(recorder.ticks.len(), 5);
    assert_eq!(recorder.ticks[4].elapsed, 1.0);
}

#[test]
fn warmup_then_saturated_force() {
    let config = short(PlantTopology::DoublePendulum, 1.0);
    let mut recorder = TrajectoryRecorder::default();
    run_episode_observed(&mut Constant::scalar(15.0), &config, &mut recorder).unwrap();

    for tick in &recorder.ticks {
        assert!(tick.force.abs() <= MAX_FORCE);
        if tick.elapsed < config.warmup_duration {
            assert_eq!(tick.force, config.warmup_force);
        } else {
            assert_eq!(tick.force, MAX_FORCE);
        }
    }

    let mut recorder = TrajectoryRecorder::default();
    run_episode_observed(&mut Constant::scalar(-15.0), &config, &mut recorder).unwrap();
    let last = recorder.ticks.last().unwrap();
    assert_eq!(last.force, -MAX_FORCE);
}

#[test]
fn recorder_reports_every_body_pose() {
    let mut recorder = TrajectoryRecorder::default();
    run_episode_observed(
        &mut Constant::scalar(0.0),
        &short(PlantTopology::DoublePendulum, 0.1),
        &mut recorder,
    )
    .unwrap();
    assert!(recorder.ticks.iter().all(|t| t.poses.len() == 3));
}

#[test]
fn controller_error_aborts_the_episode() {
    let mut calls = 0;
    let mut flaky = from_fn(move |_: &[f64]| {
        calls += 1;
        if calls > 3 {
            Err(ControllerError::Failed("gave up".into()))
        } else {
            Ok(vec![0.0])
        }
    });
    let err = run_episode(&mut flaky, &short(PlantTopology::SinglePendulum, 1.0)).unwrap_err();
    assert!(matches!(err, EvaluationError::Controller(ControllerError::Failed(_))));
    assert!(!err.is_fatal());
}

#[test]
fn non_finite_and_empty_outputs_are_rejected() {
    let config = short(PlantTopology::SinglePendulum, 0.5);

    let err = run_episode(&mut Constant::scalar(f64::NAN), &config).unwrap_err();
    assert!(matches!(err, EvaluationError::Controller(ControllerError::NonFinite)));

    let err = run_episode(&mut Constant(Vec::new()), &config).unwrap_err();
    assert!(matches!(err, EvaluationError::Controller(ControllerError::EmptyOutput)));
}

#[test]
fn network_with_wrong_input_width_fails() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut net = FeedForward::random(&[6, 4, 1], &mut rng).unwrap();
    let err = run_episode(&mut net, &short(PlantTopology::SinglePendulum, 0.5)).unwrap_err();
    assert!(matches!(
        err,
        EvaluationError::Controller(ControllerError::InputSize { expected: 6, actual: 4 })
    ));
}

#[test]
fn invalid_setpoint_is_fatal() {
    let mut config = EpisodeConfig::for_topology(PlantTopology::SinglePendulum);
    config.setpoint.push(0.0);
    let err = run_episode(&mut Constant::scalar(0.0), &config).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn full_horizon_idle_single_pendulum_is_reproducible() {
    let config = EpisodeConfig::for_topology(PlantTopology::SinglePendulum);
    let a = run_episode(&mut Constant::scalar(0.0), &config).unwrap();
    let b = run_episode(&mut Constant::scalar(0.0), &config).unwrap();

    assert!(a[2] > 0.0);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-9);
    }
}
