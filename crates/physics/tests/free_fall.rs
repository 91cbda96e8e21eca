use approx::assert_relative_eq;
use physics::{PhysicsSim, Vec2};

#[test]
fn body_free_fall_matches_analytic() {
    let mut sim = PhysicsSim::new();
    let idx = sim.add_body(1.0, 1.0, Vec2::new(0.0, 10.0)).unwrap();
    let g = -sim.params.gravity.y;
    let dt = 0.01_f64;
    let steps = 100_usize;
    sim.run(dt, steps).unwrap();

    // semi-implicit Euler lags the analytic curve by g * h * t / 2
    #[allow(clippy::cast_precision_loss)]
    let t = dt * steps as f64;
    #[allow(clippy::cast_precision_loss)]
    let h = dt / sim.params.substeps as f64;
    let expected = 10.0 - 0.5 * g * t * t;
    let diff = (sim.bodies[idx].pos.y - expected).abs();
    assert!(diff <= 0.5 * g * h * t + 1e-6, "diff={diff}");
    assert_relative_eq!(sim.bodies[idx].vel.y, -g * t, epsilon = 1e-6);
}

#[test]
fn infinite_mass_body_stays_put() {
    let mut sim = PhysicsSim::new();
    let idx = sim.add_body(f64::INFINITY, f64::INFINITY, Vec2::new(5.0, 5.0)).unwrap();
    sim.apply_force(idx, Vec2::new(1000.0, 0.0)).unwrap();
    sim.run(0.01, 50).unwrap();
    assert_eq!(sim.bodies[idx].pos, Vec2::new(5.0, 5.0));
}
