use std::convert::Infallible;

use approx::assert_relative_eq;
use proptest::prelude::*;

use migcap_core::{EquationProblem, Model};

use super::{Action, Config, Error, Event, Reason, Status, solve, solve_unobserved};

/// Evaluates a plain function of `x`.
struct Curve(fn(f64) -> f64);

impl Model for Curve {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, x: &f64) -> Result<f64, Self::Error> {
        Ok((self.0)(*x))
    }
}

/// Drives the model output to `target`.
struct Target(f64);

impl EquationProblem<1> for Target {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Self::Error> {
        Ok([output - self.0])
    }
}

#[derive(Debug, thiserror::Error)]
#[error("input {0} is out of range")]
struct OutOfRange(f64);

/// A line that refuses inputs above `limit`.
struct LimitedLine {
    constant: f64,
    slope: f64,
    limit: f64,
}

impl Model for LimitedLine {
    type Input = f64;
    type Output = f64;
    type Error = OutOfRange;

    fn call(&self, x: &f64) -> Result<f64, Self::Error> {
        if *x > self.limit {
            return Err(OutOfRange(*x));
        }
        Ok(self.constant + self.slope * x)
    }
}

#[test]
fn solves_capacity_line_in_one_step() {
    let solution = solve_unobserved(
        &Curve(|x| 3100.0 - 12.0 * x),
        &Target(0.0),
        0.0,
        &Config::default(),
    )
    .expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.iters, 1);
    assert_relative_eq!(solution.x, 3100.0 / 12.0, epsilon = 1e-9);
    assert_relative_eq!(solution.snapshot.input, solution.x);
}

#[test]
fn solves_quadratic_from_nearby_guess() {
    let solution = solve_unobserved(&Curve(|x| x * x), &Target(9.0), 1.0, &Config::default())
        .expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x, 3.0, epsilon = 1e-9);
    assert!(solution.residual.abs() <= 1e-9);
}

#[test]
fn no_root_is_an_error() {
    let result = solve_unobserved(&Curve(|x| x * x + 1.0), &Target(0.0), 0.0, &Config::default());

    assert!(matches!(result, Err(Error::NoConvergence { .. })));
}

#[test]
fn flat_objective_is_an_error() {
    let result = solve_unobserved(&Curve(|_| 5.0), &Target(0.0), 0.0, &Config::default());

    let Err(Error::NoConvergence { reason, iters, .. }) = result else {
        panic!("expected no convergence, got {result:?}");
    };
    assert_eq!(reason, Reason::FlatResidual);
    assert_eq!(iters, 0);
}

#[test]
fn iteration_limit_is_an_error() {
    let config = Config::new(1, 1e-12, 1e-12, 1e-9, 1.0).unwrap();
    let result = solve_unobserved(&Curve(|x| x.powi(3)), &Target(8.0), 0.0, &config);

    let Err(Error::NoConvergence { reason, iters, .. }) = result else {
        panic!("expected no convergence, got {result:?}");
    };
    assert_eq!(reason, Reason::MaxIters);
    assert_eq!(iters, 1);
}

#[test]
fn non_finite_residual_is_an_error() {
    let result = solve_unobserved(
        &Curve(|x| 1.0 / (x - 1.0)),
        &Target(0.0),
        0.0,
        &Config::default(),
    );

    let Err(Error::NoConvergence { reason, x, .. }) = result else {
        panic!("expected no convergence, got {result:?}");
    };
    assert_eq!(reason, Reason::NonFiniteResidual);
    assert_relative_eq!(x, 0.0);
}

#[test]
fn non_finite_guess_is_rejected() {
    let result = solve_unobserved(&Curve(|x| x), &Target(0.0), f64::NAN, &Config::default());

    assert!(matches!(result, Err(Error::NonFiniteGuess { .. })));
}

#[test]
fn bracketed_steps_stay_inside_the_bracket() {
    let mut steps = Vec::new();
    let observer = |event: &Event<'_, _, _>| {
        if let Some(bracket) = event.bracket() {
            steps.push((event.x(), bracket));
        }
        None
    };

    let solution = solve(
        &Curve(|x| x.powi(3)),
        &Target(8.0),
        0.0,
        &Config::default(),
        observer,
    )
    .expect("should converge");

    assert_relative_eq!(solution.x, 2.0, epsilon = 1e-9);
    assert!(!steps.is_empty());
    for (x, [left, right]) in steps {
        assert!(left < x && x < right, "{x} outside [{left}, {right}]");
    }
}

#[test]
fn step_residual_is_a_discontinuity() {
    let split = std::f64::consts::PI / 10.0;
    let result = solve_unobserved(
        &Curve(|x| if x < std::f64::consts::PI / 10.0 { -1.0 } else { 1.0 }),
        &Target(0.0),
        0.0,
        &Config::default(),
    );

    let Err(Error::NoConvergence { reason, x, residual, .. }) = result else {
        panic!("expected no convergence, got {result:?}");
    };
    assert_eq!(reason, Reason::Discontinuity);
    assert_relative_eq!(x, split, epsilon = 1e-9);
    assert_relative_eq!(residual.abs(), 1.0);
}

#[test]
fn pole_is_a_discontinuity() {
    let result = solve_unobserved(
        &Curve(|x| 1.0 / (x - 0.31415)),
        &Target(0.0),
        0.0,
        &Config::default(),
    );

    let Err(Error::NoConvergence { reason, residual, .. }) = result else {
        panic!("expected no convergence, got {result:?}");
    };
    assert_eq!(reason, Reason::Discontinuity);
    assert!(residual.abs() > 1.0);
}

#[test]
fn decaying_residual_is_accepted_within_absolute_tolerance() {
    let solution = solve_unobserved(&Curve(f64::exp), &Target(0.0), 0.0, &Config::default())
        .expect("exp(x) drops below residual_tol");

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.residual.abs() <= 1e-9);
    assert!(solution.x < -20.0);
}

#[test]
fn observer_can_stop_early() {
    let observer = |_event: &Event<'_, _, _>| Some(Action::StopEarly);

    let solution = solve(
        &Curve(|x| 3100.0 - 12.0 * x),
        &Target(0.0),
        0.0,
        &Config::default(),
        observer,
    )
    .expect("stopping early still returns the best point");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 0);
    assert_relative_eq!(solution.x, 0.0);
    assert_relative_eq!(solution.residual, 3100.0);
}

#[test]
fn convergence_wins_over_stop_request() {
    let observer = |_event: &Event<'_, _, _>| Some(Action::StopEarly);

    let solution = solve(
        &Curve(|x| x - 2.0),
        &Target(0.0),
        2.0,
        &Config::default(),
        observer,
    )
    .expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.x, 2.0);
}

#[test]
fn model_failure_propagates() {
    let model = LimitedLine {
        constant: 3100.0,
        slope: -12.0,
        limit: 100.0,
    };

    let result = solve_unobserved(&model, &Target(0.0), 0.0, &Config::default());

    let Err(Error::Model(error)) = result else {
        panic!("expected a model error, got {result:?}");
    };
    assert!(error.downcast_ref::<OutOfRange>().is_some());
}

#[test]
fn observer_can_stop_on_model_failure() {
    let model = LimitedLine {
        constant: 3100.0,
        slope: -12.0,
        limit: 100.0,
    };

    let mut failures = 0;
    let observer = |event: &Event<'_, LimitedLine, Target>| match event {
        Event::ModelFailed { x, error, .. } => {
            failures += 1;
            assert_relative_eq!(*x, error.0);
            Some(Action::StopEarly)
        }
        _ => None,
    };

    let solution = solve(&model, &Target(0.0), 0.0, &Config::default(), observer)
        .expect("stopping early still returns the best point");

    assert_eq!(failures, 1);
    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_relative_eq!(solution.x, 1.0);
    assert_relative_eq!(solution.residual, 3088.0);
}

#[test]
fn stop_before_any_success_is_an_error() {
    let model = LimitedLine {
        constant: 1.0,
        slope: 1.0,
        limit: -1.0,
    };
    let observer = |_event: &Event<'_, _, _>| Some(Action::StopEarly);

    let result = solve(&model, &Target(0.0), 0.0, &Config::default(), observer);

    assert!(matches!(result, Err(Error::NoSuccessfulEvaluation)));
}

proptest! {
    #[test]
    fn affine_root_matches_closed_form(
        c in 0.0..1e5f64,
        n in 1u32..=120,
        target in 0.0..1e5f64,
    ) {
        let model = LimitedLine {
            constant: c,
            slope: -f64::from(n),
            limit: f64::INFINITY,
        };

        let solution = solve_unobserved(&model, &Target(target), 0.0, &Config::default())
            .expect("affine residual must converge");

        let expected = (c - target) / f64::from(n);
        prop_assert!((solution.x - expected).abs() <= 1e-6);
    }
}
