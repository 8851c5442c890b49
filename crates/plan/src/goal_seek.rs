//! Solving a formula for the value of `x` that produces a target.
//!
//! The objective is `f(x) = formula(x) - target`. Formulas that are affine in
//! `x` are solved in closed form; everything else goes through the secant
//! solver in `migcap-solvers`, starting from `x = 0`.

use std::convert::Infallible;

use thiserror::Error;
use tracing::{debug, trace};

use migcap_core::{EquationProblem, Model, Observer};
use migcap_expr::{EvaluationError, Formula};
use migcap_solvers::equation::secant::{self, Action, Config, Event, Status};

pub use migcap_solvers::equation::secant::Error as SolveError;

/// The initial guess for iterative solves.
pub const INITIAL_GUESS: f64 = 0.0;

/// Errors that can occur during a goal seek.
#[derive(Debug, Error)]
pub enum GoalSeekError {
    #[error("formula evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Solve(SolveError),

    #[error("goal seek stopped early at x = {x} (residual = {residual})")]
    Stopped { x: f64, residual: f64 },
}

impl From<SolveError> for GoalSeekError {
    /// Recovers evaluation failures from the solver's boxed model error.
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::Model(source) => match source.downcast::<EvaluationError>() {
                Ok(evaluation) => Self::Evaluation(*evaluation),
                Err(source) => Self::Solve(SolveError::Model(source)),
            },
            other => Self::Solve(other),
        }
    }
}

/// A [`Model`] that evaluates a formula at its input.
#[derive(Debug, Clone)]
pub struct FormulaModel {
    formula: Formula,
}

impl FormulaModel {
    #[must_use]
    pub fn new(formula: Formula) -> Self {
        Self { formula }
    }

    #[must_use]
    pub fn formula(&self) -> &Formula {
        &self.formula
    }
}

impl Model for FormulaModel {
    type Input = f64;
    type Output = f64;
    type Error = EvaluationError;

    fn call(&self, input: &f64) -> Result<f64, Self::Error> {
        self.formula.evaluate(*input)
    }
}

/// Drives a scalar model output to `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetProblem {
    pub target: f64,
}

impl TargetProblem {
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for TargetProblem {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(&self, _input: &f64, output: &f64) -> Result<[f64; 1], Self::Error> {
        Ok([output - self.target])
    }
}

/// Parses `formula` and solves it for `target` with the default solver config.
///
/// # Errors
///
/// Returns an error if the formula does not parse or evaluate, or if no
/// root is found.
pub fn solve(formula: &str, target: f64) -> Result<f64, GoalSeekError> {
    let formula = Formula::parse(formula)?;
    solve_formula(&formula, target, &Config::default())
}

/// Solves a parsed formula for `target`.
///
/// Affine formulas with a nonzero slope are solved in closed form. All other
/// formulas, including constant ones, are solved iteratively.
///
/// # Errors
///
/// Returns an error if evaluation fails or no root is found.
pub fn solve_formula(
    formula: &Formula,
    target: f64,
    config: &Config,
) -> Result<f64, GoalSeekError> {
    if let Some(x) = formula.affine().and_then(|affine| affine.solve(target)) {
        debug!(%formula, target, x, "solved affine formula in closed form");
        return Ok(x);
    }
    solve_iteratively(formula, target, config)
}

/// Solves a parsed formula for `target` with the secant solver only.
///
/// Each iteration is logged at `trace` level.
///
/// # Errors
///
/// Returns an error if evaluation fails or no root is found.
pub fn solve_iteratively(
    formula: &Formula,
    target: f64,
    config: &Config,
) -> Result<f64, GoalSeekError> {
    solve_observed(formula, target, config, trace_event)
}

/// Solves a parsed formula for `target`, passing every solver event to `observer`.
///
/// # Errors
///
/// Returns an error if evaluation fails, no root is found, or the observer
/// stops the solve before it converges.
pub fn solve_observed<Obs>(
    formula: &Formula,
    target: f64,
    config: &Config,
    observer: Obs,
) -> Result<f64, GoalSeekError>
where
    Obs: for<'a> Observer<Event<'a, FormulaModel, TargetProblem>, Action>,
{
    let model = FormulaModel::new(formula.clone());
    let problem = TargetProblem::new(target);

    let solution = secant::solve(&model, &problem, INITIAL_GUESS, config, observer)?;
    debug!(
        %formula,
        target,
        x = solution.x,
        residual = solution.residual,
        iters = solution.iters,
        "secant solve finished"
    );

    match solution.status {
        Status::Converged => Ok(solution.x),
        Status::StoppedByObserver => Err(GoalSeekError::Stopped {
            x: solution.x,
            residual: solution.residual,
        }),
    }
}

/// Logs a solver event at `trace` level.
pub fn trace_event(event: &Event<'_, FormulaModel, TargetProblem>) -> Option<Action> {
    match event {
        Event::Evaluated { point, bracket, .. } => {
            trace!(x = point.x, residual = point.residual, ?bracket, "evaluated");
        }
        Event::ModelFailed { x, error, .. } => {
            trace!(x, %error, "formula evaluation failed");
        }
        Event::ProblemFailed { x, .. } => {
            trace!(x, "residual computation failed");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use migcap_solvers::equation::secant::Reason;

    fn formula(source: &str) -> Formula {
        Formula::parse(source).expect("should parse")
    }

    #[test]
    fn capacity_formula() {
        let rate = solve("3100 - 12*x", 0.0).unwrap();
        assert_relative_eq!(rate, 3100.0 / 12.0, epsilon = 1e-9);
        assert_eq!(format!("{rate:.2}"), "258.33");
    }

    #[test]
    fn closed_form_and_iterative_agree() {
        let formula = formula("3100 - 12*x");
        let config = Config::default();

        let closed = solve_formula(&formula, 100.0, &config).unwrap();
        let iterative = solve_iteratively(&formula, 100.0, &config).unwrap();

        assert_relative_eq!(closed, 250.0, epsilon = 1e-9);
        assert_relative_eq!(iterative, closed, epsilon = 1e-6);
    }

    #[test]
    fn solves_nonlinear_formula() {
        let x = solve("sqrt(x + 1)", 3.0).unwrap();
        assert_relative_eq!(x, 8.0, epsilon = 1e-6);
    }

    #[test]
    fn no_root_is_a_solve_error() {
        let err = solve("x^2 + 1", 0.0).expect_err("no real root");
        assert!(matches!(
            err,
            GoalSeekError::Solve(SolveError::NoConvergence { .. })
        ));
    }

    #[test]
    fn flat_formula_is_a_solve_error() {
        let err = solve("0*x + 5", 0.0).expect_err("no x reaches 0");
        assert!(matches!(
            err,
            GoalSeekError::Solve(SolveError::NoConvergence {
                reason: Reason::FlatResidual,
                ..
            })
        ));
    }

    #[test]
    fn pole_is_a_solve_error() {
        let err = solve("1/(x - 0.31415)", 0.0).expect_err("a pole is not a root");
        assert!(matches!(
            err,
            GoalSeekError::Solve(SolveError::NoConvergence {
                reason: Reason::Discontinuity,
                ..
            })
        ));
    }

    #[test]
    fn step_formula_is_a_solve_error() {
        let err = solve("round(x)", 0.5).expect_err("round(x) never equals 0.5");
        assert!(matches!(
            err,
            GoalSeekError::Solve(SolveError::NoConvergence {
                reason: Reason::Discontinuity,
                ..
            })
        ));
    }

    #[test]
    fn decaying_formula_is_solved_within_residual_tolerance() {
        let x = solve("exp(x)", 0.0).unwrap();
        assert!(x.exp() <= Config::default().residual_tol());
    }

    #[test]
    fn constant_formula_at_target_is_solved() {
        let x = solve("5", 5.0).unwrap();
        assert_relative_eq!(x, INITIAL_GUESS);
    }

    #[test]
    fn parse_failure_is_an_evaluation_error() {
        let err = solve("__import__('os')", 0.0).expect_err("must not parse");
        assert!(matches!(err, GoalSeekError::Evaluation(_)));
    }

    #[test]
    fn evaluation_failure_during_solve_is_recovered() {
        let err = solve("log(x)", 1.0).expect_err("log(0) fails at the initial guess");
        assert!(matches!(
            err,
            GoalSeekError::Evaluation(EvaluationError::Domain { function: "log", .. })
        ));
    }

    #[test]
    fn observer_stop_is_an_error() {
        let err = solve_observed(
            &formula("x^3 - 8"),
            0.0,
            &Config::default(),
            |_event: &Event<'_, _, _>| Some(Action::StopEarly),
        )
        .expect_err("stopped before converging");

        let GoalSeekError::Stopped { x, .. } = err else {
            panic!("expected a stop, got {err:?}");
        };
        assert_relative_eq!(x, INITIAL_GUESS);
    }
}
