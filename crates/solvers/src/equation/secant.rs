//! Secant root finding for single-variable equations.
//!
//! # Algorithm
//!
//! The secant method starts from an initial guess `x0` and a second point a
//! small step away, then repeatedly steps to the root of the line through
//! the two most recent evaluations. For an affine residual the first secant
//! step lands on the root exactly.
//!
//! Once two evaluations have residuals of opposite sign, the solver keeps
//! them as a [`Bracket`]. Any secant step that leaves the bracket, or a flat
//! secant with equal residuals, falls back to the bracket midpoint. Every
//! new point shrinks the bracket, so a bracketed solve cannot diverge.
//!
//! # Convergence
//!
//! A solve converges only when the residual magnitude is at most
//! `residual_tol`. The tolerance is absolute, so a residual that decays
//! toward zero without crossing it is accepted once it is small enough.
//!
//! A bracket whose width drops to `x_abs_tol + x_rel_tol * |mid|` before any
//! residual is small enough holds a jump or a pole, not a root, and fails
//! with [`Reason::Discontinuity`]. Running out of iterations, a flat residual
//! with no bracket, and a non-finite residual also fail with
//! [`Error::NoConvergence`].
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per evaluation, including both starting
//! points:
//!
//! - [`Event::Evaluated`]: evaluation succeeded
//! - [`Event::ModelFailed`]: model returned an error
//! - [`Event::ProblemFailed`]: problem returned an error (input or residual)
//!
//! Observers can return [`Action::StopEarly`] to halt and receive the best
//! evaluation so far with [`Status::StoppedByObserver`]. A converged
//! residual takes precedence over the request to stop.

mod action;
mod best;
mod bracket;
mod config;
mod error;
mod event;
mod point;
mod search;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use bracket::{Bracket, Sign};
pub use config::{Config, ConfigError};
pub use error::{Error, Reason};
pub use event::Event;
pub use point::Point;
pub use solution::{Solution, Status};

use migcap_core::{EquationProblem, Model, Observer};

use search::search;

/// Finds a root of the residual using the secant method, starting at `x0`.
///
/// The observer receives an [`Event`] for each evaluation.
/// See the [module docs](self) for details on convergence and observer actions.
///
/// # Errors
///
/// Returns an error if `x0` is not finite, if the solve does not converge,
/// or if the model or problem fails and the observer does not stop early.
pub fn solve<M, P, Obs>(
    model: &M,
    problem: &P,
    x0: f64,
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P>, Action>,
{
    search(model, problem, x0, config, observer)
}

/// Finds a root of the residual without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if `x0` is not finite, if the solve does not converge,
/// or if the model or problem fails.
pub fn solve_unobserved<M, P>(
    model: &M,
    problem: &P,
    x0: f64,
    config: &Config,
) -> Result<Solution<M::Input, M::Output>, Error>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, x0, config, ())
}
