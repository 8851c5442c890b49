use migcap_core::{EquationProblem, Model, Observer};

use crate::equation::evaluate;

use super::{
    Action, Config, Error, Event, Point, Reason, Solution, Status, best::Best, bracket::Bracket,
};

/// Core secant iteration with bracket safeguarding.
///
/// Only a residual within `residual_tol` counts as convergence.
pub(super) fn search<M, P, Obs>(
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
    if !x0.is_finite() {
        return Err(Error::NonFiniteGuess { x: x0 });
    }

    let mut state = State {
        model,
        problem,
        config,
        observer,
        best: Best::empty(),
        bracket: None,
    };

    let mut prev = match state.evaluate_at(x0, 0)? {
        Outcome::Continue(point) => point,
        Outcome::Finished(status) => return state.best.finish(status, 0),
    };
    let mut curr = match state.evaluate_at(config.second_point(x0), 0)? {
        Outcome::Continue(point) => point,
        Outcome::Finished(status) => return state.best.finish(status, 0),
    };
    state.bracket = Bracket::from_points(prev, curr);

    for iter in 1..=config.max_iters() {
        if state.is_bracket_collapsed() {
            return Err(state.no_convergence(Reason::Discontinuity, iter - 1));
        }

        let x = match (state.bracket, prev.secant_root(curr)) {
            (Some(bracket), Some(x)) if bracket.contains(x) => x,
            (Some(bracket), _) => bracket.midpoint(),
            (None, Some(x)) => x,
            (None, None) => return Err(state.no_convergence(Reason::FlatResidual, iter - 1)),
        };

        let next = match state.evaluate_at(x, iter)? {
            Outcome::Continue(point) => point,
            Outcome::Finished(status) => return state.best.finish(status, iter),
        };

        state.bracket = match state.bracket {
            Some(mut bracket) => {
                bracket.shrink(next);
                Some(bracket)
            }
            None => Bracket::from_points(curr, next),
        };

        prev = curr;
        curr = next;
    }

    let reason = if state.is_bracket_collapsed() {
        Reason::Discontinuity
    } else {
        Reason::MaxIters
    };
    Err(state.no_convergence(reason, config.max_iters()))
}

/// Outcome of a single evaluation.
enum Outcome {
    /// Keep iterating from this point.
    Continue(Point),
    /// Stop and report the best evaluation with this status.
    Finished(Status),
}

struct State<'a, M, P, Obs>
where
    M: Model,
{
    model: &'a M,
    problem: &'a P,
    config: &'a Config,
    observer: Obs,
    best: Best<M::Input, M::Output>,
    bracket: Option<Bracket>,
}

impl<M, P, Obs> State<'_, M, P, Obs>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P>, Action>,
{
    /// Evaluates at `x`, emits an event, and decides whether to continue.
    ///
    /// A converged residual wins over an observer's request to stop.
    fn evaluate_at(&mut self, x: f64, iters: usize) -> Result<Outcome, Error> {
        let bracket = self.bracket.map(|bracket| bracket.as_array());

        let eval = match evaluate(self.model, self.problem, [x]) {
            Ok(eval) => eval,
            Err(error) => {
                return match Event::<M, P>::emit_failure(x, bracket, &error, &mut self.observer) {
                    Some(Action::StopEarly) => Ok(Outcome::Finished(Status::StoppedByObserver)),
                    None => Err(error.into()),
                };
            }
        };

        let point = Point::from(&eval);
        let event = Event::Evaluated {
            point,
            input: &eval.snapshot.input,
            output: &eval.snapshot.output,
            bracket,
        };
        let action = self.observer.observe(&event);

        if !point.residual.is_finite() {
            return Err(self.no_convergence(Reason::NonFiniteResidual, iters));
        }
        self.best.update(eval);

        if point.is_residual_converged(self.config.residual_tol()) {
            return Ok(Outcome::Finished(Status::Converged));
        }
        match action {
            Some(Action::StopEarly) => Ok(Outcome::Finished(Status::StoppedByObserver)),
            None => Ok(Outcome::Continue(point)),
        }
    }

    /// Returns true once the bracket is narrower than the x tolerances.
    ///
    /// Every evaluation so far missed `residual_tol`, so the sign change is a
    /// jump or a pole rather than a root.
    fn is_bracket_collapsed(&self) -> bool {
        self.bracket.is_some_and(|bracket| {
            bracket.is_collapsed(self.config.x_abs_tol(), self.config.x_rel_tol())
        })
    }

    fn no_convergence(&self, reason: Reason, iters: usize) -> Error {
        let (x, residual) = self.best.point();
        Error::NoConvergence {
            reason,
            x,
            residual,
            iters,
        }
    }
}
