use migcap_core::{EquationProblem, Model, Observer};

use crate::equation::EvalError;

use super::{Action, Point};

/// Events emitted by the secant solver.
///
/// One event is emitted per evaluation, including the two starting points.
/// Each event carries the sign-change bracket known before the evaluation,
/// or `None` if no bracket has been found yet.
pub enum Event<'a, M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    /// Successful evaluation.
    Evaluated {
        /// The evaluated point (x and residual).
        point: Point,

        /// The model input at this point.
        input: &'a M::Input,

        /// The model output at this point.
        output: &'a M::Output,

        /// The current bracket, if any.
        bracket: Option<[f64; 2]>,
    },

    /// Model evaluation failed.
    ModelFailed {
        /// The x value where evaluation failed.
        x: f64,

        /// The current bracket, if any.
        bracket: Option<[f64; 2]>,

        /// The model error.
        error: &'a M::Error,
    },

    /// Problem method failed (input construction or residual computation).
    ProblemFailed {
        /// The x value where evaluation failed.
        x: f64,

        /// The current bracket, if any.
        bracket: Option<[f64; 2]>,

        /// The problem error.
        error: &'a P::Error,
    },
}

impl<M, P> Event<'_, M, P>
where
    M: Model,
    P: EquationProblem<1, Input = M::Input, Output = M::Output>,
{
    /// Returns the x value that was evaluated (or attempted).
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Evaluated { point, .. } => point.x,
            Self::ModelFailed { x, .. } | Self::ProblemFailed { x, .. } => *x,
        }
    }

    /// Returns the bracket known when the event was emitted.
    #[must_use]
    pub fn bracket(&self) -> Option<[f64; 2]> {
        match self {
            Self::Evaluated { bracket, .. }
            | Self::ModelFailed { bracket, .. }
            | Self::ProblemFailed { bracket, .. } => *bracket,
        }
    }

    /// Emits a failure event and returns the observer's action.
    pub(super) fn emit_failure<Obs>(
        x: f64,
        bracket: Option<[f64; 2]>,
        error: &EvalError<M::Error, P::Error>,
        observer: &mut Obs,
    ) -> Option<Action>
    where
        Obs: for<'a> Observer<Event<'a, M, P>, Action>,
    {
        match error {
            EvalError::Model(e) => {
                let event = Event::ModelFailed {
                    x,
                    bracket,
                    error: e,
                };
                observer.observe(&event)
            }
            EvalError::Problem(e) => {
                let event = Event::ProblemFailed {
                    x,
                    bracket,
                    error: e,
                };
                observer.observe(&event)
            }
        }
    }
}
