use std::fmt;

use crate::equation::EvalError;

/// Errors that can occur during a secant solve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("initial guess must be finite, got {x}")]
    NonFiniteGuess { x: f64 },

    #[error("no convergence after {iters} iteration(s): {reason} (best x = {x}, residual = {residual})")]
    NoConvergence {
        reason: Reason,
        x: f64,
        residual: f64,
        iters: usize,
    },

    #[error("stopped before any successful evaluation")]
    NoSuccessfulEvaluation,

    #[error("model error: {0}")]
    Model(Box<dyn std::error::Error + Send + Sync>),

    #[error("problem error: {0}")]
    Problem(Box<dyn std::error::Error + Send + Sync>),
}

/// Why a solve failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The iteration limit was reached.
    MaxIters,
    /// Two successive residuals were equal with no bracket to fall back on.
    FlatResidual,
    /// The problem produced a NaN or infinite residual.
    NonFiniteResidual,
    /// The bracket shrank below the x tolerances without a small residual.
    Discontinuity,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MaxIters => "iteration limit reached",
            Self::FlatResidual => "residual did not change between iterates",
            Self::NonFiniteResidual => "residual is not finite",
            Self::Discontinuity => "residual changes sign without reaching zero",
        })
    }
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: std::error::Error + Send + Sync + 'static,
    PE: std::error::Error + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Model(e) => Self::Model(Box::new(e)),
            EvalError::Problem(e) => Self::Problem(Box::new(e)),
        }
    }
}
