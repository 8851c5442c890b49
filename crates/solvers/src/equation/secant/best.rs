use crate::equation::Evaluation;

use super::{Error, Solution, Status};

/// Tracks the best evaluation encountered so far.
///
/// The best evaluation is defined by minimum residual magnitude, with ties
/// going to the newer evaluation. The `Option` lets us represent the state before any successful evaluation.
pub(super) struct Best<I, O> {
    eval: Option<Evaluation<I, O, 1>>,
}

impl<I, O> Best<I, O> {
    /// Creates an empty best tracker.
    pub(super) fn empty() -> Self {
        Self { eval: None }
    }

    /// Updates the best evaluation if the residual magnitude improves.
    pub(super) fn update(&mut self, eval: Evaluation<I, O, 1>) {
        let improves = self
            .eval
            .as_ref()
            .is_none_or(|best| eval.residuals[0].abs() <= best.residuals[0].abs());
        if improves {
            self.eval = Some(eval);
        }
    }

    /// Returns the best `(x, residual)` pair, or NaNs before any evaluation.
    pub(super) fn point(&self) -> (f64, f64) {
        self.eval
            .as_ref()
            .map_or((f64::NAN, f64::NAN), |eval| (eval.x[0], eval.residuals[0]))
    }

    /// Finalizes the solver using the best available evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSuccessfulEvaluation` if no successful evaluation is stored.
    pub(super) fn finish(self, status: Status, iters: usize) -> Result<Solution<I, O>, Error> {
        let eval = self.eval.ok_or(Error::NoSuccessfulEvaluation)?;
        Ok(Solution {
            status,
            x: eval.x[0],
            residual: eval.residuals[0],
            snapshot: eval.snapshot,
            iters,
        })
    }
}
