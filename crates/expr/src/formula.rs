use std::{fmt, str::FromStr};

use crate::{Affine, EvaluationError, Expr, eval::eval, parser::parse};

/// The name of the free variable in every formula.
pub const VARIABLE: &str = "x";

/// A parsed single-variable formula.
///
/// Parsing resolves every name against the whitelist, so a `Formula` can be
/// evaluated any number of times without re-checking its source.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: Expr,
}

impl Formula {
    /// Parses formula source text.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] if the source is malformed or refers to
    /// a name outside the whitelist.
    pub fn parse(source: &str) -> Result<Self, EvaluationError> {
        parse(source).map(|expr| Self { expr })
    }

    /// Evaluates the formula with the variable bound to `x`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvaluationError`] on division by zero, a domain error, or
    /// a non-finite intermediate result.
    pub fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        eval(&self.expr, x)
    }

    /// Returns the affine form of the formula, if it is linear in `x`.
    #[must_use]
    pub fn affine(&self) -> Option<Affine> {
        Affine::detect(&self.expr)
    }

    /// Returns the parsed expression tree.
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl FromStr for Formula {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expr.fmt(f)
    }
}
