//! An allow-listed evaluator for single-variable numeric formulas.
//!
//! Formulas are parsed into an expression tree over a closed grammar and
//! evaluated by walking that tree. Nothing outside the grammar can be
//! reached from formula text:
//!
//! - numeric literals (`3100`, `0.5`, `1e-3`)
//! - the free variable `x`
//! - the operators `+`, `-`, `*`, `/`, `^` (also written `**`) and parentheses
//! - the functions in the [`Function`] table
//!
//! Any other name fails at parse time with an [`EvaluationError`].
//!
//! # Example
//!
//! ```
//! use migcap_expr::Formula;
//!
//! let formula = Formula::parse("3100 - 12*x").unwrap();
//! assert_eq!(formula.evaluate(100.0).unwrap(), 1900.0);
//!
//! assert!(Formula::parse("__import__('os')").is_err());
//! ```

mod affine;
mod ast;
mod error;
mod eval;
mod formula;
mod function;
mod parser;
mod token;

pub use affine::Affine;
pub use ast::{BinaryOp, Expr, UnaryOp};
pub use error::{Arity, EvaluationError};
pub use formula::{Formula, VARIABLE};
pub use function::Function;

/// Parses `source` and evaluates it with the variable bound to `x`.
///
/// Use [`Formula::parse`] instead when the same formula is evaluated
/// repeatedly.
///
/// # Errors
///
/// Returns an [`EvaluationError`] if the formula is malformed, references a
/// name outside the whitelist, or hits an arithmetic domain error.
pub fn evaluate(source: &str, x: f64) -> Result<f64, EvaluationError> {
    Formula::parse(source)?.evaluate(x)
}
