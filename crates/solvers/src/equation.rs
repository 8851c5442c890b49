//! Solvers for equation problems: finding roots of residual functions.
//!
//! An [`EquationProblem`] maps solver variables `x: [f64; N]` to model inputs,
//! calls the model, and computes residuals. Solvers in this module drive those
//! residuals toward zero.
//!
//! # Solvers
//!
//! - [`secant`]: secant iteration from an initial guess, safeguarded by
//!   bisection once a sign change is found
//!
//! [`EquationProblem`]: migcap_core::EquationProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};

pub mod secant;
