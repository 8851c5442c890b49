//! Numerical solvers for migration capacity planning.
//!
//! Solvers are generic over a [`Model`] and a problem trait from
//! `migcap-core`. They evaluate the model repeatedly and stream [`Observer`]
//! events so callers can log or stop an iteration without changing the
//! solver API.
//!
//! [`Model`]: migcap_core::Model
//! [`Observer`]: migcap_core::Observer

pub mod equation;
