use thiserror::Error;

/// Configuration for the secant solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    x_abs_tol: f64,
    x_rel_tol: f64,
    residual_tol: f64,
    initial_step: f64,
}

/// Errors that can occur when validating a secant solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("x_abs_tol must be finite and non-negative")]
    XAbs,

    #[error("x_rel_tol must be finite and non-negative")]
    XRel,

    #[error("residual_tol must be finite and non-negative")]
    Residual,

    #[error("initial_step must be finite and non-zero")]
    InitialStep,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 1e-12,
            x_rel_tol: 1e-12,
            residual_tol: 1e-9,
            initial_step: 1.0,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// The second secant point is placed at
    /// `x0 + initial_step * max(|x0|, 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite, or if the
    /// initial step is zero or non-finite.
    pub fn new(
        max_iters: usize,
        x_abs_tol: f64,
        x_rel_tol: f64,
        residual_tol: f64,
        initial_step: f64,
    ) -> Result<Self, ConfigError> {
        if !x_abs_tol.is_finite() || x_abs_tol < 0.0 {
            return Err(ConfigError::XAbs);
        }
        if !x_rel_tol.is_finite() || x_rel_tol < 0.0 {
            return Err(ConfigError::XRel);
        }
        if !residual_tol.is_finite() || residual_tol < 0.0 {
            return Err(ConfigError::Residual);
        }
        if !initial_step.is_finite() || initial_step == 0.0 {
            return Err(ConfigError::InitialStep);
        }

        Ok(Self {
            max_iters,
            x_abs_tol,
            x_rel_tol,
            residual_tol,
            initial_step,
        })
    }

    /// Returns the maximum number of secant steps.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the absolute bracket width at which a sign change is treated
    /// as a discontinuity.
    #[must_use]
    pub fn x_abs_tol(&self) -> f64 {
        self.x_abs_tol
    }

    /// Returns the relative bracket width at which a sign change is treated
    /// as a discontinuity.
    #[must_use]
    pub fn x_rel_tol(&self) -> f64 {
        self.x_rel_tol
    }

    /// Returns the absolute residual tolerance.
    ///
    /// A residual within this tolerance is accepted as a root, so an
    /// objective that only approaches zero asymptotically (such as `exp(x)`)
    /// is reported as solved where it drops below the tolerance.
    #[must_use]
    pub fn residual_tol(&self) -> f64 {
        self.residual_tol
    }

    /// Returns the relative offset of the second secant point.
    #[must_use]
    pub fn initial_step(&self) -> f64 {
        self.initial_step
    }

    /// Returns the second secant point for an initial guess.
    pub(super) fn second_point(&self, x0: f64) -> f64 {
        x0 + self.initial_step * x0.abs().max(1.0)
    }
}
