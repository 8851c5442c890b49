use thiserror::Error;

use migcap_expr::EvaluationError;

use crate::{GoalSeekError, Month};

/// Invalid planning inputs.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid month {text:?}: expected YYYY-MM or YYYY-MM-DD")]
    InvalidMonth { text: String },

    #[error("calendar arithmetic failed: {0}")]
    Calendar(#[from] jiff::Error),

    #[error("{first_name} month {first} is after {second_name} month {second}")]
    MonthOrder {
        first_name: &'static str,
        first: Month,
        second_name: &'static str,
        second: Month,
    },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("migration rate must be finite, got {value}")]
    NonFiniteRate { value: f64 },
}

impl ValidationError {
    /// Checks that `value` is finite and non-negative.
    pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { name, value })
        }
    }

    /// Checks that `first` is not after `second`.
    pub(crate) fn check_order(
        first_name: &'static str,
        first: Month,
        second_name: &'static str,
        second: Month,
    ) -> Result<(), Self> {
        if first <= second {
            Ok(())
        } else {
            Err(Self::MonthOrder {
                first_name,
                first,
                second_name,
                second,
            })
        }
    }
}

/// Errors that can occur while building a [`Plan`](crate::Plan).
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid plan inputs: {0}")]
    Validation(#[from] ValidationError),

    #[error("formula evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("could not solve for the migration rate: {0}")]
    Solve(#[source] GoalSeekError),
}

impl From<GoalSeekError> for PlanError {
    fn from(err: GoalSeekError) -> Self {
        match err {
            GoalSeekError::Evaluation(e) => Self::Evaluation(e),
            other => Self::Solve(other),
        }
    }
}
