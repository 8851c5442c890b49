use std::fmt;

use thiserror::Error;

/// Errors that can occur when parsing or evaluating a formula.
///
/// Offsets are byte positions into the formula source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of formula, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("name {name:?} is not allowed")]
    UnknownName { name: String },

    #[error("function {name:?} is not allowed")]
    UnknownFunction { name: String },

    #[error("{function} expects {expected} argument(s), got {found}")]
    WrongArity {
        function: &'static str,
        expected: Arity,
        found: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{function} is undefined for {value}")]
    Domain { function: &'static str, value: f64 },

    #[error("{operation} produced a non-finite result")]
    NonFinite { operation: &'static str },
}

/// The number of arguments a whitelisted function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// Between `min` and `max` arguments, inclusive.
    Between { min: usize, max: usize },
    /// At least this many arguments.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` arguments are accepted.
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::Between { min, max } => (min..=max).contains(&count),
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::Between { min, max } => write!(f, "{min} to {max}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_bounds() {
        assert!(Arity::Exactly(1).accepts(1));
        assert!(!Arity::Exactly(1).accepts(2));

        let between = Arity::Between { min: 1, max: 2 };
        assert!(!between.accepts(0));
        assert!(between.accepts(2));
        assert!(!between.accepts(3));

        assert!(Arity::AtLeast(1).accepts(7));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn messages_are_readable() {
        let err = EvaluationError::WrongArity {
            function: "round",
            expected: Arity::Between { min: 1, max: 2 },
            found: 3,
        };
        assert_eq!(err.to_string(), "round expects 1 to 2 argument(s), got 3");

        let err = EvaluationError::Domain {
            function: "log",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "log is undefined for -1");
    }
}
