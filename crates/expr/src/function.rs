use crate::{Arity, EvaluationError};

/// The closed set of functions a formula may call.
///
/// This table is the whole capability surface of a formula. Names that do
/// not resolve through [`Function::lookup`] are rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Abs,
    Pow,
    /// Round half to even, optionally to a number of decimal digits.
    Round,
    Min,
    Max,
    Sin,
    Cos,
    Tan,
    Exp,
    /// Natural logarithm.
    Log,
    Sqrt,
}

impl Function {
    /// Every whitelisted function.
    pub const ALL: [Function; 11] = [
        Function::Abs,
        Function::Pow,
        Function::Round,
        Function::Min,
        Function::Max,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Exp,
        Function::Log,
        Function::Sqrt,
    ];

    /// Resolves a function name.
    ///
    /// Transcendental functions also resolve under their `np.` qualified names
    /// (`np.sin`, `np.log`, ...).
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "abs" => Self::Abs,
            "pow" => Self::Pow,
            "round" => Self::Round,
            "min" => Self::Min,
            "max" => Self::Max,
            "sin" | "np.sin" => Self::Sin,
            "cos" | "np.cos" => Self::Cos,
            "tan" | "np.tan" => Self::Tan,
            "exp" | "np.exp" => Self::Exp,
            "log" | "np.log" => Self::Log,
            "sqrt" | "np.sqrt" => Self::Sqrt,
            _ => return None,
        };
        Some(function)
    }

    /// Returns the canonical name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Pow => "pow",
            Self::Round => "round",
            Self::Min => "min",
            Self::Max => "max",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
        }
    }

    /// Returns the number of arguments the function accepts.
    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Self::Pow => Arity::Exactly(2),
            Self::Round => Arity::Between { min: 1, max: 2 },
            Self::Min | Self::Max => Arity::AtLeast(1),
            Self::Abs
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Exp
            | Self::Log
            | Self::Sqrt => Arity::Exactly(1),
        }
    }

    /// Applies the function to already evaluated arguments.
    ///
    /// The argument count has been checked by the parser.
    pub(crate) fn apply(self, args: &[f64]) -> Result<f64, EvaluationError> {
        let value = match (self, args) {
            (Self::Abs, [a]) => a.abs(),
            (Self::Pow, [base, exponent]) => power(*base, *exponent)?,
            (Self::Round, [a]) => a.round_ties_even(),
            (Self::Round, [a, digits]) => round_to(*a, *digits)?,
            (Self::Min, _) => args.iter().copied().fold(f64::INFINITY, f64::min),
            (Self::Max, _) => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            (Self::Sin, [a]) => a.sin(),
            (Self::Cos, [a]) => a.cos(),
            (Self::Tan, [a]) => a.tan(),
            (Self::Exp, [a]) => a.exp(),
            (Self::Log, [a]) if *a <= 0.0 => return Err(self.domain(*a)),
            (Self::Log, [a]) => a.ln(),
            (Self::Sqrt, [a]) if *a < 0.0 => return Err(self.domain(*a)),
            (Self::Sqrt, [a]) => a.sqrt(),
            _ => {
                return Err(EvaluationError::WrongArity {
                    function: self.name(),
                    expected: self.arity(),
                    found: args.len(),
                });
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFinite {
                operation: self.name(),
            })
        }
    }

    fn domain(self, value: f64) -> EvaluationError {
        EvaluationError::Domain {
            function: self.name(),
            value,
        }
    }
}

/// Raises `base` to `exponent`, rejecting results that are not real numbers.
pub(crate) fn power(base: f64, exponent: f64) -> Result<f64, EvaluationError> {
    #[allow(clippy::float_cmp)]
    if base == 0.0 && exponent < 0.0 {
        return Err(EvaluationError::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvaluationError::Domain {
            function: "pow",
            value: base,
        });
    }
    Ok(base.powf(exponent))
}

/// Rounds to `digits` decimal places, half to even.
///
/// Negative `digits` rounds to tens, hundreds, and so on.
fn round_to(value: f64, digits: f64) -> Result<f64, EvaluationError> {
    if digits.fract() != 0.0 {
        return Err(EvaluationError::Domain {
            function: "round",
            value: digits,
        });
    }

    // Exponents beyond this range cannot change an f64.
    let digits = digits.clamp(-400.0, 400.0) as i32;
    let scale = 10f64.powi(digits);
    if scale == 0.0 {
        return Ok(0.0);
    }
    let scaled = value * scale;
    if !scaled.is_finite() {
        return Ok(value);
    }
    Ok(scaled.round_ties_even() / scale)
}
