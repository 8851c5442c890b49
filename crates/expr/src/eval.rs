use crate::{
    BinaryOp, EvaluationError, Expr, UnaryOp,
    function::power,
};

/// Evaluates a parsed expression with the variable bound to `x`.
///
/// Every intermediate result must be finite; an overflow or a non-finite
/// `x` surfaces as [`EvaluationError::NonFinite`].
pub(crate) fn eval(expr: &Expr, x: f64) -> Result<f64, EvaluationError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Variable => finite(x, "x"),
        Expr::Unary { op, operand } => {
            let value = eval(operand, x)?;
            Ok(match op {
                UnaryOp::Plus => value,
                UnaryOp::Neg => -value,
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs, x)?;
            let rhs = eval(rhs, x)?;
            binary(*op, lhs, rhs)
        }
        Expr::Call { function, args } => {
            let args = args
                .iter()
                .map(|arg| eval(arg, x))
                .collect::<Result<Vec<_>, _>>()?;
            function.apply(&args)
        }
    }
}

fn binary(op: BinaryOp, lhs: f64, rhs: f64) -> Result<f64, EvaluationError> {
    match op {
        BinaryOp::Add => finite(lhs + rhs, "addition"),
        BinaryOp::Sub => finite(lhs - rhs, "subtraction"),
        BinaryOp::Mul => finite(lhs * rhs, "multiplication"),
        BinaryOp::Div if rhs == 0.0 => Err(EvaluationError::DivisionByZero),
        BinaryOp::Div => finite(lhs / rhs, "division"),
        BinaryOp::Pow => finite(power(lhs, rhs)?, "power"),
    }
}

fn finite(value: f64, operation: &'static str) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite { operation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::parser::parse;

    fn eval_str(source: &str, x: f64) -> Result<f64, EvaluationError> {
        eval(&parse(source).expect("should parse"), x)
    }

    #[test]
    fn arithmetic_precedence() {
        assert_relative_eq!(eval_str("1 + 2*3", 0.0).unwrap(), 7.0);
        assert_relative_eq!(eval_str("(1 + 2)*3", 0.0).unwrap(), 9.0);
        assert_relative_eq!(eval_str("2^3^2", 0.0).unwrap(), 512.0);
        assert_relative_eq!(eval_str("-2^2", 0.0).unwrap(), -4.0);
        assert_relative_eq!(eval_str("(-2)^2", 0.0).unwrap(), 4.0);
        assert_relative_eq!(eval_str("8/4/2", 0.0).unwrap(), 1.0);
    }

    #[test]
    fn binds_the_variable() {
        assert_relative_eq!(eval_str("3100 - 12*x", 100.0).unwrap(), 1900.0);
        assert_relative_eq!(eval_str("x**2 - 2", 3.0).unwrap(), 7.0);
        assert_relative_eq!(eval_str("--x", 5.0).unwrap(), 5.0);
    }

    #[test]
    fn whitelisted_functions() {
        assert_relative_eq!(eval_str("abs(x)", -3.0).unwrap(), 3.0);
        assert_relative_eq!(eval_str("pow(x, 3)", 2.0).unwrap(), 8.0);
        assert_relative_eq!(eval_str("round(x, 1)", 2.25).unwrap(), 2.2);
        assert_relative_eq!(eval_str("min(x, 4, 9)", 5.0).unwrap(), 4.0);
        assert_relative_eq!(eval_str("max(x, 4, 9)", 5.0).unwrap(), 9.0);
        assert_relative_eq!(eval_str("sin(x)^2 + cos(x)^2", 0.7).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(eval_str("tan(0)", 0.0).unwrap(), 0.0);
        assert_relative_eq!(eval_str("log(exp(x))", 2.5).unwrap(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(eval_str("np.sqrt(x)", 81.0).unwrap(), 9.0);
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval_str("1 / x", 0.0), Err(EvaluationError::DivisionByZero));
        assert_eq!(eval_str("1 / (x - x)", 3.0), Err(EvaluationError::DivisionByZero));
    }

    #[test]
    fn domain_errors_propagate_from_arguments() {
        assert!(matches!(
            eval_str("1 + log(x)", -1.0),
            Err(EvaluationError::Domain { function: "log", .. })
        ));
        assert!(matches!(
            eval_str("max(sqrt(x), 1)", -1.0),
            Err(EvaluationError::Domain { function: "sqrt", .. })
        ));
    }

    #[test]
    fn overflow_is_an_error() {
        assert_eq!(
            eval_str("x*x", 1e200),
            Err(EvaluationError::NonFinite {
                operation: "multiplication"
            })
        );
        assert_eq!(
            eval_str("10^x", 400.0),
            Err(EvaluationError::NonFinite { operation: "power" })
        );
    }

    #[test]
    fn non_finite_variable_is_an_error() {
        assert_eq!(
            eval_str("x + 1", f64::NAN),
            Err(EvaluationError::NonFinite { operation: "x" })
        );
    }
}
