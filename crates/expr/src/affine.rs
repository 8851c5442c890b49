use crate::{BinaryOp, Expr, UnaryOp, eval::eval};

/// A formula of the form `constant + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub constant: f64,
    pub slope: f64,
}

impl Affine {
    fn constant(value: f64) -> Self {
        Self {
            constant: value,
            slope: 0.0,
        }
    }

    fn scale(self, factor: f64) -> Self {
        Self {
            constant: self.constant * factor,
            slope: self.slope * factor,
        }
    }

    /// Evaluates the affine form at `x`.
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.constant + self.slope * x
    }

    /// Returns the `x` at which the form equals `target`.
    ///
    /// Returns `None` if the slope is zero or the result is not finite.
    #[must_use]
    pub fn solve(&self, target: f64) -> Option<f64> {
        #[allow(clippy::float_cmp)]
        if self.slope == 0.0 {
            return None;
        }
        let x = (target - self.constant) / self.slope;
        x.is_finite().then_some(x)
    }

    /// Detects whether `expr` is affine in the variable.
    ///
    /// Variable-free subtrees are folded to constants by evaluating them; a
    /// subtree that fails to evaluate makes the whole expression non-affine
    /// so that the error surfaces through normal evaluation instead.
    pub(crate) fn detect(expr: &Expr) -> Option<Self> {
        if !expr.contains_variable() {
            return eval(expr, 0.0).ok().map(Self::constant);
        }

        let affine = match expr {
            Expr::Variable => Self {
                constant: 0.0,
                slope: 1.0,
            },
            Expr::Unary { op, operand } => {
                let inner = Self::detect(operand)?;
                match op {
                    UnaryOp::Plus => inner,
                    UnaryOp::Neg => inner.scale(-1.0),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = Self::detect(lhs)?;
                let rhs = Self::detect(rhs)?;
                match op {
                    BinaryOp::Add => Self {
                        constant: lhs.constant + rhs.constant,
                        slope: lhs.slope + rhs.slope,
                    },
                    BinaryOp::Sub => Self {
                        constant: lhs.constant - rhs.constant,
                        slope: lhs.slope - rhs.slope,
                    },
                    BinaryOp::Mul if lhs.slope == 0.0 => rhs.scale(lhs.constant),
                    BinaryOp::Mul if rhs.slope == 0.0 => lhs.scale(rhs.constant),
                    BinaryOp::Div if rhs.slope == 0.0 && rhs.constant != 0.0 => {
                        lhs.scale(rhs.constant.recip())
                    }
                    _ => return None,
                }
            }
            Expr::Number(_) | Expr::Call { .. } => return None,
        };

        (affine.constant.is_finite() && affine.slope.is_finite()).then_some(affine)
    }
}
