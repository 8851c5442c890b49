use crate::equation::Evaluation;

/// An evaluated point: solver variable and residual.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub residual: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, residual: f64) -> Self {
        Self { x, residual }
    }

    /// Returns true if the residual magnitude is within `residual_tol`.
    #[must_use]
    pub fn is_residual_converged(&self, residual_tol: f64) -> bool {
        self.residual.abs() <= residual_tol
    }

    /// Returns the root of the line through `self` and `other`.
    ///
    /// Returns `None` if the residuals are equal or the root is not finite.
    pub(super) fn secant_root(&self, other: Point) -> Option<f64> {
        let slope_denominator = other.residual - self.residual;
        #[allow(clippy::float_cmp)]
        if slope_denominator == 0.0 {
            return None;
        }
        let x = other.x - other.residual * (other.x - self.x) / slope_denominator;
        x.is_finite().then_some(x)
    }
}

impl<I, O> From<&Evaluation<I, O, 1>> for Point {
    fn from(eval: &Evaluation<I, O, 1>) -> Self {
        Self::new(eval.x[0], eval.residuals[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn secant_root_of_a_line_is_exact() {
        // Residual of 3100 - 12x at x = 0 and x = 1.
        let a = Point::new(0.0, 3100.0);
        let b = Point::new(1.0, 3088.0);

        assert_relative_eq!(a.secant_root(b).unwrap(), 3100.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(b.secant_root(a).unwrap(), 3100.0 / 12.0, epsilon = 1e-12);
    }

    #[test]
    fn flat_secant_has_no_root() {
        let a = Point::new(-1.0, 2.0);
        let b = Point::new(1.0, 2.0);
        assert_eq!(a.secant_root(b), None);
    }

    #[test]
    fn residual_convergence() {
        assert!(Point::new(0.0, -1e-10).is_residual_converged(1e-9));
        assert!(!Point::new(0.0, 1e-8).is_residual_converged(1e-9));
    }
}
