use super::Point;

/// The sign of a residual for bracket logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Residual is positive (or zero).
    Positive,
    /// Residual is negative.
    Negative,
}

impl Sign {
    /// Returns the sign of a residual value.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value >= 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

/// Two evaluated points whose residuals have opposite signs.
///
/// For a continuous residual, a root lies between `left` and `right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    left: Point,
    right: Point,
}

impl Bracket {
    /// Creates a bracket if the residuals of `a` and `b` change sign.
    pub(super) fn from_points(a: Point, b: Point) -> Option<Self> {
        if Sign::of(a.residual) == Sign::of(b.residual) {
            return None;
        }
        let (left, right) = if a.x < b.x { (a, b) } else { (b, a) };
        Some(Self { left, right })
    }

    /// Returns the bracket bounds as an array.
    #[must_use]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left.x, self.right.x]
    }

    /// Returns the midpoint of the bracket.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.left.x + self.right.x)
    }

    /// Returns the bracket width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right.x - self.left.x
    }

    /// Returns true if `x` lies strictly inside the bracket.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.left.x < x && x < self.right.x
    }

    /// Returns true if the bracket is no wider than the x tolerances allow.
    #[must_use]
    pub fn is_collapsed(&self, x_abs_tol: f64, x_rel_tol: f64) -> bool {
        self.width() <= x_abs_tol + x_rel_tol * self.midpoint().abs()
    }

    /// Shrinks the bracket using a new point inside it.
    pub(super) fn shrink(&mut self, point: Point) {
        if Sign::of(point.residual) == Sign::of(self.left.residual) {
            self.left = point;
        } else {
            self.right = point;
        }
    }
}
