/// A point-like memory layout to achieve zero copy.
///
/// The names follow the usual dyad notation: `P` is a known point, `L` a
/// known length and `A` a known angle.
pub trait Point: Sized + Copy {
    /// Create a new point.
    fn point(x: f64, y: f64) -> Self;
    /// X coordinate.
    fn x(&self) -> f64;
    /// Y coordinate.
    fn y(&self) -> f64;

    /// Distance to another point.
    fn dist(&self, rhs: &Self) -> f64 {
        (rhs.x() - self.x()).hypot(rhs.y() - self.y())
    }

    /// Point at distance `d0` from `self` in the direction `a0`.
    fn pla(&self, d0: f64, a0: f64) -> Self {
        Self::point(self.x() + d0 * a0.cos(), self.y() + d0 * a0.sin())
    }

    /// Point at distance `d0` from `self`, rotated by `a0` from the direction
    /// `self -> rhs`.
    fn plap(&self, d0: f64, a0: f64, rhs: &Self) -> Self {
        let a1 = f64::atan2(rhs.y() - self.y(), rhs.x() - self.x()) + a0;
        self.pla(d0, a1)
    }

    /// Intersection of the circle of radius `d0` about `self` and the circle
    /// of radius `d1` about `rhs`.
    ///
    /// Only the solution on the left of `self -> rhs` is returned. Return
    /// `None` if the circles do not intersect, the centers coincide or any
    /// length is not a number.
    fn pllp(&self, d0: f64, d1: f64, rhs: &Self) -> Option<Self> {
        let dx = rhs.x() - self.x();
        let dy = rhs.y() - self.y();
        let d = dx.hypot(dy);
        // Also false if any length is NaN
        let meet = d <= d0 + d1 && d >= (d0 - d1).abs() && d >= f64::EPSILON;
        if !meet {
            return None;
        }
        // Rounding near the closure boundary may push `a` out of range
        let a = ((d0 * d0 - d1 * d1 + d * d) / (2. * d)).clamp(-d0, d0);
        let h = (d0 * d0 - a * a).sqrt();
        let xm = self.x() + a * dx / d;
        let ym = self.y() + a * dy / d;
        Some(Self::point(xm - h * dy / d, ym + h * dx / d))
    }
}

impl Point for [f64; 2] {
    #[inline(always)]
    fn point(x: f64, y: f64) -> Self {
        [x, y]
    }
    #[inline(always)]
    fn x(&self) -> f64 {
        self[0]
    }
    #[inline(always)]
    fn y(&self) -> f64 {
        self[1]
    }
}

