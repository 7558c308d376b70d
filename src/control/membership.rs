//! Piecewise-linear membership functions.
//!
//! Two shapes cover every linguistic term in the controller:
//!
//! ```text
//!   Triangular{a,b,c}          Trapezoidal{a,b,c,d}
//!
//!   1 ┤    /\                  1 ┤    ┌────┐
//!     │   /  \                   │   /      \
//!   0 ┼──/────\──              0 ┼──/────────\──
//!        a  b  c                    a  b    c  d
//! ```
//!
//! Degenerate edges are allowed: `a == b` gives a left shoulder that is
//! already at 1 on its first corner, `c == d` (or `b == c` for the
//! triangle) the mirrored right shoulder.

use serde::{Deserialize, Serialize};

/// A piecewise-linear membership function over a real input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFn {
    /// Peak of 1 at `b`, zero at and beyond `a` and `c`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Plateau of 1 on `[b, c]`, zero at and beyond `a` and `d`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFn {
    pub const fn triangular(a: f64, b: f64, c: f64) -> Self {
        Self::Triangular { a, b, c }
    }

    pub const fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::Trapezoidal { a, b, c, d }
    }

    /// Degree of membership of `x`, always in `[0, 1]`.
    ///
    /// The core is tested before the support so that shoulders with
    /// coincident corners evaluate to 1 on their flat side. NaN yields 0.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.0
                } else if x <= a || x >= c || x.is_nan() {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if (b..=c).contains(&x) {
                    1.0
                } else if x <= a || x >= d || x.is_nan() {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    /// Closed interval outside of which the degree is zero.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangular { a, c, .. } => (a, c),
            Self::Trapezoidal { a, d, .. } => (a, d),
        }
    }

    /// Corner points are finite and non-decreasing.
    pub fn is_well_formed(&self) -> bool {
        let corners: &[f64] = match self {
            Self::Triangular { a, b, c } => &[*a, *b, *c],
            Self::Trapezoidal { a, b, c, d } => &[*a, *b, *c, *d],
        };
        corners.iter().all(|v| v.is_finite()) && corners.windows(2).all(|w| w[0] <= w[1])
    }
}
