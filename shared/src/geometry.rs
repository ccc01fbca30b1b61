use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{InkError, Point, Result};

/// Digits kept after the decimal point when a transform is written out.
pub const TRANSFORM_DECIMALS: usize = 4;

/// A 2x2 linear map from device coordinates to canvas coordinates.
///
/// There is no translation component; the InkML output always treats it
/// as zero.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub m00: f64,
    pub m01: f64,
    pub m10: f64,
    pub m11: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        m00: 1.0,
        m01: 0.0,
        m10: 0.0,
        m11: 1.0,
    };

    /// Solves for the map sending `p00` to `p10` and `p01` to `p11`.
    ///
    /// The system
    ///
    /// ```text
    /// x10 = m00 * x00 + m01 * y00    y10 = m10 * x00 + m11 * y00
    /// x11 = m00 * x01 + m01 * y01    y11 = m10 * x01 + m11 * y01
    /// ```
    ///
    /// is solved in closed form. Entries keep full precision; rounding only
    /// happens in [`fmt::Display`].
    pub fn solve(p00: Point, p01: Point, p10: Point, p11: Point) -> Result<Self> {
        let denominator = p00.x * p01.y - p01.x * p00.y;
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(InkError::DegenerateTransform { denominator });
        }
        let transform = Self {
            m00: (p10.x * p01.y - p11.x * p00.y) / denominator,
            m01: (p00.x * p11.x - p01.x * p10.x) / denominator,
            m10: (p01.y * p10.y - p00.y * p11.y) / denominator,
            m11: (p00.x * p11.y - p01.x * p10.y) / denominator,
        };
        if !transform.is_finite() {
            return Err(InkError::DegenerateTransform { denominator });
        }
        Ok(transform)
    }

    pub fn apply(self, point: Point) -> Point {
        Point {
            x: self.m00 * point.x + self.m01 * point.y,
            y: self.m10 * point.x + self.m11 * point.y,
        }
    }

    pub fn is_finite(self) -> bool {
        self.m00.is_finite() && self.m01.is_finite() && self.m10.is_finite() && self.m11.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Renders the body of an InkML `<affine>` element: `"m00 m01, m10 m11,"`.
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {},",
            Fixed(self.m00),
            Fixed(self.m01),
            Fixed(self.m10),
            Fixed(self.m11)
        )
    }
}

struct Fixed(f64);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 would otherwise print as "-0.0000".
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        write!(
            f,
            "{:.prec$}",
            round_ties_away(value),
            prec = TRANSFORM_DECIMALS
        )
    }
}

/// `{:.N}` rounds exact decimal ties to even; transforms are written with
/// ties rounded away from zero instead.
///
/// A value sits exactly halfway between two N-decimal numbers only when it
/// is an odd multiple of `2^-(N+1)`, so the check is exact.
fn round_ties_away(value: f64) -> f64 {
    let decimals = TRANSFORM_DECIMALS as i32;
    let halves = value.abs() * 2f64.powi(decimals + 1);
    if halves.fract() != 0.0 || halves % 2.0 != 1.0 {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
