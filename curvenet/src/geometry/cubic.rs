//! Cubic Bézier evaluation in monomial form.
//!
//! Segments convert their four control points once into power-basis
//! coefficients so repeated evaluation is a short Horner chain.

use crate::geometry::aabb::Aabb;
use crate::model::Vec2;

/// Control points of a cubic Bézier curve.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    pub p0: Vec2, // Start point
    pub p1: Vec2, // First control point
    pub p2: Vec2, // Second control point
    pub p3: Vec2, // End point
}

impl CubicBezier {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Power-basis coefficients `C0 + C1 t + C2 t^2 + C3 t^3`.
    pub fn to_monomial(&self) -> Cubic {
        let (p0, p1, p2, p3) = (self.p0, self.p1, self.p2, self.p3);
        Cubic {
            c: [
                p0,
                (p1 - p0) * 3.0,
                (p0 - p1 * 2.0 + p2) * 3.0,
                -p0 + p1 * 3.0 - p2 * 3.0 + p3,
            ],
        }
    }

    /// Box around the control polygon; always contains the curve.
    pub fn hull_bounds(&self) -> Aabb {
        Aabb {
            min: self.p0.min(self.p1).min(self.p2).min(self.p3),
            max: self.p0.max(self.p1).max(self.p2).max(self.p3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cubic {
    pub c: [Vec2; 4],
}

impl Cubic {
    /// Evaluate the curve at parameter t ∈ [0, 1].
    #[inline]
    pub fn eval(&self, t: f32) -> Vec2 {
        let [c0, c1, c2, c3] = self.c;
        c0 + (c1 + (c2 + c3 * t) * t) * t
    }

    /// First derivative `C1 + 2 C2 t + 3 C3 t^2`.
    #[inline]
    pub fn derivative(&self, t: f32) -> Vec2 {
        let [_, c1, c2, c3] = self.c;
        c1 + (c2 * 2.0 + c3 * (3.0 * t)) * t
    }

    pub fn tangent(&self, t: f32) -> Vec2 {
        let d = self.derivative(t);
        let u = d.normalized();
        if u != Vec2::ZERO {
            return u;
        }
        // Zero-length handle at an endpoint: the second derivative points along the curve.
        let [_, _, c2, c3] = self.c;
        (c2 * 2.0 + c3 * (6.0 * t)).normalized()
    }

    pub fn normal(&self, t: f32) -> Vec2 {
        self.tangent(t).perp()
    }
}
