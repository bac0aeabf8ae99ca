use crate::geometry::aabb::Aabb;
use crate::geometry::cubic::Cubic;
use crate::model::Vec2;

/// Straight piece of a segment's polyline approximation.
/// `t0`/`t1` are the segment-local curve parameters at `from`/`to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub t0: f32,
    pub t1: f32,
}

impl Line {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Line { from, to, t0: 0.0, t1: 1.0 }
    }

    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Unit direction, zero for a degenerate line.
    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.delta().normalized()
    }

    pub fn reversed(&self) -> Line {
        Line { from: self.to, to: self.from, t0: self.t1, t1: self.t0 }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb { min: self.from.min(self.to), max: self.from.max(self.to) }
    }

    /// Curve parameter at fraction `s` along the line.
    #[inline]
    pub fn param_at(&self, s: f32) -> f32 {
        self.t0 + (self.t1 - self.t0) * s
    }
}

/// Sample `count` straight lines at uniform parameter steps.
pub fn flatten_uniform(curve: &Cubic, count: u32, out: &mut Vec<Line>) {
    out.clear();
    let count = count.max(1);
    let step = 1.0 / count as f32;
    let mut prev = curve.eval(0.0);
    for i in 1..=count {
        // Last sample is exactly t = 1 so polylines meet at the nodes.
        let t = if i == count { 1.0 } else { i as f32 * step };
        let p = curve.eval(t);
        out.push(Line { from: prev, to: p, t0: (i - 1) as f32 * step, t1: t });
        prev = p;
    }
}
