//! Segments and splines: ordered node chains with eagerly cached geometry.

use crate::geometry::aabb::Aabb;
use crate::geometry::cubic::{Cubic, CubicBezier};
use crate::geometry::flatten::{flatten_uniform, Line};
use crate::geometry::tolerance::clamp01;
use crate::model::{ControlNode, NodeId, PathFrame, Selection, Vec2};

#[inline]
pub(crate) fn node_at(arena: &[Option<ControlNode>], id: NodeId) -> Option<&ControlNode> {
    arena.get(id as usize).and_then(|n| n.as_ref())
}

/// Cubic piece between two consecutive nodes.
#[derive(Clone, Debug)]
pub struct Segment {
    pub from: NodeId,
    pub to: NodeId,
    p0: Vec2,
    p3: Vec2,
    curve: Cubic,
    aabb: Aabb,
    lines: Vec<Line>,
}

impl Segment {
    pub(crate) fn build(from: NodeId, a: &ControlNode, to: NodeId, b: &ControlNode, line_count: u32) -> Segment {
        let bez = CubicBezier::new(a.pos, a.next.pos, b.prev.pos, b.pos);
        let curve = bez.to_monomial();
        let mut lines = Vec::with_capacity(line_count as usize);
        flatten_uniform(&curve, line_count, &mut lines);
        Segment { from, to, p0: a.pos, p3: b.pos, curve, aabb: bez.hull_bounds(), lines }
    }

    pub(crate) fn rebuild(&mut self, a: &ControlNode, b: &ControlNode, line_count: u32) {
        let bez = CubicBezier::new(a.pos, a.next.pos, b.prev.pos, b.pos);
        self.p0 = a.pos;
        self.p3 = b.pos;
        self.curve = bez.to_monomial();
        self.aabb = bez.hull_bounds();
        flatten_uniform(&self.curve, line_count, &mut self.lines);
    }

    /// Position at local parameter `t` in [0, 1]; the ends are the node positions exactly.
    pub fn evaluate(&self, t: f32) -> Vec2 {
        if t <= 0.0 {
            self.p0
        } else if t >= 1.0 {
            self.p3
        } else {
            self.curve.eval(t)
        }
    }

    pub fn derivative(&self, t: f32) -> Vec2 {
        self.curve.derivative(clamp01(t))
    }

    pub fn tangent(&self, t: f32) -> Vec2 {
        self.curve.tangent(clamp01(t))
    }

    pub fn normal(&self, t: f32) -> Vec2 {
        self.tangent(t).perp()
    }

    pub fn coefficients(&self) -> &[Vec2; 4] {
        &self.curve.c
    }

    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

#[derive(Clone, Debug, Default)]
pub struct Spline {
    pub(crate) nodes: Vec<NodeId>,
    pub(crate) is_closed: bool,
    pub(crate) segments: Vec<Segment>,
    pub(crate) aabb: Option<Aabb>,
}

impl Spline {
    pub(crate) fn with_nodes(nodes: Vec<NodeId>) -> Spline {
        Spline { nodes, ..Default::default() }
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Union of the segment boxes; `None` while the spline has no segments.
    pub fn aabb(&self) -> Option<Aabb> {
        self.aabb
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        expected_segments(self.nodes.len(), self.is_closed)
    }

    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == id)
    }

    /// Rebuild every segment after a structural change.
    pub(crate) fn rebuild_all(&mut self, arena: &[Option<ControlNode>], line_count: u32) {
        let n = self.nodes.len();
        let count = expected_segments(n, self.is_closed);
        self.segments.clear();
        for i in 0..count {
            let from = self.nodes[i];
            let to = self.nodes[(i + 1) % n];
            if let (Some(a), Some(b)) = (node_at(arena, from), node_at(arena, to)) {
                self.segments.push(Segment::build(from, a, to, b, line_count));
            }
        }
        self.refresh_aabb();
    }

    /// Rebuild only the one or two segments touching the node at `index`.
    pub(crate) fn rebuild_around(&mut self, index: usize, arena: &[Option<ControlNode>], line_count: u32) {
        let count = self.segments.len();
        if count == 0 {
            return;
        }
        let before = if index > 0 {
            Some(index - 1)
        } else if self.is_closed {
            Some(count - 1)
        } else {
            None
        };
        let after = (index < count).then_some(index);
        for si in [before, after].into_iter().flatten() {
            let seg = &mut self.segments[si];
            if let (Some(a), Some(b)) = (node_at(arena, seg.from), node_at(arena, seg.to)) {
                seg.rebuild(a, b, line_count);
            }
        }
        self.refresh_aabb();
    }

    pub(crate) fn refresh_aabb(&mut self) {
        self.aabb = Aabb::from_boxes(self.segments.iter().map(|s| s.aabb));
    }

    /// Split a global parameter into (segment index, local parameter).
    ///
    /// Closed splines wrap into `[0, n)`, open splines clamp into `[0, n-1]`.
    pub fn locate(&self, t: f32) -> Option<(usize, f32)> {
        let count = self.segments.len();
        if count == 0 || !t.is_finite() {
            return None;
        }
        let t = if self.is_closed {
            t.rem_euclid(count as f32)
        } else {
            t.clamp(0.0, count as f32)
        };
        let i = t.floor() as usize;
        if i >= count {
            // Open end, or a wrap that rounded up to n.
            return Some(if self.is_closed { (0, 0.0) } else { (count - 1, 1.0) });
        }
        Some((i, t - i as f32))
    }

    pub fn evaluate(&self, t: f32) -> Option<Vec2> {
        let (i, frac) = self.locate(t)?;
        Some(self.segments[i].evaluate(frac))
    }

    pub fn frame(&self, t: f32) -> Option<PathFrame> {
        let (i, frac) = self.locate(t)?;
        let seg = &self.segments[i];
        let tangent = seg.tangent(frac);
        Some(PathFrame { position: seg.evaluate(frac), tangent, normal: tangent.perp() })
    }

    /// First node (or visible handle) of this spline hit by `pos`.
    pub fn select(&self, arena: &[Option<ControlNode>], pos: Vec2, radius: f32, include_handles: bool) -> Option<Selection> {
        self.nodes
            .iter()
            .find_map(|&id| node_at(arena, id).and_then(|n| n.select(id, pos, radius, include_handles)))
    }
}

#[inline]
pub(crate) fn expected_segments(nodes: usize, closed: bool) -> usize {
    match (nodes, closed) {
        (0, _) | (1, _) => 0,
        (n, true) => n,
        (n, false) => n - 1,
    }
}
