//! Best-first descent over the curve hierarchy.
//!
//! Levels, top to bottom: MultiSpline, Spline, Segment, Line. Only lines are
//! leaves; every query (nearest point, swept circle) is a [`Query`] that
//! decides child order, which children to enter, how to score a line and
//! which of two results to keep.

use crate::geometry::aabb::Aabb;
use crate::geometry::flatten::Line;
use crate::model::SplineId;
use crate::spline::{Segment, Spline};
use crate::MultiSpline;

/// A line leaf together with where it sits in the hierarchy.
#[derive(Clone, Copy, Debug)]
pub struct LineRef<'a> {
    pub spline: SplineId,
    pub segment: usize,
    pub line: &'a Line,
}

impl LineRef<'_> {
    /// Global spline parameter at fraction `s` along the line.
    #[inline]
    pub fn global_param(&self, s: f32) -> f32 {
        self.segment as f32 + self.line.param_at(s)
    }
}

#[derive(Clone, Copy, Debug)]
pub enum Geom<'a> {
    MultiSpline(&'a MultiSpline),
    Spline { id: SplineId, spline: &'a Spline },
    Segment { spline: SplineId, index: usize, segment: &'a Segment },
    Line(LineRef<'a>),
}

impl<'a> Geom<'a> {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Geom::Line(_))
    }

    pub fn children(&self) -> Vec<Geom<'a>> {
        match *self {
            Geom::MultiSpline(net) => net.splines().map(|(id, spline)| Geom::Spline { id, spline }).collect(),
            Geom::Spline { id, spline } => spline
                .segments()
                .iter()
                .enumerate()
                .map(|(index, segment)| Geom::Segment { spline: id, index, segment })
                .collect(),
            Geom::Segment { spline, index, segment } => segment
                .lines()
                .iter()
                .map(|line| Geom::Line(LineRef { spline, segment: index, line }))
                .collect(),
            Geom::Line(_) => Vec::new(),
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            Geom::MultiSpline(net) => Aabb::from_boxes(net.splines().filter_map(|(_, s)| s.aabb())),
            Geom::Spline { spline, .. } => spline.aabb(),
            Geom::Segment { segment, .. } => Some(segment.aabb()),
            Geom::Line(l) => Some(l.line.bounds()),
        }
    }
}

pub trait Query<'a> {
    type Output;

    /// Order (and optionally thin out) the children of a composite node.
    fn select_candidates(&self, children: Vec<Geom<'a>>) -> Vec<Geom<'a>> {
        children
    }

    /// Early reject before descending into `candidate`.
    fn admit(&self, _candidate: &Geom<'a>, _best: Option<&Self::Output>) -> bool {
        true
    }

    fn evaluate_leaf(&self, leaf: LineRef<'a>) -> Option<Self::Output>;

    fn pick_better(&self, best: Self::Output, candidate: Self::Output) -> Self::Output;
}

/// Run `query` over the tree rooted at `root` and return the best leaf result.
pub fn traverse<'a, Q: Query<'a>>(query: &Q, root: Geom<'a>) -> Option<Q::Output> {
    let mut best = None;
    descend(query, root, &mut best);
    best
}

fn descend<'a, Q: Query<'a>>(query: &Q, node: Geom<'a>, best: &mut Option<Q::Output>) {
    if let Geom::Line(leaf) = node {
        if let Some(res) = query.evaluate_leaf(leaf) {
            *best = Some(match best.take() {
                Some(b) => query.pick_better(b, res),
                None => res,
            });
        }
        return;
    }
    for child in query.select_candidates(node.children()) {
        if query.admit(&child, best.as_ref()) {
            descend(query, child, best);
        }
    }
}
