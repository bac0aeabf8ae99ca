use crate::algorithms::traverse::{traverse, Geom, LineRef, Query};
use crate::geometry::math::seg_distance_sq;
use crate::model::{SplineId, Vec2};
use crate::MultiSpline;
use serde::Serialize;

/// Closest point on the polyline approximation of the network.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NearestHit {
    pub spline: SplineId,
    /// Global spline parameter of the hit.
    pub t: f32,
    pub position: Vec2,
    pub dist_sq: f32,
}

struct NearestQuery {
    point: Vec2,
    bound_sq: f32,
}

impl NearestQuery {
    fn box_dist_sq(&self, g: &Geom<'_>) -> f32 {
        g.bounds().map_or(f32::INFINITY, |b| b.squared_distance(self.point))
    }
}

impl<'a> Query<'a> for NearestQuery {
    type Output = NearestHit;

    fn select_candidates(&self, children: Vec<Geom<'a>>) -> Vec<Geom<'a>> {
        let mut keyed: Vec<(f32, Geom<'a>)> = children.into_iter().map(|g| (self.box_dist_sq(&g), g)).collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        keyed.into_iter().map(|(_, g)| g).collect()
    }

    fn admit(&self, candidate: &Geom<'a>, best: Option<&NearestHit>) -> bool {
        // The box distance bounds the distance to anything inside it.
        let limit = best.map_or(self.bound_sq, |b| b.dist_sq);
        self.box_dist_sq(candidate) <= limit
    }

    fn evaluate_leaf(&self, leaf: LineRef<'a>) -> Option<NearestHit> {
        let (dist_sq, s) = seg_distance_sq(self.point, leaf.line.from, leaf.line.to);
        if dist_sq > self.bound_sq {
            return None;
        }
        Some(NearestHit {
            spline: leaf.spline,
            t: leaf.global_param(s),
            position: leaf.line.from.lerp(leaf.line.to, s),
            dist_sq,
        })
    }

    fn pick_better(&self, best: NearestHit, candidate: NearestHit) -> NearestHit {
        if candidate.dist_sq < best.dist_sq { candidate } else { best }
    }
}

pub fn nearest(net: &MultiSpline, point: Vec2) -> Option<NearestHit> {
    nearest_within(net, point, f32::INFINITY)
}

/// Nearest hit no farther than `max_dist`; `None` when nothing qualifies.
pub fn nearest_within(net: &MultiSpline, point: Vec2, max_dist: f32) -> Option<NearestHit> {
    if !point.is_finite() || max_dist.is_nan() || max_dist < 0.0 {
        return None;
    }
    let q = NearestQuery { point, bound_sq: max_dist * max_dist };
    traverse(&q, Geom::MultiSpline(net))
}
