//! Swept-circle collision against the polyline approximation of the network.
//!
//! Each boundary line is tested three ways (end cap, edge crossing, corner
//! graze) and the earliest sweep parameter wins. `move_circle` resolves hits
//! as bounces and keeps sweeping with the leftover translation.

use crate::algorithms::traverse::{traverse, Geom, LineRef, Query};
use crate::geometry::aabb::Aabb;
use crate::geometry::flatten::Line;
use crate::geometry::math::project_on_line;
use crate::geometry::tolerance::{inverse_lerp, EPS_DENOM, EPS_LEN, EPS_POS, SKIN};
use crate::model::{SplineId, Vec2};
use crate::MultiSpline;
use serde::Serialize;

/// Circle of `radius` whose centre moves from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    pub from: Vec2,
    pub to: Vec2,
    pub radius: f32,
}

impl Sweep {
    pub fn new(from: Vec2, to: Vec2, radius: f32) -> Self {
        Sweep { from, to, radius }
    }

    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.to - self.from
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.delta().normalized()
    }

    /// Centre position at sweep parameter `t`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.from + self.delta() * t
    }

    /// Everything the circle can touch during the sweep.
    pub fn bounds(&self) -> Aabb {
        Aabb { min: self.from.min(self.to), max: self.from.max(self.to) }.inflate(self.radius + EPS_POS)
    }

    fn is_degenerate(&self) -> bool {
        !self.from.is_finite() || !self.to.is_finite() || !(self.radius >= 0.0) || self.length() <= EPS_LEN
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContactKind {
    /// Final position overlaps the line; contact found by perpendicular distance.
    #[serde(rename = "end_cap")]
    EndCap,
    /// Sweep crosses the line.
    #[serde(rename = "edge")]
    Edge,
    /// Circle grazes a line endpoint.
    #[serde(rename = "corner")]
    Corner,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hit {
    t: f32,
    point: Vec2,
    kind: ContactKind,
}

fn earlier(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Contact {
    /// Sweep parameter of first contact, in [0, 1].
    pub t: f32,
    /// Touched point on the boundary.
    pub point: Vec2,
    /// Circle centre at contact.
    pub center: Vec2,
    /// Unit surface normal facing the circle.
    pub normal: Vec2,
    pub kind: ContactKind,
    pub spline: SplineId,
    pub segment: usize,
}

/// Circle ends within `radius` of the infinite line; find when the
/// perpendicular distance first equals the radius. Distances are signed
/// towards the side the sweep starts on, so a move that ends across the line
/// still interpolates correctly.
/// A circle that starts inside the band and moves deeper reports `t = 0`.
fn collide_end(line: &Line, sweep: &Sweep) -> Option<Hit> {
    let len = line.length();
    if len <= EPS_LEN {
        return None;
    }
    let dir = line.dir();
    let r = sweep.radius;

    let side = |p: Vec2| (p - line.from).cross(dir);
    let from_side = side(sweep.from);
    let sign = if from_side < 0.0 { -1.0 } else { 1.0 };
    let d_from = from_side * sign;
    let d_to = side(sweep.to) * sign;
    if d_to > r {
        return None;
    }

    let t = if d_from <= r {
        // Already overlapping: only an approaching move counts, and it hits at once.
        if d_to >= d_from {
            return None;
        }
        0.0
    } else {
        inverse_lerp(d_from, d_to, r)?
    };
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let (s, point) = project_on_line(sweep.at(t), line.from, dir);
    if s < 0.0 || s > len {
        return None;
    }
    Some(Hit { t, point, kind: ContactKind::EndCap })
}

/// Sweep path crosses the line; back the crossing off by the radius measured
/// along the sweep direction.
fn collide_intersect(line: &Line, sweep: &Sweep) -> Option<Hit> {
    let v1 = sweep.delta();
    let v2 = line.delta();
    let move_len = v1.length();
    let len = v2.length();
    if move_len <= EPS_LEN || len <= EPS_LEN {
        return None;
    }
    let den = v1.cross(v2);
    if den.abs() <= EPS_DENOM {
        return None;
    }
    let w = sweep.from - line.from;
    let u = (-v1.y * w.x + v1.x * w.y) / den; // along the line
    let t = (v2.x * w.y - v2.y * w.x) / den; // along the sweep
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&t) {
        return None;
    }

    let dir = line.dir();
    let crossing = sweep.from + v1 * t;
    let (_, foot) = project_on_line(sweep.from, line.from, dir);
    let d_cross = sweep.from.distance(crossing);
    let d_perp = sweep.from.distance(foot);
    if d_perp <= EPS_LEN {
        return None;
    }

    let t_hit = t - (sweep.radius * d_cross / d_perp) / move_len;
    if t_hit < 0.0 {
        return None;
    }
    let (s, point) = project_on_line(sweep.at(t_hit), line.from, dir);
    if s < 0.0 || s > len {
        return None;
    }
    Some(Hit { t: t_hit, point, kind: ContactKind::Edge })
}

/// Contact with `line.from` as a corner. Falls back to an edge hit when the
/// interpolated contact still lands inside the line.
fn corner_hit(line: &Line, sweep: &Sweep) -> Option<Hit> {
    let move_len = sweep.length();
    let len = line.length();
    if move_len <= EPS_LEN || len <= EPS_LEN {
        return None;
    }
    let r = sweep.radius;
    let mdir = sweep.dir();
    let ldir = line.dir();
    let corner = line.from;

    // Closest approach of the sweep line to the corner.
    let (t0, closest) = project_on_line(corner, sweep.from, mdir);
    let gap_sq = closest.distance_sq(corner);
    if gap_sq > r * r || t0 < 0.0 || t0 > move_len + r {
        return None;
    }

    let (_, foot_closest) = project_on_line(closest, line.from, ldir);
    let (_, foot_from) = project_on_line(sweep.from, line.from, ldir);
    let d_closest = closest.distance(foot_closest);
    let d_from = sweep.from.distance(foot_from);

    if d_closest < d_from {
        if let Some(f) = inverse_lerp(d_from, d_closest, r) {
            let t1 = f * (t0 / move_len);
            let s = (sweep.at(t1) - line.from).dot(ldir);
            if s > 0.0 && s < len {
                if !(0.0..=1.0).contains(&t1) {
                    return None;
                }
                return Some(Hit { t: t1, point: line.from + ldir * s, kind: ContactKind::Edge });
            }
        }
    }

    let back = (r * r - gap_sq).max(0.0).sqrt();
    let t = (t0 - back) / move_len;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(Hit { t, point: corner, kind: ContactKind::Corner })
}

fn collide_corner(line: &Line, sweep: &Sweep) -> Option<Hit> {
    earlier(corner_hit(line, sweep), corner_hit(&line.reversed(), sweep))
}

fn collide_line(line: &Line, sweep: &Sweep) -> Option<Hit> {
    let best = earlier(collide_end(line, sweep), collide_intersect(line, sweep));
    earlier(best, collide_corner(line, sweep))
}

fn contact_normal(hit: &Hit, center: Vec2, line: &Line, sweep_dir: Vec2) -> Vec2 {
    let n = match hit.kind {
        ContactKind::Corner => (center - hit.point).normalized(),
        ContactKind::EndCap | ContactKind::Edge => {
            let n = line.dir().perp();
            if n.dot(sweep_dir) > 0.0 { -n } else { n }
        }
    };
    if n == Vec2::ZERO { -sweep_dir } else { n }
}

struct SweepQuery {
    sweep: Sweep,
    reach: Aabb,
}

impl<'a> Query<'a> for SweepQuery {
    type Output = Contact;

    fn admit(&self, candidate: &Geom<'a>, _best: Option<&Contact>) -> bool {
        candidate.bounds().is_some_and(|b| b.intersects(&self.reach))
    }

    fn evaluate_leaf(&self, leaf: LineRef<'a>) -> Option<Contact> {
        let hit = collide_line(leaf.line, &self.sweep)?;
        let center = self.sweep.at(hit.t);
        Some(Contact {
            t: hit.t,
            point: hit.point,
            center,
            normal: contact_normal(&hit, center, leaf.line, self.sweep.dir()),
            kind: hit.kind,
            spline: leaf.spline,
            segment: leaf.segment,
        })
    }

    fn pick_better(&self, best: Contact, candidate: Contact) -> Contact {
        if candidate.t < best.t { candidate } else { best }
    }
}

/// Earliest contact along the sweep; `None` when the move is unobstructed.
pub fn collide(net: &MultiSpline, sweep: &Sweep) -> Option<Contact> {
    if sweep.is_degenerate() {
        return None;
    }
    let q = SweepQuery { sweep: *sweep, reach: sweep.bounds() };
    traverse(&q, Geom::MultiSpline(net))
}

/// Outcome of one bounce.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounce {
    /// Centre after separating from the surface.
    pub position: Vec2,
    pub velocity: Vec2,
    /// Translation left over for the rest of the step.
    pub remaining: Vec2,
}

/// Reflect velocity and leftover translation about the contact normal.
pub fn resolve_collision(contact: &Contact, sweep: &Sweep, velocity: Vec2, restitution: f32) -> Bounce {
    let n = contact.normal;
    let unused = sweep.length() * (1.0 - contact.t);
    Bounce {
        position: contact.center + n * SKIN,
        velocity: velocity.reflect(n) * restitution,
        remaining: sweep.dir().reflect(n) * (unused * restitution),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveResult {
    pub position: Vec2,
    pub velocity: Vec2,
    pub contacts: Vec<Contact>,
    /// The bounce cap stopped the move before the translation was used up.
    pub truncated: bool,
}

/// Sweep, bounce and re-sweep until a pass is unobstructed or `max_bounces`
/// contacts have been resolved.
pub fn move_circle(net: &MultiSpline, sweep: Sweep, velocity: Vec2, restitution: f32, max_bounces: u32) -> MoveResult {
    let mut sweep = sweep;
    let mut velocity = velocity;
    let mut contacts = Vec::new();
    loop {
        let Some(contact) = collide(net, &sweep) else {
            let position = if sweep.to.is_finite() { sweep.to } else { sweep.from };
            return MoveResult { position, velocity, contacts, truncated: false };
        };
        let bounce = resolve_collision(&contact, &sweep, velocity, restitution);
        contacts.push(contact);
        #[cfg(feature = "collide_trace")]
        eprintln!(
            "bounce n={} t={:.4} kind={:?} spline={} seg={} remaining={:.4}",
            contacts.len(),
            contact.t,
            contact.kind,
            contact.spline,
            contact.segment,
            bounce.remaining.length()
        );
        velocity = bounce.velocity;
        if contacts.len() as u32 >= max_bounces {
            return MoveResult { position: bounce.position, velocity, contacts, truncated: true };
        }
        sweep = Sweep::new(bounce.position, bounce.position + bounce.remaining, sweep.radius);
    }
}
