use crate::geometry::tolerance::EPS_LEN;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub type NodeId = u32;
pub type SplineId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const Y: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const MAX: Vec2 = Vec2 { x: f32::INFINITY, y: f32::INFINITY };
    pub const MIN: Vec2 = Vec2 { x: f32::NEG_INFINITY, y: f32::NEG_INFINITY };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn dot(self, o: Vec2) -> f32 {
        self.x * o.x + self.y * o.y
    }

    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(self, o: Vec2) -> f32 {
        self.x * o.y - self.y * o.x
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance_sq(self, o: Vec2) -> f32 {
        (self - o).length_sq()
    }

    #[inline]
    pub fn distance(self, o: Vec2) -> f32 {
        (self - o).length()
    }

    /// Unit vector in the same direction, or zero for a near-zero vector.
    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > EPS_LEN {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Rotated by +90 degrees.
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn rotated(self, radians: f32) -> Vec2 {
        let (s, c) = radians.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Mirror about the line with unit normal `n`: `v - 2 (v.n) n`.
    #[inline]
    pub fn reflect(self, n: Vec2) -> Vec2 {
        self - n * (2.0 * self.dot(n))
    }

    /// Point reflection through `center`.
    #[inline]
    pub fn mirrored_through(self, center: Vec2) -> Vec2 {
        center * 2.0 - self
    }

    #[inline]
    pub fn lerp(self, o: Vec2, t: f32) -> Vec2 {
        self + (o - self) * t
    }

    #[inline]
    pub fn min(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x.min(o.x), self.y.min(o.y))
    }

    #[inline]
    pub fn max(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x.max(o.x), self.y.max(o.y))
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, s: f32) -> Vec2 {
        Vec2::new(self.x / s, self.y / s)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, o: Vec2) {
        self.x += o.x;
        self.y += o.y;
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, o: Vec2) {
        self.x -= o.x;
        self.y -= o.y;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    #[serde(rename = "prev")]
    Prev = 0,
    #[serde(rename = "next")]
    Next = 1,
}

impl HandleSide {
    pub fn opposite(self) -> HandleSide {
        match self {
            HandleSide::Prev => HandleSide::Next,
            HandleSide::Next => HandleSide::Prev,
        }
    }
}

/// Non-owning reference to one of a node's two handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRef {
    pub node: NodeId,
    pub side: HandleSide,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Handle {
    pub pos: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct ControlNode {
    pub pos: Vec2,
    pub prev: Handle,
    pub next: Handle,
    pub spline: SplineId, // owner, non-owning link
    pub is_first: bool,
    pub is_last: bool,
    pub show_handles: bool,
}

impl ControlNode {
    /// Node with handles at `pos -/+ dir * len`.
    pub fn new(pos: Vec2, dir: Vec2, len: f32, spline: SplineId) -> Self {
        let dir = dir.normalized();
        ControlNode {
            pos,
            prev: Handle { pos: pos - dir * len },
            next: Handle { pos: pos + dir * len },
            spline,
            is_first: false,
            is_last: false,
            show_handles: false,
        }
    }

    /// Neither end of an open path.
    pub fn is_inner(&self) -> bool {
        !self.is_first && !self.is_last
    }

    pub fn handle(&self, side: HandleSide) -> &Handle {
        match side {
            HandleSide::Prev => &self.prev,
            HandleSide::Next => &self.next,
        }
    }

    pub(crate) fn handle_mut(&mut self, side: HandleSide) -> &mut Handle {
        match side {
            HandleSide::Prev => &mut self.prev,
            HandleSide::Next => &mut self.next,
        }
    }

    /// Move the node, carrying both handles along.
    pub(crate) fn translate_to(&mut self, pos: Vec2) {
        let offset = pos - self.pos;
        self.pos = pos;
        self.prev.pos += offset;
        self.next.pos += offset;
    }

    /// Move one handle and point-reflect its sibling through the node.
    pub(crate) fn move_handle(&mut self, side: HandleSide, pos: Vec2) {
        let center = self.pos;
        self.handle_mut(side).pos = pos;
        self.handle_mut(side.opposite()).pos = pos.mirrored_through(center);
    }

    /// Hit-test the node and, when shown, its handles (`next` before `prev`).
    pub fn select(&self, id: NodeId, pos: Vec2, radius: f32, include_handles: bool) -> Option<Selection> {
        let r2 = radius * radius;
        if include_handles && self.show_handles {
            for side in [HandleSide::Next, HandleSide::Prev] {
                if self.handle(side).pos.distance_sq(pos) <= r2 {
                    return Some(Selection::Handle { node: id, side });
                }
            }
        }
        (self.pos.distance_sq(pos) <= r2).then_some(Selection::Node { id })
    }

    /// Reverses the tangent orientation when the owning spline is reversed.
    pub(crate) fn swap_handles(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.next);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    #[serde(rename = "node")]
    Node { id: NodeId },
    #[serde(rename = "handle")]
    Handle { node: NodeId, side: HandleSide },
}

/// Position, unit tangent and unit normal at a curve parameter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathFrame {
    pub position: Vec2,
    pub tangent: Vec2,
    pub normal: Vec2,
}
