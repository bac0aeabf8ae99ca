//! Axis-aligned bounding boxes used for pruning tree queries.

use crate::model::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb { min, max }
    }

    /// Minimal box enclosing `points`; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Aabb> {
        let mut min = Vec2::MAX;
        let mut max = Vec2::MIN;
        let mut any = false;
        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        any.then_some(Aabb { min, max })
    }

    /// Minimal box enclosing every box in `boxes`; `None` for an empty iterator.
    pub fn from_boxes<I: IntoIterator<Item = Aabb>>(boxes: I) -> Option<Aabb> {
        let mut min = Vec2::MAX;
        let mut max = Vec2::MIN;
        let mut any = false;
        for b in boxes {
            min = min.min(b.min);
            max = max.max(b.max);
            any = true;
        }
        any.then_some(Aabb { min, max })
    }

    /// Zero inside the box, else squared distance to the nearest face or corner.
    pub fn squared_distance(&self, p: Vec2) -> f32 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        dx * dx + dy * dy
    }

    pub fn distance(&self, p: Vec2) -> f32 {
        self.squared_distance(p).sqrt()
    }

    pub fn inflate(&self, r: f32) -> Aabb {
        let pad = Vec2::new(r, r);
        Aabb { min: self.min - pad, max: self.max + pad }
    }

    pub fn intersects(&self, o: &Aabb) -> bool {
        self.min.x <= o.max.x && o.min.x <= self.max.x && self.min.y <= o.max.y && o.min.y <= self.max.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn union(&self, o: &Aabb) -> Aabb {
        Aabb { min: self.min.min(o.min), max: self.max.max(o.max) }
    }
}
