use crate::algorithms::collision::{move_circle, MoveResult, Sweep};
use crate::model::Vec2;
use crate::MultiSpline;
use serde::{Deserialize, Serialize};

/// A circle moved through the network under gravity, bouncing off curves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Body { position, velocity: Vec2::ZERO, radius }
    }

    /// Advance by `dt` seconds: integrate gravity into the velocity, then sweep
    /// the circle along `velocity * dt` with bounces.
    ///
    /// A non-finite or non-positive `dt` leaves the body untouched.
    pub fn step(&mut self, net: &MultiSpline, dt: f32, gravity: Vec2) -> MoveResult {
        if !(dt > 0.0) || !dt.is_finite() || !gravity.is_finite() {
            return MoveResult { position: self.position, velocity: self.velocity, contacts: Vec::new(), truncated: false };
        }
        let velocity = self.velocity + gravity * dt;
        let sweep = Sweep::new(self.position, self.position + velocity * dt, self.radius);
        let cfg = net.config();
        let res = move_circle(net, sweep, velocity, cfg.restitution, cfg.max_bounces);
        self.position = res.position;
        self.velocity = res.velocity;
        res
    }
}
