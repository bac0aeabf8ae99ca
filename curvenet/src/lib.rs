pub mod config;
pub mod model;
pub mod spline;
pub mod geometry {
    pub mod aabb;
    pub mod cubic;
    pub mod flatten;
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod body;
    pub mod collision;
    pub mod nearest;
    pub mod picking;
    pub mod traverse;
}

pub use algorithms::body::Body;
pub use algorithms::collision::{Contact, ContactKind, MoveResult, Sweep};
pub use algorithms::nearest::NearestHit;
pub use config::SplineConfig;
pub use model::{ControlNode, HandleRef, HandleSide, NodeId, PathFrame, Selection, SplineId, Vec2};
pub use spline::{Segment, Spline};

use geometry::limits::in_point_bounds;
use spline::node_at;

/// Strict-call error: (machine-readable code, message).
pub type StrictError = (&'static str, String);

/// Forest of independent open or closed splines.
///
/// Nodes and splines live in id-indexed slots; a spline lists its node ids in
/// order and every node records the id of the spline that owns it.
pub struct MultiSpline {
    pub(crate) nodes: Vec<Option<ControlNode>>, // id is index
    pub(crate) splines: Vec<Option<Spline>>,    // id is index
    pub(crate) config: SplineConfig,
    pub(crate) geom_ver: u64,
}

impl std::fmt::Debug for MultiSpline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSpline")
            .field("splines", &self.spline_count())
            .field("nodes", &self.node_count())
            .field("geom_ver", &self.geom_ver)
            .finish()
    }
}

impl Default for MultiSpline {
    fn default() -> Self {
        MultiSpline::new()
    }
}

impl MultiSpline {
    pub fn new() -> Self {
        MultiSpline::with_config(SplineConfig::default())
    }

    pub fn with_config(config: SplineConfig) -> Self {
        MultiSpline { nodes: Vec::new(), splines: Vec::new(), config: config.sanitized(), geom_ver: 1 }
    }

    /// Monotonic geometry version; increments on every topology or position edit.
    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver = self.geom_ver.wrapping_add(1);
    }

    pub fn config(&self) -> &SplineConfig {
        &self.config
    }

    /// Replace the configuration; a new `line_count` rebuilds every segment.
    pub fn set_config(&mut self, config: SplineConfig) {
        let config = config.sanitized();
        let relines = config.line_count != self.config.line_count;
        self.config = config;
        if relines {
            let line_count = self.config.line_count;
            for spline in self.splines.iter_mut().flatten() {
                spline.rebuild_all(&self.nodes, line_count);
            }
            self.bump();
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.splines.clear();
        self.bump();
    }

    // Lookups
    pub fn node(&self, id: NodeId) -> Option<&ControlNode> {
        node_at(&self.nodes, id)
    }
    pub fn spline(&self, id: SplineId) -> Option<&Spline> {
        self.splines.get(id as usize).and_then(|s| s.as_ref())
    }
    pub fn node_position(&self, id: NodeId) -> Option<Vec2> {
        self.node(id).map(|n| n.pos)
    }
    pub fn handle_position(&self, h: HandleRef) -> Option<Vec2> {
        self.node(h.node).map(|n| n.handle(h.side).pos)
    }
    pub fn spline_of(&self, id: NodeId) -> Option<SplineId> {
        self.node(id).map(|n| n.spline)
    }
    pub fn nodes_of(&self, spline: SplineId) -> Option<&[NodeId]> {
        self.spline(spline).map(|s| s.nodes())
    }
    pub fn splines(&self) -> impl Iterator<Item = (SplineId, &Spline)> + '_ {
        self.splines
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i as SplineId, s)))
    }
    pub fn spline_ids(&self) -> Vec<SplineId> {
        self.splines().map(|(id, _)| id).collect()
    }
    pub fn node_count(&self) -> u32 {
        self.nodes.iter().filter(|n| n.is_some()).count() as u32
    }
    pub fn spline_count(&self) -> u32 {
        self.splines.iter().filter(|s| s.is_some()).count() as u32
    }
    pub fn segment_count(&self) -> u32 {
        self.splines().map(|(_, s)| s.segments.len()).sum::<usize>() as u32
    }

    fn push_spline(&mut self, spline: Spline) -> SplineId {
        let id = self.splines.len() as SplineId;
        self.splines.push(Some(spline));
        id
    }

    /// Reassign ownership and endpoint flags, then rebuild all cached geometry of `sid`.
    fn restructure(&mut self, sid: SplineId) {
        let line_count = self.config.line_count;
        let Some(Some(spline)) = self.splines.get_mut(sid as usize) else { return };
        let len = spline.nodes.len();
        for (i, &id) in spline.nodes.iter().enumerate() {
            if let Some(Some(n)) = self.nodes.get_mut(id as usize) {
                n.spline = sid;
                n.is_first = !spline.is_closed && i == 0;
                n.is_last = !spline.is_closed && i + 1 == len;
            }
        }
        spline.rebuild_all(&self.nodes, line_count);
    }

    /// Insert a node at `index` of spline `sid`, oriented along its neighbours.
    fn insert_node(&mut self, sid: SplineId, index: usize, pos: Vec2) -> Option<NodeId> {
        let spline = self.spline(sid)?;
        let prev = index.checked_sub(1).and_then(|i| spline.nodes.get(i)).and_then(|&id| self.node_position(id));
        let next = spline.nodes.get(index).and_then(|&id| self.node_position(id));

        let dir = match (next.unwrap_or(pos) - prev.unwrap_or(pos)).normalized() {
            d if d == Vec2::ZERO => Vec2::X,
            d => d,
        };
        let len = [prev, next]
            .into_iter()
            .flatten()
            .map(|p| p.distance(pos) * 0.5)
            .reduce(f32::min)
            .unwrap_or(self.config.default_handle_length);

        let id = self.nodes.len() as NodeId;
        self.nodes.push(Some(ControlNode::new(pos, dir, len, sid)));
        if let Some(Some(spline)) = self.splines.get_mut(sid as usize) {
            let index = index.min(spline.nodes.len());
            spline.nodes.insert(index, id);
        }
        self.restructure(sid);
        self.bump();
        Some(id)
    }

    // Topology

    /// Start a new single-node spline at `pos`. `None` when `pos` is
    /// non-finite or outside the coordinate bounds.
    pub fn add_node(&mut self, pos: Vec2) -> Option<NodeId> {
        if !in_point_bounds(pos.x, pos.y) {
            return None;
        }
        let sid = self.push_spline(Spline::default());
        self.insert_node(sid, 0, pos)
    }

    /// Extend the spline owning endpoint `node` with a new node at `pos`.
    /// Inner nodes and out-of-bounds positions are refused.
    pub fn add_node_connected(&mut self, pos: Vec2, node: NodeId) -> Option<NodeId> {
        if !in_point_bounds(pos.x, pos.y) {
            return None;
        }
        let n = *self.node(node)?;
        let spline = self.spline(n.spline)?;
        if n.is_last {
            let end = spline.nodes.len();
            self.insert_node(n.spline, end, pos)
        } else if n.is_first {
            self.insert_node(n.spline, 0, pos)
        } else {
            None
        }
    }

    /// Delete a node. A spline left with one node reopens; an empty one is dropped.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(sid) = self.spline_of(id) else { return false };
        let Some(Some(spline)) = self.splines.get_mut(sid as usize) else { return false };
        let Some(index) = spline.index_of(id) else { return false };
        spline.nodes.remove(index);
        if spline.nodes.len() <= 1 {
            spline.is_closed = false;
        }
        let emptied = spline.nodes.is_empty();
        self.nodes[id as usize] = None;
        if emptied {
            self.splines[sid as usize] = None;
        } else {
            self.restructure(sid);
        }
        self.bump();
        true
    }

    /// Delete a whole spline and its nodes.
    pub fn remove_spline(&mut self, sid: SplineId) -> bool {
        let Some(spline) = self.splines.get_mut(sid as usize).and_then(|s| s.take()) else { return false };
        for id in spline.nodes {
            if let Some(slot) = self.nodes.get_mut(id as usize) {
                *slot = None;
            }
        }
        self.bump();
        true
    }

    /// Join two endpoint nodes. Endpoints of the same open spline close it;
    /// endpoints of different splines splice both into one new spline.
    pub fn connect_nodes(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return false;
        }
        let (Some(na), Some(nb)) = (self.node(a).copied(), self.node(b).copied()) else { return false };
        if na.is_inner() || nb.is_inner() {
            return false;
        }
        if na.spline == nb.spline {
            let Some(Some(spline)) = self.splines.get_mut(na.spline as usize) else { return false };
            if spline.is_closed || spline.nodes.len() < 2 {
                return false;
            }
            spline.is_closed = true;
            self.restructure(na.spline);
            self.bump();
            return true;
        }

        if self.spline(na.spline).is_none() || self.spline(nb.spline).is_none() {
            return false;
        }
        let (Some(left), Some(right)) = (
            self.splines.get_mut(na.spline as usize).and_then(|s| s.take()),
            self.splines.get_mut(nb.spline as usize).and_then(|s| s.take()),
        ) else {
            return false;
        };
        // `a` becomes the tail of the first half, `b` the head of the second.
        let mut combined = left.nodes;
        if combined.last() != Some(&a) {
            self.reverse_nodes(&mut combined);
        }
        let mut tail = right.nodes;
        if tail.first() != Some(&b) {
            self.reverse_nodes(&mut tail);
        }
        combined.extend(tail);
        let sid = self.push_spline(Spline::with_nodes(combined));
        self.restructure(sid);
        self.bump();
        true
    }

    /// Flip traversal order, swapping each node's handles so the curve keeps its shape.
    fn reverse_nodes(&mut self, ids: &mut [NodeId]) {
        ids.reverse();
        for &id in ids.iter() {
            if let Some(Some(n)) = self.nodes.get_mut(id as usize) {
                n.swap_handles();
            }
        }
    }

    /// Cut the segment between two adjacent nodes. An open spline splits in
    /// two; a closed one reopens at the cut.
    pub fn disconnect_nodes(&mut self, a: NodeId, b: NodeId) -> bool {
        self.try_disconnect_nodes(a, b).is_ok()
    }

    // Positions

    /// Move a node (handles follow); only the adjacent segments are rebuilt.
    pub fn set_node_position(&mut self, id: NodeId, pos: Vec2) -> bool {
        if !in_point_bounds(pos.x, pos.y) {
            return false;
        }
        let Some(Some(node)) = self.nodes.get_mut(id as usize) else { return false };
        node.translate_to(pos);
        let sid = node.spline;
        self.refresh_around(sid, id);
        self.bump();
        true
    }

    /// Move a handle and mirror its sibling through the node.
    pub fn set_handle_position(&mut self, h: HandleRef, pos: Vec2) -> bool {
        if !in_point_bounds(pos.x, pos.y) {
            return false;
        }
        let Some(Some(node)) = self.nodes.get_mut(h.node as usize) else { return false };
        node.move_handle(h.side, pos);
        let sid = node.spline;
        self.refresh_around(sid, h.node);
        self.bump();
        true
    }

    fn refresh_around(&mut self, sid: SplineId, id: NodeId) {
        let line_count = self.config.line_count;
        if let Some(Some(spline)) = self.splines.get_mut(sid as usize) {
            if let Some(index) = spline.index_of(id) {
                spline.rebuild_around(index, &self.nodes, line_count);
            }
        }
    }

    /// Editor flag: handles of this node become selectable.
    pub fn set_show_handles(&mut self, id: NodeId, show: bool) -> bool {
        match self.nodes.get_mut(id as usize) {
            Some(Some(n)) => {
                n.show_handles = show;
                true
            }
            _ => false,
        }
    }

    // Evaluation
    pub fn evaluate(&self, spline: SplineId, t: f32) -> Option<Vec2> {
        let s = self.spline(spline)?;
        // A lone node has no segments but still has a position.
        s.evaluate(t).or_else(|| s.first().and_then(|id| self.node_position(id)))
    }

    pub fn frame(&self, spline: SplineId, t: f32) -> Option<PathFrame> {
        self.spline(spline)?.frame(t)
    }

    // Queries
    pub fn select(&self, pos: Vec2) -> Option<Selection> {
        algorithms::picking::select_impl(self, pos, true)
    }

    pub fn select_node(&self, pos: Vec2) -> Option<NodeId> {
        match algorithms::picking::select_impl(self, pos, false) {
            Some(Selection::Node { id }) => Some(id),
            _ => None,
        }
    }

    pub fn nearest(&self, point: Vec2) -> Option<NearestHit> {
        algorithms::nearest::nearest(self, point)
    }

    pub fn nearest_within(&self, point: Vec2, max_dist: f32) -> Option<NearestHit> {
        algorithms::nearest::nearest_within(self, point, max_dist)
    }

    /// First contact of a circle swept from `from` to `to`, if any.
    pub fn collide(&self, from: Vec2, to: Vec2, radius: f32) -> Option<Contact> {
        algorithms::collision::collide(self, &Sweep::new(from, to, radius))
    }

    /// Sweep with bounces using the configured restitution and bounce cap.
    pub fn move_circle(&self, from: Vec2, to: Vec2, radius: f32, velocity: Vec2) -> MoveResult {
        algorithms::collision::move_circle(
            self,
            Sweep::new(from, to, radius),
            velocity,
            self.config.restitution,
            self.config.max_bounces,
        )
    }

    // Strict variants

    pub fn try_add_node(&mut self, pos: Vec2) -> Result<NodeId, StrictError> {
        check_point(pos)?;
        self.add_node(pos).ok_or_else(|| ("out_of_range", "position outside coordinate bounds".to_string()))
    }

    pub fn try_add_node_connected(&mut self, pos: Vec2, node: NodeId) -> Result<NodeId, StrictError> {
        check_point(pos)?;
        let n = self.node(node).ok_or_else(|| invalid_node(node))?;
        if n.is_inner() {
            return Err(("inner_node", format!("node {} is not an endpoint", node)));
        }
        self.add_node_connected(pos, node).ok_or_else(|| invalid_node(node))
    }

    pub fn try_connect_nodes(&mut self, a: NodeId, b: NodeId) -> Result<(), StrictError> {
        if a == b {
            return Err(("same_node", format!("cannot connect node {} to itself", a)));
        }
        for id in [a, b] {
            let n = self.node(id).ok_or_else(|| invalid_node(id))?;
            if n.is_inner() {
                return Err(("inner_node", format!("node {} is not an endpoint", id)));
            }
        }
        if self.connect_nodes(a, b) {
            Ok(())
        } else {
            Err(("not_endpoint", "spline cannot be closed".to_string()))
        }
    }

    pub fn try_disconnect_nodes(&mut self, a: NodeId, b: NodeId) -> Result<(), StrictError> {
        let na = *self.node(a).ok_or_else(|| invalid_node(a))?;
        let nb = *self.node(b).ok_or_else(|| invalid_node(b))?;
        let not_adjacent = || ("not_adjacent", format!("nodes {} and {} share no segment", a, b));
        if a == b || na.spline != nb.spline {
            return Err(not_adjacent());
        }
        let sid = na.spline;
        let Some(Some(spline)) = self.splines.get_mut(sid as usize) else { return Err(not_adjacent()) };
        let (lo, hi) = match (spline.index_of(a), spline.index_of(b)) {
            (Some(ia), Some(ib)) => (ia.min(ib), ia.max(ib)),
            _ => return Err(not_adjacent()),
        };
        let last = spline.nodes.len() - 1;
        if spline.is_closed {
            // Cutting a loop opens it at the cut; no new spline is created.
            if hi == lo + 1 {
                spline.nodes.rotate_left(hi);
            } else if !(lo == 0 && hi == last) {
                return Err(not_adjacent());
            }
            spline.is_closed = false;
            self.restructure(sid);
        } else {
            if hi != lo + 1 {
                return Err(not_adjacent());
            }
            let tail = spline.nodes.split_off(hi);
            self.restructure(sid);
            let new_sid = self.push_spline(Spline::with_nodes(tail));
            self.restructure(new_sid);
        }
        self.bump();
        Ok(())
    }

    pub fn try_remove_node(&mut self, id: NodeId) -> Result<(), StrictError> {
        if self.remove_node(id) { Ok(()) } else { Err(invalid_node(id)) }
    }

    pub fn try_set_node_position(&mut self, id: NodeId, pos: Vec2) -> Result<(), StrictError> {
        check_point(pos)?;
        if self.set_node_position(id, pos) { Ok(()) } else { Err(invalid_node(id)) }
    }

    pub fn try_set_handle_position(&mut self, h: HandleRef, pos: Vec2) -> Result<(), StrictError> {
        check_point(pos)?;
        if self.set_handle_position(h, pos) { Ok(()) } else { Err(invalid_node(h.node)) }
    }
}

fn check_point(pos: Vec2) -> Result<(), StrictError> {
    if !pos.is_finite() {
        return Err(("non_finite", "position must be finite".to_string()));
    }
    if !in_point_bounds(pos.x, pos.y) {
        return Err(("out_of_range", "position outside coordinate bounds".to_string()));
    }
    Ok(())
}

fn invalid_node(id: NodeId) -> StrictError {
    ("invalid_id", format!("invalid node id {}", id))
}
