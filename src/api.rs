use crate::{Circle, SplineNet};
use curvenet::{HandleRef, HandleSide, SplineConfig, Vec2};
use wasm_bindgen::prelude::*;
use crate::error;
use crate::interop::{arr_f32, arr_u32, arr_u8, new_obj, set_kv, to_js, xy};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn side_from_u8(side: u8) -> Option<HandleSide> {
    match side {
        0 => Some(HandleSide::Prev),
        1 => Some(HandleSide::Next),
        _ => None,
    }
}

fn check_radius(r: f32) -> Result<(), JsValue> {
    error::check_finite(&[("radius", r)])?;
    if r < 0.0 {
        return Err(error::out_of_range("radius", 0.0, f32::MAX, r));
    }
    Ok(())
}

#[wasm_bindgen]
impl SplineNet {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SplineNet {
        crate::SplineNet::rs_new()
    }
    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }
    pub fn clear(&mut self) {
        self.inner.clear()
    }

    // Config
    pub fn get_config(&self) -> JsValue {
        to_js(self.inner.config())
    }
    pub fn set_config_res(&mut self, cfg: JsValue) -> JsValue {
        // Round-trip through JSON text so integers stay integers.
        let text: String = match js_sys::JSON::stringify(&cfg) {
            Ok(s) => s.into(),
            Err(_) => return error::err("invalid_config", "config is not JSON-serializable", None),
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(v) => v,
            Err(e) => return error::err("invalid_config", e.to_string(), None),
        };
        match SplineConfig::from_json_value(value) {
            Ok(c) => {
                self.inner.set_config(c);
                error::ok(to_js(self.inner.config()))
            }
            Err(e) => error::from_strict(e),
        }
    }

    // Topology
    pub fn add_node(&mut self, x: f32, y: f32) -> Option<u32> {
        self.inner.add_node(Vec2::new(x, y))
    }
    pub fn add_node_res(&mut self, x: f32, y: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        match self.inner.try_add_node(Vec2::new(x, y)) {
            Ok(id) => error::ok(JsValue::from_f64(id as f64)),
            Err(e) => error::from_strict(e),
        }
    }
    pub fn add_node_connected(&mut self, x: f32, y: f32, node: u32) -> Option<u32> {
        self.inner.add_node_connected(Vec2::new(x, y), node)
    }
    pub fn add_node_connected_res(&mut self, x: f32, y: f32, node: u32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        match self.inner.node(node) {
            None => return error::invalid_id("node", node),
            Some(n) if n.is_inner() => return error::inner_node(node),
            Some(_) => {}
        }
        match self.inner.try_add_node_connected(Vec2::new(x, y), node) {
            Ok(id) => error::ok(JsValue::from_f64(id as f64)),
            Err(e) => error::from_strict(e),
        }
    }
    pub fn remove_node(&mut self, id: u32) -> bool {
        self.inner.remove_node(id)
    }
    pub fn remove_node_res(&mut self, id: u32) -> JsValue {
        if self.inner.node(id).is_none() {
            return error::invalid_id("node", id);
        }
        error::ok(JsValue::from_bool(self.inner.remove_node(id)))
    }
    pub fn remove_spline(&mut self, id: u32) -> bool {
        self.inner.remove_spline(id)
    }
    pub fn connect_nodes(&mut self, a: u32, b: u32) -> bool {
        self.inner.connect_nodes(a, b)
    }
    pub fn connect_nodes_res(&mut self, a: u32, b: u32) -> JsValue {
        for id in [a, b] {
            match self.inner.node(id) {
                None => return error::invalid_id("node", id),
                Some(n) if n.is_inner() => return error::inner_node(id),
                Some(_) => {}
            }
        }
        match self.inner.try_connect_nodes(a, b) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_strict(e),
        }
    }
    pub fn disconnect_nodes(&mut self, a: u32, b: u32) -> bool {
        self.inner.disconnect_nodes(a, b)
    }
    pub fn disconnect_nodes_res(&mut self, a: u32, b: u32) -> JsValue {
        match self.inner.try_disconnect_nodes(a, b) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(("invalid_id", _)) => {
                let bad = if self.inner.node(a).is_none() { a } else { b };
                error::invalid_id("node", bad)
            }
            Err(e) => error::from_strict(e),
        }
    }
    pub fn node_count(&self) -> u32 {
        self.inner.node_count()
    }
    pub fn spline_count(&self) -> u32 {
        self.inner.spline_count()
    }
    pub fn segment_count(&self) -> u32 {
        self.inner.segment_count()
    }
    pub fn spline_of(&self, node: u32) -> Option<u32> {
        self.inner.spline_of(node)
    }

    // Positions
    pub fn set_node_position(&mut self, id: u32, x: f32, y: f32) -> bool {
        self.inner.set_node_position(id, Vec2::new(x, y))
    }
    pub fn set_node_position_res(&mut self, id: u32, x: f32, y: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        if self.inner.node(id).is_none() {
            return error::invalid_id("node", id);
        }
        match self.inner.try_set_node_position(id, Vec2::new(x, y)) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_strict(e),
        }
    }
    /// `side`: 0 = prev, 1 = next.
    pub fn set_handle_position(&mut self, node: u32, side: u8, x: f32, y: f32) -> bool {
        match side_from_u8(side) {
            Some(side) => self.inner.set_handle_position(HandleRef { node, side }, Vec2::new(x, y)),
            None => false,
        }
    }
    pub fn set_handle_position_res(&mut self, node: u32, side: u8, x: f32, y: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        let Some(side) = side_from_u8(side) else { return error::invalid_side(side) };
        if self.inner.node(node).is_none() {
            return error::invalid_id("node", node);
        }
        match self.inner.try_set_handle_position(HandleRef { node, side }, Vec2::new(x, y)) {
            Ok(()) => error::ok(JsValue::from_bool(true)),
            Err(e) => error::from_strict(e),
        }
    }
    pub fn set_show_handles(&mut self, node: u32, show: bool) -> bool {
        self.inner.set_show_handles(node, show)
    }

    // Getters
    pub fn get_node(&self, id: u32) -> JsValue {
        match self.inner.node_position(id) {
            Some(p) => xy(p.x, p.y),
            None => JsValue::NULL,
        }
    }
    pub fn get_node_res(&self, id: u32) -> JsValue {
        match self.inner.node_position(id) {
            Some(p) => error::ok(xy(p.x, p.y)),
            None => error::invalid_id("node", id),
        }
    }
    /// `{ ids, positions, handles, flags, splines }`: `handles` holds prev then
    /// next per node; `flags` bit 0 first, bit 1 last, bit 2 handles shown.
    pub fn get_node_data(&self) -> JsValue {
        let mut ids = Vec::new();
        let mut pos = Vec::new();
        let mut handles = Vec::new();
        let mut flags = Vec::new();
        let mut owners = Vec::new();
        for (sid, spline) in self.inner.splines() {
            for &id in spline.nodes() {
                let Some(n) = self.inner.node(id) else { continue };
                ids.push(id);
                pos.extend_from_slice(&[n.pos.x, n.pos.y]);
                handles.extend_from_slice(&[n.prev.pos.x, n.prev.pos.y, n.next.pos.x, n.next.pos.y]);
                flags.push(n.is_first as u8 | (n.is_last as u8) << 1 | (n.show_handles as u8) << 2);
                owners.push(sid);
            }
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f32(&pos).into());
        set_kv(&obj, "handles", &arr_f32(&handles).into());
        set_kv(&obj, "flags", &arr_u8(&flags).into());
        set_kv(&obj, "splines", &arr_u32(&owners).into());
        obj.into()
    }
    /// `{ ids, closed, offsets, nodes }`: nodes of spline `i` are
    /// `nodes[offsets[i]..offsets[i + 1]]`.
    pub fn get_spline_data(&self) -> JsValue {
        let mut ids = Vec::new();
        let mut closed = Vec::new();
        let mut offsets = vec![0u32];
        let mut nodes = Vec::new();
        for (sid, spline) in self.inner.splines() {
            ids.push(sid);
            closed.push(spline.is_closed() as u8);
            nodes.extend_from_slice(spline.nodes());
            offsets.push(nodes.len() as u32);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "closed", &arr_u8(&closed).into());
        set_kv(&obj, "offsets", &arr_u32(&offsets).into());
        set_kv(&obj, "nodes", &arr_u32(&nodes).into());
        obj.into()
    }
    /// Cached polyline of every segment: `{ splines, segments, lines }` with
    /// four floats (x0, y0, x1, y1) per line.
    pub fn get_segment_data(&self) -> JsValue {
        let mut splines = Vec::new();
        let mut segments = Vec::new();
        let mut lines = Vec::new();
        for (sid, spline) in self.inner.splines() {
            for (si, seg) in spline.segments().iter().enumerate() {
                for l in seg.lines() {
                    splines.push(sid);
                    segments.push(si as u32);
                    lines.extend_from_slice(&[l.from.x, l.from.y, l.to.x, l.to.y]);
                }
            }
        }
        let obj = new_obj();
        set_kv(&obj, "splines", &arr_u32(&splines).into());
        set_kv(&obj, "segments", &arr_u32(&segments).into());
        set_kv(&obj, "lines", &arr_f32(&lines).into());
        obj.into()
    }

    // Evaluation
    pub fn evaluate(&self, spline: u32, t: f32) -> JsValue {
        match self.inner.evaluate(spline, t) {
            Some(p) => xy(p.x, p.y),
            None => JsValue::NULL,
        }
    }
    pub fn frame(&self, spline: u32, t: f32) -> JsValue {
        match self.inner.frame(spline, t) {
            Some(f) => to_js(&f),
            None => JsValue::NULL,
        }
    }

    // Queries
    pub fn select(&self, x: f32, y: f32) -> JsValue {
        match self.inner.select(Vec2::new(x, y)) {
            Some(s) => to_js(&s),
            None => JsValue::NULL,
        }
    }
    pub fn select_node(&self, x: f32, y: f32) -> Option<u32> {
        self.inner.select_node(Vec2::new(x, y))
    }
    pub fn select_res(&self, x: f32, y: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        error::ok(self.select(x, y))
    }
    pub fn nearest(&self, x: f32, y: f32) -> JsValue {
        match self.inner.nearest(Vec2::new(x, y)) {
            Some(h) => to_js(&h),
            None => JsValue::NULL,
        }
    }
    pub fn nearest_within(&self, x: f32, y: f32, max_dist: f32) -> JsValue {
        match self.inner.nearest_within(Vec2::new(x, y), max_dist) {
            Some(h) => to_js(&h),
            None => JsValue::NULL,
        }
    }
    pub fn nearest_res(&self, x: f32, y: f32, max_dist: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        if max_dist.is_nan() || max_dist < 0.0 {
            return error::out_of_range("max_dist", 0.0, f32::INFINITY, max_dist);
        }
        error::ok(self.nearest_within(x, y, max_dist))
    }
    pub fn collide(&self, fx: f32, fy: f32, tx: f32, ty: f32, radius: f32) -> JsValue {
        match self.inner.collide(Vec2::new(fx, fy), Vec2::new(tx, ty), radius) {
            Some(c) => to_js(&c),
            None => JsValue::NULL,
        }
    }
    pub fn collide_res(&self, fx: f32, fy: f32, tx: f32, ty: f32, radius: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("fx", fx), ("fy", fy), ("tx", tx), ("ty", ty)]) {
            return e;
        }
        if let Err(e) = check_radius(radius) {
            return e;
        }
        error::ok(self.collide(fx, fy, tx, ty, radius))
    }
    #[allow(clippy::too_many_arguments)]
    pub fn move_circle(&self, fx: f32, fy: f32, tx: f32, ty: f32, radius: f32, vx: f32, vy: f32) -> JsValue {
        to_js(&self.inner.move_circle(Vec2::new(fx, fy), Vec2::new(tx, ty), radius, Vec2::new(vx, vy)))
    }
    #[allow(clippy::too_many_arguments)]
    pub fn move_circle_res(&self, fx: f32, fy: f32, tx: f32, ty: f32, radius: f32, vx: f32, vy: f32) -> JsValue {
        let params = [("fx", fx), ("fy", fy), ("tx", tx), ("ty", ty), ("vx", vx), ("vy", vy)];
        if let Err(e) = error::check_finite(&params) {
            return e;
        }
        if let Err(e) = check_radius(radius) {
            return e;
        }
        error::ok(self.move_circle(fx, fy, tx, ty, radius, vx, vy))
    }
}

impl Default for SplineNet {
    fn default() -> Self {
        SplineNet::new()
    }
}

#[wasm_bindgen]
impl Circle {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f32, y: f32, radius: f32) -> Circle {
        Circle { inner: curvenet::Body::new(Vec2::new(x, y), radius) }
    }
    pub fn position(&self) -> JsValue {
        xy(self.inner.position.x, self.inner.position.y)
    }
    pub fn velocity(&self) -> JsValue {
        xy(self.inner.velocity.x, self.inner.velocity.y)
    }
    pub fn set_velocity(&mut self, vx: f32, vy: f32) -> bool {
        if !vx.is_finite() || !vy.is_finite() {
            return false;
        }
        self.inner.velocity = Vec2::new(vx, vy);
        true
    }
    /// Advance by `dt` under gravity `(gx, gy)`; returns the move result.
    pub fn step(&mut self, net: &SplineNet, dt: f32, gx: f32, gy: f32) -> JsValue {
        to_js(&self.inner.step(net.rs_inner(), dt, Vec2::new(gx, gy)))
    }
    pub fn step_res(&mut self, net: &SplineNet, dt: f32, gx: f32, gy: f32) -> JsValue {
        if let Err(e) = error::check_finite(&[("dt", dt), ("gx", gx), ("gy", gy)]) {
            return e;
        }
        if dt < 0.0 {
            return error::out_of_range("dt", 0.0, f32::INFINITY, dt);
        }
        error::ok(self.step(net, dt, gx, gy))
    }
}
