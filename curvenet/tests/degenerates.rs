use curvenet::{HandleRef, HandleSide, MultiSpline, SplineConfig, Vec2};

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[test]
fn zero_length_sweep_is_no_hit() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(0.0, 0.0)).unwrap();
    net.add_node_connected(v(10.0, 0.0), a).unwrap();
    assert!(net.collide(v(5.0, 0.5), v(5.0, 0.5), 1.0).is_none());
    let res = net.move_circle(v(5.0, 0.5), v(5.0, 0.5), 1.0, Vec2::ZERO);
    assert!(res.contacts.is_empty());
    assert_eq!(res.position, v(5.0, 0.5));
}

#[test]
fn coincident_nodes_make_a_point_segment() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(3.0, 3.0)).unwrap();
    let b = net.add_node_connected(v(3.0, 3.0), a).unwrap();
    let sid = net.spline_of(b).unwrap();
    // The new node gets zero-length handles.
    let p = net.evaluate(sid, 0.5).unwrap();
    assert!(p.is_finite());
    let hit = net.nearest(v(4.0, 3.0)).unwrap();
    assert!(hit.position.is_finite() && hit.t.is_finite());
    assert!(hit.dist_sq.is_finite());
    let f = net.frame(sid, 0.5).unwrap();
    assert!(f.tangent.is_finite() && f.normal.is_finite());
    // Sweeps through the point never yield NaN.
    if let Some(c) = net.collide(v(0.0, 3.0), v(6.0, 3.0), 0.5) {
        assert!(c.t.is_finite() && c.normal.is_finite());
    }
}

#[test]
fn non_finite_inputs_are_rejected() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(0.0, 0.0)).unwrap();
    let ver = net.geom_version();
    assert!(!net.set_node_position(a, v(f32::NAN, 0.0)));
    assert!(!net.set_handle_position(HandleRef { node: a, side: HandleSide::Next }, v(0.0, f32::INFINITY)));
    assert_eq!(net.geom_version(), ver);
    assert_eq!(net.try_add_node(v(f32::NAN, 1.0)).unwrap_err().0, "non_finite");
    assert_eq!(net.try_add_node(v(1e9, 1.0)).unwrap_err().0, "out_of_range");

    let nodes = net.node_count();
    assert!(net.add_node(v(f32::NAN, 0.0)).is_none());
    assert!(net.add_node(v(0.0, f32::NEG_INFINITY)).is_none());
    assert!(net.add_node_connected(v(f32::INFINITY, 0.0), a).is_none());
    assert!(net.add_node_connected(v(1e9, 0.0), a).is_none());
    assert_eq!(net.try_add_node_connected(v(f32::NAN, 0.0), a).unwrap_err().0, "non_finite");
    assert_eq!(net.node_count(), nodes);
    assert_eq!(net.spline_count(), 1);
    assert_eq!(net.geom_version(), ver);

    let b = net.add_node_connected(v(4.0, 0.0), a).unwrap();
    let sid = net.spline_of(b).unwrap();
    assert!(net.evaluate(sid, 0.5).unwrap().is_finite());
    assert!(net.nearest(v(f32::NAN, 0.0)).is_none());
    assert!(net.collide(v(0.0, f32::NAN), v(1.0, 1.0), 1.0).is_none());
    assert!(net.collide(v(0.0, -5.0), v(0.0, 5.0), f32::NAN).is_none());
}

#[test]
fn lone_nodes_have_no_segments() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(2.0, 2.0)).unwrap();
    let sid = net.spline_of(a).unwrap();
    assert_eq!(net.segment_count(), 0);
    assert_eq!(net.evaluate(sid, 0.7), Some(v(2.0, 2.0)));
    assert!(net.frame(sid, 0.0).is_none());
    assert!(net.nearest(v(0.0, 0.0)).is_none());
    assert!(net.collide(v(2.0, -5.0), v(2.0, 5.0), 1.0).is_none());
    // Closing a single node is a no-op.
    assert!(!net.connect_nodes(a, a));
}

#[test]
fn unknown_ids_are_ignored() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(0.0, 0.0)).unwrap();
    assert!(net.add_node_connected(v(1.0, 1.0), 77).is_none());
    assert!(!net.connect_nodes(a, 77));
    assert!(!net.set_node_position(77, v(1.0, 1.0)));
    assert!(!net.set_show_handles(77, true));
    assert!(net.evaluate(42, 0.0).is_none());
    assert_eq!(net.try_remove_node(77).unwrap_err().0, "invalid_id");
}

#[test]
fn config_parsing_clamps_and_rejects() {
    let cfg = SplineConfig::from_json_value(serde_json::json!({ "line_count": 100000, "restitution": 3.0 })).unwrap();
    assert_eq!(cfg.line_count, 256);
    assert_eq!(cfg.restitution, 1.0);
    assert_eq!(cfg.select_radius, SplineConfig::default().select_radius);
    assert_eq!(SplineConfig::from_json_value(serde_json::json!([1, 2])).unwrap_err().0, "invalid_config");
    assert_eq!(SplineConfig::from_json_value(serde_json::json!({ "line_count": "many" })).unwrap_err().0, "invalid_config");
}
