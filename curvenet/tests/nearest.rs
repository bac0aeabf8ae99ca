use curvenet::{MultiSpline, Vec2};

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn wavy(net: &mut MultiSpline, y: f32) -> u32 {
    let mut last = net.add_node(v(0.0, y)).unwrap();
    for i in 1..6 {
        let dy = if i % 2 == 0 { 2.0 } else { -2.0 };
        last = net.add_node_connected(v(i as f32 * 5.0, y + dy), last).unwrap();
    }
    net.spline_of(last).unwrap()
}

/// Brute force over every polyline line of every segment.
fn brute_nearest(net: &MultiSpline, p: Vec2) -> f32 {
    let mut best = f32::INFINITY;
    for (_, s) in net.splines() {
        for seg in s.segments() {
            for l in seg.lines() {
                let d = l.to - l.from;
                let len2 = d.length_sq();
                let s = if len2 > 0.0 { ((p - l.from).dot(d) / len2).clamp(0.0, 1.0) } else { 0.0 };
                best = best.min(p.distance_sq(l.from + d * s));
            }
        }
    }
    best
}

#[test]
fn pruned_search_matches_brute_force() {
    let mut net = MultiSpline::new();
    wavy(&mut net, 0.0);
    wavy(&mut net, 9.0);
    wavy(&mut net, -7.0);
    for k in 0..200 {
        let p = v((k as f32 * 1.37) % 30.0 - 2.0, (k as f32 * 2.11) % 24.0 - 10.0);
        let hit = net.nearest(p).unwrap();
        let brute = brute_nearest(&net, p);
        assert!((hit.dist_sq - brute).abs() <= 1e-3 * brute.max(1.0), "p={:?} got {} want {}", p, hit.dist_sq, brute);
    }
}

#[test]
fn hit_parameter_evaluates_near_hit_position() {
    let mut net = MultiSpline::new();
    let sid = wavy(&mut net, 0.0);
    let hit = net.nearest(v(12.0, 6.0)).unwrap();
    assert_eq!(hit.spline, sid);
    let on_curve = net.evaluate(sid, hit.t).unwrap();
    // The polyline hugs the curve; within sampling error.
    assert!(on_curve.distance(hit.position) < 0.5, "{:?} vs {:?}", on_curve, hit.position);
}

#[test]
fn edits_are_seen_by_the_next_query() {
    let mut net = MultiSpline::new();
    let a = net.add_node(v(0.0, 0.0)).unwrap();
    let b = net.add_node_connected(v(10.0, 0.0), a).unwrap();
    let before = net.nearest(v(10.0, 5.0)).unwrap();
    net.set_node_position(b, v(10.0, 5.0));
    let after = net.nearest(v(10.0, 5.0)).unwrap();
    assert!(after.dist_sq < 1e-6);
    assert!(before.dist_sq > 20.0);
}
