use curvenet::{HandleRef, HandleSide, MultiSpline, NodeId, Vec2};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddNode { x: i16, y: i16 },
    Extend { idx: u16, x: i16, y: i16 },
    Move { idx: u16, dx: i8, dy: i8 },
    MoveHandle { idx: u16, next: bool, dx: i8, dy: i8 },
    Remove { idx: u16 },
    Connect { a: u16, b: u16 },
    Disconnect { idx: u16 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode { x, y }),
        (any::<u16>(), any::<i16>(), any::<i16>()).prop_map(|(idx, x, y)| Op::Extend { idx, x, y }),
        (any::<u16>(), any::<i8>(), any::<i8>()).prop_map(|(idx, dx, dy)| Op::Move { idx, dx, dy }),
        (any::<u16>(), any::<bool>(), any::<i8>(), any::<i8>())
            .prop_map(|(idx, next, dx, dy)| Op::MoveHandle { idx, next, dx, dy }),
        any::<u16>().prop_map(|idx| Op::Remove { idx }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::Connect { a, b }),
        any::<u16>().prop_map(|idx| Op::Disconnect { idx }),
    ]
}

fn live_nodes(net: &MultiSpline) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = net.splines().flat_map(|(_, s)| s.nodes().to_vec()).collect();
    ids.sort_unstable();
    ids
}

fn pick(ids: &[NodeId], idx: u16) -> Option<NodeId> {
    (!ids.is_empty()).then(|| ids[idx as usize % ids.len()])
}

fn apply_op(net: &mut MultiSpline, op: Op) {
    let ids = live_nodes(net);
    let scale = 0.05;
    match op {
        Op::AddNode { x, y } => {
            net.add_node(Vec2::new(x as f32 * scale, y as f32 * scale));
        }
        Op::Extend { idx, x, y } => {
            if let Some(id) = pick(&ids, idx) {
                let _ = net.add_node_connected(Vec2::new(x as f32 * scale, y as f32 * scale), id);
            }
        }
        Op::Move { idx, dx, dy } => {
            if let Some(id) = pick(&ids, idx) {
                let p = net.node_position(id).unwrap();
                net.set_node_position(id, p + Vec2::new(dx as f32 * 0.1, dy as f32 * 0.1));
            }
        }
        Op::MoveHandle { idx, next, dx, dy } => {
            if let Some(id) = pick(&ids, idx) {
                let side = if next { HandleSide::Next } else { HandleSide::Prev };
                let p = net.node_position(id).unwrap();
                net.set_handle_position(HandleRef { node: id, side }, p + Vec2::new(dx as f32 * 0.1, dy as f32 * 0.1));
            }
        }
        Op::Remove { idx } => {
            if let Some(id) = pick(&ids, idx) {
                net.remove_node(id);
            }
        }
        Op::Connect { a, b } => {
            if let (Some(a), Some(b)) = (pick(&ids, a), pick(&ids, b)) {
                net.connect_nodes(a, b);
            }
        }
        Op::Disconnect { idx } => {
            if let Some(id) = pick(&ids, idx) {
                let sid = net.spline_of(id).unwrap();
                let nodes = net.nodes_of(sid).unwrap().to_vec();
                let i = nodes.iter().position(|&n| n == id).unwrap();
                if let Some(&other) = nodes.get(i + 1) {
                    net.disconnect_nodes(id, other);
                }
            }
        }
    }
}

fn check_invariants(net: &MultiSpline) -> Result<(), TestCaseError> {
    let mut seen = 0u32;
    let mut segments = 0u32;
    for (sid, s) in net.splines() {
        let n = s.node_count();
        prop_assert!(n >= 1, "empty spline {} kept", sid);
        let expected = match (n, s.is_closed()) {
            (1, _) => 0,
            (n, true) => n,
            (n, false) => n - 1,
        };
        prop_assert_eq!(s.segments().len(), expected);
        prop_assert!(!(s.is_closed() && n < 2));
        segments += expected as u32;
        for (i, &id) in s.nodes().iter().enumerate() {
            let node = net.node(id).expect("listed node exists");
            seen += 1;
            prop_assert_eq!(node.spline, sid);
            prop_assert_eq!(node.is_first, !s.is_closed() && i == 0);
            prop_assert_eq!(node.is_last, !s.is_closed() && i + 1 == n);
        }
        for (i, seg) in s.segments().iter().enumerate() {
            let from = s.nodes()[i];
            let to = s.nodes()[(i + 1) % n];
            prop_assert_eq!((seg.from, seg.to), (from, to));
            prop_assert_eq!(seg.evaluate(0.0), net.node_position(from).unwrap());
            prop_assert_eq!(seg.evaluate(1.0), net.node_position(to).unwrap());
            let b = s.aabb().expect("spline with segments has a box").inflate(1e-3);
            let hull = seg.aabb().inflate(1e-3);
            for l in seg.lines() {
                prop_assert!(hull.contains(l.from) && hull.contains(l.to));
                prop_assert!(b.contains(l.from));
            }
        }
        if !s.is_closed() && expected > 0 {
            prop_assert_eq!(net.evaluate(sid, 0.0), net.node_position(s.nodes()[0]));
            prop_assert_eq!(net.evaluate(sid, (n - 1) as f32), net.node_position(s.nodes()[n - 1]));
        }
    }
    prop_assert_eq!(seen, net.node_count());
    prop_assert_eq!(segments, net.segment_count());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn random_edits_keep_topology_consistent(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut net = MultiSpline::new();
        for op in ops {
            apply_op(&mut net, op);
            check_invariants(&net)?;
        }
    }

    #[test]
    fn nearest_is_minimal_after_edits(
        ops in proptest::collection::vec(op_strategy(), 1..40),
        px in -1000i16..1000,
        py in -1000i16..1000,
    ) {
        let mut net = MultiSpline::new();
        for op in ops {
            apply_op(&mut net, op);
        }
        let p = Vec2::new(px as f32 * 0.05, py as f32 * 0.05);
        if let Some(hit) = net.nearest(p) {
            for (_, s) in net.splines() {
                for seg in s.segments() {
                    for l in seg.lines() {
                        let slack = 1e-3 * hit.dist_sq.max(1.0);
                        prop_assert!(hit.dist_sq <= p.distance_sq(l.from) + slack);
                        prop_assert!(hit.dist_sq <= p.distance_sq(l.to) + slack);
                    }
                }
            }
        } else {
            prop_assert_eq!(net.segment_count(), 0);
        }
    }

    #[test]
    fn contacts_never_go_backwards(
        ops in proptest::collection::vec(op_strategy(), 1..30),
        fx in -500i16..500, fy in -500i16..500,
        tx in -500i16..500, ty in -500i16..500,
        r in 1u8..40,
    ) {
        let mut net = MultiSpline::new();
        for op in ops {
            apply_op(&mut net, op);
        }
        let from = Vec2::new(fx as f32 * 0.1, fy as f32 * 0.1);
        let to = Vec2::new(tx as f32 * 0.1, ty as f32 * 0.1);
        if let Some(c) = net.collide(from, to, r as f32 * 0.1) {
            prop_assert!((0.0..=1.0).contains(&c.t));
            prop_assert!(c.normal.is_finite() && c.point.is_finite());
            prop_assert!((c.normal.length() - 1.0).abs() < 1e-3);
        }
    }
}
