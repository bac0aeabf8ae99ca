use curvenet::{MultiSpline, Vec2};
use std::time::Instant;

/// Rows of wavy open splines, `per_row` nodes each.
fn build_waves(rows: usize, per_row: usize) -> MultiSpline {
    let mut net = MultiSpline::new();
    for j in 0..rows {
        let y = j as f32 * 12.0;
        let Some(mut last) = net.add_node(Vec2::new(0.0, y)) else { continue };
        for i in 1..per_row {
            let wobble = if i % 2 == 0 { 2.0 } else { -2.0 };
            match net.add_node_connected(Vec2::new(i as f32 * 8.0, y + wobble), last) {
                Some(id) => last = id,
                None => break,
            }
        }
    }
    net
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut rows = 40usize;
    let mut per_row = 60usize;
    let mut sweeps = 10000usize;
    let mut radius = 1.5f32;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--rows=") { if let Ok(v)=val.parse() { rows=v; } }
        else if let Some(val)=a.strip_prefix("--per-row=") { if let Ok(v)=val.parse() { per_row=v; } }
        else if let Some(val)=a.strip_prefix("--sweeps=") { if let Ok(v)=val.parse() { sweeps=v; } }
        else if let Some(val)=a.strip_prefix("--radius=") { if let Ok(v)=val.parse() { radius=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let net = build_waves(rows, per_row);
    let _ = net.nearest(Vec2::new(1.0, 1.0));

    // Vertical drops through the rows, cycling across the width.
    let width = per_row.max(2) as f32 * 8.0;
    let mut times_ms: Vec<f64> = Vec::with_capacity(sweeps);
    let start_all = Instant::now();
    let mut hits = 0usize;
    let mut bounces = 0usize;
    for k in 0..sweeps {
        let x = (k as f32 * 3.7) % width;
        let y = ((k / 100) % rows.max(1)) as f32 * 12.0 + 6.0;
        let from = Vec2::new(x, y);
        let to = Vec2::new(x + 1.3, y - 9.0);
        let t0 = Instant::now();
        if net.collide(from, to, radius).is_some() { hits += 1; }
        bounces += net.move_circle(from, to, radius, to - from).contacts.len();
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a, b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("splines={} segments={} sweeps={} radius={} hits={} bounces={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}",
        net.spline_count(), net.segment_count(), sweeps, radius, hits, bounces, dur_all, med, p90, p99);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
