use crate::geometry::tolerance::clamp01;
use crate::model::Vec2;

/// Squared distance from `p` to segment `ab` and the clamped parameter of the foot.
pub fn seg_distance_sq(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let v = b - a;
    let w = p - a;
    let vv = v.length_sq();
    let t = if vv > 0.0 { clamp01(w.dot(v) / vv) } else { 0.0 };
    let proj = a + v * t;
    (p.distance_sq(proj), t)
}

/// Foot of the perpendicular from `p` onto the infinite line through `origin`
/// with unit direction `dir`, as (signed offset along `dir`, foot point).
#[inline]
pub fn project_on_line(p: Vec2, origin: Vec2, dir: Vec2) -> (f32, Vec2) {
    let s = (p - origin).dot(dir);
    (s, origin + dir * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_clamps_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        let (d2, t) = seg_distance_sq(Vec2::new(5.0, 3.0), a, b);
        assert!((d2 - 9.0).abs() < 1e-6);
        assert!((t - 0.5).abs() < 1e-6);
        let (d2, t) = seg_distance_sq(Vec2::new(-4.0, 3.0), a, b);
        assert!((d2 - 25.0).abs() < 1e-6);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn degenerate_segment_measures_to_point() {
        let a = Vec2::new(1.0, 1.0);
        let (d2, t) = seg_distance_sq(Vec2::new(4.0, 5.0), a, a);
        assert!((d2 - 25.0).abs() < 1e-6);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn line_projection_is_unclamped() {
        let (s, foot) = project_on_line(Vec2::new(-3.0, 2.0), Vec2::ZERO, Vec2::X);
        assert_eq!(s, -3.0);
        assert_eq!(foot, Vec2::new(-3.0, 0.0));
    }
}
