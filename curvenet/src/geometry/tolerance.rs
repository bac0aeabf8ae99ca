// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_DENOM: f32 = 1e-8;          // denominator guard for ratios

// Separation kept between a resolved circle and the boundary after a bounce
pub const SKIN: f32 = 1e-4;

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }

/// Parameter at which the linear ramp from `a` to `b` reaches `v`.
/// `None` when the ramp is flat.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> Option<f32> {
    let den = b - a;
    if den.abs() <= EPS_DENOM { None } else { Some((v - a) / den) }
}
