// Centralized bounds for configuration and untrusted coordinates

// Polyline approximation per segment
pub const MIN_LINE_COUNT: u32 = 1;
pub const MAX_LINE_COUNT: u32 = 256;

// Bounce iterations per move
pub const MAX_BOUNCES_CAP: u32 = 64;

// Hit radius for node/handle selection
pub const MAX_SELECT_RADIUS: f32 = 1_000.0;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_point_bounds(x: f32, y: f32) -> bool { in_coord_bounds(x) && in_coord_bounds(y) }
