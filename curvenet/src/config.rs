use crate::geometry::limits::{MAX_BOUNCES_CAP, MAX_LINE_COUNT, MAX_SELECT_RADIUS, MIN_LINE_COUNT};
use crate::geometry::tolerance::clamp01;
use serde::{Deserialize, Serialize};

/// Tunables shared by topology edits and queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineConfig {
    /// Straight lines sampled per segment for nearest/collision tests.
    pub line_count: u32,
    /// Hit radius of nodes and handles for selection.
    pub select_radius: f32,
    /// Handle length given to a node that has no neighbours yet.
    pub default_handle_length: f32,
    /// Re-sweeps allowed in one `move_circle` call.
    pub max_bounces: u32,
    /// Fraction of speed kept by a bounce, 0..=1.
    pub restitution: f32,
}

impl Default for SplineConfig {
    fn default() -> Self {
        SplineConfig {
            line_count: 8,
            select_radius: 0.25,
            default_handle_length: 1.0,
            max_bounces: 8,
            restitution: 1.0,
        }
    }
}

impl SplineConfig {
    /// Clamp every field into its supported range; non-finite floats fall back to defaults.
    pub fn sanitized(self) -> Self {
        let d = SplineConfig::default();
        let finite_or = |v: f32, fallback: f32| if v.is_finite() { v } else { fallback };
        SplineConfig {
            line_count: self.line_count.clamp(MIN_LINE_COUNT, MAX_LINE_COUNT),
            select_radius: finite_or(self.select_radius, d.select_radius).clamp(0.0, MAX_SELECT_RADIUS),
            default_handle_length: finite_or(self.default_handle_length, d.default_handle_length).max(0.0),
            max_bounces: self.max_bounces.min(MAX_BOUNCES_CAP),
            restitution: clamp01(finite_or(self.restitution, d.restitution)),
        }
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    pub fn from_json_value(v: serde_json::Value) -> Result<Self, (&'static str, String)> {
        if !v.is_object() {
            return Err(("invalid_config", "config must be a JSON object".to_string()));
        }
        serde_json::from_value::<SplineConfig>(v)
            .map(SplineConfig::sanitized)
            .map_err(|e| ("invalid_config", e.to_string()))
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
