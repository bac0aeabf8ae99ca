use crate::model::Selection;
use crate::model::Vec2;
use crate::MultiSpline;

/// Hit-test splines in id order and return the first node or visible handle
/// within the configured select radius.
pub fn select_impl(net: &MultiSpline, pos: Vec2, include_handles: bool) -> Option<Selection> {
    if !pos.is_finite() {
        return None;
    }
    let radius = net.config().select_radius;
    net.splines().find_map(|(_, s)| s.select(&net.nodes, pos, radius, include_handles))
}
