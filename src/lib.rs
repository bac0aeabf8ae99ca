use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Editable spline network exposed to JS.
#[wasm_bindgen]
pub struct SplineNet { pub(crate) inner: curvenet::MultiSpline }

/// Circle body stepped through a [`SplineNet`].
#[wasm_bindgen]
pub struct Circle { pub(crate) inner: curvenet::Body }

impl SplineNet {
    pub fn rs_new() -> SplineNet { SplineNet { inner: curvenet::MultiSpline::new() } }
    pub fn rs_geom_version(&self) -> u64 { self.inner.geom_version() }
    pub fn rs_inner(&self) -> &curvenet::MultiSpline { &self.inner }
}
