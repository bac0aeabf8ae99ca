use crate::interop::{new_obj, set_kv};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

/// `{ ok: false, error: { code, message, data? } }`; also logged as a console warning.
pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let message = message.into();
    web_sys::console::warn_1(&JsValue::from_str(&format!("curvenet: {}: {}", code, message)));
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

/// Map a core strict-call error straight through.
pub fn from_strict(e: curvenet::StrictError) -> JsValue { err(e.0, e.1, None) }

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f32, max: f32, got: f32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min as f64));
    set_kv(&d, "max", &JsValue::from_f64(max as f64));
    set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_side(got: u8) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_f64(got as f64));
    err("invalid_side", "side must be 0:Prev or 1:Next", Some(d.into()))
}

#[inline]
pub fn inner_node(id: u32) -> JsValue {
    let d = new_obj(); set_kv(&d, "node", &JsValue::from_f64(id as f64));
    err("inner_node", "node is not an endpoint of an open spline", Some(d.into()))
}

/// Reject the first non-finite value among `(name, value)` pairs.
pub fn check_finite(params: &[(&str, f32)]) -> Result<(), JsValue> {
    match params.iter().find(|(_, v)| !v.is_finite()) {
        Some((name, _)) => Err(non_finite(name)),
        None => Ok(()),
    }
}
