use js_sys::{Float64Array, Object, Reflect, Uint32Array};
use wasm_bindgen::JsValue;

/// Plain `{}` for envelopes and render payloads.
pub fn new_obj() -> Object { Object::new() }

// Every target is a fresh `new_obj()`, which is never frozen or proxied, so
// `Reflect::set` cannot fail here.
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn set_str(obj: &Object, k: &str, v: &str) { set_kv(obj, k, &JsValue::from_str(v)) }
pub fn set_num(obj: &Object, k: &str, v: f64) { set_kv(obj, k, &JsValue::from_f64(v)) }
pub fn set_bool(obj: &Object, k: &str, v: bool) { set_kv(obj, k, &JsValue::from_bool(v)) }

/// Node ids and edge endpoints.
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
/// Interleaved positions and edge weights, kept at full precision.
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
