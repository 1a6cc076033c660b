use crate::interop::{new_obj, set_bool, set_kv, set_num, set_str};
use graphedit::{ConfigError, GraphError, Target};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_bool(&o, "ok", true);
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_bool(&root, "ok", false);
    let e = new_obj();
    set_str(&e, "code", code);
    set_str(&e, "message", &message.into());
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_str(&d, "param", param);
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_button(got: u8) -> JsValue {
    let d = new_obj(); set_num(&d, "got", got as f64);
    err("invalid_button", "button must be 0:Left, 1:Middle, 2:Right", Some(d.into()))
}

#[inline]
pub fn invalid_mode(got: &str) -> JsValue {
    let d = new_obj(); set_str(&d, "got", got);
    err("invalid_mode", "mode must be one of node, edge, delete, modify", Some(d.into()))
}

pub fn from_config(e: &ConfigError) -> JsValue {
    let data = match e {
        ConfigError::NotPositive { param } => {
            let d = new_obj(); set_str(&d, "param", param);
            Some(d.into())
        }
        ConfigError::Json(_) => None,
    };
    err(e.code(), e.to_string(), data)
}

/// Envelope for an engine error, keyed by its stable code.
pub fn from_graph(e: &GraphError) -> JsValue {
    let data = match e {
        GraphError::NotFound(t) | GraphError::AlreadyExists(t) => Some(target_data(t)),
        _ => None,
    };
    err(e.code(), e.to_string(), data)
}

fn target_data(t: &Target) -> JsValue {
    let d = new_obj();
    match t {
        Target::Node(id) => {
            set_str(&d, "kind", "node");
            set_num(&d, "id", id.0 as f64);
        }
        Target::Edge(key) => {
            let (u, v) = key.endpoints();
            set_str(&d, "kind", "edge");
            set_num(&d, "u", u.0 as f64);
            set_num(&d, "v", v.0 as f64);
        }
    }
    d.into()
}
