use crate::error;
use crate::interop::{arr_f64, arr_u32, new_obj, set_kv, set_num, set_str};
use crate::Editor;
use graphedit::{
    Attributes, Button, Buttons, EdgeKey, EditorConfig, InputEvent, Key, Mode, NodeId, Overlay,
    Pick, Response, Vec2,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// DOM `MouseEvent.button` numbering
fn button_from_dom(b: u8) -> Option<Button> {
    match b {
        0 => Some(Button::Left),
        1 => Some(Button::Middle),
        2 => Some(Button::Right),
        _ => None,
    }
}

fn check_point(x: f64, y: f64) -> Result<Vec2, JsValue> {
    if !x.is_finite() {
        return Err(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Err(error::non_finite("y"));
    }
    Ok(Vec2::new(x, y))
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        crate::Editor::rs_new()
    }

    /// Builds an editor from a JSON `EditorConfig`; missing fields default.
    pub fn with_config(config_json: &str) -> Result<Editor, JsValue> {
        match EditorConfig::from_json_str(config_json) {
            Ok(cfg) => Ok(crate::Editor::rs_with_config(cfg)),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                Err(error::from_config(&e))
            }
        }
    }

    // Input events. Points are canvas pixels.
    pub fn pointer_down_res(&mut self, x: f64, y: f64, button: u8) -> JsValue {
        let point = match check_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let button = match button_from_dom(button) {
            Some(b) => b,
            None => return error::invalid_button(button),
        };
        self.inner.handle(InputEvent::PointerDown { point, button });
        error::ok(JsValue::NULL)
    }
    /// `buttons` is the DOM `MouseEvent.buttons` bitmask.
    pub fn pointer_drag_res(&mut self, x: f64, y: f64, dx: f64, dy: f64, buttons: u8) -> JsValue {
        let point = match check_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        if !dx.is_finite() {
            return error::non_finite("dx");
        }
        if !dy.is_finite() {
            return error::non_finite("dy");
        }
        self.inner.handle(InputEvent::PointerDrag {
            point,
            delta: Vec2::new(dx, dy),
            buttons: Buttons::from_bits(buttons),
        });
        error::ok(JsValue::NULL)
    }
    pub fn pointer_up_res(&mut self, x: f64, y: f64, button: u8) -> JsValue {
        let point = match check_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let button = match button_from_dom(button) {
            Some(b) => b,
            None => return error::invalid_button(button),
        };
        self.inner.handle(InputEvent::PointerUp { point, button });
        error::ok(JsValue::NULL)
    }
    pub fn scroll_res(&mut self, delta: f64) -> JsValue {
        if !delta.is_finite() {
            return error::non_finite("delta");
        }
        self.inner.handle(InputEvent::Scroll { delta });
        error::ok(JsValue::NULL)
    }
    pub fn key_down(&mut self, name: &str) {
        self.inner.handle(InputEvent::KeyDown { key: Key::from_name(name) });
    }
    /// Returns true when the host should close the editor.
    pub fn key_up(&mut self, name: &str) -> bool {
        let r = self.inner.handle(InputEvent::KeyUp { key: Key::from_name(name) });
        r == Response::Quit
    }
    pub fn focus_lost(&mut self) {
        self.inner.handle(InputEvent::FocusLost);
    }

    // Direct operations
    pub fn mode(&self) -> String {
        self.inner.mode().as_str().to_string()
    }
    pub fn set_mode_res(&mut self, name: &str) -> JsValue {
        let mode = match Mode::from_name(name) {
            Some(m) => m,
            None => return error::invalid_mode(name),
        };
        match self.inner.set_mode(mode) {
            Ok(()) => error::ok(JsValue::from_str(mode.as_str())),
            Err(e) => error::from_graph(&e),
        }
    }
    /// Adds a node at world coordinates.
    pub fn add_node_res(&mut self, x: f64, y: f64) -> JsValue {
        let p = match check_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        match self.inner.add_node(p, Attributes::new()) {
            Ok(id) => error::ok(JsValue::from_f64(id.0 as f64)),
            Err(e) => error::from_graph(&e),
        }
    }
    /// `ok(true)` when an edge was created, `ok(false)` for a duplicate or
    /// self-loop.
    pub fn connect_res(&mut self, u: u32, v: u32) -> JsValue {
        match self.inner.connect(NodeId(u), NodeId(v)) {
            Ok(created) => error::ok(JsValue::from_bool(created.is_some())),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn delete_node_res(&mut self, id: u32) -> JsValue {
        match self.inner.delete_node(NodeId(id)) {
            Ok(()) => error::ok(JsValue::NULL),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn delete_edge_res(&mut self, u: u32, v: u32) -> JsValue {
        let key = match EdgeKey::new(NodeId(u), NodeId(v)) {
            Some(k) => k,
            None => return error::err("invalid_edge", "edge endpoints cannot be the same node", None),
        };
        match self.inner.delete_edge(key) {
            Ok(()) => error::ok(JsValue::NULL),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn undo_res(&mut self) -> JsValue {
        match self.inner.undo() {
            Ok(label) => error::ok(JsValue::from_str(label)),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn redo_res(&mut self) -> JsValue {
        match self.inner.redo() {
            Ok(label) => error::ok(JsValue::from_str(label)),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn can_undo(&self) -> bool {
        self.inner.history().can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.history().can_redo()
    }

    /// Hit test at canvas coordinates; `ok(null)` when nothing is hit.
    pub fn pick_res(&self, x: f64, y: f64) -> JsValue {
        let p = match check_point(x, y) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let s = &self.inner;
        let hit = match s.query().pick(s.store(), s.view(), p) {
            Some(h) => h,
            None => return error::ok(JsValue::NULL),
        };
        let obj = new_obj();
        match hit {
            Pick::Node { id, dist } => {
                set_str(&obj, "kind", "node");
                set_num(&obj, "id", id.0 as f64);
                set_num(&obj, "dist", dist);
            }
            Pick::Edge { key, dist } => {
                let (u, v) = key.endpoints();
                set_str(&obj, "kind", "edge");
                set_num(&obj, "u", u.0 as f64);
                set_num(&obj, "v", v.0 as f64);
                set_num(&obj, "dist", dist);
            }
        }
        error::ok(obj.into())
    }

    // Interchange
    /// `ok(text)` with the version-1 interchange document.
    pub fn export_json_res(&mut self) -> JsValue {
        match self.inner.export() {
            Ok(bytes) => error::ok(JsValue::from_str(&String::from_utf8_lossy(&bytes))),
            Err(e) => error::from_graph(&e),
        }
    }
    pub fn import_json_res(&mut self, text: &str) -> JsValue {
        match self.inner.import(text.as_bytes()) {
            Ok(()) => error::ok(JsValue::from_f64(self.inner.store().node_count() as f64)),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                error::from_graph(&e)
            }
        }
    }

    // Render state
    pub fn node_count(&self) -> u32 {
        self.inner.store().node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.store().edge_count() as u32
    }
    pub fn get_node_data(&self) -> JsValue {
        let (ids, pos) = self.inner.store().node_arrays();
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let (endpoints, weights) = self.inner.store().edge_arrays();
        let obj = new_obj();
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        set_kv(&obj, "weights", &arr_f64(&weights).into());
        obj.into()
    }
    /// `{offset: {x, y}, scale}`
    pub fn view(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.view()).unwrap_or(JsValue::NULL)
    }
    pub fn selection(&self) -> Option<u32> {
        self.inner.selection().map(|id| id.0)
    }
    pub fn status(&self) -> String {
        self.inner.status().to_string()
    }
    /// Text of the overlay currently held open, if any.
    pub fn overlay_text(&self) -> Option<String> {
        self.inner.overlay().map(|o| match o {
            Overlay::Help => self.inner.help_text().to_string(),
            Overlay::Info => self.inner.info_text(),
        })
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}
