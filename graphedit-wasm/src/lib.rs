use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

/// Browser-facing handle around one editing session.
#[wasm_bindgen]
pub struct Editor {
    pub(crate) inner: graphedit::EditSession,
}

impl Editor {
    pub fn rs_new() -> Editor {
        Editor { inner: graphedit::EditSession::default() }
    }
    pub fn rs_with_config(config: graphedit::EditorConfig) -> Editor {
        Editor { inner: graphedit::EditSession::new(config) }
    }
}
