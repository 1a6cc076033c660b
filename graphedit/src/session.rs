//! Interaction orchestration.
//!
//! [`EditSession`] consumes input events in arrival order, resolves pointer
//! positions through [`SpatialQuery`], mutates the [`GraphStore`] and records
//! a [`CommandEntry`] for every mutation in the same step. Move gestures are
//! coalesced: intermediate drag deltas only update the position and the
//! whole gesture commits one `MoveNode` entry when it ends.

use crate::algorithms::picking::SpatialQuery;
use crate::config::EditorConfig;
use crate::error::{GraphError, Result};
use crate::geometry::limits;
use crate::history::{CommandEntry, CommandLog};
use crate::input::{self, Action, Button, InputEvent, Key, Overlay};
use crate::json;
use crate::model::{Attributes, EdgeKey, EdgeWeight, Mode, NodeId, NodeState, Pick, Vec2};
use crate::store::GraphStore;
use crate::view::ViewTransform;
use std::path::{Path, PathBuf};

/// What the host should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Response {
    Continue,
    Quit,
}

#[derive(Clone, Debug)]
struct MoveGesture {
    id: NodeId,
    before: NodeState,
    before_edges: Vec<EdgeWeight>,
}

pub struct EditSession {
    store: GraphStore,
    query: SpatialQuery,
    log: CommandLog,
    view: ViewTransform,
    config: EditorConfig,
    mode: Mode,
    selection: Option<NodeId>,
    gesture: Option<MoveGesture>,
    zoom_step: f64,
    overlay: Option<Overlay>,
    status: String,
}

impl Default for EditSession {
    fn default() -> Self {
        EditSession::new(EditorConfig::default())
    }
}

impl EditSession {
    pub fn new(config: EditorConfig) -> Self {
        let query = SpatialQuery::new(config.node_pick_radius_px, config.edge_pick_threshold_px);
        let view = ViewTransform::new(Vec2::ZERO, config.base_scale);
        EditSession::from_parts(GraphStore::new(), query, CommandLog::new(), view, config)
    }

    /// Assembles a session around injected collaborators.
    pub fn from_parts(
        store: GraphStore,
        query: SpatialQuery,
        log: CommandLog,
        view: ViewTransform,
        config: EditorConfig,
    ) -> Self {
        EditSession {
            store,
            query,
            log,
            view,
            config,
            mode: Mode::Node,
            selection: None,
            gesture: None,
            zoom_step: 0.0,
            overlay: None,
            status: "Press 'h' for help".to_string(),
        }
    }

    // Read-only view for the render collaborator
    pub fn store(&self) -> &GraphStore {
        &self.store
    }
    pub fn history(&self) -> &CommandLog {
        &self.log
    }
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }
    pub fn query(&self) -> &SpatialQuery {
        &self.query
    }
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }
    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }
    pub fn status(&self) -> &str {
        &self.status
    }
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn info_text(&self) -> String {
        format!(
            "Info\n\nNumber of nodes: {}\nNumber of edges: {}",
            self.store.node_count(),
            self.store.edge_count()
        )
    }

    pub fn help_text(&self) -> &'static str {
        input::HELP_TEXT
    }

    /// Dispatches one input event. Faults are reported through the status
    /// line and logged; they never abort the session.
    pub fn handle(&mut self, event: InputEvent) -> Response {
        let outcome = match event {
            InputEvent::PointerDown { point, button } => self.on_pointer_down(point, button),
            InputEvent::PointerDrag { delta, buttons, .. } => {
                if buttons.contains(Button::Right) {
                    self.view.pan(delta);
                    Ok(())
                } else if buttons.contains(Button::Left) && self.mode == Mode::Modify {
                    match self.selection {
                        Some(id) => self.drag_node(id, delta),
                        None => Ok(()),
                    }
                } else {
                    Ok(())
                }
            }
            InputEvent::PointerUp { point, button } => self.on_pointer_up(point, button),
            InputEvent::KeyDown { key } => {
                if let Some(o) = input::overlay_for_key_down(key) {
                    self.overlay = Some(o);
                }
                Ok(())
            }
            InputEvent::KeyUp { key } => return self.on_key_up(key),
            InputEvent::Scroll { delta } => {
                self.zoom(delta);
                Ok(())
            }
            InputEvent::FocusLost => {
                self.overlay = None;
                self.end_gesture().map(|_| ())
            }
        };
        if let Err(e) = outcome {
            self.report(e);
        }
        Response::Continue
    }

    fn on_pointer_down(&mut self, point: Vec2, button: Button) -> Result<()> {
        // a release we never saw still ends the previous gesture
        self.end_gesture()?;
        if button == Button::Left && self.mode == Mode::Modify {
            self.selection = self.query.pick_node(&self.store, &self.view, point);
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, point: Vec2, button: Button) -> Result<()> {
        if button != Button::Left {
            return Ok(());
        }
        let result = match self.mode {
            Mode::Node => match self.query.pick_node(&self.store, &self.view, point) {
                Some(id) => {
                    self.selection = Some(id);
                    Ok(())
                }
                None => {
                    let world = self.view.to_world(point);
                    self.add_node(world, Attributes::new()).map(|_| ())
                }
            },
            Mode::Edge => match self.query.pick_node(&self.store, &self.view, point) {
                Some(id) => self.click_node_in_edge_mode(id),
                None => Ok(()),
            },
            Mode::Delete => match self.query.pick(&self.store, &self.view, point) {
                Some(Pick::Node { id, .. }) => self.delete_node(id),
                Some(Pick::Edge { key, .. }) => self.delete_edge(key),
                None => Ok(()),
            },
            Mode::Modify => Ok(()),
        };
        // the gesture commits even if the click action failed
        let committed = self.end_gesture();
        result.and(committed.map(|_| ()))
    }

    fn click_node_in_edge_mode(&mut self, id: NodeId) -> Result<()> {
        match self.selection {
            Some(sel) if sel == id => self.selection = None,
            None => self.selection = Some(id),
            Some(sel) => {
                self.connect(sel, id)?;
                self.selection = Some(id);
            }
        }
        Ok(())
    }

    fn on_key_up(&mut self, key: Key) -> Response {
        let action = match input::action_for_key_up(key) {
            Some(a) => a,
            None => return Response::Continue,
        };
        let outcome = match action {
            Action::SetMode(m) => self.set_mode(m),
            Action::Undo => self.undo().map(|_| ()),
            Action::Redo => self.redo().map(|_| ()),
            Action::Save => {
                let path = self.config.document_path.clone();
                self.save(&path)
            }
            Action::Load => {
                let path = self.config.document_path.clone();
                self.load(&path)
            }
            Action::ClearSelection => {
                self.selection = None;
                Ok(())
            }
            Action::HideOverlay => {
                self.overlay = None;
                Ok(())
            }
            Action::Quit => return Response::Quit,
        };
        if let Err(e) = outcome {
            self.report(e);
        }
        Response::Continue
    }

    // High-level operations. Each performs its mutation and history push
    // together or not at all, and commits any open gesture before either so
    // the log keeps event order.

    /// Adds a node at a world position and selects it.
    pub fn add_node(&mut self, position: Vec2, attributes: Attributes) -> Result<NodeId> {
        check_position(position)?;
        self.end_gesture()?;
        let id = self.store.add_node(position, attributes);
        if let Some(node) = self.store.node(id) {
            self.log.push(CommandEntry::AddNode { node: node.clone() });
        }
        self.selection = Some(id);
        Ok(id)
    }

    /// Connects two nodes. A duplicate pair or a self-loop is a no-op that
    /// records nothing and returns `Ok(None)`.
    pub fn connect(&mut self, u: NodeId, v: NodeId) -> Result<Option<EdgeKey>> {
        self.end_gesture()?;
        match self.store.add_edge(u, v, Attributes::new())? {
            Some(edge) => {
                let key = edge.key;
                self.log.push(CommandEntry::AddEdge { edge });
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }

    pub fn delete_node(&mut self, id: NodeId) -> Result<()> {
        self.end_gesture()?;
        let (node, incident) = self.store.remove_node(id)?;
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.log.push(CommandEntry::DeleteNode { node, incident });
        Ok(())
    }

    pub fn delete_edge(&mut self, key: EdgeKey) -> Result<()> {
        self.end_gesture()?;
        let edge = self.store.remove_edge(key)?;
        self.log.push(CommandEntry::DeleteEdge { edge });
        Ok(())
    }

    /// Moves `id` by a screen-space delta as part of the current gesture.
    /// Incident weights are left stale until the gesture ends. A step that
    /// would leave the editable area is rejected and the node stays put.
    pub fn drag_node(&mut self, id: NodeId, delta: Vec2) -> Result<()> {
        if self.gesture.as_ref().is_some_and(|g| g.id != id) {
            self.end_gesture()?;
        }
        let position = self
            .store
            .position(id)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        if self.gesture.is_none() {
            let before = self
                .store
                .node_state(id)
                .ok_or_else(|| GraphError::node_not_found(id))?;
            let before_edges = self.store.incident_weights(id);
            tracing::debug!(node = %id, degree = before_edges.len(), "move gesture started");
            self.gesture = Some(MoveGesture {
                id,
                before,
                before_edges,
            });
        }
        let step = Vec2::new(self.view.to_world_len(delta.x), self.view.to_world_len(delta.y));
        let target = position + step;
        check_position(target)?;
        self.store.set_node_position(id, target)
    }

    /// Ends the in-progress gesture: recomputes incident weights and commits
    /// one `MoveNode` entry unless the net displacement is zero. Returns
    /// whether an entry was committed.
    pub fn end_gesture(&mut self) -> Result<bool> {
        let gesture = match self.gesture.take() {
            Some(g) => g,
            None => return Ok(false),
        };
        self.store.recompute_incident_weights(gesture.id)?;
        let after = self
            .store
            .node_state(gesture.id)
            .ok_or_else(|| GraphError::node_not_found(gesture.id))?;
        if after.position == gesture.before.position {
            tracing::debug!(node = %gesture.id, "move gesture ended without displacement");
            return Ok(false);
        }
        let after_edges = self.store.incident_weights(gesture.id);
        self.log.push(CommandEntry::MoveNode {
            id: gesture.id,
            before: gesture.before,
            before_edges: gesture.before_edges,
            after,
            after_edges,
        });
        Ok(true)
    }

    /// Switching mode never mutates the graph; it ends any gesture first.
    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        let ended = self.end_gesture();
        self.mode = mode;
        ended.map(|_| ())
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.selection = id.filter(|id| self.store.contains_node(*id));
    }

    pub fn undo(&mut self) -> Result<&'static str> {
        self.end_gesture()?;
        let label = self.log.undo(&mut self.store)?.label();
        self.status = format!("'{}' operation undone", label);
        self.drop_stale_selection();
        Ok(label)
    }

    pub fn redo(&mut self) -> Result<&'static str> {
        self.end_gesture()?;
        let label = self.log.redo(&mut self.store)?.label();
        self.status = format!("'{}' operation redone", label);
        self.drop_stale_selection();
        Ok(label)
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selection {
            if !self.store.contains_node(id) {
                self.selection = None;
            }
        }
    }

    /// Zoom steps that would push the scale out of `MIN_SCALE..=MAX_SCALE`
    /// are dropped whole.
    fn zoom(&mut self, steps: f64) {
        let step = self.zoom_step + steps;
        let mut view = self.view;
        view.set_zoom(step, self.config.base_scale, self.config.zoom_factor);
        if !limits::in_scale_bounds(view.scale) {
            tracing::debug!(step, scale = view.scale, "zoom limit reached");
            return;
        }
        self.zoom_step = step;
        self.view = view;
    }

    // Persistence

    /// Serializes the graph after committing any open gesture, so exported
    /// weights are never stale.
    pub fn export(&mut self) -> Result<Vec<u8>> {
        self.end_gesture()?;
        let bytes = json::export_bytes(&self.store);
        let n = self.store.node_count();
        tracing::info!(nodes = n, edges = self.store.edge_count(), bytes = bytes.len(), "graph exported");
        self.status = format!("{} nodes exported ({:.1}k)", n, bytes.len() as f64 / 1000.0);
        Ok(bytes)
    }

    /// Replaces the graph wholesale. History and selection are cleared with
    /// it since old entries name ids foreign to the new store. On failure
    /// the graph is untouched and the error becomes the status message.
    pub fn import(&mut self, bytes: &[u8]) -> Result<()> {
        let store = self.parse_document(bytes)?;
        self.replace_store(store);
        let n = self.store.node_count();
        tracing::info!(nodes = n, edges = self.store.edge_count(), bytes = bytes.len(), "graph imported");
        self.status = format!("{} nodes imported ({:.1}k)", n, bytes.len() as f64 / 1000.0);
        Ok(())
    }

    fn parse_document(&mut self, bytes: &[u8]) -> Result<GraphStore> {
        json::import_bytes(bytes).map_err(|e| {
            tracing::warn!(code = e.code(), error = %e, "import rejected");
            self.status = e.to_string();
            e
        })
    }

    fn replace_store(&mut self, store: GraphStore) {
        self.gesture = None;
        self.store = store;
        self.log.clear();
        self.selection = None;
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.export()?;
        std::fs::write(path, &bytes)?;
        let n = self.store.node_count();
        tracing::info!(path = %path.display(), nodes = n, bytes = bytes.len(), "graph saved");
        self.status = format!(
            "{} nodes written to {} ({:.1}k)",
            n,
            path.display(),
            bytes.len() as f64 / 1000.0
        );
        Ok(())
    }

    pub fn load(&mut self, path: &Path) -> Result<()> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "graph file missing");
                self.status = format!("File {} not found", path.display());
                return Err(GraphError::Io(e));
            }
            Err(e) => return Err(e.into()),
        };
        let store = self.parse_document(&bytes)?;
        self.replace_store(store);
        let n = self.store.node_count();
        tracing::info!(path = %path.display(), nodes = n, edges = self.store.edge_count(), "graph loaded");
        self.status = format!(
            "{} nodes loaded from {} ({:.1}k)",
            n,
            path.display(),
            bytes.len() as f64 / 1000.0
        );
        Ok(())
    }

    pub fn document_path(&self) -> PathBuf {
        self.config.document_path.clone()
    }

    fn report(&mut self, err: GraphError) {
        match &err {
            GraphError::EmptyHistory(_) => {
                tracing::debug!(error = %err, "history boundary");
            }
            GraphError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // status already names the missing file
                return;
            }
            GraphError::Parse(_) => {
                // logged and shown where the document was rejected
                return;
            }
            _ => tracing::warn!(code = err.code(), error = %err, "edit operation failed"),
        }
        self.status = err.to_string();
    }
}

fn check_position(p: Vec2) -> Result<()> {
    if limits::in_position_bounds(p.x, p.y) {
        Ok(())
    } else {
        Err(GraphError::OutOfBounds { x: p.x, y: p.y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Buttons;

    fn session() -> EditSession {
        let config = EditorConfig {
            base_scale: 1.0,
            ..EditorConfig::default()
        };
        EditSession::new(config)
    }

    fn click(s: &mut EditSession, x: f64, y: f64) {
        let point = Vec2::new(x, y);
        s.handle(InputEvent::PointerDown { point, button: Button::Left });
        s.handle(InputEvent::PointerUp { point, button: Button::Left });
    }

    fn key(s: &mut EditSession, c: char) -> Response {
        s.handle(InputEvent::KeyDown { key: Key::Char(c) });
        s.handle(InputEvent::KeyUp { key: Key::Char(c) })
    }

    #[test]
    fn node_mode_click_adds_and_selects() {
        let mut s = session();
        click(&mut s, 10.0, 10.0);
        assert_eq!(s.store().node_count(), 1);
        assert_eq!(s.selection(), Some(NodeId(0)));
        assert_eq!(s.history().len(), 1);
        // clicking the node again selects without adding
        s.select(None);
        click(&mut s, 12.0, 10.0);
        assert_eq!(s.store().node_count(), 1);
        assert_eq!(s.selection(), Some(NodeId(0)));
    }

    #[test]
    fn edge_mode_connects_selected_to_clicked() {
        let mut s = session();
        click(&mut s, 0.0, 0.0);
        click(&mut s, 100.0, 0.0);
        key(&mut s, 'e');
        assert_eq!(s.mode(), Mode::Edge);
        s.select(None);
        click(&mut s, 0.0, 0.0);
        assert_eq!(s.selection(), Some(NodeId(0)));
        click(&mut s, 100.0, 0.0);
        assert_eq!(s.store().edge_count(), 1);
        assert_eq!(s.selection(), Some(NodeId(1)));
        // clicking the selected node deselects it
        click(&mut s, 100.0, 0.0);
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn delete_mode_removes_node_before_edge() {
        let mut s = session();
        let a = s.add_node(Vec2::new(0.0, 0.0), Attributes::new()).unwrap();
        let b = s.add_node(Vec2::new(100.0, 0.0), Attributes::new()).unwrap();
        s.connect(a, b).unwrap();
        s.set_mode(Mode::Delete).unwrap();
        click(&mut s, 50.0, 1.0);
        assert_eq!(s.store().edge_count(), 0);
        assert_eq!(s.store().node_count(), 2);
        click(&mut s, 1.0, 0.0);
        assert_eq!(s.store().node_count(), 1);
        click(&mut s, 300.0, 300.0);
        assert_eq!(s.history().len(), 5);
    }

    #[test]
    fn right_drag_pans_and_scroll_zooms() {
        let mut s = session();
        s.handle(InputEvent::PointerDrag {
            point: Vec2::new(5.0, 5.0),
            delta: Vec2::new(5.0, -2.0),
            buttons: Buttons::RIGHT,
        });
        assert_eq!(s.view().offset, Vec2::new(5.0, -2.0));
        s.handle(InputEvent::Scroll { delta: 1.0 });
        assert!((s.view().scale - 1.2).abs() < 1e-12);
        assert!(s.history().is_empty());
    }

    #[test]
    fn overlays_follow_key_hold() {
        let mut s = session();
        s.handle(InputEvent::KeyDown { key: Key::Char('i') });
        assert_eq!(s.overlay(), Some(Overlay::Info));
        assert!(s.info_text().contains("Number of nodes: 0"));
        s.handle(InputEvent::KeyUp { key: Key::Char('i') });
        assert_eq!(s.overlay(), None);
        assert_eq!(key(&mut s, 'q'), Response::Quit);
    }

    #[test]
    fn undo_at_boundary_reports_status() {
        let mut s = session();
        key(&mut s, 'z');
        assert_eq!(s.status(), "There is no previous history");
        key(&mut s, 'y');
        assert_eq!(s.status(), "Already at newest change");
        click(&mut s, 0.0, 0.0);
        key(&mut s, 'z');
        assert_eq!(s.status(), "'add node' operation undone");
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn extreme_scroll_keeps_scale_finite() {
        let mut s = session();
        s.handle(InputEvent::Scroll { delta: -5000.0 });
        assert_eq!(s.view().scale, 1.0);
        s.handle(InputEvent::Scroll { delta: 5000.0 });
        assert_eq!(s.view().scale, 1.0);
        s.handle(InputEvent::Scroll { delta: -2.0 });
        assert!(limits::in_scale_bounds(s.view().scale) && s.view().scale < 1.0);

        click(&mut s, 40.0, 40.0);
        let p = s.store().position(NodeId(0)).unwrap();
        assert!(p.is_finite());
        let bytes = s.export().unwrap();
        assert!(s.import(&bytes).is_ok());
        let q = s.store().position(NodeId(0)).unwrap();
        assert!((q.x - p.x).abs() < 1e-9 && (q.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn positions_outside_editable_area_are_rejected() {
        let mut s = session();
        let far = Vec2::new(limits::COORD_MAX * 2.0, 0.0);
        assert!(matches!(s.add_node(far, Attributes::new()), Err(GraphError::OutOfBounds { .. })));
        assert!(s.history().is_empty());

        let a = s.add_node(Vec2::new(limits::COORD_MAX, 0.0), Attributes::new()).unwrap();
        let err = s.drag_node(a, Vec2::new(1.0, 0.0)).unwrap_err();
        assert_eq!(err.code(), "out_of_bounds");
        assert_eq!(s.store().position(a), Some(Vec2::new(limits::COORD_MAX, 0.0)));
        assert_eq!(s.end_gesture().unwrap(), false);
    }

    #[test]
    fn import_and_export_report_status() {
        let mut s = session();
        s.add_node(Vec2::new(1.0, 2.0), Attributes::new()).unwrap();
        let bytes = s.export().unwrap();
        assert!(s.status().starts_with("1 nodes exported"), "{}", s.status());

        assert!(s.import(b"{\"version\": 3, \"nodes\": []}").is_err());
        assert_eq!(s.status(), "parse error: unsupported document version 3");
        assert_eq!(s.store().node_count(), 1);

        s.import(&bytes).unwrap();
        assert!(s.status().starts_with("1 nodes imported"), "{}", s.status());
    }

    #[test]
    fn export_commits_open_gesture() {
        let mut s = session();
        let a = s.add_node(Vec2::new(0.0, 0.0), Attributes::new()).unwrap();
        let b = s.add_node(Vec2::new(3.0, 0.0), Attributes::new()).unwrap();
        s.connect(a, b).unwrap();
        s.drag_node(a, Vec2::new(0.0, 4.0)).unwrap();
        let bytes = s.export().unwrap();
        assert!(!s.is_dragging());
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["edges"][0]["weight"], serde_json::json!(5.0));
    }

    #[test]
    fn mode_switch_commits_abandoned_drag() {
        let mut s = session();
        let a = s.add_node(Vec2::new(0.0, 0.0), Attributes::new()).unwrap();
        s.set_mode(Mode::Modify).unwrap();
        s.handle(InputEvent::PointerDown { point: Vec2::ZERO, button: Button::Left });
        s.handle(InputEvent::PointerDrag {
            point: Vec2::new(2.0, 0.0),
            delta: Vec2::new(2.0, 0.0),
            buttons: Buttons::LEFT,
        });
        assert!(s.is_dragging());
        s.set_mode(Mode::Node).unwrap();
        assert!(!s.is_dragging());
        assert_eq!(s.store().position(a), Some(Vec2::new(2.0, 0.0)));
        assert_eq!(s.history().len(), 2);
    }
}
