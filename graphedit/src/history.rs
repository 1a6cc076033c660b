//! Reversible command log.
//!
//! Each [`CommandEntry`] carries exactly the state needed to invert and
//! reapply one mutation. [`CommandLog`] is a cursor-addressed sequence of
//! entries; pushing while the cursor is not at the tail drops the redo branch.
//!
//! Replay validates every precondition before touching the store, so a
//! failed undo/redo leaves both the store and the cursor unchanged.

use crate::error::{Direction, GraphError, Result, Target};
use crate::model::{Edge, EdgeWeight, Node, NodeId, NodeState};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CommandEntry {
    AddNode {
        node: Node,
    },
    DeleteNode {
        node: Node,
        incident: Vec<Edge>,
    },
    AddEdge {
        edge: Edge,
    },
    DeleteEdge {
        edge: Edge,
    },
    MoveNode {
        id: NodeId,
        before: NodeState,
        before_edges: Vec<EdgeWeight>,
        after: NodeState,
        after_edges: Vec<EdgeWeight>,
    },
}

impl CommandEntry {
    /// Short name used in status messages.
    pub fn label(&self) -> &'static str {
        match self {
            CommandEntry::AddNode { .. } => "add node",
            CommandEntry::DeleteNode { .. } => "delete node",
            CommandEntry::AddEdge { .. } => "add edge",
            CommandEntry::DeleteEdge { .. } => "delete edge",
            CommandEntry::MoveNode { .. } => "move node",
        }
    }

    /// Inverts this entry against `g`.
    pub fn revert(&self, g: &mut GraphStore) -> Result<()> {
        match self {
            CommandEntry::AddNode { node } => remove_node_checked(g, node.id),
            CommandEntry::DeleteNode { node, incident } => restore_node_with_edges(g, node, incident),
            CommandEntry::AddEdge { edge } => g.remove_edge(edge.key).map(|_| ()),
            CommandEntry::DeleteEdge { edge } => g.restore_edge(edge.clone()),
            CommandEntry::MoveNode {
                id,
                before,
                before_edges,
                ..
            } => reset_node(g, *id, before, before_edges),
        }
    }

    /// Reapplies the forward direction of this entry against `g`.
    pub fn apply(&self, g: &mut GraphStore) -> Result<()> {
        match self {
            CommandEntry::AddNode { node } => g.restore_node(node.clone()),
            CommandEntry::DeleteNode { node, .. } => g.remove_node(node.id).map(|_| ()),
            CommandEntry::AddEdge { edge } => g.restore_edge(edge.clone()),
            CommandEntry::DeleteEdge { edge } => g.remove_edge(edge.key).map(|_| ()),
            CommandEntry::MoveNode {
                id,
                after,
                after_edges,
                ..
            } => reset_node(g, *id, after, after_edges),
        }
    }
}

// Undoing an add never cascades: every later edge touching the node has
// already been reverted by the time this entry is.
fn remove_node_checked(g: &mut GraphStore, id: NodeId) -> Result<()> {
    if !g.contains_node(id) {
        return Err(GraphError::node_not_found(id));
    }
    if let Some(e) = g.incident_edges(id).next() {
        return Err(GraphError::AlreadyExists(Target::Edge(e.key)));
    }
    g.remove_node(id).map(|_| ())
}

fn restore_node_with_edges(g: &mut GraphStore, node: &Node, incident: &[Edge]) -> Result<()> {
    g.can_restore_node(node.id)?;
    for e in incident {
        let other = e
            .key
            .other(node.id)
            .ok_or_else(|| GraphError::edge_not_found(e.key))?;
        if !g.contains_node(other) {
            return Err(GraphError::node_not_found(other));
        }
        if g.contains_edge(e.key) {
            return Err(GraphError::AlreadyExists(Target::Edge(e.key)));
        }
    }
    g.restore_node(node.clone())?;
    for e in incident {
        g.restore_edge(e.clone())?;
    }
    Ok(())
}

fn reset_node(g: &mut GraphStore, id: NodeId, state: &NodeState, edges: &[EdgeWeight]) -> Result<()> {
    if !g.contains_node(id) {
        return Err(GraphError::node_not_found(id));
    }
    if let Some(missing) = edges.iter().find(|w| !g.contains_edge(w.key)) {
        return Err(GraphError::edge_not_found(missing.key));
    }
    g.set_node_state(id, state)?;
    for w in edges {
        g.set_edge_weight(w.key, w.weight)?;
    }
    Ok(())
}

/// Ordered history with a cursor on the last applied entry (`None` = before
/// the first entry).
#[derive(Clone, Debug, Default)]
pub struct CommandLog {
    entries: Vec<CommandEntry>,
    cursor: Option<usize>,
}

impl CommandLog {
    pub fn new() -> Self {
        CommandLog::default()
    }

    /// Records an already-applied entry, discarding any redo branch.
    pub fn push(&mut self, entry: CommandEntry) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            tracing::debug!(dropped = self.entries.len() - keep, "redo branch discarded");
        }
        self.entries.truncate(keep);
        tracing::debug!(command = entry.label(), index = keep, "command committed");
        self.entries.push(entry);
        self.cursor = Some(keep);
    }

    pub fn undo(&mut self, g: &mut GraphStore) -> Result<&CommandEntry> {
        let idx = self.cursor.ok_or(GraphError::EmptyHistory(Direction::Undo))?;
        let entry = &self.entries[idx];
        entry.revert(g)?;
        self.cursor = idx.checked_sub(1);
        tracing::debug!(command = entry.label(), index = idx, "command undone");
        Ok(entry)
    }

    pub fn redo(&mut self, g: &mut GraphStore) -> Result<&CommandEntry> {
        let idx = self.cursor.map_or(0, |c| c + 1);
        let entry = self
            .entries
            .get(idx)
            .ok_or(GraphError::EmptyHistory(Direction::Redo))?;
        entry.apply(g)?;
        self.cursor = Some(idx);
        tracing::debug!(command = entry.label(), index = idx, "command redone");
        Ok(entry)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the last applied entry.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.entries.len()
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }
}
