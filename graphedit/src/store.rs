use crate::error::{GraphError, Result, Target};
use crate::model::{Attributes, Edge, EdgeKey, EdgeWeight, Node, NodeId, NodeState, Vec2};
use std::collections::HashMap;

/// Node and edge collections. Pure data plus mutation; no editing policy.
///
/// Node ids are slot indices into `nodes`. Slots are only ever appended, so
/// an id is never handed out twice by the same store.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    pub(crate) nodes: Vec<Option<Node>>,       // id is index
    pub(crate) edges: Vec<Option<Edge>>,       // insertion order, tombstoned
    pub(crate) edge_slots: HashMap<EdgeKey, usize>, // key -> slot in `edges`
    pub(crate) vacated: HashMap<EdgeKey, usize>,    // removed key -> its old slot
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore::default()
    }

    /// Id the next `add_node` will return.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    // Nodes
    pub fn add_node(&mut self, position: Vec2, attributes: Attributes) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Some(Node {
            id,
            position,
            attributes,
        }));
        id
    }

    /// Removes the node and every incident edge. Returns the node and the
    /// removed edges (in insertion order) for history capture.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(Node, Vec<Edge>)> {
        let node = self
            .nodes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| GraphError::node_not_found(id))?;
        let mut incident = Vec::new();
        for (idx, slot) in self.edges.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|e| e.key.touches(id)) {
                if let Some(edge) = slot.take() {
                    self.edge_slots.remove(&edge.key);
                    self.vacated.insert(edge.key, idx);
                    incident.push(edge);
                }
            }
        }
        Ok((node, incident))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(|n| n.as_ref())
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn position(&self, id: NodeId) -> Option<Vec2> {
        self.node(id).map(|n| n.position)
    }

    /// Updates position only; incident weights go stale until
    /// `recompute_incident_weights`.
    pub fn set_node_position(&mut self, id: NodeId, position: Vec2) -> Result<()> {
        let node = self.node_mut(id)?;
        node.position = position;
        Ok(())
    }

    pub fn node_state(&self, id: NodeId) -> Option<NodeState> {
        self.node(id).map(|n| NodeState {
            position: n.position,
            attributes: n.attributes.clone(),
        })
    }

    pub(crate) fn set_node_state(&mut self, id: NodeId, state: &NodeState) -> Result<()> {
        let node = self.node_mut(id)?;
        node.position = state.position;
        node.attributes = state.attributes.clone();
        Ok(())
    }

    /// Re-inserts a node under its original id into a vacant slot.
    pub(crate) fn restore_node(&mut self, node: Node) -> Result<()> {
        self.can_restore_node(node.id)?;
        let idx = node.id.index();
        self.nodes[idx] = Some(node);
        Ok(())
    }

    pub(crate) fn can_restore_node(&self, id: NodeId) -> Result<()> {
        match self.nodes.get(id.index()) {
            Some(None) => Ok(()),
            Some(Some(_)) => Err(GraphError::AlreadyExists(Target::Node(id))),
            None => Err(GraphError::node_not_found(id)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Live nodes in id (creation) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter_map(|n| n.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .and_then(|n| n.as_mut())
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    // Edges
    /// Connects `u` and `v` with weight equal to their current distance.
    /// `Ok(None)` (nothing mutated) for a self-loop or an existing pair.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, attributes: Attributes) -> Result<Option<Edge>> {
        let pu = self.position(u).ok_or_else(|| GraphError::node_not_found(u))?;
        let pv = self.position(v).ok_or_else(|| GraphError::node_not_found(v))?;
        let key = match EdgeKey::new(u, v) {
            Some(k) => k,
            None => return Ok(None),
        };
        if self.edge_slots.contains_key(&key) {
            return Ok(None);
        }
        let edge = Edge {
            key,
            weight: pu.distance(pv),
            attributes,
        };
        // a fresh connection is a new insertion; the old slot stays dead
        self.vacated.remove(&key);
        self.insert_edge_unchecked(edge.clone());
        Ok(Some(edge))
    }

    pub fn remove_edge(&mut self, key: EdgeKey) -> Result<Edge> {
        let slot = self
            .edge_slots
            .remove(&key)
            .ok_or_else(|| GraphError::edge_not_found(key))?;
        let edge = self
            .edges
            .get_mut(slot)
            .and_then(Option::take)
            .ok_or_else(|| GraphError::edge_not_found(key))?;
        self.vacated.insert(key, slot);
        Ok(edge)
    }

    /// Re-inserts an edge verbatim, saved weight included, back into the
    /// slot it was removed from so enumeration order is unchanged.
    pub(crate) fn restore_edge(&mut self, edge: Edge) -> Result<()> {
        self.check_restorable_edge(edge.key)?;
        match self.vacated.remove(&edge.key) {
            Some(slot) if matches!(self.edges.get(slot), Some(None)) => {
                self.edge_slots.insert(edge.key, slot);
                self.edges[slot] = Some(edge);
            }
            _ => self.insert_edge_unchecked(edge),
        }
        Ok(())
    }

    pub(crate) fn check_restorable_edge(&self, key: EdgeKey) -> Result<()> {
        let (u, v) = key.endpoints();
        for id in [u, v] {
            if !self.contains_node(id) {
                return Err(GraphError::node_not_found(id));
            }
        }
        if self.edge_slots.contains_key(&key) {
            return Err(GraphError::AlreadyExists(Target::Edge(key)));
        }
        Ok(())
    }

    pub(crate) fn set_edge_weight(&mut self, key: EdgeKey, weight: f64) -> Result<()> {
        let edge = self.edge_mut(key)?;
        edge.weight = weight;
        Ok(())
    }

    /// Recomputes the weight of every edge touching `id` from current
    /// endpoint positions. Idempotent.
    pub fn recompute_incident_weights(&mut self, id: NodeId) -> Result<()> {
        let p = self.position(id).ok_or_else(|| GraphError::node_not_found(id))?;
        let nodes = &self.nodes;
        for edge in self.edges.iter_mut().flatten() {
            if let Some(other) = edge.key.other(id) {
                if let Some(Some(o)) = nodes.get(other.index()) {
                    edge.weight = p.distance(o.position);
                }
            }
        }
        Ok(())
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&Edge> {
        self.edge_slots
            .get(&key)
            .and_then(|&slot| self.edges.get(slot))
            .and_then(|e| e.as_ref())
    }

    pub fn edge_between(&self, u: NodeId, v: NodeId) -> Option<&Edge> {
        EdgeKey::new(u, v).and_then(|k| self.edge(k))
    }

    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.edge_slots.contains_key(&key)
    }

    pub fn edge_count(&self) -> usize {
        self.edge_slots.len()
    }

    /// Live edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(|e| e.as_ref())
    }

    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges().filter(move |e| e.key.touches(id))
    }

    pub fn incident_weights(&self, id: NodeId) -> Vec<EdgeWeight> {
        self.incident_edges(id)
            .map(|e| EdgeWeight {
                key: e.key,
                weight: e.weight,
            })
            .collect()
    }

    fn edge_mut(&mut self, key: EdgeKey) -> Result<&mut Edge> {
        let slot = *self
            .edge_slots
            .get(&key)
            .ok_or_else(|| GraphError::edge_not_found(key))?;
        self.edges
            .get_mut(slot)
            .and_then(|e| e.as_mut())
            .ok_or_else(|| GraphError::edge_not_found(key))
    }

    fn insert_edge_unchecked(&mut self, edge: Edge) {
        let slot = self.edges.len();
        self.edge_slots.insert(edge.key, slot);
        self.edges.push(Some(edge));
    }

    // Typed arrays for batch rendering
    pub fn node_arrays(&self) -> (Vec<u32>, Vec<f64>) {
        let mut ids = Vec::new();
        let mut pos = Vec::new();
        for n in self.nodes() {
            ids.push(n.id.0);
            pos.push(n.position.x);
            pos.push(n.position.y);
        }
        (ids, pos)
    }

    /// (flattened endpoint pairs, weights)
    pub fn edge_arrays(&self) -> (Vec<u32>, Vec<f64>) {
        let mut ep = Vec::new();
        let mut weights = Vec::new();
        for e in self.edges() {
            let (u, v) = e.key.endpoints();
            ep.push(u.0);
            ep.push(v.0);
            weights.push(e.weight);
        }
        (ep, weights)
    }

    /// Builds a store from already-validated parts. `next_id` is raised to
    /// cover every supplied id.
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, next_id: u32) -> Self {
        let max_id = nodes.iter().map(|n| n.id.0 + 1).max().unwrap_or(0);
        let len = next_id.max(max_id) as usize;
        let mut store = GraphStore {
            nodes: vec![None; len],
            edges: Vec::with_capacity(edges.len()),
            edge_slots: HashMap::with_capacity(edges.len()),
            vacated: HashMap::new(),
        };
        for n in nodes {
            let idx = n.id.index();
            store.nodes[idx] = Some(n);
        }
        for e in edges {
            store.insert_edge_unchecked(e);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(label: &str) -> Attributes {
        let mut a = Attributes::new();
        a.insert("label".into(), json!(label));
        a
    }

    #[test]
    fn ids_are_never_reused() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let b = g.add_node(Vec2::new(1.0, 0.0), Attributes::new());
        g.remove_node(b).unwrap();
        let c = g.add_node(Vec2::new(2.0, 0.0), Attributes::new());
        assert_eq!((a, b, c), (NodeId(0), NodeId(1), NodeId(2)));
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn add_edge_computes_distance_and_rejects_duplicates() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let b = g.add_node(Vec2::new(3.0, 4.0), Attributes::new());
        let e = g.add_edge(a, b, attrs("ab")).unwrap().expect("edge");
        assert_eq!(e.weight, 5.0);
        assert!(g.add_edge(b, a, Attributes::new()).unwrap().is_none());
        assert!(g.add_edge(a, a, Attributes::new()).unwrap().is_none());
        assert_eq!(g.edge_count(), 1);
        assert!(matches!(
            g.add_edge(a, NodeId(42), Attributes::new()),
            Err(GraphError::NotFound(_))
        ));
    }

    #[test]
    fn remove_node_returns_incident_edges() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), attrs("a"));
        let b = g.add_node(Vec2::new(1.0, 0.0), Attributes::new());
        let c = g.add_node(Vec2::new(0.0, 1.0), Attributes::new());
        g.add_edge(a, b, Attributes::new()).unwrap();
        g.add_edge(b, c, Attributes::new()).unwrap();
        g.add_edge(c, a, attrs("ca")).unwrap();
        let (node, incident) = g.remove_node(a).unwrap();
        assert_eq!(node.attributes, attrs("a"));
        assert_eq!(incident.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.edge_between(b, c).is_some());
        assert!(matches!(g.remove_node(a), Err(GraphError::NotFound(_))));
    }

    #[test]
    fn weights_stay_stale_until_recomputed() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let b = g.add_node(Vec2::new(3.0, 0.0), Attributes::new());
        let key = g.add_edge(a, b, Attributes::new()).unwrap().unwrap().key;
        g.set_node_position(a, Vec2::new(0.0, 4.0)).unwrap();
        assert_eq!(g.edge(key).unwrap().weight, 3.0);
        g.recompute_incident_weights(a).unwrap();
        assert_eq!(g.edge(key).unwrap().weight, 5.0);
        g.recompute_incident_weights(a).unwrap();
        assert_eq!(g.edge(key).unwrap().weight, 5.0);
    }

    #[test]
    fn restore_requires_vacant_slot() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let snapshot = g.node(a).cloned().unwrap();
        assert!(matches!(
            g.restore_node(snapshot.clone()),
            Err(GraphError::AlreadyExists(_))
        ));
        g.remove_node(a).unwrap();
        g.restore_node(snapshot).unwrap();
        assert!(g.contains_node(a));
        assert_eq!(g.next_id(), NodeId(1));
    }

    #[test]
    fn restored_edges_reuse_their_slot() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let b = g.add_node(Vec2::new(1.0, 0.0), Attributes::new());
        let c = g.add_node(Vec2::new(0.0, 1.0), Attributes::new());
        let ab = g.add_edge(a, b, Attributes::new()).unwrap().unwrap();
        let bc = g.add_edge(b, c, Attributes::new()).unwrap().unwrap();
        let ca = g.add_edge(c, a, Attributes::new()).unwrap().unwrap();
        let order = vec![ab.key, bc.key, ca.key];

        for _ in 0..1000 {
            let e = g.remove_edge(bc.key).unwrap();
            g.restore_edge(e).unwrap();
        }
        assert_eq!(g.edges.len(), 3);
        assert_eq!(g.edges().map(|e| e.key).collect::<Vec<_>>(), order);

        let (node, incident) = g.remove_node(a).unwrap();
        g.restore_node(node).unwrap();
        for e in incident {
            g.restore_edge(e).unwrap();
        }
        assert_eq!(g.edges.len(), 3);
        assert_eq!(g.edges().map(|e| e.key).collect::<Vec<_>>(), order);
    }

    #[test]
    fn reconnecting_appends_a_new_insertion() {
        let mut g = GraphStore::new();
        let a = g.add_node(Vec2::new(0.0, 0.0), Attributes::new());
        let b = g.add_node(Vec2::new(1.0, 0.0), Attributes::new());
        let c = g.add_node(Vec2::new(0.0, 1.0), Attributes::new());
        let ab = g.add_edge(a, b, Attributes::new()).unwrap().unwrap().key;
        let bc = g.add_edge(b, c, Attributes::new()).unwrap().unwrap().key;
        g.remove_edge(ab).unwrap();
        g.add_edge(b, a, Attributes::new()).unwrap();
        assert_eq!(g.edges().map(|e| e.key).collect::<Vec<_>>(), vec![bc, ab]);
        assert!(g.vacated.is_empty());
    }

    #[test]
    fn remove_missing_edge_is_not_found() {
        let mut g = GraphStore::new();
        let key = EdgeKey::new(NodeId(0), NodeId(1)).unwrap();
        assert!(matches!(g.remove_edge(key), Err(GraphError::NotFound(_))));
    }
}
