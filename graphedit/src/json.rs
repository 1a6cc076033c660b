use crate::error::{GraphError, ParseError};
use crate::geometry::limits;
use crate::model::{Attributes, Edge, EdgeKey, Node, NodeId, Vec2};
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct NodeSer<'a> {
    id: u32,
    x: f64,
    y: f64,
    attributes: &'a Attributes,
}

#[derive(Serialize)]
struct EdgeSer<'a> {
    u: u32,
    v: u32,
    weight: f64,
    attributes: &'a Attributes,
}

#[derive(Serialize)]
struct DocSer<'a> {
    version: u32,
    next_id: u32,
    nodes: Vec<NodeSer<'a>>,
    edges: Vec<EdgeSer<'a>>,
}

#[derive(Deserialize)]
struct NodeDe {
    id: u32,
    x: f64,
    y: f64,
    #[serde(default)]
    attributes: Attributes,
}

#[derive(Deserialize)]
struct EdgeDe {
    u: u32,
    v: u32,
    // a stored `weight` is ignored: weights are recomputed from positions
    #[serde(default)]
    attributes: Attributes,
}

#[derive(Deserialize)]
struct DocDe {
    version: u32,
    #[serde(default)]
    next_id: u32,
    nodes: Vec<NodeDe>,
    #[serde(default)]
    edges: Vec<EdgeDe>,
}

pub fn to_json_impl(g: &GraphStore) -> Value {
    let nodes = g
        .nodes()
        .map(|n| NodeSer {
            id: n.id.0,
            x: n.position.x,
            y: n.position.y,
            attributes: &n.attributes,
        })
        .collect();
    let edges = g
        .edges()
        .map(|e| {
            let (u, v) = e.key.endpoints();
            EdgeSer {
                u: u.0,
                v: v.0,
                weight: e.weight,
                attributes: &e.attributes,
            }
        })
        .collect();
    let doc = DocSer {
        version: FORMAT_VERSION,
        next_id: g.next_id().0,
        nodes,
        edges,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

/// Strict ingest: any violation rejects the whole document.
pub fn from_json_impl_strict(v: Value) -> Result<GraphStore, ParseError> {
    let doc: DocDe = serde_json::from_value(v)?;
    if doc.version != FORMAT_VERSION {
        return Err(ParseError::UnsupportedVersion(doc.version));
    }
    if doc.nodes.len() > limits::MAX_NODES {
        return Err(ParseError::CapsExceeded(format!("nodes>{}", limits::MAX_NODES)));
    }
    if doc.edges.len() > limits::MAX_EDGES {
        return Err(ParseError::CapsExceeded(format!("edges>{}", limits::MAX_EDGES)));
    }

    let mut nodes = Vec::with_capacity(doc.nodes.len());
    let mut positions: HashMap<u32, Vec2> = HashMap::with_capacity(doc.nodes.len());
    for n in doc.nodes {
        if !limits::in_id_bounds(n.id) {
            return Err(ParseError::OutOfBounds(format!("node id {}", n.id)));
        }
        if !limits::in_coord_bounds(n.x) || !limits::in_coord_bounds(n.y) {
            return Err(ParseError::OutOfBounds("node coordinate".into()));
        }
        let position = Vec2::new(n.x, n.y);
        if positions.insert(n.id, position).is_some() {
            return Err(ParseError::InvalidStructure(format!("duplicate node id {}", n.id)));
        }
        nodes.push(Node {
            id: NodeId(n.id),
            position,
            attributes: n.attributes,
        });
    }
    if !limits::in_id_bounds(doc.next_id) {
        return Err(ParseError::OutOfBounds(format!("next_id {}", doc.next_id)));
    }

    let mut keys: HashSet<EdgeKey> = HashSet::with_capacity(doc.edges.len());
    let mut edges = Vec::with_capacity(doc.edges.len());
    for e in doc.edges {
        let key = EdgeKey::new(NodeId(e.u), NodeId(e.v))
            .ok_or_else(|| ParseError::InvalidStructure("edge endpoints equal".into()))?;
        let (a, b) = match (positions.get(&e.u), positions.get(&e.v)) {
            (Some(a), Some(b)) => (*a, *b),
            _ => {
                return Err(ParseError::InvalidStructure(format!(
                    "edge {} references a missing node",
                    key
                )))
            }
        };
        if !keys.insert(key) {
            return Err(ParseError::InvalidStructure(format!("duplicate edge {}", key)));
        }
        edges.push(Edge {
            key,
            weight: a.distance(b),
            attributes: e.attributes,
        });
    }
    Ok(GraphStore::from_parts(nodes, edges, doc.next_id))
}

/// Export collaborator: serialized interchange document.
pub fn export_bytes(g: &GraphStore) -> Vec<u8> {
    serde_json::to_vec_pretty(&to_json_impl(g)).unwrap_or_default()
}

/// Import collaborator: parses and validates a document into a fresh store.
pub fn import_bytes(bytes: &[u8]) -> Result<GraphStore, GraphError> {
    let v: Value = serde_json::from_slice(bytes).map_err(ParseError::from)?;
    Ok(from_json_impl_strict(v)?)
}
