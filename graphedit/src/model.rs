use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Open-ended node/edge attributes (label, color, ...), ordered by key.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Node identifier. Allocated from a monotonically increasing counter and
/// never reused by the store that issued it, even after deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }
    #[inline]
    pub fn distance_sq(self, o: Vec2) -> f64 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }
    #[inline]
    pub fn distance(self, o: Vec2) -> f64 {
        self.distance_sq(o).sqrt()
    }
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

/// Unordered pair of distinct node ids. Stored normalized (`lo < hi`) so
/// `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: NodeId,
    hi: NodeId,
}

impl EdgeKey {
    /// `None` for a self-loop.
    pub fn new(u: NodeId, v: NodeId) -> Option<EdgeKey> {
        match u.cmp(&v) {
            std::cmp::Ordering::Less => Some(EdgeKey { lo: u, hi: v }),
            std::cmp::Ordering::Greater => Some(EdgeKey { lo: v, hi: u }),
            std::cmp::Ordering::Equal => None,
        }
    }
    #[inline]
    pub fn endpoints(self) -> (NodeId, NodeId) {
        (self.lo, self.hi)
    }
    #[inline]
    pub fn touches(self, id: NodeId) -> bool {
        self.lo == id || self.hi == id
    }
    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(self, id: NodeId) -> Option<NodeId> {
        if self.lo == id {
            Some(self.hi)
        } else if self.hi == id {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Vec2,
    pub attributes: Attributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub key: EdgeKey,
    pub weight: f64,
    pub attributes: Attributes,
}

/// Saved weight of one edge, captured around a move gesture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeight {
    pub key: EdgeKey,
    pub weight: f64,
}

/// Position plus attributes of a node at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub position: Vec2,
    pub attributes: Attributes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Node,
    Edge,
    Delete,
    Modify,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Node => "node",
            Mode::Edge => "edge",
            Mode::Delete => "delete",
            Mode::Modify => "modify",
        }
    }
    pub fn from_name(s: &str) -> Option<Mode> {
        match s {
            "node" => Some(Mode::Node),
            "edge" => Some(Mode::Edge),
            "delete" => Some(Mode::Delete),
            "modify" => Some(Mode::Modify),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum Pick {
    #[serde(rename = "node")]
    Node { id: NodeId, dist: f64 },
    #[serde(rename = "edge")]
    Edge { key: EdgeKey, dist: f64 },
}
