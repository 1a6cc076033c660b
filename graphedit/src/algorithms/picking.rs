use crate::geometry::math::{diameter_circle, line_distance};
use crate::geometry::tolerance::{EDGE_PICK_THRESHOLD_PX, NODE_PICK_RADIUS_PX};
use crate::model::{EdgeKey, NodeId, Pick, Vec2};
use crate::store::GraphStore;
use crate::view::ViewTransform;

/// Stateless hit-testing over a store snapshot. Tolerances are in screen
/// pixels and converted to world units through the view scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialQuery {
    pub node_radius_px: f64,
    pub edge_threshold_px: f64,
}

impl Default for SpatialQuery {
    fn default() -> Self {
        SpatialQuery {
            node_radius_px: NODE_PICK_RADIUS_PX,
            edge_threshold_px: EDGE_PICK_THRESHOLD_PX,
        }
    }
}

impl SpatialQuery {
    pub fn new(node_radius_px: f64, edge_threshold_px: f64) -> Self {
        SpatialQuery {
            node_radius_px,
            edge_threshold_px,
        }
    }

    /// Nearest node strictly within the picking radius of `point` (screen
    /// coordinates). Exact ties go to the lowest id.
    pub fn pick_node(&self, g: &GraphStore, view: &ViewTransform, point: Vec2) -> Option<NodeId> {
        self.nearest_node(g, view, point).map(|(id, _)| id)
    }

    /// Edge whose supporting line passes closest to `point`, among edges
    /// whose diameter circle contains it.
    ///
    /// This is the circle+line approximation of segment distance: near the
    /// circle boundary an edge can match slightly beyond its true endpoints.
    pub fn pick_edge(&self, g: &GraphStore, view: &ViewTransform, point: Vec2) -> Option<EdgeKey> {
        self.nearest_edge(g, view, point).map(|(key, _)| key)
    }

    /// Nodes win over edges, as in the delete tool.
    pub fn pick(&self, g: &GraphStore, view: &ViewTransform, point: Vec2) -> Option<Pick> {
        if let Some((id, dist)) = self.nearest_node(g, view, point) {
            return Some(Pick::Node { id, dist });
        }
        self.nearest_edge(g, view, point)
            .map(|(key, dist)| Pick::Edge { key, dist })
    }

    fn nearest_node(&self, g: &GraphStore, view: &ViewTransform, point: Vec2) -> Option<(NodeId, f64)> {
        let p = view.to_world(point);
        let r = view.to_world_len(self.node_radius_px);
        let r2 = r * r;
        let mut best: Option<(NodeId, f64)> = None;
        // ids ascend, so strict `<` keeps the lowest id on ties
        for n in g.nodes() {
            let d2 = n.position.distance_sq(p);
            if d2 < r2 && best.map_or(true, |(_, bd)| d2 < bd) {
                best = Some((n.id, d2));
            }
        }
        best.map(|(id, d2)| (id, d2.sqrt()))
    }

    fn nearest_edge(&self, g: &GraphStore, view: &ViewTransform, point: Vec2) -> Option<(EdgeKey, f64)> {
        let p = view.to_world(point);
        let threshold = view.to_world_len(self.edge_threshold_px);
        let mut best: Option<(EdgeKey, f64)> = None;
        for e in g.edges() {
            let (u, v) = e.key.endpoints();
            let (a, b) = match (g.position(u), g.position(v)) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            let (center, r2) = diameter_circle(a, b);
            if p.distance_sq(center) > r2 {
                continue;
            }
            let d = match line_distance(p, a, b) {
                Some(d) => d,
                None => continue,
            };
            if d < threshold && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((e.key, d));
            }
        }
        best
    }
}
