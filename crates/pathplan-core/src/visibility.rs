//! Visibility graph over the start, the goal, and the buffered zone corners.

use crate::error::GeometryError;
use crate::geometry::{buffer_polygon, distance, segment_intersects_polygon};
use crate::models::{Position, RestrictedZone};

/// Stable index of a node inside one [`VisibilityGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const START: NodeId = NodeId(0);
    pub const GOAL: NodeId = NodeId(1);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityNode {
    pub id: NodeId,
    pub position: Position,
}

/// Undirected edge; `from < to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance_m: f64,
}

#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    nodes: Vec<VisibilityNode>,
    edges: Vec<WeightedEdge>,
    adjacency: Vec<Vec<(NodeId, f64)>>,
    buffered: Vec<Position>,
}

impl VisibilityGraph {
    /// Buffer `restricted` and connect every pair of nodes that can see each
    /// other around it.
    pub fn build(
        start: Position,
        goal: Position,
        restricted: &RestrictedZone,
    ) -> Result<Self, GeometryError> {
        let buffered = buffer_polygon(restricted.open_ring(), restricted.margin_m)?;
        Ok(Self::from_buffered(start, goal, buffered))
    }

    /// Build from a polygon that has already been buffered.
    ///
    /// Node 0 is `start`, node 1 is `goal`, nodes `2..` are the polygon
    /// vertices in order.
    pub fn from_buffered(start: Position, goal: Position, buffered: Vec<Position>) -> Self {
        let nodes: Vec<VisibilityNode> = [start, goal]
            .into_iter()
            .chain(buffered.iter().copied())
            .enumerate()
            .map(|(index, position)| VisibilityNode {
                id: NodeId(index),
                position,
            })
            .collect();

        let mut edges = Vec::new();
        let mut adjacency = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (a, b) = (nodes[i].position, nodes[j].position);
                if segment_intersects_polygon(a, b, &buffered) {
                    continue;
                }
                let distance_m = distance(a, b);
                edges.push(WeightedEdge {
                    from: NodeId(i),
                    to: NodeId(j),
                    distance_m,
                });
                adjacency[i].push((NodeId(j), distance_m));
                adjacency[j].push((NodeId(i), distance_m));
            }
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "built visibility graph"
        );

        Self {
            nodes,
            edges,
            adjacency,
            buffered,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[VisibilityNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// The buffered zone the edges were tested against.
    pub fn buffered(&self) -> &[Position] {
        &self.buffered
    }

    pub fn position(&self, id: NodeId) -> Option<Position> {
        self.nodes.get(id.index()).map(|node| node.position)
    }

    /// Visible neighbours of `id` with edge lengths in meters.
    pub fn neighbors(&self, id: NodeId) -> &[(NodeId, f64)] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude, 0.0).unwrap()
    }

    fn square_zone() -> RestrictedZone {
        RestrictedZone::new(
            vec![
                pos(-0.001, -0.001),
                pos(-0.001, 0.001),
                pos(0.001, 0.001),
                pos(0.001, -0.001),
            ],
            10.0,
        )
    }

    #[test]
    fn node_ids_follow_construction_order() {
        let start = pos(0.0, -0.01);
        let goal = pos(0.0, 0.01);
        let graph = VisibilityGraph::build(start, goal, &square_zone()).unwrap();

        assert_eq!(graph.len(), 6);
        assert_eq!(graph.position(NodeId::START), Some(start));
        assert_eq!(graph.position(NodeId::GOAL), Some(goal));
        for (index, node) in graph.nodes().iter().enumerate() {
            assert_eq!(node.id, NodeId(index));
        }
        assert_eq!(graph.position(NodeId(6)), None);
    }

    #[test]
    fn blocked_pairs_have_no_edge() {
        let graph = VisibilityGraph::build(pos(0.0, -0.01), pos(0.0, 0.01), &square_zone()).unwrap();

        // The straight line runs through the zone.
        assert!(!graph
            .neighbors(NodeId::START)
            .iter()
            .any(|(id, _)| *id == NodeId::GOAL));
        // Adjacent buffered corners see each other along the boundary,
        // opposite corners do not.
        let corner = NodeId(2);
        let reachable: Vec<NodeId> = graph.neighbors(corner).iter().map(|(id, _)| *id).collect();
        assert!(reachable.contains(&NodeId(3)));
        assert!(reachable.contains(&NodeId(5)));
        assert!(!reachable.contains(&NodeId(4)));
    }

    #[test]
    fn edges_are_true_distances_and_symmetric() {
        let graph = VisibilityGraph::build(pos(0.0, -0.01), pos(0.0, 0.01), &square_zone()).unwrap();
        assert!(!graph.edges().is_empty());
        for edge in graph.edges() {
            assert!(edge.from < edge.to);
            let a = graph.position(edge.from).unwrap();
            let b = graph.position(edge.to).unwrap();
            assert!((edge.distance_m - distance(a, b)).abs() < 1e-9);
            assert!(graph
                .neighbors(edge.to)
                .iter()
                .any(|(id, d)| *id == edge.from && *d == edge.distance_m));
        }
    }

    #[test]
    fn duplicate_coordinates_stay_distinct_nodes() {
        // Goal on top of the start: two nodes, same value, different ids.
        let start = pos(0.0, -0.01);
        let graph = VisibilityGraph::build(start, start, &square_zone()).unwrap();
        assert_eq!(graph.position(NodeId::START), graph.position(NodeId::GOAL));
        assert_ne!(graph.nodes()[0].id, graph.nodes()[1].id);
    }

    #[test]
    fn rejects_malformed_zone() {
        let zone = RestrictedZone::new(vec![pos(0.0, 0.0), pos(0.0, 0.001)], 10.0);
        assert!(VisibilityGraph::build(pos(0.0, -0.01), pos(0.0, 0.01), &zone).is_err());
    }
}
