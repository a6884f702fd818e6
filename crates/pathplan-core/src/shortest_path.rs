//! Dijkstra's algorithm over a [`VisibilityGraph`].

use crate::error::RouteError;
use crate::visibility::{NodeId, VisibilityGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Node ids from start to goal and the summed edge length.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub nodes: Vec<NodeId>,
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Queue entry ordered by distance, then id so pops are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    distance: FloatOrd,
    node: NodeId,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Shortest path from `start` to `goal`, stopping as soon as the goal is
/// settled.
pub fn dijkstra(
    graph: &VisibilityGraph,
    start: NodeId,
    goal: NodeId,
) -> Result<ShortestPath, RouteError> {
    for id in [start, goal] {
        if !graph.contains(id) {
            return Err(RouteError::InvalidInput(format!(
                "node {} is not in a graph of {} nodes",
                id.index(),
                graph.len()
            )));
        }
    }

    let mut best = vec![f64::INFINITY; graph.len()];
    let mut previous: Vec<Option<NodeId>> = vec![None; graph.len()];
    let mut settled = vec![false; graph.len()];
    let mut open: BinaryHeap<Reverse<QueueEntry>> = BinaryHeap::new();

    best[start.index()] = 0.0;
    open.push(Reverse(QueueEntry {
        distance: FloatOrd(0.0),
        node: start,
    }));

    let mut visited = 0usize;
    while let Some(Reverse(current)) = open.pop() {
        let index = current.node.index();
        if settled[index] {
            continue;
        }
        settled[index] = true;
        visited += 1;

        if current.node == goal {
            break;
        }

        for &(next, edge_m) in graph.neighbors(current.node) {
            if settled[next.index()] {
                continue;
            }
            let tentative = best[index] + edge_m;
            if tentative < best[next.index()] {
                best[next.index()] = tentative;
                previous[next.index()] = Some(current.node);
                open.push(Reverse(QueueEntry {
                    distance: FloatOrd(tentative),
                    node: next,
                }));
            }
        }
    }

    if !settled[goal.index()] {
        return Err(RouteError::Unreachable(format!(
            "no obstacle-free path from node {} to node {} ({visited} nodes explored)",
            start.index(),
            goal.index()
        )));
    }

    let mut nodes = vec![goal];
    let mut cursor = goal;
    while let Some(prev) = previous[cursor.index()] {
        nodes.push(prev);
        cursor = prev;
    }
    nodes.reverse();

    tracing::debug!(
        hops = nodes.len() - 1,
        distance_m = best[goal.index()],
        visited,
        "dijkstra finished"
    );

    Ok(ShortestPath {
        nodes,
        distance_m: best[goal.index()],
    })
}
