//! Single-source shortest paths.

use tracing::debug;

use super::graph::{Graph, NodeIndex};
use super::queue::{MinQueue, QueueItem};

/// Distances and predecessors from one source to every node.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: NodeIndex,
    distance: Vec<f64>,
    predecessor: Vec<Option<NodeIndex>>,
    stale_pops: usize,
}

impl ShortestPaths {
    /// The node the search started from.
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    /// Minimal distance to `node`; `f64::INFINITY` when unreachable.
    pub fn distance(&self, node: NodeIndex) -> f64 {
        self.distance[node.0]
    }

    /// Distances for every node, indexed by node.
    pub fn distances(&self) -> &[f64] {
        &self.distance
    }

    /// The node `node` was reached from on a shortest path.
    ///
    /// `None` for the source and for unreachable nodes.
    pub fn predecessor(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.predecessor[node.0]
    }

    pub fn is_reachable(&self, node: NodeIndex) -> bool {
        self.distance[node.0].is_finite()
    }

    /// Queue entries discarded because a shorter distance had already been
    /// found for their node.
    pub fn stale_pops(&self) -> usize {
        self.stale_pops
    }
}

/// Run Dijkstra's algorithm from `source`.
///
/// Edge weights must be non-negative, which [`Graph::build`] guarantees.
/// Neighbors are relaxed in index order and the queue breaks ties by index,
/// so equal-cost alternatives resolve the same way on every run.
///
/// # Panics
///
/// Panics if `source` is not a node of `graph`.
pub fn shortest_paths(graph: &Graph, source: NodeIndex) -> ShortestPaths {
    let mut distance = vec![f64::INFINITY; graph.len()];
    let mut predecessor = vec![None; graph.len()];
    let mut stale_pops = 0;

    distance[source.0] = 0.0;
    let mut queue = MinQueue::with_capacity(graph.len());
    queue.push(QueueItem::new(source, 0.0));

    while let Some(item) = queue.pop() {
        if item.is_stale(&distance) {
            stale_pops += 1;
            continue;
        }

        let u = item.node;
        for edge in graph.neighbors(u) {
            let alt = distance[u.0] + edge.weight;
            if alt < distance[edge.to.0] {
                distance[edge.to.0] = alt;
                predecessor[edge.to.0] = Some(u);
                queue.push(QueueItem::new(edge.to, alt));
            }
        }
    }

    debug!(
        source = source.0,
        reachable = distance.iter().filter(|d| d.is_finite()).count(),
        stale_pops,
        "Shortest paths computed"
    );

    ShortestPaths {
        source,
        distance,
        predecessor,
        stale_pops,
    }
}
