//! Path reconstruction from a predecessor map.

use super::dijkstra::ShortestPaths;
use super::graph::NodeIndex;

/// Walk predecessors back from `destination` to the search source.
///
/// Returns the nodes in travel order, source first and destination last, or
/// `None` when `destination` cannot be reached from the source. A route to
/// the source itself is the single-node path.
pub fn reconstruct(paths: &ShortestPaths, destination: NodeIndex) -> Option<Vec<NodeIndex>> {
    let source = paths.source();
    if destination == source {
        return Some(vec![source]);
    }

    let mut path = vec![destination];
    let mut current = destination;
    while current != source {
        current = paths.predecessor(current)?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}
