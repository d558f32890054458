//! Weighted station graph.
//!
//! Stations are stored in a dense arena sorted by station id, and each
//! node's neighbor list is sorted by neighbor index. Everything downstream
//! (the solver's relaxation order in particular) is therefore independent
//! of the order in which the source supplied its rows.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::domain::{LineId, Station, StationId, haversine_km};
use crate::stations::{ConnectionPair, SourceError, StationSource};

use super::config::{AdjacencyPolicy, PlannerConfig};

/// Position of a station in the graph's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub usize);

/// What an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Riding a line between two of its stations.
    Line,

    /// Changing lines within a station complex.
    Transfer,
}

/// A directed edge to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeIndex,
    pub weight: f64,
    pub kind: EdgeKind,
}

/// Immutable adjacency structure built for a single request.
///
/// Every station passed to [`Graph::build`] is a node, including stations
/// with no edges. Weights are non-negative, there are no self-loops, and
/// transfer edges are symmetric.
#[derive(Debug, Clone)]
pub struct Graph {
    stations: Vec<Station>,
    index: HashMap<StationId, NodeIndex>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Fetch one snapshot from `source` and build the graph from it.
    ///
    /// The connection table is only requested under
    /// [`AdjacencyPolicy::Explicit`].
    pub fn load(
        source: &dyn StationSource,
        config: &PlannerConfig,
        allow_special_line: bool,
    ) -> Result<Self, SourceError> {
        let snapshot = source.snapshot(config.adjacency == AdjacencyPolicy::Explicit)?;

        Ok(Self::build(
            snapshot.stations,
            snapshot.connections.as_deref(),
            allow_special_line,
            config,
        ))
    }

    /// Build the graph from station records.
    ///
    /// With `connections`, each pair whose endpoints are both present
    /// becomes a line edge weighted by great-circle distance. Without, every
    /// same-line pair closer than `config.max_distance_km` is connected.
    /// Line edges touching `config.special_line` are dropped unless
    /// `allow_special_line` is set. Finally, distinct stations sharing a
    /// non-zero group id are joined by transfer edges of weight
    /// `config.transfer_cost`, replacing any line edge between them.
    pub fn build(
        mut stations: Vec<Station>,
        connections: Option<&[ConnectionPair]>,
        allow_special_line: bool,
        config: &PlannerConfig,
    ) -> Self {
        stations.sort_by_key(|s| s.id);
        let before = stations.len();
        stations.dedup_by_key(|s| s.id);
        if stations.len() != before {
            warn!(
                duplicates = before - stations.len(),
                "Duplicate station ids in source, keeping the first of each"
            );
        }

        let index: HashMap<StationId, NodeIndex> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id, NodeIndex(i)))
            .collect();

        let mut builder = EdgeSet::new(stations.len());
        let excluded = |line: LineId| !allow_special_line && line == config.special_line;

        match connections {
            Some(pairs) => {
                for (a, b) in pairs {
                    let (Some(&u), Some(&v)) = (index.get(a), index.get(b)) else {
                        continue;
                    };
                    if u == v {
                        continue;
                    }
                    let (s1, s2) = (&stations[u.0], &stations[v.0]);
                    if excluded(s1.line) || excluded(s2.line) {
                        continue;
                    }
                    let weight = haversine_km(s1.position, s2.position);
                    builder.set(u, v, weight, EdgeKind::Line);
                    builder.set(v, u, weight, EdgeKind::Line);
                }
            }
            None => {
                for (line, members) in partition(&stations, |s| Some(s.line)) {
                    if excluded(line) {
                        continue;
                    }
                    for (i, &u) in members.iter().enumerate() {
                        for &v in &members[i + 1..] {
                            let weight =
                                haversine_km(stations[u.0].position, stations[v.0].position);
                            if weight < config.max_distance_km {
                                builder.set(u, v, weight, EdgeKind::Line);
                                builder.set(v, u, weight, EdgeKind::Line);
                            }
                        }
                    }
                }
            }
        }

        let shared_groups = partition(&stations, |s| s.group.is_shared().then_some(s.group));
        for members in shared_groups.values() {
            for &u in members {
                for &v in members {
                    if stations[u.0].is_co_located_with(&stations[v.0]) {
                        builder.set(u, v, config.transfer_cost, EdgeKind::Transfer);
                    }
                }
            }
        }

        let graph = Self {
            stations,
            index,
            adjacency: builder.finish(),
        };

        debug!(
            stations = graph.len(),
            edges = graph.edge_count(),
            explicit = connections.is_some(),
            allow_special_line,
            "Built station graph"
        );

        graph
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Returns true if the graph has no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Look up the node for a station id.
    pub fn index_of(&self, id: StationId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// The station stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` did not come from this graph.
    pub fn station(&self, node: NodeIndex) -> &Station {
        &self.stations[node.0]
    }

    /// All stations, in node order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Outgoing edges of `node`, sorted by neighbor index.
    pub fn neighbors(&self, node: NodeIndex) -> &[Edge] {
        &self.adjacency[node.0]
    }

    /// The edge from `from` to `to`, if any.
    pub fn edge(&self, from: NodeIndex, to: NodeIndex) -> Option<&Edge> {
        let edges = &self.adjacency[from.0];
        edges
            .binary_search_by_key(&to, |e| e.to)
            .ok()
            .map(|i| &edges[i])
    }

    /// Weight of the edge from `from` to `to`, if any.
    pub fn edge_weight(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.edge(from, to).map(|e| e.weight)
    }

    /// Iterate over every directed edge as `(from, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, &Edge)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, edges)| edges.iter().map(move |e| (NodeIndex(i), e)))
    }
}

/// Bucket node indices by a key, preserving node order within each bucket.
fn partition<K: Ord>(
    stations: &[Station],
    key: impl Fn(&Station) -> Option<K>,
) -> BTreeMap<K, Vec<NodeIndex>> {
    let mut buckets: BTreeMap<K, Vec<NodeIndex>> = BTreeMap::new();
    for (i, station) in stations.iter().enumerate() {
        if let Some(k) = key(station) {
            buckets.entry(k).or_default().push(NodeIndex(i));
        }
    }
    buckets
}

/// Mutable neighbor maps used only during construction.
///
/// Setting an edge twice keeps the last weight.
struct EdgeSet {
    neighbors: Vec<BTreeMap<NodeIndex, (f64, EdgeKind)>>,
}

impl EdgeSet {
    fn new(nodes: usize) -> Self {
        Self {
            neighbors: vec![BTreeMap::new(); nodes],
        }
    }

    fn set(&mut self, from: NodeIndex, to: NodeIndex, weight: f64, kind: EdgeKind) {
        debug_assert!(from != to, "self-loop at {from:?}");
        debug_assert!(weight >= 0.0, "negative weight {weight}");
        self.neighbors[from.0].insert(to, (weight, kind));
    }

    fn finish(self) -> Vec<Vec<Edge>> {
        self.neighbors
            .into_iter()
            .map(|map| {
                map.into_iter()
                    .map(|(to, (weight, kind))| Edge { to, weight, kind })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::stations::{MemorySource, Snapshot};

    use crate::domain::GroupId;
    use crate::planner::config::TRANSFER_COST as TRANSFER;

    /// One kilometer of latitude, in degrees.
    const KM: f64 = 1.0 / 111.19492664455873;

    fn station(id: u32, group: u32, line: u32, north_km: f64) -> Station {
        Station::new(
            StationId(id),
            GroupId(group),
            format!("S{id}"),
            LineId(line),
            Coordinates::new(35.0 + north_km * KM, 139.0).unwrap(),
        )
    }

    fn node(graph: &Graph, id: u32) -> NodeIndex {
        graph.index_of(StationId(id)).unwrap()
    }

    fn weight(graph: &Graph, a: u32, b: u32) -> Option<f64> {
        graph.edge_weight(node(graph, a), node(graph, b))
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("edge should exist");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn every_station_is_a_node() {
        let stations = vec![station(3, 0, 1, 0.0), station(1, 0, 1, 1.0), station(2, 0, 2, 9.0)];
        let graph = Graph::build(stations, Some(&[]), false, &PlannerConfig::default());

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 0);
        let ids: Vec<_> = graph.stations().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(graph.neighbors(node(&graph, 2)).is_empty());
        assert!(graph.index_of(StationId(4)).is_none());
    }

    #[test]
    fn empty_graph() {
        let graph = Graph::build(vec![], None, false, &PlannerConfig::default());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn explicit_connections_are_symmetric_haversine() {
        let stations = vec![station(1, 0, 1, 0.0), station(2, 0, 1, 2.0)];
        let pairs = [(StationId(1), StationId(2))];
        let graph = Graph::build(stations, Some(&pairs), false, &PlannerConfig::default());

        assert_close(weight(&graph, 1, 2), 2.0);
        assert_close(weight(&graph, 2, 1), 2.0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn explicit_connections_ignore_distance_threshold() {
        let stations = vec![station(1, 0, 1, 0.0), station(2, 0, 1, 250.0)];
        let pairs = [(StationId(1), StationId(2))];
        let graph = Graph::build(stations, Some(&pairs), false, &PlannerConfig::default());

        assert_close(weight(&graph, 1, 2), 250.0);
    }

    #[test]
    fn unknown_and_self_pairs_are_skipped() {
        let stations = vec![station(1, 0, 1, 0.0), station(2, 0, 1, 1.0)];
        let pairs = [
            (StationId(1), StationId(99)),
            (StationId(98), StationId(2)),
            (StationId(1), StationId(1)),
        ];
        let graph = Graph::build(stations, Some(&pairs), false, &PlannerConfig::default());

        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn implicit_policy_connects_close_same_line_pairs() {
        let stations = vec![
            station(1, 0, 1, 0.0),
            station(2, 0, 1, 60.0),
            station(3, 0, 1, 150.0),
            station(4, 0, 2, 1.0),
        ];
        let graph = Graph::build(stations, None, false, &PlannerConfig::default());

        assert_close(weight(&graph, 1, 2), 60.0);
        assert_close(weight(&graph, 2, 3), 90.0);
        // 150 km is over the limit
        assert_eq!(weight(&graph, 1, 3), None);
        // different line, however close
        assert_eq!(weight(&graph, 1, 4), None);
    }

    #[test]
    fn implicit_threshold_is_strict() {
        let config = PlannerConfig::new(10.0, 2.0, LineId(9999), AdjacencyPolicy::Implicit);
        let stations = vec![station(1, 0, 1, 0.0), station(2, 0, 1, 2.0 + 1e-6)];
        let graph = Graph::build(stations, None, false, &config);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn transfer_edges_join_shared_groups() {
        let stations = vec![
            station(1, 7, 1, 0.0),
            station(2, 7, 2, 0.1),
            station(3, 7, 3, 0.2),
            station(4, 0, 4, 0.0),
            station(5, 0, 5, 0.0),
        ];
        let graph = Graph::build(stations, Some(&[]), false, &PlannerConfig::default());

        for (a, b) in [(1, 2), (1, 3), (2, 3)] {
            assert_eq!(weight(&graph, a, b), Some(TRANSFER));
            assert_eq!(weight(&graph, b, a), Some(TRANSFER));
        }
        // group zero never transfers
        assert_eq!(weight(&graph, 4, 5), None);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.edges().all(|(_, e)| e.kind == EdgeKind::Transfer));
    }

    #[test]
    fn transfer_overrides_line_edge() {
        let stations = vec![station(1, 7, 1, 0.0), station(2, 7, 1, 2.0)];
        let pairs = [(StationId(1), StationId(2))];
        let graph = Graph::build(stations, Some(&pairs), false, &PlannerConfig::default());

        let edge = graph.edge(node(&graph, 1), node(&graph, 2)).unwrap();
        assert_eq!(edge.weight, TRANSFER);
        assert_eq!(edge.kind, EdgeKind::Transfer);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn special_line_excluded_unless_allowed() {
        let config = PlannerConfig::default();
        let special = config.special_line.0;
        let stations = vec![
            station(1, 0, 1, 0.0),
            station(2, 5, 1, 1.0),
            station(3, 5, special, 1.0),
            station(4, 0, special, 3.0),
        ];
        let pairs = [
            (StationId(1), StationId(2)),
            (StationId(3), StationId(4)),
            (StationId(2), StationId(4)),
        ];

        let closed = Graph::build(stations.clone(), Some(&pairs), false, &config);
        assert!(weight(&closed, 1, 2).is_some());
        assert_eq!(weight(&closed, 3, 4), None);
        assert_eq!(weight(&closed, 2, 4), None);
        // transfers are unaffected
        assert_eq!(weight(&closed, 2, 3), Some(TRANSFER));

        let open = Graph::build(stations, Some(&pairs), true, &config);
        assert!(weight(&open, 3, 4).is_some());
        assert!(weight(&open, 2, 4).is_some());
    }

    #[test]
    fn special_line_excluded_under_implicit_policy() {
        let config = PlannerConfig::default().with_adjacency(AdjacencyPolicy::Implicit);
        let special = config.special_line.0;
        let stations = vec![station(1, 0, special, 0.0), station(2, 0, special, 1.0)];

        let closed = Graph::build(stations.clone(), None, false, &config);
        assert_eq!(closed.edge_count(), 0);

        let open = Graph::build(stations, None, true, &config);
        assert_eq!(open.edge_count(), 2);
    }

    #[test]
    fn neighbors_sorted_regardless_of_input_order() {
        let stations = vec![
            station(4, 0, 1, 3.0),
            station(1, 0, 1, 0.0),
            station(3, 0, 1, 2.0),
            station(2, 0, 1, 1.0),
        ];
        let pairs = [
            (StationId(1), StationId(4)),
            (StationId(1), StationId(2)),
            (StationId(3), StationId(1)),
        ];
        let graph = Graph::build(stations, Some(&pairs), false, &PlannerConfig::default());

        let order: Vec<_> = graph
            .neighbors(node(&graph, 1))
            .iter()
            .map(|e| graph.station(e.to).id.0)
            .collect();
        assert_eq!(order, vec![2, 3, 4]);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut dup = station(1, 0, 2, 5.0);
        dup.name = "dup".to_string();
        let graph = Graph::build(
            vec![station(1, 0, 1, 0.0), dup],
            None,
            false,
            &PlannerConfig::default(),
        );
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.station(NodeIndex(0)).name, "S1");
    }

    #[test]
    fn load_uses_connections_only_when_explicit() {
        let source = MemorySource::new(vec![station(1, 0, 1, 0.0), station(2, 0, 1, 1.0)])
            .with_connections(vec![]);

        let explicit = Graph::load(&source, &PlannerConfig::default(), false).unwrap();
        assert_eq!(explicit.edge_count(), 0);

        let implicit_config = PlannerConfig::default().with_adjacency(AdjacencyPolicy::Implicit);
        let implicit = Graph::load(&source, &implicit_config, false).unwrap();
        assert_eq!(implicit.edge_count(), 2);
    }

    #[test]
    fn load_falls_back_to_implicit_without_table() {
        let source = MemorySource::new(vec![station(1, 0, 1, 0.0), station(2, 0, 1, 1.0)]);
        let graph = Graph::load(&source, &PlannerConfig::default(), false).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn load_propagates_source_errors() {
        struct Broken;

        impl StationSource for Broken {
            fn active_stations(&self) -> Result<Vec<Station>, SourceError> {
                Ok(vec![])
            }

            fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError> {
                Err(SourceError::Io(std::io::Error::other("disk on fire")))
            }
        }

        let result = Graph::load(&Broken, &PlannerConfig::default(), false);
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[test]
    fn load_reads_one_snapshot() {
        // Per-table reads disagree with the snapshot; only the snapshot counts
        struct Snapshotted;

        impl StationSource for Snapshotted {
            fn active_stations(&self) -> Result<Vec<Station>, SourceError> {
                Err(SourceError::Io(std::io::Error::other("stale stations")))
            }

            fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError> {
                Err(SourceError::Io(std::io::Error::other("stale connections")))
            }

            fn snapshot(&self, with_connections: bool) -> Result<Snapshot, SourceError> {
                Ok(Snapshot {
                    stations: vec![station(1, 0, 1, 0.0), station(2, 0, 1, 1.0)],
                    connections: with_connections.then(|| vec![(StationId(1), StationId(2))]),
                })
            }
        }

        let explicit = Graph::load(&Snapshotted, &PlannerConfig::default(), false).unwrap();
        assert_close(weight(&explicit, 1, 2), 1.0);

        let implicit_config = PlannerConfig::default().with_adjacency(AdjacencyPolicy::Implicit);
        let implicit = Graph::load(&Snapshotted, &implicit_config, false).unwrap();
        assert_eq!(implicit.len(), 2);
    }
}
