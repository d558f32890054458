//! Route planning entry points.

use tracing::debug;

use crate::domain::StationId;
use crate::stations::{SourceError, StationSource};

use super::config::PlannerConfig;
use super::dijkstra::shortest_paths;
use super::graph::Graph;
use super::path::reconstruct;
use super::response::{Route, assemble};

/// Error from route planning.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The station data could not be read
    #[error("station data unavailable: {0}")]
    DataUnavailable(#[from] SourceError),

    /// A requested station is not among the active stations
    #[error("unknown station {0}")]
    UnknownStation(StationId),

    /// The stations are in disconnected parts of the network
    #[error("no route from {from} to {to}")]
    NoPath { from: StationId, to: StationId },
}

/// Request for a route between two stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteQuery {
    pub start: StationId,
    pub end: StationId,

    /// Whether the configured special line may be ridden.
    pub allow_special_line: bool,
}

impl RouteQuery {
    pub fn new(start: StationId, end: StationId) -> Self {
        Self {
            start,
            end,
            allow_special_line: false,
        }
    }

    pub fn allow_special_line(mut self, allow: bool) -> Self {
        self.allow_special_line = allow;
        self
    }
}

/// Plan a route against a fresh snapshot of `source`.
///
/// Builds a new graph for this query; nothing is reused between calls.
pub fn plan_route(
    source: &dyn StationSource,
    config: &PlannerConfig,
    query: &RouteQuery,
) -> Result<Route, RouteError> {
    let graph = Graph::load(source, config, query.allow_special_line)?;
    find_route(&graph, query.start, query.end)
}

/// Find the shortest route between two stations of an already built graph.
pub fn find_route(graph: &Graph, start: StationId, end: StationId) -> Result<Route, RouteError> {
    let from = graph
        .index_of(start)
        .ok_or(RouteError::UnknownStation(start))?;
    let to = graph.index_of(end).ok_or(RouteError::UnknownStation(end))?;

    let paths = shortest_paths(graph, from);
    let path = reconstruct(&paths, to).ok_or(RouteError::NoPath {
        from: start,
        to: end,
    })?;

    let route = assemble(graph, &path, paths.distance(to));

    debug!(
        %start,
        %end,
        stops = route.stops.len(),
        transfers = route.transfers,
        distance = route.total_distance,
        "Route found"
    );

    Ok(route)
}
