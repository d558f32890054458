//! Route assembly.
//!
//! Turns a node path into the stops a passenger sees, marking where the
//! route changes lines.

use crate::domain::{Coordinates, LineId, StationId};

use super::graph::{Graph, NodeIndex};

/// One stop on a planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub station: StationId,
    pub name: String,
    pub line: LineId,
    pub position: Coordinates,

    /// The route changed onto this stop's line here.
    pub transfer: bool,
}

/// A planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Stops in travel order, origin first.
    pub stops: Vec<RouteStop>,

    /// Solver distance to the destination in kilometers, transfer
    /// penalties included.
    pub total_distance: f64,

    /// Number of stops flagged as transfers.
    pub transfers: usize,
}

impl Route {
    pub fn origin(&self) -> Option<&RouteStop> {
        self.stops.first()
    }

    pub fn destination(&self) -> Option<&RouteStop> {
        self.stops.last()
    }
}

/// Build the route for `path`, reporting `total_distance` as given.
///
/// A stop is a transfer when its line differs from the previous stop's line
/// and both stations belong to the same group.
pub fn assemble(graph: &Graph, path: &[NodeIndex], total_distance: f64) -> Route {
    let mut stops = Vec::with_capacity(path.len());
    let mut transfers = 0;

    for (i, &node) in path.iter().enumerate() {
        let station = graph.station(node);

        let transfer = i > 0 && {
            let previous = graph.station(path[i - 1]);
            previous.line != station.line && previous.group == station.group
        };
        if transfer {
            transfers += 1;
        }

        stops.push(RouteStop {
            station: station.id,
            name: station.name.clone(),
            line: station.line,
            position: station.position,
            transfer,
        });
    }

    Route {
        stops,
        total_distance,
        transfers,
    }
}
