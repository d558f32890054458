//! Shortest-route planner.
//!
//! This module implements the core algorithm that answers:
//! "what is the shortest way from station A to station B?"
//!
//! Each query builds a fresh weighted graph from the station snapshot (line
//! edges weighted by great-circle distance plus fixed-cost transfer edges
//! inside station groups), runs Dijkstra from the origin, walks the
//! predecessor chain back from the destination and annotates the stops
//! where the route changes lines.

mod config;
mod dijkstra;
mod graph;
mod path;
mod queue;
mod response;
mod route;


pub use config::{
    AdjacencyPolicy, InvalidAdjacencyPolicy, MAX_DISTANCE_KM, PlannerConfig, SPECIAL_LINE,
    TRANSFER_COST,
};
pub use dijkstra::{ShortestPaths, shortest_paths};
pub use graph::{Edge, EdgeKind, Graph, NodeIndex};
pub use path::reconstruct;
pub use queue::{MinQueue, QueueItem};
pub use response::{Route, RouteStop, assemble};
pub use route::{RouteError, RouteQuery, find_route, plan_route};
