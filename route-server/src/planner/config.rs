//! Planner configuration.

use std::fmt;
use std::str::FromStr;

use crate::domain::LineId;

/// Default penalty for changing lines, in kilometer-equivalents.
pub const TRANSFER_COST: f64 = 10.0;

/// Default upper bound (exclusive) for inferred same-line edges, in kilometers.
pub const MAX_DISTANCE_KM: f64 = 100.0;

/// Default line whose stations are excluded unless a request opts in.
pub const SPECIAL_LINE: LineId = LineId(9999);

/// How line edges are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjacencyPolicy {
    /// Use the source's connection table when it has one, otherwise fall
    /// back to [`AdjacencyPolicy::Implicit`].
    #[default]
    Explicit,

    /// Ignore any connection table and connect every same-line pair closer
    /// than the maximum distance.
    Implicit,
}

/// Error returned when parsing an unknown adjacency policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown adjacency policy {0:?} (expected \"explicit\" or \"implicit\")")]
pub struct InvalidAdjacencyPolicy(String);

impl FromStr for AdjacencyPolicy {
    type Err = InvalidAdjacencyPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "explicit" => Ok(AdjacencyPolicy::Explicit),
            "implicit" => Ok(AdjacencyPolicy::Implicit),
            _ => Err(InvalidAdjacencyPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for AdjacencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjacencyPolicy::Explicit => f.write_str("explicit"),
            AdjacencyPolicy::Implicit => f.write_str("implicit"),
        }
    }
}

/// Configuration parameters for graph construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Weight of a transfer edge between co-located stations.
    pub transfer_cost: f64,

    /// Inferred same-line edges must be strictly shorter than this (km).
    /// Only used by [`AdjacencyPolicy::Implicit`].
    pub max_distance_km: f64,

    /// Line whose edges are dropped unless the request allows it.
    pub special_line: LineId,

    /// How line edges are derived.
    pub adjacency: AdjacencyPolicy,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        transfer_cost: f64,
        max_distance_km: f64,
        special_line: LineId,
        adjacency: AdjacencyPolicy,
    ) -> Self {
        Self {
            transfer_cost,
            max_distance_km,
            special_line,
            adjacency,
        }
    }

    /// Same configuration with a different adjacency policy.
    pub fn with_adjacency(mut self, adjacency: AdjacencyPolicy) -> Self {
        self.adjacency = adjacency;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            transfer_cost: TRANSFER_COST,
            max_distance_km: MAX_DISTANCE_KM,
            special_line: SPECIAL_LINE,
            adjacency: AdjacencyPolicy::Explicit,
        }
    }
}
