//! In-memory station data.

use crate::domain::Station;

use super::error::SourceError;
use super::source::{ConnectionPair, StationSource};

/// Station source that serves fixed data held in memory.
///
/// Useful for tests and for embedding the planner without a database.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    stations: Vec<Station>,
    connections: Option<Vec<ConnectionPair>>,
}

impl MemorySource {
    /// Create a source with no connection table.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations,
            connections: None,
        }
    }

    /// Attach an explicit connection table.
    pub fn with_connections(mut self, connections: Vec<ConnectionPair>) -> Self {
        self.connections = Some(connections);
        self
    }
}

impl StationSource for MemorySource {
    fn active_stations(&self) -> Result<Vec<Station>, SourceError> {
        Ok(self.stations.clone())
    }

    fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError> {
        Ok(self.connections.clone())
    }
}
