//! The station data collaborator seen by the planner.

use serde::Deserialize;

use crate::domain::{Coordinates, GroupId, LineId, Station, StationId};

use super::error::SourceError;

/// An undirected pair of stations directly connected by a line.
pub type ConnectionPair = (StationId, StationId);

/// Read-only supplier of station data.
///
/// This abstraction lets the planner run against fixture data in tests and
/// against a database in production. Implementations are shared between
/// concurrent requests and must not hold per-request state.
pub trait StationSource: Send + Sync {
    /// The current set of active stations.
    fn active_stations(&self) -> Result<Vec<Station>, SourceError>;

    /// Explicit connectivity between stations.
    ///
    /// Returns `None` when the source has no connection table, in which case
    /// the planner infers same-line adjacency from distance instead.
    fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError>;

    /// Stations, and connections when `with_connections` is set, read
    /// together.
    ///
    /// Sources that can change underneath a reader override this so both
    /// parts come from the same state.
    fn snapshot(&self, with_connections: bool) -> Result<Snapshot, SourceError> {
        let stations = self.active_stations()?;
        let connections = if with_connections {
            self.connections()?
        } else {
            None
        };
        Ok(Snapshot {
            stations,
            connections,
        })
    }
}

/// Station data read from one state of a source.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stations: Vec<Station>,
    pub connections: Option<Vec<ConnectionPair>>,
}

/// A station row as stored in the `m_station` table and its CSV dump.
///
/// Extra columns in the dump are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StationRecord {
    pub station_cd: u32,
    pub station_g_cd: u32,
    pub station_name: String,
    pub line_cd: u32,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub e_status: Option<u8>,
}

impl StationRecord {
    /// Whether the station is in service.
    pub fn is_active(&self) -> bool {
        matches!(self.e_status, None | Some(0))
    }

    /// Validate the row into a domain station.
    pub fn into_station(self) -> Result<Station, SourceError> {
        let position =
            Coordinates::new(self.lat, self.lon).map_err(|e| SourceError::InvalidRecord {
                station: self.station_cd.to_string(),
                message: e.to_string(),
            })?;

        Ok(Station::new(
            StationId(self.station_cd),
            GroupId(self.station_g_cd),
            self.station_name,
            LineId(self.line_cd),
            position,
        ))
    }
}

/// Keep active rows and validate them, failing on the first bad row.
pub(crate) fn active_from_records(
    records: impl IntoIterator<Item = StationRecord>,
) -> Result<Vec<Station>, SourceError> {
    records
        .into_iter()
        .filter(StationRecord::is_active)
        .map(StationRecord::into_station)
        .collect()
}
