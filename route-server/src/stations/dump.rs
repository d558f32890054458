//! CSV-backed station data.
//!
//! Reads ekidata-style dumps from a directory: `station.csv` with the
//! station rows and an optional `join.csv` with the connection rows.
//! Without `join.csv` the source reports no connection table.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Station, StationId};

use super::error::SourceError;
use super::source::{ConnectionPair, StationRecord, StationSource, active_from_records};

pub const STATIONS_FILE: &str = "station.csv";
pub const JOINS_FILE: &str = "join.csv";

#[derive(Debug, Deserialize)]
struct JoinRecord {
    station_cd1: u32,
    station_cd2: u32,
}

/// Station source reading CSV dumps from a directory.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    /// Create a source for the dumps in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl StationSource for CsvSource {
    fn active_stations(&self) -> Result<Vec<Station>, SourceError> {
        let mut reader = csv::Reader::from_path(self.dir.join(STATIONS_FILE))?;
        let records = reader
            .deserialize::<StationRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = records.len(), dir = %self.dir.display(), "Loaded stations");
        active_from_records(records)
    }

    fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError> {
        let path = self.dir.join(JOINS_FILE);
        if !path.try_exists()? {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let pairs = reader
            .deserialize::<JoinRecord>()
            .map(|row| row.map(|r| (StationId(r.station_cd1), StationId(r.station_cd2))))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = pairs.len(), dir = %self.dir.display(), "Loaded connections");
        Ok(Some(pairs))
    }
}
