//! SQLite-backed station data.
//!
//! Reads the `m_station` and `m_station_join` tables of an ekidata-style
//! database. The file is opened read-only on every call, so concurrent
//! requests never contend for a shared connection. Tables loaded with
//! `sqlite3 .import` store every column as text, so numeric columns accept
//! decimal text as well as native numbers.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::domain::{Station, StationId};

use super::error::SourceError;
use super::source::{
    ConnectionPair, Snapshot, StationRecord, StationSource, active_from_records,
};

const STATIONS_QUERY: &str = "SELECT station_cd, station_g_cd, station_name, line_cd, lon, lat \
     FROM m_station \
     WHERE e_status IS NULL OR e_status = 0";

const JOINS_QUERY: &str = "SELECT station_cd1, station_cd2 FROM m_station_join";

/// Station source reading from an SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    /// Create a source for the database at `path`.
    ///
    /// The file is not touched until the first query.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The database file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, SourceError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }

    fn read_stations(&self, conn: &Connection) -> Result<Vec<Station>, SourceError> {
        let mut stmt = conn.prepare(STATIONS_QUERY)?;
        let mut rows = stmt.query([])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let id = station_id(row.get_ref(0)?)?;
            let station = id.to_string();
            records.push(StationRecord {
                station_cd: id.0,
                station_g_cd: integer(row.get_ref(1)?, &station, "station_g_cd")?,
                station_name: row.get(2)?,
                line_cd: integer(row.get_ref(3)?, &station, "line_cd")?,
                lon: real(row.get_ref(4)?, &station, "lon")?,
                lat: real(row.get_ref(5)?, &station, "lat")?,
                e_status: None,
            });
        }

        debug!(rows = records.len(), path = %self.path.display(), "Loaded stations");
        active_from_records(records)
    }

    fn read_connections(&self, conn: &Connection) -> Result<Vec<ConnectionPair>, SourceError> {
        let mut stmt = conn.prepare(JOINS_QUERY)?;
        let mut rows = stmt.query([])?;

        let mut pairs = Vec::new();
        while let Some(row) = rows.next()? {
            let a = station_id(row.get_ref(0)?)?;
            let b = station_id(row.get_ref(1)?)?;
            pairs.push((a, b));
        }

        debug!(rows = pairs.len(), path = %self.path.display(), "Loaded connections");
        Ok(pairs)
    }
}

impl StationSource for SqliteSource {
    fn active_stations(&self) -> Result<Vec<Station>, SourceError> {
        let conn = self.open()?;
        self.read_stations(&conn)
    }

    fn connections(&self) -> Result<Option<Vec<ConnectionPair>>, SourceError> {
        let conn = self.open()?;
        self.read_connections(&conn).map(Some)
    }

    /// Both tables are read inside one transaction.
    fn snapshot(&self, with_connections: bool) -> Result<Snapshot, SourceError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        let stations = self.read_stations(&tx)?;
        let connections = if with_connections {
            Some(self.read_connections(&tx)?)
        } else {
            None
        };
        tx.commit()?;

        Ok(Snapshot {
            stations,
            connections,
        })
    }
}

/// Station ids appear as either integers or decimal text.
fn station_id(value: ValueRef<'_>) -> Result<StationId, SourceError> {
    match value {
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            StationId::parse(&text).map_err(|e| SourceError::InvalidRecord {
                station: text.to_string(),
                message: e.to_string(),
            })
        }
        ValueRef::Integer(n) => integer(value, &n.to_string(), "station id").map(StationId),
        other => Err(SourceError::InvalidRecord {
            station: format!("{other:?}"),
            message: "station id must be an integer or text".to_string(),
        }),
    }
}

fn integer(value: ValueRef<'_>, station: &str, column: &str) -> Result<u32, SourceError> {
    let invalid = |message: String| SourceError::InvalidRecord {
        station: station.to_string(),
        message,
    };

    match value {
        ValueRef::Integer(n) => {
            u32::try_from(n).map_err(|_| invalid(format!("{column} {n} out of range")))
        }
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.trim()
                .parse()
                .map_err(|e| invalid(format!("{column} {text:?}: {e}")))
        }
        other => Err(invalid(format!(
            "{column} must be an integer or text, got {other:?}"
        ))),
    }
}

fn real(value: ValueRef<'_>, station: &str, column: &str) -> Result<f64, SourceError> {
    let invalid = |message: String| SourceError::InvalidRecord {
        station: station.to_string(),
        message,
    };

    match value {
        ValueRef::Real(x) => Ok(x),
        ValueRef::Integer(n) => Ok(n as f64),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            text.trim()
                .parse()
                .map_err(|e| invalid(format!("{column} {text:?}: {e}")))
        }
        other => Err(invalid(format!(
            "{column} must be a number or text, got {other:?}"
        ))),
    }
}
