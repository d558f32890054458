//! Station data source error types.

/// Errors that can occur when reading station data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// SQLite query or connection failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// CSV file could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A row was readable but held values the planner cannot use
    #[error("invalid record for station {station}: {message}")]
    InvalidRecord { station: String, message: String },
}
