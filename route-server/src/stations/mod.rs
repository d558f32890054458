//! Station data sources.
//!
//! The planner reads stations and their connections through the
//! [`StationSource`] trait. Each request fetches a fresh snapshot; nothing
//! here is cached or written back.

mod dump;
mod error;
mod memory;
mod source;
mod sqlite;

pub use dump::{CsvSource, JOINS_FILE, STATIONS_FILE};
pub use error::SourceError;
pub use memory::MemorySource;
pub use source::{ConnectionPair, Snapshot, StationSource};
pub use sqlite::SqliteSource;
