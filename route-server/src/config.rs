//! Server configuration from environment variables.
//!
//! Every setting has a default. A variable that is set but cannot be parsed
//! is logged and replaced by the default rather than aborting startup.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use crate::domain::LineId;
use crate::planner::{AdjacencyPolicy, PlannerConfig};
use crate::stations::{CsvSource, SqliteSource, StationSource};

pub const BIND_ADDR_VAR: &str = "ROUTE_BIND_ADDR";
pub const DATA_VAR: &str = "ROUTE_DATA";
pub const STATIC_DIR_VAR: &str = "ROUTE_STATIC_DIR";
pub const TRANSFER_COST_VAR: &str = "ROUTE_TRANSFER_COST";
pub const MAX_DISTANCE_VAR: &str = "ROUTE_MAX_DISTANCE";
pub const SPECIAL_LINE_VAR: &str = "ROUTE_SPECIAL_LINE";
pub const ADJACENCY_VAR: &str = "ROUTE_ADJACENCY";

/// Errors in configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Data source string had no path
    #[error("invalid data source {0:?} (expected sqlite:<path>, csv:<dir> or a path)")]
    InvalidDataSource(String),

    /// A distance or cost was negative, zero where not allowed, or not finite
    #[error("invalid {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Where station data is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceConfig {
    /// SQLite database file
    Sqlite(PathBuf),

    /// Directory of CSV dumps
    Csv(PathBuf),
}

impl DataSourceConfig {
    /// Create the station source this configuration describes.
    pub fn open(&self) -> Arc<dyn StationSource> {
        match self {
            DataSourceConfig::Sqlite(path) => Arc::new(SqliteSource::new(path)),
            DataSourceConfig::Csv(dir) => Arc::new(CsvSource::new(dir)),
        }
    }
}

impl FromStr for DataSourceConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidDataSource(s.to_string());

        let (kind, path) = match s.split_once(':') {
            Some(("sqlite", path)) => ("sqlite", path),
            Some(("csv", path)) => ("csv", path),
            _ => ("sqlite", s),
        };
        if path.is_empty() {
            return Err(invalid());
        }

        Ok(match kind {
            "csv" => DataSourceConfig::Csv(PathBuf::from(path)),
            _ => DataSourceConfig::Sqlite(PathBuf::from(path)),
        })
    }
}

impl fmt::Display for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceConfig::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            DataSourceConfig::Csv(dir) => write!(f, "csv:{}", dir.display()),
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub data: DataSourceConfig,
    pub static_dir: PathBuf,
    pub planner: PlannerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data: DataSourceConfig::Sqlite(PathBuf::from("./test.db")),
            static_dir: PathBuf::from("./static"),
            planner: PlannerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value when set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let planner = defaults.planner.clone();

        Self {
            bind_addr: parse_var(&lookup, BIND_ADDR_VAR, defaults.bind_addr, str::parse),
            data: parse_var(&lookup, DATA_VAR, defaults.data, str::parse),
            static_dir: lookup(STATIC_DIR_VAR)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            planner: PlannerConfig {
                transfer_cost: parse_var(&lookup, TRANSFER_COST_VAR, planner.transfer_cost, |s| {
                    non_negative("transfer cost", s)
                }),
                max_distance_km: parse_var(
                    &lookup,
                    MAX_DISTANCE_VAR,
                    planner.max_distance_km,
                    |s| positive("max distance", s),
                ),
                special_line: parse_var(&lookup, SPECIAL_LINE_VAR, planner.special_line, |s| {
                    s.trim().parse().map(LineId)
                }),
                adjacency: parse_var(&lookup, ADJACENCY_VAR, planner.adjacency, str::parse),
            },
        }
    }
}

// - var not set -> use default value
// - var set but not parsable -> warn and use default value
fn parse_var<T, Parser, ParseErr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
    parser: Parser,
) -> T
where
    Parser: Fn(&str) -> Result<T, ParseErr>,
    ParseErr: fmt::Display,
    T: fmt::Debug,
{
    match lookup(name) {
        Some(value) => parser(&value).unwrap_or_else(|err| {
            warn!(
                variable = name,
                %value,
                %err,
                ?default,
                "Could not parse environment variable, using default"
            );
            default
        }),
        None => default,
    }
}

fn non_negative(name: &'static str, s: &str) -> Result<f64, ConfigError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: s.to_string(),
        }),
    }
}

fn positive(name: &'static str, s: &str) -> Result<f64, ConfigError> {
    match non_negative(name, s) {
        Ok(v) if v > 0.0 => Ok(v),
        _ => Err(ConfigError::InvalidNumber {
            name,
            value: s.to_string(),
        }),
    }
}
