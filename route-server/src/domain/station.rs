//! Station records and their identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geo::Coordinates;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id {input:?}: {reason}")]
pub struct InvalidStationId {
    input: String,
    reason: &'static str,
}

/// Identity of a single station on a single line.
///
/// Co-located stations on different lines have different ids but share a
/// [`GroupId`].
///
/// # Examples
///
/// ```
/// use route_server::domain::StationId;
///
/// let id = StationId::parse("1130101").unwrap();
/// assert_eq!(id, StationId(1130101));
///
/// // Surrounding whitespace is tolerated
/// assert_eq!(StationId::parse(" 42 ").unwrap(), StationId(42));
///
/// // Anything else is rejected
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("12a").is_err());
/// assert!(StationId::parse("-3").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl StationId {
    /// Parse a decimal station identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must contain only decimal digits",
            });
        }

        trimmed.parse().map(StationId).map_err(|_| InvalidStationId {
            input: s.to_string(),
            reason: "out of range",
        })
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a station complex.
///
/// Stations sharing a non-zero group id are physically co-located and can
/// be changed between. Zero means "not part of any group".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl GroupId {
    /// Whether stations carrying this group id may be transferred between.
    pub fn is_shared(&self) -> bool {
        self.0 != 0
    }
}

/// Identity of a line (a named service route).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An active station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub group: GroupId,
    pub name: String,
    pub line: LineId,
    pub position: Coordinates,
}

impl Station {
    /// Create a new station record.
    pub fn new(
        id: StationId,
        group: GroupId,
        name: impl Into<String>,
        line: LineId,
        position: Coordinates,
    ) -> Self {
        Self {
            id,
            group,
            name: name.into(),
            line,
            position,
        }
    }

    /// Whether a passenger can change between `self` and `other` without
    /// riding a line.
    pub fn is_co_located_with(&self, other: &Station) -> bool {
        self.id != other.id && self.group.is_shared() && self.group == other.group
    }
}
