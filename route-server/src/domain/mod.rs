//! Domain types for the route planner.
//!
//! Station records are validated when they enter the system, so the
//! planner can trust identifiers and coordinates it receives.

mod geo;
mod station;

pub use geo::{Coordinates, EARTH_RADIUS_KM, InvalidCoordinates, haversine_km};
pub use station::{GroupId, InvalidStationId, LineId, Station, StationId};
