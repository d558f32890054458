//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{GroupId, InvalidStationId, LineId, Station, StationId};
use crate::planner::{Route, RouteQuery, RouteStop};

/// A station identifier as sent by clients: a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StationIdParam {
    Number(u64),
    Text(String),
}

impl StationIdParam {
    /// Validate into a station id.
    pub fn parse(&self) -> Result<StationId, InvalidStationId> {
        match self {
            StationIdParam::Number(n) => StationId::parse(&n.to_string()),
            StationIdParam::Text(s) => StationId::parse(s),
        }
    }
}

/// Request to plan a route.
///
/// The older field names `startCD`, `endCD` and `allow78` are accepted too.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    /// Origin station id
    #[serde(alias = "startCD")]
    pub start_id: StationIdParam,

    /// Destination station id
    #[serde(alias = "endCD")]
    pub end_id: StationIdParam,

    /// Whether the special line may be used (defaults to false)
    #[serde(default, alias = "allow78")]
    pub allow_special_line: bool,
}

impl RouteRequest {
    /// Validate into a planner query.
    pub fn to_query(&self) -> Result<RouteQuery, InvalidStationId> {
        Ok(RouteQuery::new(self.start_id.parse()?, self.end_id.parse()?)
            .allow_special_line(self.allow_special_line))
    }
}

/// A stop on a planned route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationPathResult {
    /// Station display name
    pub name: String,

    /// Line served at this stop
    pub line_id: LineId,

    pub lat: f64,
    pub lon: f64,

    /// Whether the route changes onto this line here
    pub transfer: bool,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// Stops in travel order, origin first
    pub path: Vec<StationPathResult>,

    /// Total cost in kilometers, transfer penalties included
    pub total_distance: f64,

    /// Number of line changes along the route
    pub transfers: usize,
}

/// An active station, for populating station pickers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationListEntry {
    pub id: StationId,
    pub name: String,
    pub line_id: LineId,
    pub group_id: GroupId,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationPathResult {
    /// Create from a planned stop.
    pub fn from_stop(stop: &RouteStop) -> Self {
        Self {
            name: stop.name.clone(),
            line_id: stop.line,
            lat: stop.position.lat(),
            lon: stop.position.lon(),
            transfer: stop.transfer,
        }
    }
}

impl RouteResponse {
    /// Create from a planned route.
    pub fn from_route(route: &Route) -> Self {
        Self {
            path: route.stops.iter().map(StationPathResult::from_stop).collect(),
            total_distance: route.total_distance,
            transfers: route.transfers,
        }
    }
}

impl StationListEntry {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id,
            name: station.name.clone(),
            line_id: station.line,
            group_id: station.group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn stop(name: &str, line: u32, transfer: bool) -> RouteStop {
        RouteStop {
            station: StationId(1),
            name: name.to_string(),
            line: LineId(line),
            position: Coordinates::new(35.681236, 139.767125).unwrap(),
            transfer,
        }
    }

    #[test]
    fn parse_request_with_string_ids() {
        let req: RouteRequest =
            serde_json::from_str(r#"{"startId": "1130101", "endId": "1130105"}"#).unwrap();
        let query = req.to_query().unwrap();

        assert_eq!(query.start, StationId(1130101));
        assert_eq!(query.end, StationId(1130105));
        assert!(!query.allow_special_line);
    }

    #[test]
    fn parse_request_with_numeric_ids() {
        let req: RouteRequest = serde_json::from_str(
            r#"{"startId": 1130101, "endId": 2800101, "allowSpecialLine": true}"#,
        )
        .unwrap();
        let query = req.to_query().unwrap();

        assert_eq!(query.start, StationId(1130101));
        assert_eq!(query.end, StationId(2800101));
        assert!(query.allow_special_line);
    }

    #[test]
    fn parse_request_with_legacy_names() {
        let req: RouteRequest =
            serde_json::from_str(r#"{"startCD": "1", "endCD": "2", "allow78": true}"#).unwrap();
        let query = req.to_query().unwrap();

        assert_eq!(query.start, StationId(1));
        assert_eq!(query.end, StationId(2));
        assert!(query.allow_special_line);
    }

    #[test]
    fn malformed_ids_fail_validation() {
        let req: RouteRequest =
            serde_json::from_str(r#"{"startId": "tokyo", "endId": "2"}"#).unwrap();
        assert!(req.to_query().is_err());

        let req: RouteRequest =
            serde_json::from_str(r#"{"startId": 99999999999, "endId": "2"}"#).unwrap();
        assert!(req.to_query().is_err());
    }

    #[test]
    fn missing_or_mistyped_fields_fail_decoding() {
        assert!(serde_json::from_str::<RouteRequest>(r#"{"startId": "1"}"#).is_err());
        assert!(serde_json::from_str::<RouteRequest>(r#"{"startId": -1, "endId": 2}"#).is_err());
        assert!(serde_json::from_str::<RouteRequest>(r#"{"startId": true, "endId": 2}"#).is_err());
    }

    #[test]
    fn route_response_json_shape() {
        let route = Route {
            stops: vec![stop("Tokyo", 11302, false), stop("Otemachi", 28001, true)],
            total_distance: 12.5,
            transfers: 1,
        };

        let json = serde_json::to_value(RouteResponse::from_route(&route)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": [
                    {"name": "Tokyo", "lineId": 11302, "lat": 35.681236, "lon": 139.767125, "transfer": false},
                    {"name": "Otemachi", "lineId": 28001, "lat": 35.681236, "lon": 139.767125, "transfer": true},
                ],
                "totalDistance": 12.5,
                "transfers": 1,
            })
        );
    }

    #[test]
    fn station_list_entry_json_shape() {
        let station = Station::new(
            StationId(1130101),
            GroupId(1130101),
            "Tokyo",
            LineId(11302),
            Coordinates::new(35.681236, 139.767125).unwrap(),
        );

        let json = serde_json::to_value(StationListEntry::from_station(&station)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1130101, "name": "Tokyo", "lineId": 11302, "groupId": 1130101})
        );
    }
}
