//! Geographic coordinates and great-circle distance.

use serde::Serialize;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Error returned for coordinates outside the valid WGS84 ranges.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid coordinates: lat {lat}, lon {lon}")]
pub struct InvalidCoordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A point on the Earth's surface, in degrees.
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]; both are
/// finite. Any `Coordinates` value satisfies this by construction, which
/// keeps [`haversine_km`] free of `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Validate and create a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinates> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);

        if lat_ok && lon_ok {
            Ok(Self { lat, lon })
        } else {
            Err(InvalidCoordinates { lat, lon })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Great-circle distance between two points, in kilometers.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// # Examples
///
/// ```
/// use route_server::domain::{Coordinates, haversine_km};
///
/// let tokyo = Coordinates::new(35.681236, 139.767125).unwrap();
/// assert_eq!(haversine_km(tokyo, tokyo), 0.0);
/// ```
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let h = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon2 - lon1) / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinates::new(90.1, 0.0).is_err());
        assert!(Coordinates::new(-90.1, 0.0).is_err());
        assert!(Coordinates::new(0.0, 180.5).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn zero_distance_to_self() {
        let p = at(35.681236, 139.767125);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * R / 360
        let d = haversine_km(at(0.0, 0.0), at(1.0, 0.0));
        assert!((d - 111.19492664455873).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn tokyo_to_shinjuku() {
        let tokyo = at(35.681236, 139.767125);
        let shinjuku = at(35.690921, 139.700258);
        let d = haversine_km(tokyo, shinjuku);
        assert!((6.0..6.2).contains(&d), "got {d}");
    }

    #[test]
    fn antipodal_is_half_circumference() {
        let d = haversine_km(at(0.0, 0.0), at(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
