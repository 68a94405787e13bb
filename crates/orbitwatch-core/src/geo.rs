//! Great-circle geodesy over a spherical Earth.
//!
//! All functions here are pure and total. Identical endpoints yield a zero
//! distance and a bearing of 0 by convention; antipodal points yield roughly
//! half the Earth's circumference. Longitudes are wrapped into [-180, 180]
//! before any delta is taken, so tracks crossing the antimeridian never see
//! a spurious near-360-degree delta.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
///
/// Latitude is expected in [-90, 90]. Longitude is wrapped into [-180, 180]
/// by [`GeoPoint::new`]; values arriving from external sources may be
/// un-normalized and must go through the constructor or [`normalize_lon`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, wrapping the longitude into [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude: normalize_lon(longitude),
        }
    }
}

/// Wrap a longitude in degrees into [-180, 180].
///
/// 180 itself maps to -180, so the output range is [-180, 180).
pub fn normalize_lon(lon_deg: f64) -> f64 {
    (lon_deg + 540.0).rem_euclid(360.0) - 180.0
}

/// Haversine great-circle distance between two points, in kilometers.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = normalize_lon(b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_RADIUS_KM * c
}

/// Forward azimuth from `a` to `b` in degrees, normalized to [0, 360).
///
/// Identical endpoints produce 0. Callers that care about a meaningful
/// direction must ensure the two points differ.
pub fn initial_bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lon = normalize_lon(b.longitude - a.longitude).to_radians();
    let y = d_lon.sin() * lat_b.cos();
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// One of the eight compass points, each covering a 45-degree sector
/// centered on its cardinal or intercardinal bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    /// The display label for this compass point.
    pub fn label(self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Map a bearing in degrees to its compass point.
///
/// Sectors are centered on the cardinals: anything within 22.5 degrees of
/// due north is `N`, and so on around the rose. Bearings outside [0, 360)
/// are wrapped first.
pub fn compass_point(bearing_deg: f64) -> CompassPoint {
    const POINTS: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];
    let sector = ((bearing_deg.rem_euclid(360.0) + 22.5) / 45.0).floor() as usize % 8;
    POINTS[sector]
}

/// Project a point along a great circle by `distance_km` at `bearing_deg`.
///
/// The result longitude is normalized into [-180, 180].
pub fn destination_point(origin: GeoPoint, distance_km: f64, bearing_deg: f64) -> GeoPoint {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint {
        latitude: lat2.to_degrees(),
        longitude: normalize_lon(lon2.to_degrees()),
    }
}
