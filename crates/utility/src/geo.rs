use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid latitude {0}: expected a finite value in [-90, 90]")]
    InvalidLatitude(f64),
    #[error("invalid longitude {0}: expected a finite value in [-180, 180]")]
    InvalidLongitude(f64),
    #[error("invalid radius {0}: expected a finite, non-negative value in km")]
    InvalidRadius(f64),
}

pub type Result<T> = std::result::Result<T, GeoError>;

/// A position on the earth's surface in decimal degrees.
///
/// Values built through [`GeoPoint::new`] are always valid. Values that come
/// in through deserialization are not checked until they reach one of the
/// distance functions, which validate again before computing anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Self {
            latitude,
            longitude,
        }
        .validate()
    }

    pub fn validate(self) -> Result<Self> {
        // NaN fails both range checks
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(self)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

pub fn validate_radius(radius_km: f64) -> Result<f64> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius(radius_km))
    }
}

/// Great-circle distance in km between two points (haversine, mean earth
/// radius). This is the only distance function used for "nearby" decisions.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> Result<f64> {
    let a = a.validate()?;
    let b = b.validate()?;
    Ok(haversine_distance(
        a.latitude,
        a.longitude,
        b.latitude,
        b.longitude,
    ))
}

/// Inclusive containment: a point exactly on the circle counts as inside.
pub fn is_within_radius(center: &GeoPoint, point: &GeoPoint, radius_km: f64) -> Result<bool> {
    let radius_km = validate_radius(radius_km)?;
    Ok(distance_km(center, point)? <= radius_km)
}

/// Initial bearing from `a` towards `b` in degrees, normalized to [0, 360).
pub fn bearing_deg(a: &GeoPoint, b: &GeoPoint) -> Result<f64> {
    let a = a.validate()?;
    let b = b.validate()?;
    let lat1 = to_radians(a.latitude);
    let lat2 = to_radians(b.latitude);
    let dlon = to_radians(b.longitude - a.longitude);

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = to_degrees(y.atan2(x)).rem_euclid(360.0);
    // rem_euclid may round up to exactly 360.0 for tiny negative inputs
    Ok(if bearing >= 360.0 { 0.0 } else { bearing })
}

fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push `a` a hair above 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Axis-aligned lat/lon box enclosing a circle. Only meant as a coarse store
/// pre-filter: it may include points outside the circle, never excludes one
/// inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude)
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude)
    }
}

pub fn calculate_bounding_box(center: &GeoPoint, radius_km: f64) -> Result<BoundingBox> {
    let center = center.validate()?;
    let radius_km = validate_radius(radius_km)?;

    let lat_rad = to_radians(center.latitude);
    let lon_rad = to_radians(center.longitude);
    let angular_radius = radius_km / EARTH_RADIUS_KM;

    // Latitude bounds
    let min_lat = lat_rad - angular_radius;
    let max_lat = lat_rad + angular_radius;

    let half_pi = std::f64::consts::FRAC_PI_2;
    let (min_lon, max_lon) = if min_lat <= -half_pi || max_lat >= half_pi {
        // circle covers a pole, every longitude is in reach
        (to_radians(MIN_LONGITUDE), to_radians(MAX_LONGITUDE))
    } else {
        // Longitude bounds (adjusted by latitude)
        let delta_lon = (angular_radius.sin() / lat_rad.cos()).clamp(-1.0, 1.0).asin();
        let min_lon = lon_rad - delta_lon;
        let max_lon = lon_rad + delta_lon;
        if min_lon < to_radians(MIN_LONGITUDE) || max_lon > to_radians(MAX_LONGITUDE) {
            // crosses the antimeridian
            (to_radians(MIN_LONGITUDE), to_radians(MAX_LONGITUDE))
        } else {
            (min_lon, max_lon)
        }
    };

    Ok(BoundingBox {
        min_latitude: to_degrees(min_lat).max(MIN_LATITUDE),
        max_latitude: to_degrees(max_lat).min(MAX_LATITUDE),
        min_longitude: to_degrees(min_lon).max(MIN_LONGITUDE),
        max_longitude: to_degrees(max_lon).min(MAX_LONGITUDE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    fn sample_points() -> Vec<GeoPoint> {
        vec![
            point(-26.2041, 28.0473),
            point(-26.1937, 28.0337),
            point(-26.30, 28.10),
            point(54.3233, 10.1228),
            point(0.0, 0.0),
            point(89.9, -179.9),
            point(-45.0, 179.5),
            point(-45.0, -179.5),
        ]
    }

    #[test]
    fn distance_is_symmetric() {
        for a in sample_points() {
            for b in sample_points() {
                let ab = distance_km(&a, &b).unwrap();
                let ba = distance_km(&b, &a).unwrap();
                assert!((ab - ba).abs() < 1e-9, "{a} {b}: {ab} != {ba}");
            }
        }
    }

    #[test]
    fn distance_to_self_is_zero() {
        for a in sample_points() {
            assert!(distance_km(&a, &a).unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn distance_respects_triangle_inequality() {
        let points = sample_points();
        for a in &points {
            for b in &points {
                for c in &points {
                    let ac = distance_km(a, c).unwrap();
                    let ab = distance_km(a, b).unwrap();
                    let bc = distance_km(b, c).unwrap();
                    assert!(ac <= ab + bc + 1e-9, "{a} {b} {c}");
                }
            }
        }
    }

    #[test]
    fn johannesburg_cbd_to_braamfontein() {
        let cbd = point(-26.2041, 28.0473);
        let braamfontein = point(-26.1937, 28.0337);
        let distance = distance_km(&cbd, &braamfontein).unwrap();
        assert!((1.7..1.9).contains(&distance), "got {distance}");
    }

    #[test]
    fn antimeridian_neighbours_are_close() {
        let distance = distance_km(&point(-45.0, 179.5), &point(-45.0, -179.5)).unwrap();
        assert!(distance < 80.0, "got {distance}");
    }

    #[test]
    fn rejects_invalid_coordinates() {
        assert!(matches!(
            GeoPoint::new(f64::NAN, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, f64::INFINITY),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(matches!(
            GeoPoint::new(0.0, -180.1),
            Err(GeoError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn distance_rejects_unvalidated_points() {
        let raw: GeoPoint =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": 0.0}"#).unwrap();
        let valid = point(0.0, 0.0);
        assert!(matches!(
            distance_km(&raw, &valid),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            distance_km(&valid, &raw),
            Err(GeoError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let center = point(-26.2041, 28.0473);
        let other = point(-26.1937, 28.0337);
        let exact = distance_km(&center, &other).unwrap();
        assert!(is_within_radius(&center, &other, exact).unwrap());
        assert!(!is_within_radius(&center, &other, exact - 1e-6).unwrap());
    }

    #[test]
    fn radius_must_be_finite_and_non_negative() {
        let center = point(0.0, 0.0);
        assert!(matches!(
            is_within_radius(&center, &center, -1.0),
            Err(GeoError::InvalidRadius(_))
        ));
        assert!(matches!(
            is_within_radius(&center, &center, f64::NAN),
            Err(GeoError::InvalidRadius(_))
        ));
        assert!(is_within_radius(&center, &center, 0.0).unwrap());
    }

    #[test]
    fn bearing_points_north_and_east() {
        let origin = point(0.0, 0.0);
        let north = bearing_deg(&origin, &point(1.0, 0.0)).unwrap();
        let east = bearing_deg(&origin, &point(0.0, 1.0)).unwrap();
        let west = bearing_deg(&origin, &point(0.0, -1.0)).unwrap();
        assert!(north.abs() < 1e-9);
        assert!((east - 90.0).abs() < 1e-9);
        assert!((west - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_encloses_circle() {
        let center = point(-26.2041, 28.0473);
        let bbox = calculate_bounding_box(&center, 5.0).unwrap();
        for other in sample_points() {
            if is_within_radius(&center, &other, 5.0).unwrap() {
                assert!(bbox.contains(&other));
            }
        }
        // a point just inside the circle, due east
        let east = point(-26.2041, 28.0473 + 0.0499);
        assert!(is_within_radius(&center, &east, 5.0).unwrap());
        assert!(bbox.contains(&east));
    }

    #[test]
    fn bounding_box_widens_near_poles_and_antimeridian() {
        let polar = calculate_bounding_box(&point(89.99, 10.0), 10.0).unwrap();
        assert_eq!(polar.min_longitude, MIN_LONGITUDE);
        assert_eq!(polar.max_longitude, MAX_LONGITUDE);
        assert_eq!(polar.max_latitude, MAX_LATITUDE);

        let dateline = calculate_bounding_box(&point(-45.0, 179.9), 50.0).unwrap();
        assert!(dateline.contains(&point(-45.0, -179.9)));
    }
}
