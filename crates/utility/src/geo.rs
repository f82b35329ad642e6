use std::error;
use std::fmt;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers covered by one degree of latitude. Also used for longitude
/// after compensating for the shrinkage towards the poles.
pub const KM_PER_DEGREE: f64 = 111.0;

#[derive(Debug, Clone, PartialEq)]
pub enum GeoError {
    /// The search radius was zero, negative or not a finite number.
    InvalidRadius(f64),
    /// The latitude was at or beyond a pole, where the longitude span of a
    /// bounding box is undefined (division by `cos(90°) = 0`).
    DegenerateLatitude(f64),
}

impl error::Error for GeoError {}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GeoError::InvalidRadius(radius) => {
                write!(
                    f,
                    "Search radius must be a positive number of kilometers, got {radius}."
                )
            }
            GeoError::DegenerateLatitude(latitude) => {
                write!(
                    f,
                    "Latitude {latitude}° is at or beyond a pole, no bounding box exists there."
                )
            }
        }
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Calculate the axis-aligned rectangle of `radius_km` around a center,
/// as `((min_lat, min_lon), (max_lat, max_lon))` in degrees.
///
/// This uses the flat 111 km-per-degree approximation, which is fine for
/// regional search radii at mid latitudes. It makes no geodesic accuracy
/// guarantee and must not be used for continental-scale radii.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Result<((f64, f64), (f64, f64)), GeoError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }
    if !lat.is_finite() || lat.abs() >= 90.0 {
        return Err(GeoError::DegenerateLatitude(lat));
    }

    let delta_lat = radius_km / KM_PER_DEGREE;
    let delta_lon = radius_km / (KM_PER_DEGREE * to_radians(lat).cos());

    Ok((
        (lat - delta_lat, lon - delta_lon),
        (lat + delta_lat, lon + delta_lon),
    ))
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_distance(
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
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
