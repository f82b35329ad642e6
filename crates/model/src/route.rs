use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// Travel mode understood by the Mapbox Directions and Isochrone APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl RoutingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingProfile::Driving => "driving",
            RoutingProfile::Walking => "walking",
            RoutingProfile::Cycling => "cycling",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoutingProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driving" => Ok(RoutingProfile::Driving),
            "walking" => Ok(RoutingProfile::Walking),
            "cycling" => Ok(RoutingProfile::Cycling),
            other => Err(UnknownProfile(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnknownProfile(pub String);

impl std::error::Error for UnknownProfile {}

impl fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown routing profile '{}', expected driving, walking or cycling.",
            self.0
        )
    }
}

/// Headline figures of a computed route, in the units the panel displays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteInfo {
    /// Route length in kilometers, rounded to two decimals.
    pub distance_km: f64,
    /// Travel time in minutes, rounded to one decimal.
    pub duration_min: f64,
}

impl RouteInfo {
    /// Convert the raw meters/seconds of the Directions API.
    pub fn from_meters_seconds(distance_m: f64, duration_s: f64) -> Self {
        Self {
            distance_km: round_to(distance_m / 1000.0, 2),
            duration_min: round_to(duration_s / 60.0, 1),
        }
    }
}

impl ExampleData for RouteInfo {
    fn example_data() -> Self {
        RouteInfo {
            distance_km: 4.52,
            duration_min: 12.3,
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_info_rounds_like_the_panel_shows_it() {
        let info = RouteInfo::from_meters_seconds(4517.0, 738.0);
        assert_eq!(info.distance_km, 4.52);
        assert_eq!(info.duration_min, 12.3);
    }

    #[test]
    fn route_info_handles_short_hops() {
        let info = RouteInfo::from_meters_seconds(499.0, 59.0);
        assert_eq!(info.distance_km, 0.5);
        assert_eq!(info.duration_min, 1.0);
    }

    #[test]
    fn profile_parses_and_prints_symmetrically() {
        for profile in [
            RoutingProfile::Driving,
            RoutingProfile::Walking,
            RoutingProfile::Cycling,
        ] {
            assert_eq!(profile.as_str().parse::<RoutingProfile>().unwrap(), profile);
        }
        assert!("teleport".parse::<RoutingProfile>().is_err());
    }
}
