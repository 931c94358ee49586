use serde::{Deserialize, Serialize};

use crate::route_options::RouteOptions;

/// Portion of a route between two leg-separating waypoints.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub summary: String,

    /// Distance in meters
    pub distance: f64,

    /// Expected travel time in seconds
    pub expected_travel_time: f64,
}

/// A candidate route returned by the directions service.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Route {
    pub legs: Vec<RouteLeg>,

    /// Polyline of the physical path, in travel order
    pub shape: Vec<geo_types::Point>,

    /// Distance in meters
    pub distance: f64,

    /// Expected travel time in seconds
    pub expected_travel_time: f64,
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct DirectionsCredentials {
    pub host: String,
    pub access_token: String,
}

impl std::fmt::Debug for DirectionsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsCredentials")
            .field("host", &self.host)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Response to one directions request. Candidates are ordered best first.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
    pub options: RouteOptions,
    pub credentials: DirectionsCredentials,
}

impl RouteResponse {
    pub fn best_route(&self) -> Option<&Route> {
        self.routes.first()
    }
}
