use serde::{Deserialize, Serialize};

/// A coordinate the route must pass through, in travel order.
///
/// `separates_legs` marks the waypoint as the end of a route leg. Waypoints
/// that don't separate legs are still visited but the directions service
/// folds them into the surrounding leg.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    coordinate: geo_types::Point,
    separates_legs: bool,
}

impl Waypoint {
    pub fn new(coordinate: geo_types::Point, separates_legs: bool) -> Self {
        Self {
            coordinate,
            separates_legs,
        }
    }

    /// Builds a leg-separating waypoint from a `[longitude, latitude]` pair,
    /// the order used by host applications and GeoJSON.
    pub fn from_lon_lat([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(geo_types::Point::new(longitude, latitude), true)
    }

    pub fn with_separates_legs(mut self, separates_legs: bool) -> Self {
        self.separates_legs = separates_legs;
        self
    }

    pub fn coordinate(&self) -> geo_types::Point {
        self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.y()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.x()
    }

    pub fn separates_legs(&self) -> bool {
        self.separates_legs
    }
}

impl From<&Waypoint> for geo_types::Point {
    fn from(waypoint: &Waypoint) -> Self {
        waypoint.coordinate
    }
}
