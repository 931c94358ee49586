use crate::{
    directions_service::{DirectionsError, DirectionsService, validate_waypoint_count},
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, Route, RouteLeg, RouteResponse},
};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub fn haversine_distance<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    let from: geo_types::Point = from.into();
    let to: geo_types::Point = to.into();

    let lat1_rad = from.y().to_radians();
    let lon1_rad = from.x().to_radians();
    let lat2_rad = to.y().to_radians();
    let lon2_rad = to.x().to_radians();

    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = lon2_rad - lon1_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Offline directions: straight segments between consecutive waypoints at a
/// constant speed. Useful without network access and in tests.
pub struct StraightLineDirections {
    speed_kmh: f64,
}

impl StraightLineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn travel_time(&self, distance: f64) -> f64 {
        distance / (self.speed_kmh / 3.6)
    }

    pub fn route(&self, options: &RouteOptions) -> Route {
        let separators = options.leg_separator_indices();
        let mut legs = Vec::with_capacity(separators.len().saturating_sub(1));

        for window in separators.windows(2) {
            let distance: f64 = options.waypoints[window[0]..=window[1]]
                .windows(2)
                .map(|pair| haversine_distance(&pair[0], &pair[1]))
                .sum();

            legs.push(RouteLeg {
                summary: format!("waypoint {} to {}", window[0], window[1]),
                distance,
                expected_travel_time: self.travel_time(distance),
            });
        }

        let distance = legs.iter().map(|leg| leg.distance).sum();
        let expected_travel_time = legs.iter().map(|leg| leg.expected_travel_time).sum();

        Route {
            legs,
            shape: options
                .waypoints
                .iter()
                .map(|waypoint| waypoint.coordinate())
                .collect(),
            distance,
            expected_travel_time,
        }
    }
}

impl DirectionsService for StraightLineDirections {
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        validate_waypoint_count(options)?;

        Ok(RouteResponse {
            routes: vec![self.route(options)],
            options: options.clone(),
            credentials: self.credentials(),
        })
    }

    fn credentials(&self) -> DirectionsCredentials {
        DirectionsCredentials {
            host: String::from("offline"),
            access_token: String::new(),
        }
    }
}
