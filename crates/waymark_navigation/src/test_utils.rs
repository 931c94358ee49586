use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use parking_lot::Mutex;
use waymark_directions::{
    directions_service::{DirectionsError, DirectionsService},
    route_options::{RouteOptions, RoutingProfile},
    route_response::{DirectionsCredentials, Route, RouteLeg, RouteResponse},
    waypoint::Waypoint,
};

/// Waypoints along a meridian, roughly 111m apart.
pub fn create_waypoints(n: usize) -> Vec<Waypoint> {
    (0..n)
        .map(|i| Waypoint::from_lon_lat([4.35, 50.0 + i as f64 * 0.001]))
        .collect()
}

/// A response with one leg per consecutive waypoint pair and the waypoints as
/// shape. Distances and times are derived from `seed` so groups differ.
pub fn create_response(waypoints: &[Waypoint], seed: f64) -> RouteResponse {
    let legs: Vec<RouteLeg> = waypoints
        .windows(2)
        .enumerate()
        .map(|(i, _)| RouteLeg {
            summary: format!("leg {i}"),
            distance: seed + i as f64 * 0.1,
            expected_travel_time: seed / 10.0 + i as f64,
        })
        .collect();

    RouteResponse {
        routes: vec![Route {
            distance: legs.iter().map(|leg| leg.distance).sum(),
            expected_travel_time: legs.iter().map(|leg| leg.expected_travel_time).sum(),
            legs,
            shape: waypoints.iter().map(|waypoint| waypoint.coordinate()).collect(),
        }],
        options: RouteOptions::new(waypoints.to_vec(), RoutingProfile::DrivingTraffic, "en_US"),
        credentials: test_credentials(),
    }
}

pub fn test_credentials() -> DirectionsCredentials {
    DirectionsCredentials {
        host: String::from("https://api.example.com"),
        access_token: String::from("pk.test"),
    }
}

/// Index of a waypoint produced by [`create_waypoints`].
pub fn waypoint_position(waypoint: &Waypoint) -> usize {
    ((waypoint.latitude() - 50.0) / 0.001).round() as usize
}

/// Directions double answering with [`create_response`]. Requests whose first
/// waypoint position is listed in `failing_starts` fail after `fail_after`,
/// the others succeed after `succeed_after` (or the per-start override).
pub struct ScriptedDirections {
    pub failing_starts: Vec<usize>,
    pub slow_starts: Vec<(usize, Duration)>,
    pub fail_after: Duration,
    pub succeed_after: Duration,
    pub started: AtomicUsize,
    pub completed: AtomicUsize,
    pub requests: Mutex<Vec<RouteOptions>>,
}

impl Default for ScriptedDirections {
    fn default() -> Self {
        Self {
            failing_starts: vec![],
            slow_starts: vec![],
            fail_after: Duration::from_millis(10),
            succeed_after: Duration::from_millis(50),
            started: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            requests: Mutex::new(vec![]),
        }
    }
}

impl DirectionsService for ScriptedDirections {
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(options.clone());

        let start = waypoint_position(&options.waypoints[0]);
        if self.failing_starts.contains(&start) {
            tokio::time::sleep(self.fail_after).await;
            return Err(DirectionsError::Api {
                code: String::from("NoRoute"),
                message: format!("No route starting at waypoint {start}"),
            });
        }

        let delay = self
            .slow_starts
            .iter()
            .find(|(slow, _)| *slow == start)
            .map(|(_, delay)| *delay)
            .unwrap_or(self.succeed_after);
        tokio::time::sleep(delay).await;

        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(create_response(&options.waypoints, start as f64 + 1.0))
    }

    fn credentials(&self) -> DirectionsCredentials {
        test_credentials()
    }
}
