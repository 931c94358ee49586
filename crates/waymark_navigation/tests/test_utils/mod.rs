#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;
use waymark_directions::{
    directions_service::{DirectionsError, DirectionsService},
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, Route, RouteLeg, RouteResponse},
    waypoint::Waypoint,
};
use waymark_navigation::{
    compile::CompiledRoute,
    error::NavigationError,
    session::{
        engine::{NavigationDelegate, NavigationEngine},
        options::SessionOptions,
    },
};

pub fn create_lon_lat(n: usize) -> Vec<[f64; 2]> {
    (0..n).map(|i| [-105.14, 39.76 + i as f64 * 0.002]).collect()
}

pub fn position(waypoint: &Waypoint) -> usize {
    ((waypoint.latitude() - 39.76) / 0.002).round() as usize
}

pub fn create_response(options: &RouteOptions) -> RouteResponse {
    let start = position(&options.waypoints[0]) as f64;
    let legs: Vec<RouteLeg> = options
        .waypoints
        .windows(2)
        .map(|pair| RouteLeg {
            summary: format!("{} to {}", position(&pair[0]), position(&pair[1])),
            distance: 200.0 + start,
            expected_travel_time: 20.0,
        })
        .collect();

    RouteResponse {
        routes: vec![Route {
            distance: legs.iter().map(|leg| leg.distance).sum(),
            expected_travel_time: legs.iter().map(|leg| leg.expected_travel_time).sum(),
            legs,
            shape: options.waypoints.iter().map(|w| w.coordinate()).collect(),
        }],
        options: options.clone(),
        credentials: test_credentials(),
    }
}

pub fn test_credentials() -> DirectionsCredentials {
    DirectionsCredentials {
        host: String::from("https://api.example.com"),
        access_token: String::from("pk.test"),
    }
}

/// Directions double answering with [`create_response`]. Requests whose first
/// waypoint position is listed in `failing_starts` fail after `fail_after`,
/// the others succeed after `succeed_after`.
pub struct ScriptedDirections {
    pub failing_starts: Vec<usize>,
    pub fail_after: Duration,
    pub succeed_after: Duration,
    pub started: AtomicUsize,
    pub responses: Mutex<Vec<RouteResponse>>,
}

impl ScriptedDirections {
    pub fn new() -> Self {
        Self::failing(vec![])
    }

    pub fn failing(failing_starts: Vec<usize>) -> Self {
        Self {
            failing_starts,
            fail_after: Duration::from_millis(10),
            succeed_after: Duration::from_millis(50),
            started: AtomicUsize::new(0),
            responses: Mutex::new(vec![]),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

impl DirectionsService for ScriptedDirections {
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        self.started.fetch_add(1, Ordering::SeqCst);

        let start = position(&options.waypoints[0]);
        if self.failing_starts.contains(&start) {
            tokio::time::sleep(self.fail_after).await;
            return Err(DirectionsError::Api {
                code: String::from("NoRoute"),
                message: format!("No route starting at waypoint {start}"),
            });
        }

        tokio::time::sleep(self.succeed_after).await;

        let response = create_response(options);
        self.responses.lock().push(response.clone());
        Ok(response)
    }

    fn credentials(&self) -> DirectionsCredentials {
        test_credentials()
    }
}

/// Engine double that keeps what it was asked to present.
#[derive(Default)]
pub struct RecordingEngine {
    pub presented: Mutex<Vec<(Arc<CompiledRoute>, SessionOptions)>>,
    pub delegate: Mutex<Option<Arc<dyn NavigationDelegate>>>,
    pub detached: AtomicUsize,
}

impl RecordingEngine {
    pub fn delegate(&self) -> Arc<dyn NavigationDelegate> {
        self.delegate.lock().clone().unwrap()
    }

    pub fn presented_route(&self) -> Arc<CompiledRoute> {
        Arc::clone(&self.presented.lock()[0].0)
    }
}

impl NavigationEngine for RecordingEngine {
    fn present(
        &self,
        route: Arc<CompiledRoute>,
        options: &SessionOptions,
        delegate: Arc<dyn NavigationDelegate>,
    ) -> Result<(), NavigationError> {
        self.presented.lock().push((route, options.clone()));
        *self.delegate.lock() = Some(delegate);
        Ok(())
    }

    fn detach(&self) {
        self.detached.fetch_add(1, Ordering::SeqCst);
    }
}
