//! A navigation engine that drives along the compiled shape instead of
//! following a device location. Used for simulated sessions and in tests.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use waymark_directions::{straight_line::haversine_distance, waypoint::Waypoint};

use crate::{
    compile::CompiledRoute,
    error::NavigationError,
    session::{
        engine::{NavigationDelegate, NavigationEngine},
        event::RouteProgress,
        options::SessionOptions,
    },
};

#[derive(Debug, Clone)]
pub struct SimulationParams {
    /// Interval between two location updates
    pub tick: Duration,

    /// 1.0 replays the route at its expected travel time
    pub speed_multiplier: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            speed_multiplier: 1.0,
        }
    }
}

fn closest_point_index(points: &[geo_types::Point], point: geo_types::Point) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by(|(_, p), (_, p2)| {
            haversine_distance(point, **p).total_cmp(&haversine_distance(point, **p2))
        })
        .map(|v| v.0)
}

struct SimulationPlan {
    shape: Vec<geo_types::Point>,

    /// Distance from the origin at each shape vertex
    cumulative: Vec<f64>,

    /// Distance at which each leg destination is reached
    arrivals: Vec<(f64, Waypoint)>,
    expected_travel_time: f64,
}

impl SimulationPlan {
    fn new(route: &CompiledRoute) -> Self {
        let shape = route.shape.clone();

        let mut cumulative = Vec::with_capacity(shape.len());
        let mut distance = 0.0;
        for (i, point) in shape.iter().enumerate() {
            if i > 0 {
                distance += haversine_distance(shape[i - 1], *point);
            }
            cumulative.push(distance);
        }

        // Destinations are matched in order so a route passing the same spot
        // twice still arrives at the right occurrence.
        let mut from = 0;
        let mut arrivals = Vec::with_capacity(route.leg_destinations.len());
        for destination in &route.leg_destinations {
            let index = closest_point_index(&shape[from..], destination.coordinate())
                .map(|index| index + from)
                .unwrap_or(from);
            from = index;

            arrivals.push((cumulative.get(index).copied().unwrap_or(0.0), *destination));
        }

        Self {
            shape,
            cumulative,
            arrivals,
            expected_travel_time: route.expected_travel_time,
        }
    }

    fn total_distance(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Meters per second
    fn speed(&self) -> f64 {
        if self.expected_travel_time > 0.0 {
            self.total_distance() / self.expected_travel_time
        } else {
            f64::INFINITY
        }
    }

    fn location_at(&self, traveled: f64) -> Option<geo_types::Point> {
        let first = *self.shape.first()?;
        let i = self.cumulative.partition_point(|distance| *distance <= traveled);

        if i == 0 {
            return Some(first);
        }
        if i >= self.shape.len() {
            return self.shape.last().copied();
        }

        let (from, to) = (self.shape[i - 1], self.shape[i]);
        let segment = self.cumulative[i] - self.cumulative[i - 1];
        let t = if segment > 0.0 {
            (traveled - self.cumulative[i - 1]) / segment
        } else {
            0.0
        };

        Some(geo_types::Point::new(
            from.x() + (to.x() - from.x()) * t,
            from.y() + (to.y() - from.y()) * t,
        ))
    }

    fn progress_at(&self, traveled: f64, leg_index: usize) -> RouteProgress {
        let total = self.total_distance();
        let fraction_traveled = if total > 0.0 {
            (traveled / total).clamp(0.0, 1.0)
        } else {
            1.0
        };

        RouteProgress {
            leg_index,
            distance_traveled: traveled,
            duration_remaining: self.expected_travel_time * (1.0 - fraction_traveled),
            fraction_traveled,
            distance_remaining: (total - traveled).max(0.0),
        }
    }
}

async fn run_simulation(
    plan: SimulationPlan,
    params: SimulationParams,
    delegate: Arc<dyn NavigationDelegate>,
) {
    let total = plan.total_distance();
    let step = plan.speed() * params.tick.as_secs_f64() * params.speed_multiplier;
    let last_leg = plan.arrivals.len().saturating_sub(1);

    let mut interval = tokio::time::interval(params.tick);
    let mut traveled = 0.0;
    let mut next_arrival = 0;

    loop {
        interval.tick().await;

        if let Some(location) = plan.location_at(traveled) {
            let progress = plan.progress_at(traveled, next_arrival.min(last_leg));
            delegate.did_update_progress(&progress, location);
        }

        while let Some((distance, waypoint)) = plan.arrivals.get(next_arrival) {
            if *distance > traveled {
                break;
            }

            next_arrival += 1;
            if !delegate.did_arrive(waypoint) {
                debug!("Simulation: delegate declined to advance past leg {}", next_arrival - 1);
                return;
            }
        }

        if traveled >= total {
            break;
        }

        traveled = (traveled + step).min(total);
    }

    delegate.did_dismiss(false);
}

/// Replays compiled routes on the current tokio runtime.
pub struct SimulatedEngine {
    params: SimulationParams,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedEngine {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            task: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl NavigationEngine for SimulatedEngine {
    fn present(
        &self,
        route: Arc<CompiledRoute>,
        options: &SessionOptions,
        delegate: Arc<dyn NavigationDelegate>,
    ) -> Result<(), NavigationError> {
        if !options.simulate_route {
            return Err(NavigationError::Engine(String::from(
                "live location updates are not available, enable route simulation",
            )));
        }

        if self.params.tick.is_zero() || self.params.speed_multiplier <= 0.0 {
            return Err(NavigationError::Engine(format!(
                "invalid simulation parameters: tick = {:?}, speed multiplier = {}",
                self.params.tick, self.params.speed_multiplier
            )));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| NavigationError::Engine(err.to_string()))?;

        debug!(
            "Simulation: presenting {} legs (style = {}, muted = {}, feedback = {}, status hidden = {})",
            route.leg_count(),
            options.map_style_url,
            options.mute,
            options.shows_end_of_route_feedback,
            options.hide_status_view
        );

        let plan = SimulationPlan::new(&route);
        let task = runtime.spawn(run_simulation(plan, self.params.clone(), delegate));

        if let Some(previous) = self.task.lock().replace(task) {
            previous.abort();
        }

        Ok(())
    }

    fn detach(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}
