use tracing::{info, instrument};
use waymark_directions::{directions_service::DirectionsService, waypoint::Waypoint};

use crate::{
    compile::{CompiledRoute, compile_route},
    dispatch::{DispatchParams, RouteRequestDispatcher},
    error::NavigationError,
    grouping::group_waypoints,
};

/// Groups waypoints, routes every group and compiles the result.
pub struct RoutePlanner<D> {
    dispatcher: RouteRequestDispatcher<D>,
}

impl<D> RoutePlanner<D>
where
    D: DirectionsService,
{
    pub fn new(directions: D, params: DispatchParams) -> Self {
        Self {
            dispatcher: RouteRequestDispatcher::new(directions, params),
        }
    }

    pub fn dispatcher(&self) -> &RouteRequestDispatcher<D> {
        &self.dispatcher
    }

    #[instrument(skip_all, fields(waypoints = waypoints.len()))]
    pub async fn plan(&self, waypoints: &[Waypoint]) -> Result<CompiledRoute, NavigationError> {
        let groups = group_waypoints(waypoints)?;
        info!("Routing {} waypoints in {} groups", waypoints.len(), groups.len());

        let results = self.dispatcher.dispatch(&groups).await?;
        let compiled = compile_route(waypoints, &results, groups.len())?;

        info!(
            "Compiled route: legs = {}, distance = {:.0}m, travel time = {:.0}s",
            compiled.leg_count(),
            compiled.distance,
            compiled.expected_travel_time
        );

        Ok(compiled)
    }
}
