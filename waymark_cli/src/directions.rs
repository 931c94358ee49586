use std::time::Duration;

use tracing::info;
use waymark_directions::{
    cache::{CachedDirections, FileCache},
    directions_service::{DirectionsError, DirectionsService},
    mapbox_api::{DirectionsClientParams, MapboxDirectionsClient},
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, RouteResponse},
    straight_line::StraightLineDirections,
};

/// Average speed of offline routes, roughly urban driving.
const OFFLINE_SPEED_KMH: f64 = 40.0;

pub enum CliDirections {
    Offline(StraightLineDirections),
    Mapbox(MapboxDirectionsClient),
    CachedMapbox(CachedDirections<MapboxDirectionsClient, FileCache>),
}

impl CliDirections {
    pub fn from_env(offline: bool, timeout: Option<Duration>) -> anyhow::Result<Self> {
        if offline {
            info!("Using straight-line directions at {} km/h", OFFLINE_SPEED_KMH);
            return Ok(CliDirections::Offline(StraightLineDirections::new(
                OFFLINE_SPEED_KMH,
            )));
        }

        let mut params = DirectionsClientParams::from_env()?;
        params.timeout = timeout;
        let client = MapboxDirectionsClient::new(params)?;

        match FileCache::from_env() {
            Ok(cache) => Ok(CliDirections::CachedMapbox(CachedDirections::new(
                client, cache,
            ))),
            Err(_) => Ok(CliDirections::Mapbox(client)),
        }
    }
}

impl DirectionsService for CliDirections {
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        match self {
            CliDirections::Offline(directions) => directions.calculate(options).await,
            CliDirections::Mapbox(directions) => directions.calculate(options).await,
            CliDirections::CachedMapbox(directions) => directions.calculate(options).await,
        }
    }

    fn credentials(&self) -> DirectionsCredentials {
        match self {
            CliDirections::Offline(directions) => directions.credentials(),
            CliDirections::Mapbox(directions) => directions.credentials(),
            CliDirections::CachedMapbox(directions) => directions.credentials(),
        }
    }
}
