use thiserror::Error;

use crate::{
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, RouteResponse},
};

/// Per-request coordinate limit of the directions backend.
pub const MAX_WAYPOINTS_PER_REQUEST: usize = 25;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Directions API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("Directions request needs between 2 and {MAX_WAYPOINTS_PER_REQUEST} waypoints, got {0}")]
    InvalidWaypointCount(usize),

    #[error("No route found between the requested waypoints")]
    NoRoute,

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// Something that turns an ordered list of waypoints into candidate routes.
pub trait DirectionsService: Send + Sync {
    fn calculate(
        &self,
        options: &RouteOptions,
    ) -> impl Future<Output = Result<RouteResponse, DirectionsError>> + Send;

    /// Credentials attached to the responses of this service.
    fn credentials(&self) -> DirectionsCredentials;
}

pub(crate) fn validate_waypoint_count(options: &RouteOptions) -> Result<(), DirectionsError> {
    let count = options.waypoints.len();
    if !(2..=MAX_WAYPOINTS_PER_REQUEST).contains(&count) {
        return Err(DirectionsError::InvalidWaypointCount(count));
    }

    Ok(())
}

impl<D: DirectionsService> DirectionsService for std::sync::Arc<D> {
    fn calculate(
        &self,
        options: &RouteOptions,
    ) -> impl Future<Output = Result<RouteResponse, DirectionsError>> + Send {
        (**self).calculate(options)
    }

    fn credentials(&self) -> DirectionsCredentials {
        (**self).credentials()
    }
}
