use thiserror::Error;

use crate::grouping::GroupIndex;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NavigationError {
    #[error("At least 2 waypoints are required to build a route, got {count}")]
    InsufficientWaypoints { count: usize },

    #[error("Waypoint group {group} cannot lend its last waypoint and keep 2 waypoints")]
    InvalidGroupTopology { group: GroupIndex },

    #[error("Routing request for group {group} failed: {message}")]
    RoutingRequestFailed { group: GroupIndex, message: String },

    #[error("Missing routing results for groups {missing:?}")]
    IncompleteResultSet { missing: Vec<GroupIndex> },

    #[error("Routing response for group {group} contains no route")]
    EmptyResponse { group: GroupIndex },

    #[error("Navigation engine error: {0}")]
    Engine(String),
}

impl NavigationError {
    /// Message reported to the host through `onError`. Routing failures pass
    /// the directions service message through untouched.
    pub fn host_message(&self) -> String {
        match self {
            NavigationError::RoutingRequestFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
