use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use waymark_directions::{
    directions_service::DirectionsService,
    route_options::{DEFAULT_LOCALE, RouteOptions, RoutingProfile},
    route_response::RouteResponse,
};

use crate::{
    error::NavigationError,
    grouping::{GroupIndex, WaypointGroup},
};

/// What happens to in-flight sibling requests once one group fails. Either
/// way the failure is reported and no partial result set is returned.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Drop every outstanding request as soon as one fails.
    #[default]
    CancelSiblings,

    /// Let every request settle, then report the lowest failing group.
    AwaitSiblings,
}

#[derive(Debug, Clone)]
pub struct DispatchParams {
    pub profile: RoutingProfile,
    pub locale: String,
    pub failure_policy: FailurePolicy,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            profile: RoutingProfile::DrivingTraffic,
            locale: String::from(DEFAULT_LOCALE),
            failure_policy: FailurePolicy::default(),
        }
    }
}

pub type GroupResults = BTreeMap<GroupIndex, RouteResponse>;

/// Issues one directions request per waypoint group.
///
/// All requests are polled concurrently on the calling task and `dispatch`
/// only returns once the whole batch has settled, so the returned map is
/// complete or not returned at all.
pub struct RouteRequestDispatcher<D> {
    directions: D,
    params: DispatchParams,
}

impl<D> RouteRequestDispatcher<D>
where
    D: DirectionsService,
{
    pub fn new(directions: D, params: DispatchParams) -> Self {
        Self { directions, params }
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    pub fn params(&self) -> &DispatchParams {
        &self.params
    }

    fn request_options(&self, group: &WaypointGroup) -> RouteOptions {
        RouteOptions::new(
            group.waypoints().to_vec(),
            self.params.profile,
            self.params.locale.clone(),
        )
    }

    async fn request_group(
        &self,
        group: &WaypointGroup,
    ) -> Result<(GroupIndex, RouteResponse), NavigationError> {
        let options = self.request_options(group);
        debug!(
            "Dispatching group {} with {} waypoints",
            group.index(),
            group.len()
        );

        match self.directions.calculate(&options).await {
            Ok(response) => {
                debug!("Group {} resolved", group.index());
                Ok((group.index(), response))
            }
            Err(err) => {
                warn!("Routing request for group {} failed: {}", group.index(), err);
                Err(NavigationError::RoutingRequestFailed {
                    group: group.index(),
                    message: err.to_string(),
                })
            }
        }
    }

    pub async fn dispatch(&self, groups: &[WaypointGroup]) -> Result<GroupResults, NavigationError> {
        let requests = groups.iter().map(|group| self.request_group(group));

        let settled = match self.params.failure_policy {
            FailurePolicy::CancelSiblings => futures::future::try_join_all(requests).await?,
            FailurePolicy::AwaitSiblings => futures::future::join_all(requests)
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(settled.into_iter().collect())
    }
}
