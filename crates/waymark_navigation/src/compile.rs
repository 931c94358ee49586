use serde::{Deserialize, Serialize};
use tracing::debug;
use waymark_directions::{
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, RouteLeg},
    waypoint::Waypoint,
};

use crate::{dispatch::GroupResults, error::NavigationError, grouping::GroupIndex};

/// End-to-end route stitched together from every group's best candidate.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CompiledRoute {
    /// Full, ungrouped waypoint list
    pub waypoints: Vec<Waypoint>,
    pub legs: Vec<RouteLeg>,

    /// Waypoint ending each leg, aligned with `legs`
    pub leg_destinations: Vec<Waypoint>,
    pub shape: Vec<geo_types::Point>,

    /// Meters
    pub distance: f64,

    /// Seconds
    pub expected_travel_time: f64,

    /// Taken from the first group, every group is requested with the same options
    pub options: RouteOptions,
    pub credentials: DirectionsCredentials,
    pub group_count: usize,
}

impl CompiledRoute {
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    pub fn to_line_string(&self) -> geo_types::LineString {
        self.shape.iter().copied().collect()
    }
}

fn leg_destinations(options: &RouteOptions) -> Vec<Waypoint> {
    options
        .leg_separator_indices()
        .into_iter()
        .skip(1)
        .map(|index| options.waypoints[index])
        .collect()
}

/// Merges per-group responses in ascending group order.
///
/// Legs and shape coordinates are appended verbatim; the totals start from
/// group 0 and accumulate each following group, so a single group passes
/// through unchanged.
pub fn compile_route(
    waypoints: &[Waypoint],
    results: &GroupResults,
    group_count: usize,
) -> Result<CompiledRoute, NavigationError> {
    let missing: Vec<GroupIndex> = (0..group_count.max(1))
        .map(GroupIndex::new)
        .filter(|index| !results.contains_key(index))
        .collect();

    if !missing.is_empty() {
        return Err(NavigationError::IncompleteResultSet { missing });
    }

    let mut compiled: Option<CompiledRoute> = None;

    for index in (0..group_count.max(1)).map(GroupIndex::new) {
        let response = &results[&index];
        let route = response
            .best_route()
            .ok_or(NavigationError::EmptyResponse { group: index })?;

        match compiled.as_mut() {
            None => {
                compiled = Some(CompiledRoute {
                    waypoints: waypoints.to_vec(),
                    legs: route.legs.clone(),
                    leg_destinations: leg_destinations(&response.options),
                    shape: route.shape.clone(),
                    distance: route.distance,
                    expected_travel_time: route.expected_travel_time,
                    options: response.options.clone(),
                    credentials: response.credentials.clone(),
                    group_count,
                });
            }
            Some(compiled) => {
                compiled.legs.extend(route.legs.iter().cloned());
                compiled
                    .leg_destinations
                    .extend(leg_destinations(&response.options));
                compiled.shape.extend(route.shape.iter().copied());
                compiled.distance += route.distance;
                compiled.expected_travel_time += route.expected_travel_time;
            }
        }

        debug!(
            "Compiled group {}: {} legs, {} shape points",
            index,
            route.legs.len(),
            route.shape.len()
        );
    }

    compiled.ok_or(NavigationError::IncompleteResultSet {
        missing: vec![GroupIndex::new(0)],
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::{
        grouping::group_waypoints,
        test_utils::{create_response, create_waypoints},
    };

    use super::*;

    fn results_for(waypoints: &[Waypoint]) -> (usize, GroupResults) {
        let groups = group_waypoints(waypoints).unwrap();
        let results = groups
            .iter()
            .map(|group| {
                let seed = 1000.0 + group.index().get() as f64 * 7.3;
                (group.index(), create_response(group.waypoints(), seed))
            })
            .collect();

        (groups.len(), results)
    }

    #[test]
    fn test_single_group_passes_through() {
        let waypoints = create_waypoints(2);
        let (group_count, results) = results_for(&waypoints);
        let route = results[&GroupIndex::new(0)].best_route().unwrap().clone();

        let compiled = compile_route(&waypoints, &results, group_count).unwrap();

        assert_eq!(compiled.legs, route.legs);
        assert_eq!(compiled.shape, route.shape);
        assert_eq!(compiled.distance, route.distance);
        assert_eq!(compiled.expected_travel_time, route.expected_travel_time);
        assert_eq!(compiled.waypoints, waypoints);
        assert_eq!(compiled.group_count, 1);
    }

    #[test]
    fn test_fifty_waypoints_concatenate_in_group_order() {
        let waypoints = create_waypoints(50);
        let (group_count, results) = results_for(&waypoints);
        let first = results[&GroupIndex::new(0)].best_route().unwrap();
        let second = results[&GroupIndex::new(1)].best_route().unwrap();

        let compiled = compile_route(&waypoints, &results, group_count).unwrap();

        let expected_legs: Vec<RouteLeg> =
            first.legs.iter().chain(second.legs.iter()).cloned().collect();
        assert_eq!(compiled.legs, expected_legs);
        assert_eq!(compiled.distance, first.distance + second.distance);
        assert_eq!(
            compiled.expected_travel_time,
            first.expected_travel_time + second.expected_travel_time
        );
        assert_eq!(compiled.waypoints, waypoints);
    }

    #[test]
    fn test_counts_are_sums_without_dedup() {
        for n in [2, 25, 26, 49, 50, 51, 120] {
            let waypoints = create_waypoints(n);
            let (group_count, results) = results_for(&waypoints);
            let compiled = compile_route(&waypoints, &results, group_count).unwrap();

            let routes: Vec<_> = results.values().map(|r| r.best_route().unwrap()).collect();
            let leg_count: usize = routes.iter().map(|route| route.legs.len()).sum();
            let shape_count: usize = routes.iter().map(|route| route.shape.len()).sum();
            let distance = routes
                .iter()
                .skip(1)
                .fold(routes[0].distance, |total, route| total + route.distance);

            assert_eq!(compiled.leg_count(), leg_count, "legs for {n}");
            assert_eq!(compiled.shape.len(), shape_count, "shape for {n}");
            assert_eq!(compiled.leg_destinations.len(), leg_count, "destinations for {n}");
            assert_eq!(compiled.distance, distance, "distance for {n}");
        }
    }

    #[test]
    fn test_results_order_independent_of_insertion() {
        let waypoints = create_waypoints(60);
        let (group_count, results) = results_for(&waypoints);
        let reversed: GroupResults = results
            .iter()
            .rev()
            .map(|(index, response)| (*index, response.clone()))
            .collect();

        assert_eq!(
            compile_route(&waypoints, &results, group_count),
            compile_route(&waypoints, &reversed, group_count)
        );
    }

    #[test]
    fn test_missing_group_is_reported() {
        let waypoints = create_waypoints(75);
        let (group_count, mut results) = results_for(&waypoints);
        results.remove(&GroupIndex::new(1));

        assert_eq!(
            compile_route(&waypoints, &results, group_count),
            Err(NavigationError::IncompleteResultSet {
                missing: vec![GroupIndex::new(1)]
            })
        );
    }

    #[test]
    fn test_empty_results_are_incomplete() {
        assert!(matches!(
            compile_route(&create_waypoints(2), &BTreeMap::new(), 0),
            Err(NavigationError::IncompleteResultSet { .. })
        ));
    }

    #[test]
    fn test_response_without_route() {
        let waypoints = create_waypoints(30);
        let (group_count, mut results) = results_for(&waypoints);
        if let Some(response) = results.get_mut(&GroupIndex::new(1)) {
            response.routes.clear();
        }

        assert_eq!(
            compile_route(&waypoints, &results, group_count),
            Err(NavigationError::EmptyResponse {
                group: GroupIndex::new(1)
            })
        );
    }

    #[test]
    fn test_options_and_credentials_from_first_group() {
        let waypoints = create_waypoints(30);
        let (group_count, results) = results_for(&waypoints);

        let compiled = compile_route(&waypoints, &results, group_count).unwrap();

        assert_eq!(compiled.options, results[&GroupIndex::new(0)].options);
        assert_eq!(compiled.credentials.host, "https://api.example.com");
    }
}
