//! Splits an ordered waypoint list into batches the directions backend accepts.
//!
//! Waypoints are assigned to group `i / 25`. A trailing group of a single
//! waypoint cannot form a leg on its own, so it borrows the last waypoint of
//! the group before it: 26 waypoints become `[24, 2]` rather than `[25, 1]`.
//! Borrowing moves a waypoint between groups without duplicating or dropping
//! it, so flattening the groups always gives back the input.

use serde::Serialize;
use tracing::debug;
use waymark_directions::{directions_service::MAX_WAYPOINTS_PER_REQUEST, waypoint::Waypoint};

use crate::{define_index_newtype, error::NavigationError};

pub const MIN_WAYPOINTS_PER_GROUP: usize = 2;

define_index_newtype!(GroupIndex, WaypointGroup);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WaypointGroup {
    index: GroupIndex,
    waypoints: Vec<Waypoint>,
}

impl WaypointGroup {
    pub fn index(&self) -> GroupIndex {
        self.index
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

pub fn group_waypoints(waypoints: &[Waypoint]) -> Result<Vec<WaypointGroup>, NavigationError> {
    if waypoints.len() < MIN_WAYPOINTS_PER_GROUP {
        return Err(NavigationError::InsufficientWaypoints {
            count: waypoints.len(),
        });
    }

    let mut batches: Vec<Vec<Waypoint>> = waypoints
        .chunks(MAX_WAYPOINTS_PER_REQUEST)
        .map(|chunk| chunk.to_vec())
        .collect();

    for i in 1..batches.len() {
        if batches[i].len() >= MIN_WAYPOINTS_PER_GROUP {
            continue;
        }

        let (before, after) = batches.split_at_mut(i);
        let previous = &mut before[i - 1];
        let invalid = NavigationError::InvalidGroupTopology {
            group: GroupIndex::new(i - 1),
        };

        let borrowed = previous.pop().ok_or_else(|| invalid.clone())?;
        if previous.len() < MIN_WAYPOINTS_PER_GROUP {
            return Err(invalid);
        }

        debug!("Group {} borrows the last waypoint of group {}", i, i - 1);
        after[0].insert(0, borrowed);
    }

    Ok(batches
        .into_iter()
        .enumerate()
        .map(|(i, waypoints)| WaypointGroup {
            index: GroupIndex::new(i),
            waypoints,
        })
        .collect())
}

/// Concatenates the groups back into the input waypoint order.
pub fn flatten_groups(groups: &[WaypointGroup]) -> Vec<Waypoint> {
    groups
        .iter()
        .flat_map(|group| group.waypoints.iter().copied())
        .collect()
}
