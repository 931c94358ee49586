use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::waypoint::Waypoint;

pub const DEFAULT_LOCALE: &str = "en_US";

/// https://docs.mapbox.com/api/navigation/directions/#routing-profiles
#[derive(Deserialize, Serialize, JsonSchema, Debug, Copy, Clone, Hash, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutingProfile {
    /// Traffic-aware driving, the profile used for turn-by-turn navigation.
    #[default]
    DrivingTraffic,
    Driving,
    Walking,
    Cycling,
}

impl Display for RoutingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RoutingProfile::DrivingTraffic => "driving-traffic",
                RoutingProfile::Driving => "driving",
                RoutingProfile::Walking => "walking",
                RoutingProfile::Cycling => "cycling",
            }
        )
    }
}

/// Parameters of a single directions request.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub waypoints: Vec<Waypoint>,
    pub profile: RoutingProfile,

    /// Locale identifier such as `en_US`
    pub locale: String,
}

impl RouteOptions {
    pub fn new(waypoints: Vec<Waypoint>, profile: RoutingProfile, locale: impl Into<String>) -> Self {
        Self {
            waypoints,
            profile,
            locale: locale.into(),
        }
    }

    /// The locale as a BCP 47 language tag (`en_US` becomes `en-US`).
    pub fn language(&self) -> String {
        self.locale.replace('_', "-")
    }

    /// Indices of the waypoints that end a leg. The origin and the destination
    /// always separate legs, whatever their flag says.
    pub fn leg_separator_indices(&self) -> Vec<usize> {
        let last = self.waypoints.len().saturating_sub(1);
        self.waypoints
            .iter()
            .enumerate()
            .filter(|(i, waypoint)| *i == 0 || *i == last || waypoint.separates_legs())
            .map(|(i, _)| i)
            .collect()
    }
}

impl std::hash::Hash for RouteOptions {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.waypoints.len().hash(state);
        for waypoint in &self.waypoints {
            state.write_u64(waypoint.longitude().to_bits());
            state.write_u64(waypoint.latitude().to_bits());
            waypoint.separates_legs().hash(state);
        }
        self.profile.hash(state);
        self.locale.hash(state);
    }
}
