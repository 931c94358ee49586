use serde::Serialize;
use tokio::sync::mpsc;

/// Progress along the active route, as reported by the navigation engine.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RouteProgress {
    pub leg_index: usize,

    /// Meters
    pub distance_traveled: f64,

    /// Seconds
    pub duration_remaining: f64,

    /// Between 0 and 1
    pub fraction_traveled: f64,

    /// Meters
    pub distance_remaining: f64,
}

/// Events delivered to the host application, serialized with the host's
/// callback names.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload")]
pub enum NavigationEvent {
    #[serde(rename = "onLocationChange")]
    LocationChange { latitude: f64, longitude: f64 },

    #[serde(rename = "onRouteProgressChange", rename_all = "camelCase")]
    RouteProgressChange {
        distance_traveled: f64,
        duration_remaining: f64,
        fraction_traveled: f64,
        distance_remaining: f64,
    },

    #[serde(rename = "onError")]
    Error { message: String },

    #[serde(rename = "onCancelNavigation")]
    CancelNavigation { message: String },

    #[serde(rename = "onArrive")]
    Arrive { message: String },
}

impl From<&RouteProgress> for NavigationEvent {
    fn from(progress: &RouteProgress) -> Self {
        NavigationEvent::RouteProgressChange {
            distance_traveled: progress.distance_traveled,
            duration_remaining: progress.duration_remaining,
            fraction_traveled: progress.fraction_traveled,
            distance_remaining: progress.distance_remaining,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<NavigationEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<NavigationEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
