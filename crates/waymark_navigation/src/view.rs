//! The embeddable navigation component: takes the host's props, routes them
//! once laid out, and hands the compiled route to the navigation engine.

use std::sync::Arc;

use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use waymark_directions::{
    directions_service::DirectionsService,
    route_options::{DEFAULT_LOCALE, RoutingProfile},
    waypoint::Waypoint,
};

use crate::{
    compile::CompiledRoute,
    dispatch::{DispatchParams, FailurePolicy},
    error::NavigationError,
    grouping::MIN_WAYPOINTS_PER_GROUP,
    planner::RoutePlanner,
    session::{
        engine::NavigationEngine,
        event::{EventSender, NavigationEvent},
        navigation_session::NavigationSession,
        options::{DEFAULT_MAP_STYLE_URL, SessionOptions},
    },
};

fn default_locale() -> String {
    String::from(DEFAULT_LOCALE)
}

/// Properties set by the host application.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationProps {
    /// `[longitude, latitude]` pairs in travel order
    pub waypoints: Vec<[f64; 2]>,

    #[serde(default)]
    pub should_simulate_route: bool,

    #[serde(default)]
    pub shows_end_of_route_feedback: bool,

    #[serde(default)]
    pub hide_status_view: bool,

    #[serde(default)]
    pub mute: bool,

    #[serde(default = "default_locale")]
    pub locale_identifier: String,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for NavigationProps {
    fn default() -> Self {
        Self {
            waypoints: vec![],
            should_simulate_route: false,
            shows_end_of_route_feedback: false,
            hide_status_view: false,
            mute: false,
            locale_identifier: default_locale(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl NavigationProps {
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.waypoints
            .iter()
            .map(|&lon_lat| Waypoint::from_lon_lat(lon_lat))
            .collect()
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            simulate_route: self.should_simulate_route,
            shows_end_of_route_feedback: self.shows_end_of_route_feedback,
            hide_status_view: self.hide_status_view,
            mute: self.mute,
            locale: self.locale_identifier.clone(),
            map_style_url: String::from(DEFAULT_MAP_STYLE_URL),
        }
    }

    pub fn dispatch_params(&self) -> DispatchParams {
        DispatchParams {
            profile: RoutingProfile::DrivingTraffic,
            locale: self.locale_identifier.clone(),
            failure_policy: self.failure_policy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedState {
    Idle,
    Embedding,
    Embedded,
    Removed,
}

struct ViewState {
    embed: EmbedState,
    session: Option<NavigationSession>,
}

pub struct NavigationView<D, E> {
    props: NavigationProps,
    planner: RoutePlanner<D>,
    engine: E,
    events: EventSender,
    state: Mutex<ViewState>,
}

impl<D, E> NavigationView<D, E>
where
    D: DirectionsService,
    E: NavigationEngine,
{
    pub fn new(props: NavigationProps, directions: D, engine: E, events: EventSender) -> Self {
        Self {
            planner: RoutePlanner::new(directions, props.dispatch_params()),
            props,
            engine,
            events,
            state: Mutex::new(ViewState {
                embed: EmbedState::Idle,
                session: None,
            }),
        }
    }

    pub fn props(&self) -> &NavigationProps {
        &self.props
    }

    pub fn planner(&self) -> &RoutePlanner<D> {
        &self.planner
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn embed_state(&self) -> EmbedState {
        self.state.lock().embed
    }

    pub fn has_session(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// Route presented by the current session, if any.
    pub fn compiled_route(&self) -> Option<Arc<CompiledRoute>> {
        self.state
            .lock()
            .session
            .as_ref()
            .map(|session| session.shared_route())
    }

    fn emit(&self, event: NavigationEvent) {
        let _ = self.events.send(event);
    }

    /// Embeds the navigation session the first time the view is laid out.
    ///
    /// Calls made while an embedding is in flight, or after it finished, do
    /// nothing. A failed attempt is reported once through `onError` and is
    /// not retried.
    pub async fn layout(&self) -> Result<(), NavigationError> {
        if self.props.waypoints.len() < MIN_WAYPOINTS_PER_GROUP {
            debug!(
                "Layout with {} waypoints, waiting for a route",
                self.props.waypoints.len()
            );
            return Ok(());
        }

        {
            let mut state = self.state.lock();
            if state.embed != EmbedState::Idle {
                debug!("Layout while {:?}, nothing to embed", state.embed);
                return Ok(());
            }
            state.embed = EmbedState::Embedding;
        }

        let planned = self.planner.plan(&self.props.waypoints()).await;

        // Started under the state lock so `remove` cannot interleave with it.
        let mut state = self.state.lock();
        if state.embed == EmbedState::Removed {
            info!("View removed while embedding, the route is not presented");
            return Ok(());
        }

        state.embed = EmbedState::Embedded;
        let started = planned.and_then(|route| {
            NavigationSession::start(
                &self.engine,
                route,
                self.props.session_options(),
                self.events.clone(),
            )
        });

        match started {
            Ok(session) => {
                state.session = Some(session);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to embed navigation: {}", err);
                self.emit(NavigationEvent::Error {
                    message: err.host_message(),
                });
                Err(err)
            }
        }
    }

    /// Tears the view down. The session is detached and no event is
    /// delivered afterwards.
    pub fn remove(&self) {
        let mut state = self.state.lock();
        state.embed = EmbedState::Removed;

        if let Some(session) = state.session.take() {
            session.detach(&self.engine);
        }
    }
}
