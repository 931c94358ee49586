use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, info};
use uuid::Uuid;
use waymark_directions::waypoint::Waypoint;

use crate::{
    compile::CompiledRoute,
    error::NavigationError,
    session::{
        engine::{NavigationDelegate, NavigationEngine},
        event::{EventSender, NavigationEvent, RouteProgress},
        options::SessionOptions,
    },
};

/// Relays engine callbacks to the host until the session is detached.
struct SessionDelegate {
    session_id: Uuid,
    events: EventSender,
    detached: AtomicBool,
}

impl SessionDelegate {
    fn emit(&self, event: NavigationEvent) {
        if self.detached.load(Ordering::Acquire) {
            debug!("Session {}: dropping event after detach", self.session_id);
            return;
        }

        // The host stopped listening, nothing left to notify.
        let _ = self.events.send(event);
    }
}

impl NavigationDelegate for SessionDelegate {
    fn did_update_progress(&self, progress: &RouteProgress, location: geo_types::Point) {
        self.emit(NavigationEvent::LocationChange {
            latitude: location.y(),
            longitude: location.x(),
        });
        self.emit(NavigationEvent::from(progress));
    }

    fn did_arrive(&self, waypoint: &Waypoint) -> bool {
        debug!(
            "Session {}: arrived at {}, {}",
            self.session_id,
            waypoint.latitude(),
            waypoint.longitude()
        );
        self.emit(NavigationEvent::Arrive {
            message: String::new(),
        });
        true
    }

    fn did_dismiss(&self, cancelled: bool) {
        if !cancelled {
            return;
        }

        self.emit(NavigationEvent::CancelNavigation {
            message: String::new(),
        });
    }
}

/// A compiled route being presented by the navigation engine.
pub struct NavigationSession {
    id: Uuid,
    route: Arc<CompiledRoute>,
    options: SessionOptions,
    delegate: Arc<SessionDelegate>,
}

impl NavigationSession {
    pub fn start<E>(
        engine: &E,
        route: CompiledRoute,
        options: SessionOptions,
        events: EventSender,
    ) -> Result<Self, NavigationError>
    where
        E: NavigationEngine + ?Sized,
    {
        let id = Uuid::new_v4();
        let route = Arc::new(route);
        let delegate = Arc::new(SessionDelegate {
            session_id: id,
            events,
            detached: AtomicBool::new(false),
        });

        engine.present(
            Arc::clone(&route),
            &options,
            Arc::clone(&delegate) as Arc<dyn NavigationDelegate>,
        )?;

        info!(
            "Session {} started: {} legs, simulate = {}, muted = {}",
            id,
            route.leg_count(),
            options.simulate_route,
            options.mute
        );

        Ok(Self {
            id,
            route,
            options,
            delegate,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn route(&self) -> &CompiledRoute {
        &self.route
    }

    pub fn shared_route(&self) -> Arc<CompiledRoute> {
        Arc::clone(&self.route)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_detached(&self) -> bool {
        self.delegate.detached.load(Ordering::Acquire)
    }

    /// Stops event delivery and releases the engine's controller.
    pub fn detach<E>(&self, engine: &E)
    where
        E: NavigationEngine + ?Sized,
    {
        if self.delegate.detached.swap(true, Ordering::AcqRel) {
            return;
        }

        engine.detach();
        info!("Session {} detached", self.id);
    }
}
