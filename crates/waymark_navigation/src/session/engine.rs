use std::sync::Arc;

use waymark_directions::waypoint::Waypoint;

use crate::{
    compile::CompiledRoute, error::NavigationError, session::event::RouteProgress,
    session::options::SessionOptions,
};

/// Callbacks the navigation engine makes while a route is presented.
pub trait NavigationDelegate: Send + Sync {
    fn did_update_progress(&self, progress: &RouteProgress, location: geo_types::Point);

    /// Returns whether the engine should advance to the next leg.
    fn did_arrive(&self, waypoint: &Waypoint) -> bool;

    fn did_dismiss(&self, cancelled: bool);
}

/// The turn-by-turn presentation engine (map, banners, voice).
pub trait NavigationEngine: Send + Sync {
    fn present(
        &self,
        route: Arc<CompiledRoute>,
        options: &SessionOptions,
        delegate: Arc<dyn NavigationDelegate>,
    ) -> Result<(), NavigationError>;

    /// Releases the presented controller. No callbacks follow a detach.
    fn detach(&self);
}
