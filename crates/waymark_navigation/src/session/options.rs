use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use waymark_directions::route_options::DEFAULT_LOCALE;

pub const DEFAULT_MAP_STYLE_URL: &str = "mapbox://styles/driveapp/cl28en201000415mkpdop4fj9";

/// Presentation settings handed to the navigation engine with the route.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub simulate_route: bool,
    pub shows_end_of_route_feedback: bool,
    pub hide_status_view: bool,
    pub mute: bool,
    pub locale: String,
    pub map_style_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            simulate_route: false,
            shows_end_of_route_feedback: false,
            hide_status_view: false,
            mute: false,
            locale: String::from(DEFAULT_LOCALE),
            map_style_url: String::from(DEFAULT_MAP_STYLE_URL),
        }
    }
}
