pub mod cache;
pub mod directions_service;
pub mod mapbox_api;
pub mod route_options;
pub mod route_response;
pub mod straight_line;
pub mod waypoint;
