pub mod compile;
pub mod dispatch;
pub mod error;
pub mod grouping;
pub mod planner;
pub mod session;
pub mod simulation;
mod utils;
pub mod view;

pub use waymark_directions::waypoint::Waypoint;

#[cfg(test)]
pub(crate) mod test_utils;
