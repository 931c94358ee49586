pub mod engine;
pub mod event;
pub mod navigation_session;
pub mod options;
