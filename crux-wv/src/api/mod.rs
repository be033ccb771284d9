//! HTTP API handlers for crux-wv

pub mod error;
pub mod health;
pub mod scene;
pub mod ui;
pub mod viewport;

pub use error::ApiError;
pub use health::health_routes;
pub use scene::{get_scene, list_athletes, list_problems};
pub use ui::{serve_app_js, serve_index};
pub use viewport::{apply_viewport_event, get_viewport, reset_viewport};
