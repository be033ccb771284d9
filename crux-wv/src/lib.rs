//! crux-wv library - Wall Viewer service
//!
//! Serves the wall surface page and the JSON API it draws from. Both
//! datasets are loaded before the router is built; after that the attempt
//! index is read-only and only the viewport changes.

use axum::Router;
use crux_common::{AttemptIndex, ViewportController};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Records and hold coordinates, grouped for drawing
    pub index: Arc<AttemptIndex>,
    /// The surface's viewport; events are applied one at a time
    pub viewport: Arc<RwLock<ViewportController>>,
    /// Declared extent of the surface, written into the served page
    pub view_box: Arc<str>,
}

impl AppState {
    /// Create application state; `view_box` is the surface's declared extent
    pub fn new(index: AttemptIndex, view_box: &str) -> Self {
        let viewport = ViewportController::from_attribute(Some(view_box));
        Self {
            index: Arc::new(index),
            view_box: Arc::from(viewport.original().to_string()),
            viewport: Arc::new(RwLock::new(viewport)),
        }
    }
}

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_DIRECTIVES: &str = "crux_wv=debug,crux_common=info,tower_http=debug";

/// Log filter directives for an optionally configured level
///
/// A configured level applies to both crux crates; request tracing stays at debug.
pub fn log_directives(level: Option<&str>) -> String {
    match level.map(str::trim).filter(|l| !l.is_empty()) {
        Some(level) => format!("crux_wv={level},crux_common={level},tower_http=debug"),
        None => DEFAULT_LOG_DIRECTIVES.to_string(),
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/problems", get(api::list_problems))
        .route("/api/athletes", get(api::list_athletes))
        .route("/api/scene", get(api::get_scene))
        .route("/api/viewport", get(api::get_viewport))
        .route("/api/viewport/events", post(api::apply_viewport_event))
        .route("/api/viewport/reset", post(api::reset_viewport));

    let public = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directives_default() {
        assert_eq!(log_directives(None), "crux_wv=debug,crux_common=info,tower_http=debug");
        assert_eq!(log_directives(Some(" ")), DEFAULT_LOG_DIRECTIVES);
    }

    #[test]
    fn test_log_directives_configured_level() {
        assert_eq!(
            log_directives(Some("warn")),
            "crux_wv=warn,crux_common=warn,tower_http=debug"
        );
    }
}
