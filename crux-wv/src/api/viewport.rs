//! Viewport endpoints
//!
//! The surface forwards wheel and pointer events; each response carries the
//! viewport to apply to the surface's `viewBox`.

use axum::{extract::State, Json};
use crux_common::viewport::{InputEvent, ViewportStatus};

use crate::AppState;

/// GET /api/viewport
pub async fn get_viewport(State(state): State<AppState>) -> Json<ViewportStatus> {
    Json(state.viewport.read().await.status())
}

/// POST /api/viewport/events
pub async fn apply_viewport_event(
    State(state): State<AppState>,
    Json(event): Json<InputEvent>,
) -> Json<ViewportStatus> {
    let mut viewport = state.viewport.write().await;
    Json(viewport.apply(event))
}

/// POST /api/viewport/reset
pub async fn reset_viewport(State(state): State<AppState>) -> Json<ViewportStatus> {
    let mut viewport = state.viewport.write().await;
    viewport.reset();
    Json(viewport.status())
}
