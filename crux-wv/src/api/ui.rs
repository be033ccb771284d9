//! UI serving routes
//!
//! Serves the wall surface page and its script. The page's SVG declares the
//! configured extent as its `viewBox`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::AppState;

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const APP_JS: &str = include_str!("../../ui/app.js");

/// GET /
pub async fn serve_index(State(state): State<AppState>) -> Html<String> {
    Html(INDEX_HTML.replace("{{VIEW_BOX}}", &state.view_box))
}

/// GET /static/app.js
pub async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/javascript")],
        APP_JS,
    )
        .into_response()
}
