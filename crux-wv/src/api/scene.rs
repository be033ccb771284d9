//! Selection and scene endpoints
//!
//! The surface asks for the scene of a selection and draws it: a marker per
//! point and a path per curve, each tagged with its group attributes.

use axum::{
    extract::{Query, State},
    Json,
};
use crux_common::{build_scene, Scene, Selection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiError;
use crate::AppState;

/// Response listing problem ids in coordinate-table order
#[derive(Debug, Serialize)]
pub struct ProblemsResponse {
    pub problems: Vec<String>,
}

/// Response listing athletes in order of first appearance
#[derive(Debug, Serialize)]
pub struct AthletesResponse {
    pub athletes: Vec<String>,
}

/// Optional filters shared by `/api/athletes` and `/api/scene`
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub athlete: Option<String>,
    pub problem: Option<String>,
}

impl SelectionQuery {
    fn selection(&self) -> Selection {
        Selection::from_filters(self.athlete.as_deref(), self.problem.as_deref())
    }
}

/// GET /api/problems
pub async fn list_problems(State(state): State<AppState>) -> Json<ProblemsResponse> {
    Json(ProblemsResponse {
        problems: state.index.problem_ids().to_vec(),
    })
}

/// GET /api/athletes?problem=
///
/// All athletes, or only those with records on `problem`.
pub async fn list_athletes(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Json<AthletesResponse> {
    let athletes = match query.problem.as_deref().filter(|p| !p.is_empty()) {
        Some(problem) => state.index.athletes_for_problem(problem),
        None => state.index.athletes(),
    };
    Json(AthletesResponse { athletes })
}

/// GET /api/scene?athlete=&problem=
///
/// No filters draws everything; unknown names are 404.
pub async fn get_scene(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<Scene>, ApiError> {
    let selection = query.selection();
    selection.validate(&state.index)?;

    let scene = build_scene(&state.index, &selection);
    debug!(
        ?selection,
        groups = scene.groups.len(),
        curves = scene.curve_count(),
        "Built scene"
    );
    Ok(Json(scene))
}
