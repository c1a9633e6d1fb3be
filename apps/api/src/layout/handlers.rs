//! Axum route handlers for the Layout API.
//!
//! Every request renders into its own container, so concurrent requests never share a surface.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::docx::{layout_vars_to_docx, DocxStyleRecord};
use crate::layout::solver::{run_page_fit, PageFitResult};
use crate::layout::surface::{measure_fit, FitMeasurement};
use crate::layout::vars::{default_layout_vars, Density, LayoutVars};
use crate::models::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutDefaultsRequest {
    pub resume: ResumeDocument,
}

#[derive(Debug, Serialize)]
pub struct LayoutDefaultsResponse {
    pub density: Density,
    pub char_count: usize,
    pub layout_vars: LayoutVars,
}

#[derive(Debug, Deserialize)]
pub struct LayoutRequest {
    pub resume: ResumeDocument,
    /// Starting point. Defaults to the density preset for the resume.
    #[serde(default)]
    pub layout_vars: Option<LayoutVars>,
}

impl LayoutRequest {
    fn starting_vars(&self) -> LayoutVars {
        self.layout_vars
            .clone()
            .unwrap_or_else(|| default_layout_vars(self.resume.char_count()))
    }
}

#[derive(Debug, Serialize)]
pub struct PageFitResponse {
    #[serde(flatten)]
    pub result: PageFitResult,
    pub docx: DocxStyleRecord,
}

#[derive(Debug, Deserialize)]
pub struct DocxRequest {
    pub layout_vars: LayoutVars,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/layout/defaults
pub async fn handle_layout_defaults(
    Json(request): Json<LayoutDefaultsRequest>,
) -> Json<LayoutDefaultsResponse> {
    let char_count = request.resume.char_count();
    let density = Density::for_char_count(char_count);
    Json(LayoutDefaultsResponse {
        density,
        char_count,
        layout_vars: density.preset(),
    })
}

/// POST /api/v1/layout/measure
///
/// One measurement, no adjustment.
pub async fn handle_measure(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<FitMeasurement>, AppError> {
    let container = state.new_container();
    let measurement = measure_fit(&container, &request.resume, &request.starting_vars()).await?;
    Ok(Json(measurement))
}

/// POST /api/v1/layout/fit
///
/// Runs the solver and returns the fitted vars together with their DOCX units.
/// Overflow that cannot be fixed is reported in `status`, with a 200.
pub async fn handle_page_fit(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<PageFitResponse>, AppError> {
    let container = state.new_container();
    let result = run_page_fit(
        &container,
        &request.starting_vars(),
        &request.resume,
        &state.page_fit_options,
    )
    .await?;
    let docx = layout_vars_to_docx(&result.final_layout_vars);

    Ok(Json(PageFitResponse { result, docx }))
}

/// POST /api/v1/layout/docx
pub async fn handle_docx(
    Json(request): Json<DocxRequest>,
) -> Result<Json<DocxStyleRecord>, AppError> {
    if !request.layout_vars.is_valid() {
        return Err(AppError::Validation(
            "layout_vars has a field outside its allowed range".to_string(),
        ));
    }
    Ok(Json(layout_vars_to_docx(&request.layout_vars)))
}
