//! Axum route handlers for the Bullets API.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::{BulletRef, ResumeDocument};
use crate::state::AppState;
use crate::tailoring::checklist::JobChecklist;
use crate::tailoring::pipeline::{apply_bullet_rewrites, select_for_checklist, BulletRewrite};
use crate::tailoring::selector::SelectionResult;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectBulletsRequest {
    pub resume: ResumeDocument,
    /// Untrusted generator output; shape-checked before use.
    pub checklist: Value,
    pub max_count: Option<usize>,
}

/// Rewrite as it arrives on the wire. Ids stay strings until validated so a malformed id is
/// reported as such instead of as a body-parse failure.
#[derive(Debug, Deserialize)]
pub struct RawBulletRewrite {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteBulletsRequest {
    pub resume: ResumeDocument,
    pub rewrites: Vec<RawBulletRewrite>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/bullets/select
///
/// Scores every experience bullet against the checklist and returns the selection with its
/// coverage report. Missing must-haves are reported, not an error.
pub async fn handle_select_bullets(
    State(state): State<AppState>,
    Json(request): Json<SelectBulletsRequest>,
) -> Result<Json<SelectionResult>, AppError> {
    let checklist = JobChecklist::from_value(&request.checklist)?;
    let max_count = request
        .max_count
        .unwrap_or(state.config.max_selected_bullets);

    let result = select_for_checklist(&request.resume, &checklist, max_count)?;

    info!(
        bullets = request.resume.bullet_count(),
        selected = result.selected_bullets.len(),
        missing = result.coverage.missing.len(),
        "bullets selected"
    );

    Ok(Json(result))
}

/// POST /api/v1/bullets/rewrite
///
/// Applies externally produced rewrites to the resume. Every id must parse and resolve.
pub async fn handle_rewrite_bullets(
    Json(request): Json<RewriteBulletsRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    let rewrites = request
        .rewrites
        .into_iter()
        .map(|raw| -> Result<BulletRewrite, AppError> {
            Ok(BulletRewrite {
                id: raw.id.parse::<BulletRef>()?,
                text: raw.text,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let updated = apply_bullet_rewrites(&request.resume, &rewrites)?;

    info!(rewrites = rewrites.len(), "bullet rewrites applied");

    Ok(Json(updated))
}
