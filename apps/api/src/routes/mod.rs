pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::layout::handlers as layout;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Bullets API
        .route(
            "/api/v1/bullets/select",
            post(tailoring::handle_select_bullets),
        )
        .route(
            "/api/v1/bullets/rewrite",
            post(tailoring::handle_rewrite_bullets),
        )
        // Layout API
        .route(
            "/api/v1/layout/defaults",
            post(layout::handle_layout_defaults),
        )
        .route("/api/v1/layout/measure", post(layout::handle_measure))
        .route("/api/v1/layout/fit", post(layout::handle_page_fit))
        .route("/api/v1/layout/docx", post(layout::handle_docx))
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
