//! PageFit: deterministic bullet selection and one-page layout fitting for resumes.
//!
//! - [`tailoring`] scores resume bullets against a job checklist and selects a bounded,
//!   coverage-maximizing subset.
//! - [`layout`] adjusts purely visual parameters until the resume fills exactly one page.
//!
//! The binary target serves both over HTTP; see [`routes::build_router`].

pub mod config;
pub mod errors;
pub mod layout;
pub mod models;
pub mod routes;
pub mod state;
pub mod tailoring;

pub use errors::{AppError, LayoutError, TailorError};
pub use layout::{layout_vars_to_docx, measure_fit, run_page_fit};
pub use tailoring::{apply_bullet_rewrites, score_and_select_bullets};
