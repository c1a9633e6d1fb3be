// PageFit layout engine.
// Fits a fixed resume onto one page by moving visual knobs only; content is never touched.
// Text-metric rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod docx;
pub mod font_metrics;
pub mod handlers;
pub mod indicator;
pub mod solver;
pub mod surface;
pub mod vars;

#[cfg(test)]
pub(crate) mod test_support;

pub use docx::{layout_vars_to_docx, DocxStyleRecord};
pub use font_metrics::FontFamily;
pub use indicator::{FitIndicator, FitReading};
pub use solver::{run_page_fit, PageFitOptions, PageFitResult, Termination};
pub use surface::{
    measure_fit, measure_rendered_height, FitContainer, FitMeasurement, FitStatus, MetricsSurface,
    RenderSurface,
};
pub use vars::{content_height_px, default_layout_vars, Density, LayoutVars, PageSpec, PaperSize};
