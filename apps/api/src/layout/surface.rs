//! The only code that touches a render surface.
//!
//! A `FitContainer` owns one surface behind an async mutex. Every measurement, whether it
//! comes from the solver or the live indicator, goes through that lock, so two measurements
//! of the same container never interleave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::errors::LayoutError;
use crate::layout::font_metrics::{get_metrics, FontFamily, FontMetricTable};
use crate::layout::vars::{content_height_px, in_to_px, pt_to_px, LayoutVars, PageSpec, PaperSize};
use crate::models::{ResumeDocument, Section};

/// Left indent of a bullet's text relative to the content box.
const BULLET_INDENT_IN: f64 = 0.25;

// ────────────────────────────────────────────────────────────────────────────
// Fit status
// ────────────────────────────────────────────────────────────────────────────

/// Where a measurement lands relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStatus {
    /// Below 95%.
    Under,
    /// 95–99%.
    Fits,
    /// Above 99% up to and including 100%.
    Tight,
    /// Above 100%. A status, never an error.
    Overflow,
}

impl FitStatus {
    pub fn from_percent(fit_percent: f64) -> Self {
        if fit_percent > 100.0 {
            FitStatus::Overflow
        } else if fit_percent > 99.0 {
            FitStatus::Tight
        } else if fit_percent >= 95.0 {
            FitStatus::Fits
        } else {
            FitStatus::Under
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitMeasurement {
    pub height_px: f64,
    pub target_px: f64,
    pub fit_percent: f64,
    pub status: FitStatus,
}

impl FitMeasurement {
    pub fn new(height_px: f64, target_px: f64) -> Self {
        let fit_percent = if target_px > 0.0 {
            height_px / target_px * 100.0
        } else if height_px > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        FitMeasurement {
            height_px,
            target_px,
            fit_percent,
            status: FitStatus::from_percent(fit_percent),
        }
    }

    pub fn overflows(&self) -> bool {
        self.status == FitStatus::Overflow
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Render surface
// ────────────────────────────────────────────────────────────────────────────

/// Something that can lay out a resume and report how tall it came out.
///
/// Implementations must treat `content` as read-only.
#[async_trait]
pub trait RenderSurface: Send {
    /// Renders `content` into the content box of `page` and returns the occupied height in
    /// reference pixels.
    async fn render(
        &mut self,
        content: &ResumeDocument,
        vars: &LayoutVars,
        page: &PageSpec,
    ) -> Result<f64, LayoutError>;
}

/// Surface backed by static glyph-width tables and greedy word wrap.
#[derive(Debug, Clone)]
pub struct MetricsSurface {
    font: FontFamily,
    renders: u32,
}

impl MetricsSurface {
    pub fn new(font: FontFamily) -> Self {
        MetricsSurface { font, renders: 0 }
    }

    pub fn font(&self) -> FontFamily {
        self.font
    }

    /// Number of completed renders on this surface.
    pub fn renders(&self) -> u32 {
        self.renders
    }
}

#[async_trait]
impl RenderSurface for MetricsSurface {
    async fn render(
        &mut self,
        content: &ResumeDocument,
        vars: &LayoutVars,
        page: &PageSpec,
    ) -> Result<f64, LayoutError> {
        // Wrapping every line of the document is CPU-bound; keep it off the async workers.
        let content = content.clone();
        let vars = vars.clone();
        let page = *page;
        let font = self.font;
        let height = tokio::task::spawn_blocking(move || {
            layout_height_px(&content, &vars, &page, get_metrics(font))
        })
        .await
        .map_err(|e| LayoutError::Render(format!("layout task failed: {e}")))?;

        self.renders += 1;
        Ok(height)
    }
}

/// Stacks the fixed resume schema top to bottom and returns the total height in px.
pub fn layout_height_px(
    content: &ResumeDocument,
    vars: &LayoutVars,
    page: &PageSpec,
    metrics: &FontMetricTable,
) -> f64 {
    let width = page.content_width_px();
    let bullet_width = (width - in_to_px(BULLET_INDENT_IN)).max(0.0);
    let body_line = pt_to_px(vars.body_font_pt * vars.line_height);
    let body = |text: &str, w: f64| f64::from(metrics.line_count(text, w, vars.body_font_pt)) * body_line;

    let heading = |title: &str| {
        let line = pt_to_px(vars.section_header_font_pt * vars.line_height);
        f64::from(metrics.line_count(title, width, vars.section_header_font_pt).max(1)) * line
            + pt_to_px(vars.section_spacing_after_pt)
    };

    let mut height = 0.0;
    let mut blocks = 0usize;
    let mut open_block = |height: &mut f64| {
        if blocks > 0 {
            *height += pt_to_px(vars.section_spacing_before_pt);
        }
        blocks += 1;
    };

    for section in &content.sections {
        match section {
            Section::Header {
                name,
                contact_lines,
            } => {
                open_block(&mut height);
                let name_line = pt_to_px(vars.name_font_pt * vars.line_height);
                height += f64::from(metrics.line_count(name, width, vars.name_font_pt)) * name_line;
                if !contact_lines.is_empty() {
                    height += pt_to_px(vars.contact_spacing_pt);
                    height += body(&contact_lines.join(" | "), width);
                }
            }
            Section::Education { entries } => {
                open_block(&mut height);
                height += heading("EDUCATION");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        height += pt_to_px(vars.role_gap_pt);
                    }
                    height += body(&format!("{}  {}", entry.institution, entry.location), width);
                    height += body(&format!("{}  {}", entry.degree, entry.date_range), width);
                    if let Some(gpa) = &entry.gpa {
                        height += body(&format!("GPA: {gpa}"), width);
                    }
                    if let Some(details) = &entry.details {
                        height += body(details, width);
                    }
                }
            }
            Section::Experience { entries } => {
                open_block(&mut height);
                height += heading("EXPERIENCE");
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        height += pt_to_px(vars.role_gap_pt);
                    }
                    height += body(&format!("{}  {}", entry.company, entry.location), width);
                    height += body(&format!("{}  {}", entry.title, entry.date_range), width);
                    for (j, bullet) in entry.bullets.iter().enumerate() {
                        if j > 0 {
                            height += pt_to_px(vars.bullet_spacing_pt);
                        }
                        height += body(bullet, bullet_width);
                    }
                }
            }
            Section::Skills { text } => {
                open_block(&mut height);
                height += heading("SKILLS");
                height += body(text, width);
            }
            Section::Additional { text } => {
                open_block(&mut height);
                height += heading("ADDITIONAL");
                height += body(text, width);
            }
            Section::Custom { entries } => {
                for entry in entries {
                    open_block(&mut height);
                    height += heading(&entry.title);
                    for (j, item) in entry.items.iter().enumerate() {
                        if j > 0 {
                            height += pt_to_px(vars.bullet_spacing_pt);
                        }
                        height += body(item, bullet_width);
                    }
                }
            }
        }
    }
    height
}

// ────────────────────────────────────────────────────────────────────────────
// Container
// ────────────────────────────────────────────────────────────────────────────

/// A render surface plus the paper it prints on. Access to the surface is serialized.
pub struct FitContainer<S> {
    id: Uuid,
    paper: PaperSize,
    surface: Mutex<S>,
}

impl<S: RenderSurface> FitContainer<S> {
    pub fn new(surface: S, paper: PaperSize) -> Self {
        FitContainer {
            id: Uuid::new_v4(),
            paper,
            surface: Mutex::new(surface),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    /// Waits for exclusive access to the surface.
    pub async fn lock(&self) -> MutexGuard<'_, S> {
        self.surface.lock().await
    }

    pub fn into_surface(self) -> S {
        self.surface.into_inner()
    }
}

/// Renders once and returns the occupied height. Rejects heights that are not a finite,
/// non-negative number.
pub async fn measure_rendered_height<S: RenderSurface + ?Sized>(
    surface: &mut S,
    content: &ResumeDocument,
    vars: &LayoutVars,
    page: &PageSpec,
) -> Result<f64, LayoutError> {
    let height = surface.render(content, vars, page).await?;
    if !height.is_finite() || height < 0.0 {
        return Err(LayoutError::InvalidMeasurement(height));
    }
    Ok(height)
}

/// Measures against an already-held surface. `vars` must already be clamped.
pub(crate) async fn measure_with<S: RenderSurface + ?Sized>(
    surface: &mut S,
    paper: PaperSize,
    content: &ResumeDocument,
    vars: &LayoutVars,
) -> Result<FitMeasurement, LayoutError> {
    let page = PageSpec::new(paper, vars);
    let height = measure_rendered_height(surface, content, vars, &page).await?;
    Ok(FitMeasurement::new(height, content_height_px(&page)))
}

/// One locked measurement of `content` at `vars` (clamped first).
pub async fn measure_fit<S: RenderSurface>(
    container: &FitContainer<S>,
    content: &ResumeDocument,
    vars: &LayoutVars,
) -> Result<FitMeasurement, LayoutError> {
    let vars = vars.clamped();
    let mut surface = container.lock().await;
    measure_with(&mut *surface, container.paper(), content, &vars).await
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::layout::test_support::{sample_resume, FixedSurface};

    fn height(content: &ResumeDocument, vars: &LayoutVars) -> f64 {
        let page = PageSpec::new(PaperSize::Letter, vars);
        layout_height_px(content, vars, &page, get_metrics(FontFamily::Arial))
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(FitStatus::from_percent(0.0), FitStatus::Under);
        assert_eq!(FitStatus::from_percent(94.99), FitStatus::Under);
        assert_eq!(FitStatus::from_percent(95.0), FitStatus::Fits);
        assert_eq!(FitStatus::from_percent(99.0), FitStatus::Fits);
        assert_eq!(FitStatus::from_percent(99.5), FitStatus::Tight);
        assert_eq!(FitStatus::from_percent(100.0), FitStatus::Tight);
        assert_eq!(FitStatus::from_percent(100.01), FitStatus::Overflow);
    }

    #[test]
    fn test_measurement_percent() {
        let m = FitMeasurement::new(456.0, 912.0);
        assert!((m.fit_percent - 50.0).abs() < 1e-9);
        assert_eq!(m.status, FitStatus::Under);
        assert!(FitMeasurement::new(1000.0, 912.0).overflows());
    }

    #[test]
    fn test_empty_resume_has_zero_height() {
        assert_eq!(height(&ResumeDocument::default(), &LayoutVars::default()), 0.0);
    }

    #[test]
    fn test_more_bullets_are_taller() {
        let vars = LayoutVars::default();
        assert!(height(&sample_resume(12), &vars) > height(&sample_resume(4), &vars));
    }

    #[test]
    fn test_larger_font_and_spacing_are_taller() {
        let content = sample_resume(8);
        let base = LayoutVars::default();
        let bigger_font = LayoutVars {
            body_font_pt: 12.0,
            ..base.clone()
        };
        let more_space = LayoutVars {
            section_spacing_before_pt: 14.0,
            role_gap_pt: 10.0,
            ..base.clone()
        };
        assert!(height(&content, &bigger_font) > height(&content, &base));
        assert!(height(&content, &more_space) > height(&content, &base));
    }

    #[test]
    fn test_narrow_margins_never_increase_height() {
        let content = sample_resume(10);
        let wide = LayoutVars {
            margin_horizontal_in: 1.0,
            ..LayoutVars::default()
        };
        let narrow = LayoutVars {
            margin_horizontal_in: 0.4,
            ..LayoutVars::default()
        };
        assert!(height(&content, &narrow) <= height(&content, &wide));
    }

    #[tokio::test]
    async fn test_measure_fit_on_metrics_surface() {
        let container = FitContainer::new(MetricsSurface::new(FontFamily::Arial), PaperSize::Letter);
        let content = sample_resume(6);
        let snapshot = content.clone();

        let m = measure_fit(&container, &content, &LayoutVars::default())
            .await
            .unwrap();
        assert!((m.target_px - 912.0).abs() < 1e-9);
        assert!(m.height_px > 0.0);
        assert_eq!(content, snapshot);
        assert_eq!(container.into_surface().renders(), 1);
    }

    #[tokio::test]
    async fn test_measure_fit_clamps_before_rendering() {
        let container = FitContainer::new(FixedSurface::new(100.0), PaperSize::Letter);
        let wild = LayoutVars {
            margin_vertical_in: 9.0,
            ..LayoutVars::default()
        };
        let m = measure_fit(&container, &sample_resume(1), &wild).await.unwrap();
        // 11in page with two 1in margins.
        assert!((m.target_px - 864.0).abs() < 1e-9);
        let seen = container.into_surface().seen_vars();
        assert!(seen.iter().all(LayoutVars::is_valid));
    }

    #[tokio::test]
    async fn test_invalid_height_is_rejected() {
        let container = FitContainer::new(FixedSurface::new(f64::NAN), PaperSize::Letter);
        let err = measure_fit(&container, &sample_resume(1), &LayoutVars::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidMeasurement(_)));

        let container = FitContainer::new(FixedSurface::new(-3.0), PaperSize::Letter);
        let err = measure_fit(&container, &sample_resume(1), &LayoutVars::default())
            .await
            .unwrap_err();
        assert_eq!(err, LayoutError::InvalidMeasurement(-3.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_measurement_waits_for_container_lock() {
        let container = FitContainer::new(FixedSurface::new(100.0), PaperSize::Letter);
        let content = sample_resume(1);
        let vars = LayoutVars::default();

        let guard = container.lock().await;
        let blocked = tokio::time::timeout(
            Duration::from_millis(50),
            measure_fit(&container, &content, &vars),
        )
        .await;
        assert!(blocked.is_err(), "measurement must not run while the lock is held");

        drop(guard);
        assert!(measure_fit(&container, &content, &vars).await.is_ok());
    }
}
