//! Shared fixtures for layout tests: a realistic resume builder and scripted surfaces.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::LayoutError;
use crate::layout::font_metrics::{get_metrics, FontFamily};
use crate::layout::surface::{layout_height_px, RenderSurface};
use crate::layout::vars::{content_height_px, LayoutVars, PageSpec};
use crate::models::{CustomEntry, EducationEntry, ExperienceEntry, ResumeDocument, Section};

const BULLETS: [&str; 6] = [
    "Cut nightly batch runtime from 4h to 35m by rewriting the ingestion stage in Rust",
    "Led a cross-functional team of 6 to ship the billing migration two weeks early",
    "Designed the alerting pipeline that now pages on-call for 40+ services",
    "Reduced cloud spend by 18% through right-sizing and reserved capacity planning",
    "Mentored four junior engineers through their first production launches",
    "Built internal dashboards in SQL and Python used weekly by finance leadership",
];

/// Header, two roles sharing `bullets` bullets, education, skills and one custom section.
pub fn sample_resume(bullets: usize) -> ResumeDocument {
    let first = bullets.div_ceil(2);
    let role = |company: &str, count: usize, offset: usize| ExperienceEntry {
        company: company.to_string(),
        title: "Senior Software Engineer".to_string(),
        location: "Austin, TX".to_string(),
        date_range: "2019 – 2024".to_string(),
        bullets: (0..count)
            .map(|i| BULLETS[(i + offset) % BULLETS.len()].to_string())
            .collect(),
    };

    ResumeDocument {
        sections: vec![
            Section::Header {
                name: "Jordan Avery".to_string(),
                contact_lines: vec![
                    "jordan@example.com".to_string(),
                    "(512) 555-0142".to_string(),
                    "github.com/javery".to_string(),
                ],
            },
            Section::Experience {
                entries: vec![role("Northwind", first, 0), role("Contoso", bullets - first, 3)],
            },
            Section::Education {
                entries: vec![EducationEntry {
                    institution: "University of Texas".to_string(),
                    degree: "B.S. Computer Science".to_string(),
                    location: "Austin, TX".to_string(),
                    date_range: "2011 – 2015".to_string(),
                    gpa: Some("3.8".to_string()),
                    details: None,
                }],
            },
            Section::Skills {
                text: "Rust, Go, Python, SQL, Kubernetes, Terraform, AWS, Kafka".to_string(),
            },
            Section::Custom {
                entries: vec![CustomEntry {
                    title: "PROJECTS".to_string(),
                    items: vec!["Maintainer of an open-source rate limiter".to_string()],
                }],
            },
        ],
    }
}

/// Surface that always reports the same height and records the vars it saw.
#[derive(Debug, Clone)]
pub struct FixedSurface {
    height: f64,
    seen: Arc<Mutex<Vec<LayoutVars>>>,
}

impl FixedSurface {
    pub fn new(height: f64) -> Self {
        FixedSurface {
            height,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen_vars(&self) -> Vec<LayoutVars> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderSurface for FixedSurface {
    async fn render(
        &mut self,
        _content: &ResumeDocument,
        vars: &LayoutVars,
        _page: &PageSpec,
    ) -> Result<f64, LayoutError> {
        self.seen.lock().unwrap().push(vars.clone());
        Ok(self.height)
    }
}

/// Surface whose height is a fixed multiple of the page target, cycling through `ratios`.
#[derive(Debug, Clone)]
pub struct ScriptedSurface {
    ratios: Vec<f64>,
    next: usize,
}

impl ScriptedSurface {
    pub fn new(ratios: &[f64]) -> Self {
        ScriptedSurface {
            ratios: ratios.to_vec(),
            next: 0,
        }
    }
}

#[async_trait]
impl RenderSurface for ScriptedSurface {
    async fn render(
        &mut self,
        _content: &ResumeDocument,
        _vars: &LayoutVars,
        page: &PageSpec,
    ) -> Result<f64, LayoutError> {
        let ratio = self.ratios[self.next % self.ratios.len()];
        self.next += 1;
        Ok(content_height_px(page) * ratio)
    }
}

/// Surface whose height responds to the text-size knobs and the vertical gaps:
/// `text_px * (body / 11) * (line_height / 1.2) + 4 * gaps`.
#[derive(Debug, Clone)]
pub struct ProportionalSurface {
    text_px: f64,
    seen: Arc<Mutex<Vec<LayoutVars>>>,
    renders: Arc<Mutex<u32>>,
}

impl ProportionalSurface {
    pub fn new(text_px: f64) -> Self {
        ProportionalSurface {
            text_px,
            seen: Arc::new(Mutex::new(Vec::new())),
            renders: Arc::new(Mutex::new(0)),
        }
    }

    /// `text_px` that yields `percent` of the letter target at default vars.
    pub fn at_default_percent(percent: f64) -> Self {
        let defaults = LayoutVars::default();
        let target = 912.0 * percent / 100.0;
        ProportionalSurface::new(target - 4.0 * gaps(&defaults))
    }

    pub fn height(&self, vars: &LayoutVars) -> f64 {
        self.text_px * (vars.body_font_pt / 11.0) * (vars.line_height / 1.2) + 4.0 * gaps(vars)
    }

    pub fn seen_vars(&self) -> Vec<LayoutVars> {
        self.seen.lock().unwrap().clone()
    }

    pub fn renders(&self) -> u32 {
        *self.renders.lock().unwrap()
    }
}

fn gaps(vars: &LayoutVars) -> f64 {
    vars.section_spacing_before_pt
        + vars.section_spacing_after_pt
        + vars.role_gap_pt
        + vars.bullet_spacing_pt
}

#[async_trait]
impl RenderSurface for ProportionalSurface {
    async fn render(
        &mut self,
        _content: &ResumeDocument,
        vars: &LayoutVars,
        _page: &PageSpec,
    ) -> Result<f64, LayoutError> {
        self.seen.lock().unwrap().push(vars.clone());
        *self.renders.lock().unwrap() += 1;
        Ok(self.height(vars))
    }
}

/// Text-metric layout, run inline, that records the vars it saw.
#[derive(Debug, Clone)]
pub struct MeasuredSurface {
    font: FontFamily,
    seen: Arc<Mutex<Vec<LayoutVars>>>,
}

impl MeasuredSurface {
    pub fn new(font: FontFamily) -> Self {
        MeasuredSurface {
            font,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen_vars(&self) -> Vec<LayoutVars> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderSurface for MeasuredSurface {
    async fn render(
        &mut self,
        content: &ResumeDocument,
        vars: &LayoutVars,
        page: &PageSpec,
    ) -> Result<f64, LayoutError> {
        self.seen.lock().unwrap().push(vars.clone());
        Ok(layout_height_px(content, vars, page, get_metrics(self.font)))
    }
}
