use crate::config::Config;
use crate::layout::{FitContainer, MetricsSurface, PageFitOptions};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Solver settings derived from config once at startup.
    pub page_fit_options: PageFitOptions,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let page_fit_options = PageFitOptions {
            max_iterations: config.max_iterations,
            ..PageFitOptions::default()
        };
        AppState {
            config,
            page_fit_options,
        }
    }

    /// Fresh text-metrics container for one request.
    pub fn new_container(&self) -> FitContainer<MetricsSurface> {
        FitContainer::new(MetricsSurface::new(self.config.font), self.config.paper)
    }
}
