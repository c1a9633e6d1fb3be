//! Debounced, read-only view of how full the page is.
//!
//! Each `request` supersedes the previous one: the pending task is aborted and a generation
//! counter drops any result that still slips through. The indicator only ever measures; it
//! never adjusts layout vars.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::layout::surface::{measure_fit, FitContainer, FitMeasurement, FitStatus, RenderSurface};
use crate::layout::vars::LayoutVars;
use crate::models::ResumeDocument;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReading {
    pub fit_percent: f64,
    pub status: FitStatus,
}

impl From<&FitMeasurement> for FitReading {
    fn from(m: &FitMeasurement) -> Self {
        FitReading {
            fit_percent: m.fit_percent,
            status: m.status,
        }
    }
}

pub struct FitIndicator<S> {
    container: Arc<FitContainer<S>>,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    readings: Arc<watch::Sender<Option<FitReading>>>,
    pending: Option<JoinHandle<()>>,
}

impl<S: RenderSurface + 'static> FitIndicator<S> {
    pub fn new(container: Arc<FitContainer<S>>, debounce: Duration) -> Self {
        let (readings, _) = watch::channel(None);
        FitIndicator {
            container,
            debounce,
            generation: Arc::new(AtomicU64::new(0)),
            readings: Arc::new(readings),
            pending: None,
        }
    }

    /// Receiver that sees every published reading.
    pub fn subscribe(&self) -> watch::Receiver<Option<FitReading>> {
        self.readings.subscribe()
    }

    pub fn latest(&self) -> Option<FitReading> {
        *self.readings.borrow()
    }

    /// Schedules a measurement of `content` at `vars` after the debounce window.
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, content: ResumeDocument, vars: LayoutVars) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }

        let container = Arc::clone(&self.container);
        let current = Arc::clone(&self.generation);
        let readings = Arc::clone(&self.readings);
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let result = measure_fit(&container, &content, &vars).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            match result {
                Ok(measurement) => {
                    readings.send_replace(Some(FitReading::from(&measurement)));
                }
                Err(e) => warn!(
                    container = %container.id(),
                    error = %e,
                    "fit indicator measurement failed"
                ),
            }
        }));
    }
}

impl<S> Drop for FitIndicator<S> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
