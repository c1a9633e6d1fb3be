//! PageFit Solver — drives measured height onto one page by moving visual knobs only.
//!
//! # Loop
//! Measure → within tolerance? done : pick a direction → move one field group → measure …
//!
//! - Shrink moves spacing first, then margins, then fonts. Each consecutive shrink step that
//!   still overflows brings the next group in alongside the earlier ones, so spacing always
//!   moves first but a long run never stalls on spacing alone.
//! - Grow moves spacing, then fonts, then margins, one group at a time. A group pinned at its
//!   bounds hands off to the next one.
//! - If the last iteration is about to start while every measurement so far overflowed, it
//!   measures the all-minimum vars instead of another capped step. Overflow is then only
//!   reported when even the minimum bounds cannot fit the content.
//! - Every step aims for the middle of the tolerance band and is capped at `max_step` per
//!   field. Growth is damped because extra whitespace is cheaper to undershoot than overflow.
//! - The best measurement seen wins: non-overflowing first, then closest to 100%.
//!
//! The container lock is held for the whole run, so no other measurement of the same surface
//! interleaves with the loop. Content is borrowed immutably throughout.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::LayoutError;
use crate::layout::surface::{measure_with, FitContainer, FitMeasurement, FitStatus, RenderSurface};
use crate::layout::vars::{FieldGroup, LayoutField, LayoutVars};
use crate::models::ResumeDocument;

pub const DEFAULT_MAX_ITERATIONS: u32 = 8;

const SHRINK_ORDER: [FieldGroup; 3] = [FieldGroup::Spacing, FieldGroup::Margins, FieldGroup::Fonts];
const GROW_ORDER: [FieldGroup; 3] = [FieldGroup::Spacing, FieldGroup::Fonts, FieldGroup::Margins];
const GROW_DAMPING: f64 = 0.5;
/// Smallest change that counts as having moved a field.
const MIN_MOVE: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PageFitOptions {
    pub max_iterations: u32,
    /// Lowest acceptable fill, in percent.
    pub tolerance_low: f64,
    /// Highest acceptable fill, in percent. Never above 100.
    pub tolerance_high: f64,
    /// Largest relative change of any field in one iteration.
    pub max_step: f64,
}

impl Default for PageFitOptions {
    fn default() -> Self {
        PageFitOptions {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance_low: 95.0,
            tolerance_high: 100.0,
            max_step: 0.15,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    Converged,
    MaxIterationsReached,
    /// No field in any eligible group could move further.
    BoundsReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFitResult {
    pub final_layout_vars: LayoutVars,
    pub fit_percent: f64,
    pub status: FitStatus,
    pub iterations: u32,
    pub termination: Termination,
    /// Every measurement taken, in order.
    pub history: Vec<FitMeasurement>,
}

impl PageFitResult {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Shrink,
    Grow,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Runs the render-measure-adjust loop for `content` starting from `current_vars`.
///
/// Overflow that survives every adjustment comes back as `status: overflow`, not as an error.
/// Errors only surface when the render surface itself fails.
pub async fn run_page_fit<S: RenderSurface>(
    container: &FitContainer<S>,
    current_vars: &LayoutVars,
    content: &ResumeDocument,
    options: &PageFitOptions,
) -> Result<PageFitResult, LayoutError> {
    let max_iterations = options.max_iterations.max(1);
    let mut surface = container.lock().await;

    let mut vars = current_vars.clamped();
    let mut history: Vec<FitMeasurement> = Vec::new();
    let mut best: Option<(LayoutVars, FitMeasurement)> = None;
    let mut termination = Termination::MaxIterationsReached;
    let mut shrink_streak = 0usize;
    let floor = LayoutVars::minimum();

    while (history.len() as u32) < max_iterations {
        let measurement = measure_with(&mut *surface, container.paper(), content, &vars).await?;
        debug!(
            container = %container.id(),
            iteration = history.len() + 1,
            fit_percent = measurement.fit_percent,
            status = ?measurement.status,
            "page fit measured"
        );

        if best.as_ref().map_or(true, |(_, b)| is_better(&measurement, b)) {
            best = Some((vars.clone(), measurement.clone()));
        }
        let fit_percent = measurement.fit_percent;
        history.push(measurement);

        let Some(direction) = classify(fit_percent, options) else {
            termination = Termination::Converged;
            break;
        };
        if history.len() as u32 >= max_iterations {
            break;
        }

        let reach = match direction {
            Direction::Shrink => {
                shrink_streak += 1;
                shrink_streak - 1
            }
            Direction::Grow => {
                shrink_streak = 0;
                0
            }
        };

        let last_chance = history.len() as u32 + 1 == max_iterations
            && direction == Direction::Shrink
            && best.as_ref().map_or(false, |(_, b)| b.overflows())
            && vars != floor;
        if last_chance {
            debug!(container = %container.id(), "page fit trying minimum bounds");
            vars = floor.clone();
            continue;
        }

        match adjust(&vars, direction, fit_percent, options, reach) {
            Some((group, next)) => {
                debug!(?direction, ?group, reach, "page fit adjusting");
                vars = next;
            }
            None => {
                termination = Termination::BoundsReached;
                break;
            }
        }
    }

    let (final_layout_vars, measurement) = best
        .ok_or_else(|| LayoutError::Render("page fit finished without a measurement".to_string()))?;

    info!(
        container = %container.id(),
        iterations = history.len(),
        fit_percent = measurement.fit_percent,
        status = ?measurement.status,
        termination = ?termination,
        "page fit finished"
    );

    Ok(PageFitResult {
        final_layout_vars,
        fit_percent: measurement.fit_percent,
        status: measurement.status,
        iterations: history.len() as u32,
        termination,
        history,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Adjustment
// ────────────────────────────────────────────────────────────────────────────

fn classify(fit_percent: f64, options: &PageFitOptions) -> Option<Direction> {
    if fit_percent > options.tolerance_high {
        Some(Direction::Shrink)
    } else if fit_percent < options.tolerance_low {
        Some(Direction::Grow)
    } else {
        None
    }
}

/// Non-overflowing beats overflowing; otherwise closer to 100% wins. Ties keep the earlier one.
fn is_better(candidate: &FitMeasurement, incumbent: &FitMeasurement) -> bool {
    match (candidate.overflows(), incumbent.overflows()) {
        (false, true) => true,
        (true, false) => false,
        (false, false) => candidate.fit_percent > incumbent.fit_percent,
        (true, true) => candidate.fit_percent < incumbent.fit_percent,
    }
}

/// Scales the groups at priority ranks `0..=reach`, or the first movable group after them when
/// those are all pinned. Returns the lowest-priority group that moved; `None` when every group
/// is pinned.
fn adjust(
    vars: &LayoutVars,
    direction: Direction,
    fit_percent: f64,
    options: &PageFitOptions,
    reach: usize,
) -> Option<(FieldGroup, LayoutVars)> {
    let aim = (options.tolerance_low + options.tolerance_high) / 2.0;
    let ratio = if fit_percent > 0.0 {
        aim / fit_percent
    } else {
        f64::INFINITY
    };

    let (factor, order) = match direction {
        Direction::Shrink => (ratio.max(1.0 - options.max_step), SHRINK_ORDER),
        Direction::Grow => (
            (1.0 + (ratio - 1.0) * GROW_DAMPING).min(1.0 + options.max_step),
            GROW_ORDER,
        ),
    };

    let mut next = vars.clone();
    let mut deepest = None;
    for (rank, group) in order.into_iter().enumerate() {
        if rank > reach && deepest.is_some() {
            break;
        }
        if scale_group(&mut next, group, factor) {
            deepest = Some(group);
        }
    }
    deepest.map(|group| (group, next))
}

/// Multiplies every field of `group` by `factor`, clamped. Reports whether any field moved.
fn scale_group(vars: &mut LayoutVars, group: FieldGroup, factor: f64) -> bool {
    let mut moved = false;
    for field in LayoutField::ALL.into_iter().filter(|f| f.group() == group) {
        let current = field.get(vars);
        field.set(vars, current * factor);
        moved |= (field.get(vars) - current).abs() > MIN_MOVE;
    }
    moved
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
