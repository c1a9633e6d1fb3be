//! Coverage Selector — picks a bounded set of scored bullets for the rewrite step.
//!
//! Two greedy phases over a single score-descending ranking:
//! 1. Take bullets that either score positively or cover a must-have term nobody selected so
//!    far covers.
//! 2. Top up to `max_count` with the best remaining bullets regardless of coverage.
//!
//! Must-have terms the final selection cannot cover are reported in `coverage.missing`.
//! They are never papered over.

use serde::{Deserialize, Serialize};

use crate::errors::TailorError;
use crate::models::BulletRef;
use crate::tailoring::checklist::JobChecklist;
use crate::tailoring::scorer::ScoredBullet;
use crate::tailoring::synonyms::{matches_normalized, normalize};

pub const DEFAULT_MAX_SELECTED: usize = 12;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub covered: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    /// Selected bullets in rank order (score descending, ties by input order).
    pub selected_bullets: Vec<ScoredBullet>,
    /// The same ids in document order, for the rewrite step.
    pub ordered_ids: Vec<BulletRef>,
    pub coverage: Coverage,
}

// ────────────────────────────────────────────────────────────────────────────
// Selection algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Selects up to `max_count` bullets. Fails with `EmptyInput` when there is nothing to
/// choose from, so callers can tell that apart from an empty choice.
pub fn select_bullets(
    bullets: &[ScoredBullet],
    checklist: &JobChecklist,
    max_count: usize,
) -> Result<SelectionResult, TailorError> {
    if bullets.is_empty() {
        return Err(TailorError::EmptyInput);
    }

    let must_haves: Vec<(&str, String)> = checklist
        .must_have_terms()
        .into_iter()
        .map(|term| (term, normalize(term)))
        .collect();

    // Which must-have terms each bullet covers, by index into `must_haves`.
    let covers: Vec<Vec<usize>> = bullets
        .iter()
        .map(|b| {
            let text = normalize(&b.text);
            must_haves
                .iter()
                .enumerate()
                .filter(|(_, (_, norm))| matches_normalized(&text, norm))
                .map(|(i, _)| i)
                .collect()
        })
        .collect();

    // Stable: equal scores keep input order.
    let mut ranking: Vec<usize> = (0..bullets.len()).collect();
    ranking.sort_by(|&a, &b| bullets[b].score.cmp(&bullets[a].score));

    let mut selected = vec![false; bullets.len()];
    let mut covered = vec![false; must_haves.len()];
    let mut picks: Vec<usize> = Vec::with_capacity(max_count.min(bullets.len()));

    // Phase 1: positive score or new coverage.
    for &idx in &ranking {
        if picks.len() >= max_count {
            break;
        }
        let adds_coverage = covers[idx].iter().any(|&t| !covered[t]);
        if bullets[idx].score > 0 || adds_coverage {
            selected[idx] = true;
            picks.push(idx);
            for &t in &covers[idx] {
                covered[t] = true;
            }
        }
    }

    // Phase 2: fill remaining slots in rank order.
    for &idx in &ranking {
        if picks.len() >= max_count {
            break;
        }
        if !selected[idx] {
            selected[idx] = true;
            picks.push(idx);
            for &t in &covers[idx] {
                covered[t] = true;
            }
        }
    }

    // Report in rank order regardless of which phase picked a bullet.
    let selected_bullets: Vec<ScoredBullet> = ranking
        .iter()
        .filter(|&&idx| selected[idx])
        .map(|&idx| bullets[idx].clone())
        .collect();
    let mut ordered_ids: Vec<BulletRef> = selected_bullets.iter().map(|b| b.id).collect();
    ordered_ids.sort();

    let (covered_terms, missing_terms): (Vec<_>, Vec<_>) = must_haves
        .iter()
        .zip(&covered)
        .partition(|(_, is_covered)| **is_covered);

    Ok(SelectionResult {
        selected_bullets,
        ordered_ids,
        coverage: Coverage {
            covered: covered_terms.into_iter().map(|((t, _), _)| t.to_string()).collect(),
            missing: missing_terms.into_iter().map(|((t, _), _)| t.to_string()).collect(),
        },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
