//! Additive, explainable relevance points per resume bullet.
//!
//! Each bullet is scored independently against the checklist. Every rule that fires leaves a
//! line in `reason_trace`, and every positive match leaves a tag in `matched_terms`, so the
//! final number can always be reconstructed by hand.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::BulletRef;
use crate::tailoring::checklist::JobChecklist;
use crate::tailoring::synonyms::{matches_normalized, normalize};

// ────────────────────────────────────────────────────────────────────────────
// Point table
// ────────────────────────────────────────────────────────────────────────────

const TOOL_POINTS: i32 = 5;
const SKILL_POINTS: i32 = 5;
const RESPONSIBILITY_POINTS: i32 = 3;
const PRIMARY_POINTS: i32 = 2;
const SECONDARY_POINTS: i32 = 1;
const FLUFF_PENALTY: i32 = 3;
const NO_MATCH_PENALTY: i32 = 2;

/// Words shorter than or equal to this many characters are ignored for responsibility overlap.
const OVERLAP_MIN_WORD_LEN: usize = 3;
const OVERLAP_MIN_SHARED: usize = 2;

/// Filler phrases that signal a duty list rather than an outcome.
const FLUFF_PHRASES: [&str; 9] = [
    "responsible for",
    "worked on",
    "helped with",
    "duties included",
    "assisted with",
    "involved in",
    "participated in",
    "tasked with",
    "various tasks",
];

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredBullet {
    pub id: BulletRef,
    pub text: String,
    pub score: i32,
    /// Tags such as `tool: Python` or `primary: cross-functional`.
    pub matched_terms: Vec<String>,
    pub reason_trace: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Scores one bullet against the checklist. The score is never clamped and may be negative.
pub fn score_bullet(id: BulletRef, text: &str, checklist: &JobChecklist) -> ScoredBullet {
    let normalized = normalize(text);
    let mut score = 0i32;
    let mut matched_terms = Vec::new();
    let mut reason_trace = Vec::new();

    let term_rules: [(&[String], i32, &str, &str); 4] = [
        (&checklist.must_have_tools, TOOL_POINTS, "tool", "must-have tool"),
        (&checklist.must_have_skills, SKILL_POINTS, "skill", "must-have skill"),
        (&checklist.primary_keywords, PRIMARY_POINTS, "primary", "primary keyword"),
        (&checklist.secondary_keywords, SECONDARY_POINTS, "secondary", "secondary keyword"),
    ];

    for (terms, points, tag, label) in term_rules {
        for term in terms {
            if matches_normalized(&normalized, &normalize(term)) {
                score += points;
                matched_terms.push(format!("{tag}: {term}"));
                reason_trace.push(format!("+{points} {label} '{term}'"));
            }
        }
    }

    let bullet_words = significant_words(&normalized);
    for responsibility in &checklist.top_responsibilities {
        let normalized_resp = normalize(&responsibility.text);
        let shared: Vec<&str> = significant_words(&normalized_resp)
            .intersection(&bullet_words)
            .copied()
            .collect();
        if shared.len() >= OVERLAP_MIN_SHARED {
            score += RESPONSIBILITY_POINTS;
            matched_terms.push(format!("responsibility: {}", responsibility.text));
            reason_trace.push(format!(
                "+{RESPONSIBILITY_POINTS} responsibility '{}' (shared: {})",
                responsibility.text,
                shared.join(", ")
            ));
        }
    }

    let any_match = !matched_terms.is_empty();

    for phrase in FLUFF_PHRASES {
        let occurrences = normalized.matches(phrase).count() as i32;
        if occurrences > 0 {
            score -= FLUFF_PENALTY * occurrences;
            reason_trace.push(format!(
                "-{} fluff phrase '{phrase}' x{occurrences}",
                FLUFF_PENALTY * occurrences
            ));
        }
    }

    if !any_match {
        score -= NO_MATCH_PENALTY;
        reason_trace.push(format!("-{NO_MATCH_PENALTY} no checklist terms matched"));
    }

    ScoredBullet {
        id,
        text: text.to_string(),
        score,
        matched_terms,
        reason_trace,
    }
}

/// Scores every bullet in order. Output index `i` corresponds to input index `i`.
pub fn score_bullets<'a, I>(bullets: I, checklist: &JobChecklist) -> Vec<ScoredBullet>
where
    I: IntoIterator<Item = (BulletRef, &'a str)>,
{
    bullets
        .into_iter()
        .map(|(id, text)| score_bullet(id, text, checklist))
        .collect()
}

/// Distinct words longer than `OVERLAP_MIN_WORD_LEN`, split on anything non-alphanumeric.
fn significant_words(normalized: &str) -> BTreeSet<&str> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > OVERLAP_MIN_WORD_LEN)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
