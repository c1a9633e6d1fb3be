//! Entry points for tailoring. Callers pass a full input snapshot on every call.
//!
//! Flow: validate checklist → collect bullets → score → select. The rewrite step runs outside
//! the core; `apply_bullet_rewrites` only enforces that its ids still resolve.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::TailorError;
use crate::models::{BulletRef, ResumeDocument};
use crate::tailoring::checklist::JobChecklist;
use crate::tailoring::scorer::score_bullets;
use crate::tailoring::selector::{select_bullets, SelectionResult, DEFAULT_MAX_SELECTED};

/// New text for one selected bullet, produced by the external rewrite collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRewrite {
    pub id: BulletRef,
    pub text: String,
}

/// Scores and selects bullets for a checklist that arrived as untrusted JSON.
pub fn score_and_select_bullets(
    resume: &ResumeDocument,
    checklist: &Value,
) -> Result<SelectionResult, TailorError> {
    let checklist = JobChecklist::from_value(checklist)?;
    select_for_checklist(resume, &checklist, DEFAULT_MAX_SELECTED)
}

/// Scores and selects bullets for an already-validated checklist.
pub fn select_for_checklist(
    resume: &ResumeDocument,
    checklist: &JobChecklist,
    max_count: usize,
) -> Result<SelectionResult, TailorError> {
    let bullets = resume.bullets();
    if bullets.is_empty() {
        return Err(TailorError::EmptyInput);
    }

    let scored = score_bullets(bullets, checklist);
    let result = select_bullets(&scored, checklist, max_count)?;

    debug!(
        scored = scored.len(),
        selected = result.selected_bullets.len(),
        missing = result.coverage.missing.len(),
        "bullet selection complete"
    );

    Ok(result)
}

/// Returns a copy of `resume` with each rewritten bullet replaced in place.
///
/// Every id must resolve against the original resume; nothing is applied if one does not.
/// The rewritten text itself is taken as-is.
pub fn apply_bullet_rewrites(
    resume: &ResumeDocument,
    rewrites: &[BulletRewrite],
) -> Result<ResumeDocument, TailorError> {
    if let Some(bad) = rewrites.iter().find(|r| resume.bullet_text(r.id).is_none()) {
        return Err(TailorError::UnresolvableBullet {
            id: bad.id.to_string(),
        });
    }

    let mut updated = resume.clone();
    for rewrite in rewrites {
        if let Some(slot) = updated.bullet_text_mut(rewrite.id) {
            *slot = rewrite.text.clone();
        }
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceEntry, Section};
    use serde_json::json;

    fn make_resume(bullets: &[&[&str]]) -> ResumeDocument {
        ResumeDocument {
            sections: vec![
                Section::Header {
                    name: "Sam Rivera".to_string(),
                    contact_lines: vec!["sam@example.com".to_string()],
                },
                Section::Experience {
                    entries: bullets
                        .iter()
                        .enumerate()
                        .map(|(i, bs)| ExperienceEntry {
                            company: format!("Company {i}"),
                            title: "Analyst".to_string(),
                            location: "Remote".to_string(),
                            date_range: "2020 – Present".to_string(),
                            bullets: bs.iter().map(|b| b.to_string()).collect(),
                        })
                        .collect(),
                },
            ],
        }
    }

    fn checklist_json() -> Value {
        json!({
            "mustHaveTools": ["Python", "SQL"],
            "mustHaveSkills": ["forecasting"],
            "topResponsibilities": [{"text": "Build revenue dashboards", "priority": "high"}],
            "primaryKeywords": ["cross-functional"],
            "secondaryKeywords": ["stakeholders"]
        })
    }

    #[test]
    fn test_empty_resume_is_empty_input() {
        let resume = make_resume(&[]);
        let err = score_and_select_bullets(&resume, &checklist_json()).unwrap_err();
        assert_eq!(err, TailorError::EmptyInput);
    }

    #[test]
    fn test_roles_without_bullets_are_empty_input() {
        let resume = make_resume(&[&[], &[]]);
        let err = score_and_select_bullets(&resume, &checklist_json()).unwrap_err();
        assert_eq!(err, TailorError::EmptyInput);
    }

    #[test]
    fn test_invalid_checklist_reported_before_scoring() {
        let resume = make_resume(&[&["Did things"]]);
        let err = score_and_select_bullets(&resume, &json!({"mustHaveTools": []})).unwrap_err();
        assert!(matches!(err, TailorError::InvalidChecklist { field, .. } if field == "mustHaveSkills"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let resume = make_resume(&[
            &[
                "Built revenue dashboards in Python for cross-functional stakeholders",
                "Responsible for weekly status notes",
                "Tuned SQL warehouse queries",
            ],
            &["Forecasting models for retail demand", "Organized team lunches"],
        ]);
        let first = score_and_select_bullets(&resume, &checklist_json()).unwrap();
        for _ in 0..5 {
            let again = score_and_select_bullets(&resume, &checklist_json()).unwrap();
            assert_eq!(first, again);
        }
        assert!(first.coverage.missing.is_empty());
        assert_eq!(first.selected_bullets[0].id, BulletRef::new(0, 0));
    }

    #[test]
    fn test_adding_bullet_for_missing_term_never_grows_missing() {
        let checklist = JobChecklist::from_value(&checklist_json()).unwrap();
        let before = make_resume(&[&["Built Python tooling", "Organized offsites"]]);
        let before_result = select_for_checklist(&before, &checklist, 12).unwrap();
        assert!(before_result.coverage.missing.contains(&"SQL".to_string()));

        let after = make_resume(&[&["Built Python tooling", "Organized offsites", "Wrote SQL"]]);
        let after_result = select_for_checklist(&after, &checklist, 12).unwrap();

        assert!(after_result.coverage.missing.len() <= before_result.coverage.missing.len());
        assert!(after_result.coverage.covered.contains(&"SQL".to_string()));
        assert!(!after_result.coverage.missing.contains(&"SQL".to_string()));
    }

    #[test]
    fn test_selection_never_mutates_resume() {
        let resume = make_resume(&[&["Worked on SQL", "Python scripts"]]);
        let snapshot = resume.clone();
        let _ = score_and_select_bullets(&resume, &checklist_json()).unwrap();
        assert_eq!(resume, snapshot);
    }

    #[test]
    fn test_apply_rewrites_replaces_text_in_place() {
        let resume = make_resume(&[&["first", "second"], &["third"]]);
        let updated = apply_bullet_rewrites(
            &resume,
            &[BulletRewrite {
                id: BulletRef::new(0, 1),
                text: "second, sharper".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(updated.bullet_text(BulletRef::new(0, 1)), Some("second, sharper"));
        assert_eq!(updated.bullet_text(BulletRef::new(0, 0)), Some("first"));
        assert_eq!(updated.bullet_count(), resume.bullet_count());
        assert_eq!(resume.bullet_text(BulletRef::new(0, 1)), Some("second"));
    }

    #[test]
    fn test_apply_rewrites_rejects_unresolvable_id() {
        let resume = make_resume(&[&["only"]]);
        let err = apply_bullet_rewrites(
            &resume,
            &[
                BulletRewrite {
                    id: BulletRef::new(0, 0),
                    text: "ok".to_string(),
                },
                BulletRewrite {
                    id: BulletRef::new(3, 0),
                    text: "nope".to_string(),
                },
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TailorError::UnresolvableBullet {
                id: "exp3_bullet0".to_string()
            }
        );
    }

    #[test]
    fn test_rewrite_deserializes_from_string_id() {
        let rewrite: BulletRewrite =
            serde_json::from_value(json!({"id": "exp2_bullet4", "text": "x"})).unwrap();
        assert_eq!(rewrite.id, BulletRef::new(2, 4));
        assert!(serde_json::from_value::<BulletRewrite>(json!({"id": "b4", "text": "x"})).is_err());
    }
}
