// Bullet tailoring: deterministic scoring and coverage-driven selection.
// Pure and synchronous; no model is consulted anywhere in this module.

pub mod checklist;
pub mod handlers;
pub mod pipeline;
pub mod scorer;
pub mod selector;
pub mod synonyms;

pub use checklist::{JobChecklist, Priority, Responsibility};
pub use pipeline::{
    apply_bullet_rewrites, score_and_select_bullets, select_for_checklist, BulletRewrite,
};
pub use scorer::{score_bullet, score_bullets, ScoredBullet};
pub use selector::{select_bullets, Coverage, SelectionResult, DEFAULT_MAX_SELECTED};
