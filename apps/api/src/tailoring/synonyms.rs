//! Term normalization and synonym expansion for checklist matching.
//!
//! Matching is plain substring containment over normalized text. There is no stemming and
//! no edit-distance fallback, so every match can be explained by pointing at a substring.

/// Directional synonym table. Keys are normalized checklist terms; values are alternative
/// spellings that also count as a hit for that term. Lookups never go value → key.
static SYNONYMS: &[(&str, &[&str])] = &[
    ("sql", &["postgres", "mysql", "database"]),
    ("javascript", &["js", "node.js", "nodejs"]),
    ("python", &["django", "flask", "pandas"]),
    ("aws", &["amazon web services", "ec2", "lambda"]),
    ("gcp", &["google cloud"]),
    ("kubernetes", &["k8s"]),
    ("ci/cd", &["continuous integration", "continuous delivery", "jenkins", "github actions"]),
    ("machine learning", &["deep learning", "neural network"]),
    ("project management", &["project manager", "managed projects", "pmp"]),
    ("leadership", &["led", "mentored", "supervised"]),
    ("communication", &["presented", "stakeholder"]),
    ("data analysis", &["analytics", "analyzed data", "tableau"]),
    ("cross-functional", &["cross functional", "interdisciplinary"]),
    ("agile", &["scrum", "kanban", "sprint"]),
    ("customer service", &["customer support", "client support"]),
    ("excel", &["spreadsheet"]),
];

/// Lowercases, trims, and collapses internal whitespace runs to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synonyms declared for an already-normalized term.
pub fn synonyms_for(normalized_term: &str) -> &'static [&'static str] {
    SYNONYMS
        .iter()
        .find(|(key, _)| *key == normalized_term)
        .map(|(_, values)| *values)
        .unwrap_or(&[])
}

/// True if `term` or one of its synonyms appears in `text`. An empty term never matches.
pub fn matches(text: &str, term: &str) -> bool {
    let term = normalize(term);
    if term.is_empty() {
        return false;
    }
    matches_normalized(&normalize(text), &term)
}

/// Same as [`matches`] but with both sides already normalized. Used by the scorer so a
/// bullet is normalized once per scoring call.
pub(crate) fn matches_normalized(normalized_text: &str, normalized_term: &str) -> bool {
    if normalized_term.is_empty() {
        return false;
    }
    normalized_text.contains(normalized_term)
        || synonyms_for(normalized_term)
            .iter()
            .any(|syn| normalized_text.contains(syn))
}
