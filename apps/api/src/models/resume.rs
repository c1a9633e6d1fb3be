//! The fixed resume schema every core component operates on.
//!
//! Experience entries are expected in reverse-chronological order; nothing here sorts them.
//! Bullet order inside an entry is significant and is preserved by every accessor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TailorError;

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub sections: Vec<Section>,
}

/// One resume section. Serialized with a `type` tag: `{"type": "experience", "entries": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Section {
    Header {
        name: String,
        #[serde(rename = "contactLines", default)]
        contact_lines: Vec<String>,
    },
    Education {
        entries: Vec<EducationEntry>,
    },
    Experience {
        entries: Vec<ExperienceEntry>,
    },
    Skills {
        text: String,
    },
    Additional {
        text: String,
    },
    Custom {
        entries: Vec<CustomEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_range: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEntry {
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

impl ResumeDocument {
    /// All experience entries across every Experience section, in document order.
    /// The position in this iterator is the `experience_index` of a `BulletRef`.
    pub fn experience_entries(&self) -> impl Iterator<Item = &ExperienceEntry> {
        self.sections
            .iter()
            .filter_map(|section| match section {
                Section::Experience { entries } => Some(entries),
                _ => None,
            })
            .flatten()
    }

    fn experience_entries_mut(&mut self) -> impl Iterator<Item = &mut ExperienceEntry> {
        self.sections
            .iter_mut()
            .filter_map(|section| match section {
                Section::Experience { entries } => Some(entries),
                _ => None,
            })
            .flatten()
    }

    /// Every experience bullet paired with its positional reference.
    pub fn bullets(&self) -> Vec<(BulletRef, &str)> {
        self.experience_entries()
            .enumerate()
            .flat_map(|(exp_idx, entry)| {
                entry.bullets.iter().enumerate().map(move |(bullet_idx, text)| {
                    (BulletRef::new(exp_idx, bullet_idx), text.as_str())
                })
            })
            .collect()
    }

    pub fn bullet_count(&self) -> usize {
        self.experience_entries().map(|e| e.bullets.len()).sum()
    }

    pub fn bullet_text(&self, bullet_ref: BulletRef) -> Option<&str> {
        self.experience_entries()
            .nth(bullet_ref.experience_index)
            .and_then(|e| e.bullets.get(bullet_ref.bullet_index))
            .map(String::as_str)
    }

    pub(crate) fn bullet_text_mut(&mut self, bullet_ref: BulletRef) -> Option<&mut String> {
        self.experience_entries_mut()
            .nth(bullet_ref.experience_index)
            .and_then(|e| e.bullets.get_mut(bullet_ref.bullet_index))
    }

    /// Total visible characters across the whole document. Drives the density tier
    /// used for default layout parameters.
    pub fn char_count(&self) -> usize {
        fn len(s: &str) -> usize {
            s.chars().count()
        }

        self.sections
            .iter()
            .map(|section| match section {
                Section::Header {
                    name,
                    contact_lines,
                } => len(name) + contact_lines.iter().map(|l| len(l)).sum::<usize>(),
                Section::Education { entries } => entries
                    .iter()
                    .map(|e| {
                        len(&e.institution)
                            + len(&e.degree)
                            + len(&e.location)
                            + len(&e.date_range)
                            + e.gpa.as_deref().map(len).unwrap_or(0)
                            + e.details.as_deref().map(len).unwrap_or(0)
                    })
                    .sum(),
                Section::Experience { entries } => entries
                    .iter()
                    .map(|e| {
                        len(&e.company)
                            + len(&e.title)
                            + len(&e.location)
                            + len(&e.date_range)
                            + e.bullets.iter().map(|b| len(b)).sum::<usize>()
                    })
                    .sum(),
                Section::Skills { text } | Section::Additional { text } => len(text),
                Section::Custom { entries } => entries
                    .iter()
                    .map(|e| len(&e.title) + e.items.iter().map(|i| len(i)).sum::<usize>())
                    .sum(),
            })
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// BulletRef
// ────────────────────────────────────────────────────────────────────────────

/// Positional reference to one experience bullet. Serialized as `exp{i}_bullet{j}`.
///
/// The id is positional, so a rewrite step must keep the bullet array shape intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BulletRef {
    pub experience_index: usize,
    pub bullet_index: usize,
}

impl BulletRef {
    pub fn new(experience_index: usize, bullet_index: usize) -> Self {
        Self {
            experience_index,
            bullet_index,
        }
    }
}

impl fmt::Display for BulletRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp{}_bullet{}", self.experience_index, self.bullet_index)
    }
}

impl FromStr for BulletRef {
    type Err = TailorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TailorError::InvalidBulletId { id: s.to_string() };

        let rest = s.strip_prefix("exp").ok_or_else(invalid)?;
        let (exp, bullet) = rest.split_once("_bullet").ok_or_else(invalid)?;
        let digits = |part: &str| -> Result<usize, TailorError> {
            if part.is_empty()
                || !part.bytes().all(|b| b.is_ascii_digit())
                || (part.len() > 1 && part.starts_with('0'))
            {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };

        Ok(BulletRef::new(digits(exp)?, digits(bullet)?))
    }
}

impl TryFrom<String> for BulletRef {
    type Error = TailorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BulletRef> for String {
    fn from(value: BulletRef) -> Self {
        value.to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
