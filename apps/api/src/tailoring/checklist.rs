//! Job checklist: structured requirements extracted from a job posting by an external
//! generator. The core only checks its shape; it never judges whether the content is true.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::TailorError;
use crate::tailoring::synonyms::normalize;

/// Relative importance of a responsibility. Carried through for callers; scoring treats all
/// priorities alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Responsibility {
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobChecklist {
    pub must_have_tools: Vec<String>,
    pub must_have_skills: Vec<String>,
    pub top_responsibilities: Vec<Responsibility>,
    pub primary_keywords: Vec<String>,
    pub secondary_keywords: Vec<String>,
}

const REQUIRED_LIST_FIELDS: [&str; 4] = [
    "mustHaveTools",
    "mustHaveSkills",
    "primaryKeywords",
    "secondaryKeywords",
];

impl JobChecklist {
    /// Parses a checklist from untrusted JSON, naming the offending field on failure.
    ///
    /// Every field is required and must be an array. Blank terms are dropped.
    pub fn from_value(value: &Value) -> Result<Self, TailorError> {
        let obj = value
            .as_object()
            .ok_or_else(|| TailorError::invalid_checklist("checklist", "expected a JSON object"))?;

        let [tools, skills, primary, secondary] =
            REQUIRED_LIST_FIELDS.map(|field| string_list(obj, field));

        Ok(JobChecklist {
            must_have_tools: tools?,
            must_have_skills: skills?,
            top_responsibilities: responsibility_list(obj, "topResponsibilities")?,
            primary_keywords: primary?,
            secondary_keywords: secondary?,
        })
    }

    /// Must-have terms (tools, then skills) deduplicated by normalized form.
    /// The first spelling seen is kept.
    pub fn must_have_terms(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut terms = Vec::new();
        for term in self.must_have_tools.iter().chain(&self.must_have_skills) {
            let key = normalize(term);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            terms.push(term.as_str());
        }
        terms
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, TailorError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(TailorError::invalid_checklist(field, "field is required")),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(TailorError::invalid_checklist(field, "expected an array")),
    }
}

fn string_list(obj: &Map<String, Value>, field: &str) -> Result<Vec<String>, TailorError> {
    let items = required(obj, field)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let text = item.as_str().ok_or_else(|| {
            TailorError::invalid_checklist(field, format!("element {i} is not a string"))
        })?;
        if !text.trim().is_empty() {
            out.push(text.trim().to_string());
        }
    }
    Ok(out)
}

fn responsibility_list(
    obj: &Map<String, Value>,
    field: &str,
) -> Result<Vec<Responsibility>, TailorError> {
    let items = required(obj, field)?;
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let text = item
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                TailorError::invalid_checklist(field, format!("element {i} has no string 'text'"))
            })?;
        let priority = match item.get("priority") {
            None | Some(Value::Null) => Priority::default(),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "high" => Priority::High,
                "low" => Priority::Low,
                _ => Priority::Medium,
            },
            Some(Value::Number(n)) => match n.as_u64() {
                Some(1) => Priority::High,
                Some(2) => Priority::Medium,
                _ => Priority::Low,
            },
            Some(_) => {
                return Err(TailorError::invalid_checklist(
                    field,
                    format!("element {i} has a priority that is neither string nor number"),
                ))
            }
        };
        if !text.trim().is_empty() {
            out.push(Responsibility {
                text: text.trim().to_string(),
                priority,
            });
        }
    }
    Ok(out)
}
