//! Repairs a remote analysis payload into a complete `AnalysisResult`.
//!
//! Each field has one row in `FIELD_RULES`: an `accept` function that returns
//! the (possibly cleaned) value when the payload's value is usable, and a
//! `default` used otherwise. A partially compliant payload is repaired field by
//! field; it is never rejected as a whole.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::analysis::models::{AnalysisResult, AnalysisSource, SectionFlags};

pub const DEFAULT_SCORE: u32 = 65;

const DETAILED_ANALYSIS_DEFAULTS: &[(&str, &str)] = &[
    ("formatting", "Professional formatting analysis completed"),
    ("content", "Content quality assessment performed"),
    ("atsCompatibility", "ATS compatibility evaluated"),
    ("professionalImpact", "Market appeal assessment completed"),
];

const EXPERIENCE_ANALYSIS_DEFAULTS: &[(&str, &str)] = &[
    ("yearsOfExperience", "Experience level assessed"),
    ("careerProgression", "Career growth evaluated"),
    ("achievementQuality", "Achievement quality reviewed"),
];

struct FieldRule {
    field: &'static str,
    accept: fn(&Value) -> Option<Value>,
    default: fn() -> Value,
}

const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: "score",
        accept: accept_score,
        default: default_score,
    },
    FieldRule {
        field: "strengths",
        accept: accept_string_list,
        default: default_strengths,
    },
    FieldRule {
        field: "weaknesses",
        accept: accept_string_list,
        default: default_weaknesses,
    },
    FieldRule {
        field: "suggestions",
        accept: accept_string_list,
        default: default_suggestions,
    },
    FieldRule {
        field: "sections",
        accept: accept_sections,
        default: default_sections,
    },
    FieldRule {
        field: "keywords",
        accept: accept_keywords,
        default: default_keywords,
    },
    FieldRule {
        field: "overallFeedback",
        accept: accept_text,
        default: default_overall_feedback,
    },
    FieldRule {
        field: "detailedAnalysis",
        accept: accept_detailed_analysis,
        default: default_detailed_analysis,
    },
    FieldRule {
        field: "experienceAnalysis",
        accept: accept_experience_analysis,
        default: default_experience_analysis,
    },
    FieldRule {
        field: "improvementPriority",
        accept: accept_string_list,
        default: default_improvement_priority,
    },
];

/// Applies every field rule to `payload` and builds the typed result.
///
/// Fails only if the rule table itself produces something the result type
/// cannot hold.
pub fn normalize_remote_payload(
    payload: &Map<String, Value>,
) -> Result<AnalysisResult, serde_json::Error> {
    let mut repaired = Map::new();

    for rule in FIELD_RULES {
        let value = match payload.get(rule.field).and_then(rule.accept) {
            Some(value) => value,
            None => {
                debug!(field = rule.field, "remote payload field missing or malformed, using default");
                (rule.default)()
            }
        };
        repaired.insert(rule.field.to_string(), value);
    }

    repaired.insert("source".to_string(), json!(AnalysisSource::Remote));

    serde_json::from_value(Value::Object(repaired))
}

// ── accept ──────────────────────────────────────────────────────────────────

fn accept_score(value: &Value) -> Option<Value> {
    let score = value.as_f64()?;
    Some(json!(score.round().clamp(0.0, 100.0) as u32))
}

/// Non-empty array whose items are all strings.
fn accept_string_list(value: &Value) -> Option<Value> {
    let items = value.as_array()?;
    if items.is_empty() || !items.iter().all(Value::is_string) {
        return None;
    }
    Some(value.clone())
}

fn accept_text(value: &Value) -> Option<Value> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Some(value.clone()),
        _ => None,
    }
}

/// Any array; non-string items are dropped, the rest lowercased and deduplicated.
fn accept_keywords(value: &Value) -> Option<Value> {
    let items = value.as_array()?;
    let mut keywords: Vec<String> = Vec::new();
    for keyword in items.iter().filter_map(Value::as_str) {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    Some(json!(keywords))
}

/// An object whose known section keys, when present, hold booleans.
/// Keys the backend left out count as not detected.
fn accept_sections(value: &Value) -> Option<Value> {
    let object = value.as_object()?;
    let mut sections = Map::new();
    for name in SectionFlags::NAMES {
        let detected = match object.get(name) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return None,
        };
        sections.insert(name.to_string(), Value::Bool(detected));
    }
    Some(Value::Object(sections))
}

fn accept_detailed_analysis(value: &Value) -> Option<Value> {
    fill_text_map(value, DETAILED_ANALYSIS_DEFAULTS)
}

fn accept_experience_analysis(value: &Value) -> Option<Value> {
    fill_text_map(value, EXPERIENCE_ANALYSIS_DEFAULTS)
}

/// Keeps non-empty string entries of an object and fills the rest per key.
fn fill_text_map(value: &Value, defaults: &[(&str, &str)]) -> Option<Value> {
    let object = value.as_object()?;
    let mut filled = Map::new();
    for &(key, fallback) in defaults {
        let text = object
            .get(key)
            .and_then(accept_text)
            .unwrap_or_else(|| json!(fallback));
        filled.insert(key.to_string(), text);
    }
    Some(Value::Object(filled))
}

// ── defaults ────────────────────────────────────────────────────────────────

fn default_score() -> Value {
    json!(DEFAULT_SCORE)
}

fn default_strengths() -> Value {
    json!(["Resume successfully processed", "Basic structure is present"])
}

fn default_weaknesses() -> Value {
    json!(["Detailed analysis requires review"])
}

fn default_suggestions() -> Value {
    json!(["Consider professional review", "Add more specific details"])
}

fn default_sections() -> Value {
    json!({
        "contact": true,
        "summary": false,
        "experience": true,
        "education": true,
        "skills": true
    })
}

fn default_keywords() -> Value {
    json!([])
}

fn default_overall_feedback() -> Value {
    json!("Professional resume analysis completed with AI-powered insights.")
}

fn default_text_map(defaults: &[(&str, &str)]) -> Value {
    Value::Object(
        defaults
            .iter()
            .map(|&(key, text)| (key.to_string(), json!(text)))
            .collect(),
    )
}

fn default_detailed_analysis() -> Value {
    default_text_map(DETAILED_ANALYSIS_DEFAULTS)
}

fn default_experience_analysis() -> Value {
    default_text_map(EXPERIENCE_ANALYSIS_DEFAULTS)
}

fn default_improvement_priority() -> Value {
    json!([
        "Focus on key improvements",
        "Enhance content quality",
        "Optimize for target roles"
    ])
}
