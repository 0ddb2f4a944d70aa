use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single answer captured from the questionnaire.
///
/// Answers arrive as free-form JSON values: vitals as numbers, yes/no answers
/// as booleans or the literal strings the UI collects, and descriptive
/// answers as text (including compound values such as `"140/90"` for blood
/// pressure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Whether the answer counts as an affirmative symptom report.
    pub fn is_affirmative(&self) -> bool {
        match self {
            AnswerValue::Boolean(value) => *value,
            AnswerValue::Text(value) => value.trim().eq_ignore_ascii_case("yes"),
            AnswerValue::Number(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Reads the answer as yes/no. Returns `None` for anything that is not a
    /// boolean or a literal yes/no string.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AnswerValue::Boolean(value) => Some(*value),
            AnswerValue::Text(value) => {
                let trimmed = value.trim();
                if trimmed.eq_ignore_ascii_case("yes") {
                    Some(true)
                } else if trimmed.eq_ignore_ascii_case("no") {
                    Some(false)
                } else {
                    None
                }
            }
            AnswerValue::Number(_) => None,
        }
    }
}

/// Response set keyed by question key. A single set is scored against every
/// selected condition's formula simultaneously.
pub type ResponseSet = BTreeMap<String, AnswerValue>;

/// Input widget expected for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Number,
    YesNo,
    Text,
}

/// One question presented during intake for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: u32,
    pub text: String,
    pub key: String,
    pub kind: AnswerKind,
}

/// A selectable symptom/condition entry: its intake questions, the severity
/// weight table, and the specialists a finished report is routed toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDefinition {
    pub questions: Vec<QuestionSpec>,
    pub severity_formula: BTreeMap<String, f64>,
    #[serde(default)]
    pub specialists: Vec<String>,
}

/// Discrete severity bands, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SeverityLabel {
    Low,
    #[serde(rename = "Low-Moderate")]
    LowModerate,
    Moderate,
    #[serde(rename = "Moderate-High")]
    ModerateHigh,
    High,
}

impl SeverityLabel {
    pub const fn label(self) -> &'static str {
        match self {
            SeverityLabel::Low => "Low",
            SeverityLabel::LowModerate => "Low-Moderate",
            SeverityLabel::Moderate => "Moderate",
            SeverityLabel::ModerateHigh => "Moderate-High",
            SeverityLabel::High => "High",
        }
    }
}
