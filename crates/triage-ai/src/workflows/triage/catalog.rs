use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerKind, ConditionDefinition, QuestionSpec};

/// Immutable condition reference data. Loaded once and injected into the
/// triage workflows; the engine never reads it from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionCatalog {
    conditions: BTreeMap<String, ConditionDefinition>,
}

/// Validation and loading errors for catalog documents.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog source unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog document malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog defines no conditions")]
    Empty,
    #[error("condition '{condition}' has a negative weight for '{key}'")]
    NegativeWeight { condition: String, key: String },
    #[error("condition '{condition}' repeats question id {id}")]
    DuplicateQuestionId { condition: String, id: u32 },
}

impl ConditionCatalog {
    /// Builds a catalog from explicit definitions, rejecting malformed data.
    pub fn new(
        conditions: BTreeMap<String, ConditionDefinition>,
    ) -> Result<Self, CatalogError> {
        if conditions.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (name, definition) in &conditions {
            for (key, weight) in &definition.severity_formula {
                if *weight < 0.0 {
                    return Err(CatalogError::NegativeWeight {
                        condition: name.clone(),
                        key: key.clone(),
                    });
                }
            }

            let mut seen_ids = Vec::with_capacity(definition.questions.len());
            for question in &definition.questions {
                if seen_ids.contains(&question.id) {
                    return Err(CatalogError::DuplicateQuestionId {
                        condition: name.clone(),
                        id: question.id,
                    });
                }
                seen_ids.push(question.id);
            }
        }

        Ok(Self { conditions })
    }

    /// Parses a catalog from a JSON document mapping condition names to
    /// definitions.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let conditions: BTreeMap<String, ConditionDefinition> =
            serde_json::from_reader(reader)?;
        Self::new(conditions)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ConditionDefinition> {
        self.conditions.get(name)
    }

    /// Resolves a selection against the catalog, preserving selection order
    /// and skipping names with no definition. Callers decide whether an empty
    /// resolution is an error.
    pub fn resolve<'a>(
        &'a self,
        selection: &'a [String],
    ) -> Vec<(&'a str, &'a ConditionDefinition)> {
        selection
            .iter()
            .filter_map(|name| {
                self.conditions
                    .get_key_value(name)
                    .map(|(key, definition)| (key.as_str(), definition))
            })
            .collect()
    }

    /// Merges the question lists of the selected conditions, deduplicating by
    /// question key and keeping the first occurrence, so shared keys are asked
    /// once and answered once.
    pub fn combined_questions(&self, selection: &[String]) -> Vec<QuestionSpec> {
        let mut questions: Vec<QuestionSpec> = Vec::new();
        for (_, definition) in self.resolve(selection) {
            for question in &definition.questions {
                if !questions.iter().any(|existing| existing.key == question.key) {
                    questions.push(question.clone());
                }
            }
        }
        questions
    }

    /// Collects the specialists for the selected conditions, deduplicated and
    /// in encounter order.
    pub fn specialists(&self, selection: &[String]) -> Vec<String> {
        let mut specialists: Vec<String> = Vec::new();
        for (_, definition) in self.resolve(selection) {
            for specialist in &definition.specialists {
                if !specialists.contains(specialist) {
                    specialists.push(specialist.clone());
                }
            }
        }
        specialists
    }

    /// Per-condition summaries for selection UIs.
    pub fn summaries(&self) -> Vec<ConditionSummary> {
        self.conditions
            .iter()
            .map(|(name, definition)| ConditionSummary {
                name: name.clone(),
                specialists: definition.specialists.clone(),
                question_count: definition.questions.len(),
            })
            .collect()
    }

    /// The built-in condition catalog shipped with the service.
    pub fn standard() -> Self {
        let mut conditions = BTreeMap::new();

        conditions.insert(
            "fever".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "What is your body temperature in °F?", "temperature", AnswerKind::Number),
                    question(2, "For how many days have you had the fever?", "duration", AnswerKind::Number),
                    question(3, "Are you experiencing chills?", "chills", AnswerKind::YesNo),
                    question(4, "Do you have body aches?", "body_ache", AnswerKind::YesNo),
                ],
                severity_formula: weights(&[
                    ("temperature", 10.0),
                    ("duration", 6.0),
                    ("chills", 4.0),
                    ("body_ache", 4.0),
                ]),
                specialists: names(&["General Physician"]),
            },
        );

        conditions.insert(
            "cough".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "How would you describe your cough (dry, constant, wheezing)?", "cough_type", AnswerKind::Text),
                    question(2, "For how many days have you been coughing?", "duration", AnswerKind::Number),
                    question(3, "Have you coughed up blood or blood-streaked sputum?", "blood_sputum", AnswerKind::YesNo),
                    question(4, "Do you have difficulty breathing?", "difficulty_breathing", AnswerKind::YesNo),
                ],
                severity_formula: weights(&[
                    ("cough_type", 6.0),
                    ("duration", 5.0),
                    ("blood_sputum", 12.0),
                    ("difficulty_breathing", 12.0),
                ]),
                specialists: names(&["Pulmonologist", "General Physician"]),
            },
        );

        conditions.insert(
            "hypertension".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "What is your latest blood pressure reading (e.g. 120/80)?", "bp_level", AnswerKind::Text),
                    question(2, "Do you have a headache?", "headache", AnswerKind::YesNo),
                    question(3, "Are you experiencing chest pain?", "chest_pain", AnswerKind::YesNo),
                    question(4, "For how many days have your readings been elevated?", "duration", AnswerKind::Number),
                ],
                severity_formula: weights(&[
                    ("bp_level", 10.0),
                    ("headache", 4.0),
                    ("chest_pain", 12.0),
                    ("duration", 4.0),
                ]),
                specialists: names(&["Cardiologist"]),
            },
        );

        conditions.insert(
            "migraine".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "How would you describe the head pain (dull, sharp, radiating)?", "pain_type", AnswerKind::Text),
                    question(2, "How many headache episodes do you have per day?", "frequency", AnswerKind::Number),
                    question(3, "Do you feel nauseated?", "nausea", AnswerKind::YesNo),
                    question(4, "Are you sensitive to light?", "light_sensitivity", AnswerKind::YesNo),
                    question(5, "Does the pain arrive in waves?", "wave_pain", AnswerKind::YesNo),
                ],
                severity_formula: weights(&[
                    ("pain_type", 6.0),
                    ("frequency", 6.0),
                    ("nausea", 4.0),
                    ("light_sensitivity", 4.0),
                    ("wave_pain", 10.0),
                ]),
                specialists: names(&["Neurologist"]),
            },
        );

        conditions.insert(
            "urinary tract infection".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "Do you feel a burning sensation while urinating?", "burning_urination", AnswerKind::YesNo),
                    question(2, "How many urgent trips to the bathroom do you make per day beyond normal?", "frequency", AnswerKind::Number),
                    question(3, "Have you noticed blood in your urine?", "blood_in_urine", AnswerKind::YesNo),
                    question(4, "How would you describe any discharge?", "discharge_type", AnswerKind::Text),
                    question(5, "What is your body temperature in °F?", "temperature", AnswerKind::Number),
                ],
                severity_formula: weights(&[
                    ("burning_urination", 6.0),
                    ("frequency", 6.0),
                    ("blood_in_urine", 12.0),
                    ("discharge_type", 5.0),
                    ("temperature", 6.0),
                ]),
                specialists: names(&["Urologist"]),
            },
        );

        conditions.insert(
            "depression".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "How would you describe your low mood (mild, moderate, severe)?", "severity", AnswerKind::Text),
                    question(2, "Do you have trouble sleeping?", "sleep_trouble", AnswerKind::YesNo),
                    question(3, "Have you lost your appetite?", "appetite_loss", AnswerKind::YesNo),
                    question(4, "For how many days have you felt this way?", "duration", AnswerKind::Number),
                    question(5, "Have you had thoughts of harming yourself?", "self_harm", AnswerKind::YesNo),
                ],
                severity_formula: weights(&[
                    ("severity", 6.0),
                    ("sleep_trouble", 4.0),
                    ("appetite_loss", 4.0),
                    ("duration", 5.0),
                    ("self_harm", 14.0),
                ]),
                specialists: names(&["Psychiatrist"]),
            },
        );

        conditions.insert(
            "chest pain".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "Are you currently experiencing chest pain?", "chest_pain", AnswerKind::YesNo),
                    question(2, "How would you describe the pain (dull, sharp, radiating)?", "pain_type", AnswerKind::Text),
                    question(3, "Do you have difficulty breathing?", "difficulty_breathing", AnswerKind::YesNo),
                    question(4, "For how many days have you had episodes?", "duration", AnswerKind::Number),
                    question(5, "What is your latest blood pressure reading (e.g. 120/80)?", "bp_level", AnswerKind::Text),
                ],
                severity_formula: weights(&[
                    ("chest_pain", 12.0),
                    ("pain_type", 8.0),
                    ("difficulty_breathing", 12.0),
                    ("duration", 4.0),
                    ("bp_level", 8.0),
                ]),
                specialists: names(&["Cardiologist"]),
            },
        );

        conditions.insert(
            "common cold".to_string(),
            ConditionDefinition {
                questions: vec![
                    question(1, "Do you have a runny nose?", "runny_nose", AnswerKind::YesNo),
                    question(2, "Do you have a sore throat?", "sore_throat", AnswerKind::YesNo),
                    question(3, "What is your body temperature in °F?", "temperature", AnswerKind::Number),
                    question(4, "What colour is your nasal discharge?", "discharge_type", AnswerKind::Text),
                    question(5, "For how many days have you had symptoms?", "duration", AnswerKind::Number),
                ],
                severity_formula: weights(&[
                    ("runny_nose", 3.0),
                    ("sore_throat", 3.0),
                    ("temperature", 6.0),
                    ("discharge_type", 4.0),
                    ("duration", 3.0),
                ]),
                specialists: names(&["General Physician"]),
            },
        );

        Self { conditions }
    }
}

/// Summary row exposed by the conditions listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub name: String,
    pub specialists: Vec<String>,
    pub question_count: usize,
}

fn question(id: u32, text: &str, key: &str, kind: AnswerKind) -> QuestionSpec {
    QuestionSpec {
        id,
        text: text.to_string(),
        key: key.to_string(),
        kind,
    }
}

fn weights(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(key, weight)| (key.to_string(), *weight))
        .collect()
}

fn names(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|name| name.to_string()).collect()
}
