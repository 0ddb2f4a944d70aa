mod policy;
mod rules;

pub use rules::{KeyRole, KeyRoleTable};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::ConditionCatalog;
use super::domain::{ResponseSet, SeverityLabel};
use rules::RuleOutcome;

/// Stateless severity engine applying the key-role rule table to a response
/// set. Pure and deterministic: no I/O, no hidden state, safe to call
/// concurrently.
pub struct SeverityEngine {
    roles: KeyRoleTable,
}

impl SeverityEngine {
    pub fn new(roles: KeyRoleTable) -> Self {
        Self { roles }
    }

    pub fn standard() -> Self {
        Self::new(KeyRoleTable::standard())
    }

    /// Scores a response set against the selected conditions' formulas.
    ///
    /// Every resolved formula weight counts toward the theoretical ceiling
    /// whether or not the key was answered; answered keys contribute a
    /// rule-determined fraction of their weight. Malformed answers never
    /// fail the call — they contribute zero and are reported in
    /// `ignored_keys`.
    pub fn score(
        &self,
        catalog: &ConditionCatalog,
        selection: &[String],
        responses: &ResponseSet,
    ) -> Result<SeverityAssessment, ScoringError> {
        let resolved = catalog.resolve(selection);
        if resolved.is_empty() {
            return Err(ScoringError::InvalidSelection);
        }

        let mut max_possible = 0.0_f64;
        let mut total = 0.0_f64;
        let mut criticals: Vec<String> = Vec::new();
        let mut contributions: Vec<ScoreContribution> = Vec::new();
        let mut ignored: Vec<String> = Vec::new();

        for (condition, definition) in &resolved {
            for (key, weight) in &definition.severity_formula {
                max_possible += weight;

                let Some(answer) = responses.get(key) else {
                    continue;
                };

                match rules::contribution(self.roles.role(key), key, answer) {
                    RuleOutcome::Scored(outcome) => {
                        let awarded = weight * outcome.fraction;
                        total += awarded;
                        if let Some(description) = outcome.critical {
                            criticals.push(description);
                        }
                        contributions.push(ScoreContribution {
                            condition: (*condition).to_string(),
                            key: key.clone(),
                            weight: *weight,
                            fraction: outcome.fraction,
                            awarded,
                            notes: outcome.note.to_string(),
                        });
                    }
                    RuleOutcome::Ignored => {
                        debug!(
                            key = %key,
                            condition = %condition,
                            "answer did not match any scoring rule"
                        );
                        if !ignored.iter().any(|existing| existing == key) {
                            ignored.push(key.clone());
                        }
                    }
                }
            }
        }

        let normalized = if max_possible > 0.0 {
            total / max_possible
        } else {
            0.0
        };

        let affirmative = responses
            .values()
            .filter(|answer| answer.is_affirmative())
            .count();
        let multiplier = policy::symptom_multiplier(affirmative, !criticals.is_empty());
        let score = (normalized * multiplier).min(1.0);
        let label = policy::label_for_score(score);
        let rationale = policy::rationale(label, &criticals);

        Ok(SeverityAssessment {
            score,
            label,
            rationale,
            critical_symptoms: criticals,
            contributions,
            ignored_keys: ignored,
        })
    }
}

/// Errors raised by the severity engine. Malformed individual answers are
/// absorbed by policy; only an unresolvable selection fails the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("no recognized conditions in selection")]
    InvalidSelection,
}

/// One answered formula key's effect on the score, kept for transparent
/// audits of an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub condition: String,
    pub key: String,
    pub weight: f64,
    pub fraction: f64,
    pub awarded: f64,
    pub notes: String,
}

/// Normalized severity result for one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    /// Final score in [0.0, 1.0] after the multiplier and cap.
    pub score: f64,
    pub label: SeverityLabel,
    /// Non-empty explanation citing the contributing critical symptoms.
    pub rationale: String,
    /// Critical symptom descriptions in encounter order.
    pub critical_symptoms: Vec<String>,
    pub contributions: Vec<ScoreContribution>,
    /// Keys whose answers no rule could interpret; they contributed zero.
    pub ignored_keys: Vec<String>,
}

impl SeverityAssessment {
    /// The 0-10 display scale forwarded to prompts and client payloads,
    /// rounded to one decimal.
    pub fn display_score(&self) -> f64 {
        (self.score * 100.0).round() / 10.0
    }
}
