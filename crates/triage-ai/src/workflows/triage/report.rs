use serde::{Deserialize, Serialize};

use super::domain::{ResponseSet, SeverityLabel};
use super::scoring::SeverityAssessment;

/// Structured context handed to the generative seam. The severity result is
/// always computed fully before this is built, so downstream prompts can
/// interpolate a settled assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptContext {
    pub conditions: Vec<String>,
    pub responses: ResponseSet,
    pub severity: SeverityLabel,
    /// 0-10 display scale, one decimal.
    pub severity_score: f64,
    pub rationale: String,
}

impl PromptContext {
    pub fn new(
        conditions: Vec<String>,
        responses: ResponseSet,
        assessment: &SeverityAssessment,
    ) -> Self {
        Self {
            conditions,
            responses,
            severity: assessment.label,
            severity_score: assessment.display_score(),
            rationale: assessment.rationale.clone(),
        }
    }
}

/// Five-section care report returned to the client alongside the severity
/// result. Sections are free text produced by the generative seam or by the
/// deterministic fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareReport {
    pub summary: String,
    pub precautions: String,
    pub medications: String,
    pub diet: String,
    pub prevention: String,
}

impl CareReport {
    /// Deterministic report substituted when the generative service is
    /// unavailable or returns an unusable payload.
    pub fn fallback(conditions: &[String], severity: SeverityLabel, rationale: &str) -> Self {
        Self {
            summary: format!(
                "You are experiencing {} with {} severity. This is a {}. \
                 Proper care and monitoring are recommended.",
                conditions.join(", "),
                severity.label().to_lowercase(),
                rationale
            ),
            precautions: "1. Monitor your symptoms closely every 4-6 hours\n\
                 2. Rest adequately and avoid strenuous activities\n\
                 3. Stay hydrated with 8-10 glasses of water daily\n\
                 4. Maintain good hygiene and wash hands frequently\n\
                 5. Keep living space clean and well-ventilated"
                .to_string(),
            medications: "1. Over-the-counter pain relievers as needed for symptom relief\n\
                 2. Follow package dosage instructions carefully\n\
                 3. Take medications with food to prevent stomach upset\n\
                 4. Keep track of all medications and times taken\n\
                 5. Consult healthcare provider for prescription recommendations"
                .to_string(),
            diet: "1. Light, easily digestible meals throughout the day\n\
                 2. Include plenty of fresh fruits and vegetables\n\
                 3. Stay hydrated with water, clear broths, and herbal teas\n\
                 4. Avoid heavy, oily, and spicy foods\n\
                 5. Limit processed foods and added sugars"
                .to_string(),
            prevention: "1. Practice thorough hand hygiene regularly\n\
                 2. Get 7-8 hours of quality sleep nightly\n\
                 3. Avoid close contact with sick individuals\n\
                 4. Maintain balanced diet and regular exercise\n\
                 5. Follow up with healthcare provider as needed"
                .to_string(),
        }
    }
}

/// Whether a report came from the generative seam or the fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Generated,
    Fallback,
}
