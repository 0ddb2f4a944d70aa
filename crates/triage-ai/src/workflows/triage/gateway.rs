use serde::{Deserialize, Serialize};

use super::domain::SeverityLabel;
use super::report::{CareReport, PromptContext};

/// Seam for the external generative service that writes care reports. The
/// service treats it as opaque: implementations own their prompt text and
/// transport.
pub trait AssessmentGenerator: Send + Sync {
    fn generate(&self, context: &PromptContext) -> Result<CareReport, GeneratorError>;
}

/// Generator failure modes. Both are absorbed by the fallback report rather
/// than surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator transport unavailable: {0}")]
    Transport(String),
    #[error("generator returned an unusable payload: {0}")]
    InvalidPayload(String),
}

/// Seam for routing finished reports toward the doctor-matching backend.
pub trait ReportDispatcher: Send + Sync {
    fn dispatch(&self, referral: CareReferral) -> Result<(), DispatchError>;
}

/// Referral payload forwarded to the care team alongside the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareReferral {
    pub conditions: Vec<String>,
    pub specialists: Vec<String>,
    pub severity: SeverityLabel,
    /// 0-10 display scale, one decimal.
    pub severity_score: f64,
    pub report: CareReport,
}

/// Referral dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("referral transport unavailable: {0}")]
    Transport(String),
}
