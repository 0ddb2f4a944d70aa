//! Symptom triage: condition catalog, questionnaire assembly, deterministic
//! severity scoring, and the seams for AI-generated care reports and doctor
//! referrals.

pub mod catalog;
pub mod domain;
pub mod gateway;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, ConditionCatalog, ConditionSummary};
pub use domain::{
    AnswerKind, AnswerValue, ConditionDefinition, QuestionSpec, ResponseSet, SeverityLabel,
};
pub use gateway::{
    AssessmentGenerator, CareReferral, DispatchError, GeneratorError, ReportDispatcher,
};
pub use report::{CareReport, PromptContext, ReportSource};
pub use router::triage_router;
pub use scoring::{
    KeyRole, KeyRoleTable, ScoreContribution, ScoringError, SeverityAssessment, SeverityEngine,
};
pub use service::{AssessmentReport, AssessmentRequest, TriageService, TriageServiceError};
