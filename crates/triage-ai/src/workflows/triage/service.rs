use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::{ConditionCatalog, ConditionSummary};
use super::domain::{QuestionSpec, ResponseSet};
use super::gateway::{AssessmentGenerator, CareReferral, DispatchError, ReportDispatcher};
use super::report::{CareReport, PromptContext, ReportSource};
use super::scoring::{ScoringError, SeverityAssessment, SeverityEngine};

/// Service composing the condition catalog, severity engine, and the
/// external generator/dispatcher seams.
pub struct TriageService<G, D> {
    catalog: ConditionCatalog,
    engine: SeverityEngine,
    generator: Arc<G>,
    dispatcher: Arc<D>,
}

/// Inbound assessment request mirroring the HTTP envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub conditions: Vec<String>,
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default)]
    pub notify_care_team: bool,
}

/// Completed assessment returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// The recognized condition names the assessment covered.
    pub conditions: Vec<String>,
    pub assessment: SeverityAssessment,
    /// 0-10 display scale, one decimal.
    pub severity_score: f64,
    pub report: CareReport,
    pub report_source: ReportSource,
    pub specialists: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl<G, D> TriageService<G, D>
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    pub fn new(catalog: ConditionCatalog, generator: Arc<G>, dispatcher: Arc<D>) -> Self {
        Self::with_engine(SeverityEngine::standard(), catalog, generator, dispatcher)
    }

    pub fn with_engine(
        engine: SeverityEngine,
        catalog: ConditionCatalog,
        generator: Arc<G>,
        dispatcher: Arc<D>,
    ) -> Self {
        Self {
            catalog,
            engine,
            generator,
            dispatcher,
        }
    }

    /// Catalog summaries for the selection UI.
    pub fn conditions(&self) -> Vec<ConditionSummary> {
        self.catalog.summaries()
    }

    /// Combined, key-deduplicated question list for a selection.
    pub fn questionnaire(
        &self,
        selection: &[String],
    ) -> Result<Vec<QuestionSpec>, TriageServiceError> {
        if self.catalog.resolve(selection).is_empty() {
            return Err(ScoringError::InvalidSelection.into());
        }
        Ok(self.catalog.combined_questions(selection))
    }

    /// Severity scoring without report generation.
    pub fn severity(
        &self,
        selection: &[String],
        responses: &ResponseSet,
    ) -> Result<SeverityAssessment, TriageServiceError> {
        Ok(self.engine.score(&self.catalog, selection, responses)?)
    }

    /// Scores the responses, obtains a care report (falling back to the
    /// deterministic sections when the generator fails), and optionally
    /// dispatches a referral to the care team.
    pub fn assess(
        &self,
        request: AssessmentRequest,
    ) -> Result<AssessmentReport, TriageServiceError> {
        let AssessmentRequest {
            conditions,
            responses,
            notify_care_team,
        } = request;

        let assessment = self.engine.score(&self.catalog, &conditions, &responses)?;
        let recognized: Vec<String> = self
            .catalog
            .resolve(&conditions)
            .iter()
            .map(|(name, _)| (*name).to_string())
            .collect();

        let context = PromptContext::new(recognized.clone(), responses, &assessment);
        let (report, report_source) = match self.generator.generate(&context) {
            Ok(report) => (report, ReportSource::Generated),
            Err(error) => {
                warn!(%error, "assessment generator failed, substituting deterministic report");
                (
                    CareReport::fallback(&recognized, assessment.label, &assessment.rationale),
                    ReportSource::Fallback,
                )
            }
        };

        let specialists = self.catalog.specialists(&conditions);
        if notify_care_team {
            if specialists.is_empty() {
                warn!("care team notification skipped: no specialists resolved");
            } else {
                self.dispatcher.dispatch(CareReferral {
                    conditions: recognized.clone(),
                    specialists: specialists.clone(),
                    severity: assessment.label,
                    severity_score: context.severity_score,
                    report: report.clone(),
                })?;
            }
        }

        Ok(AssessmentReport {
            conditions: recognized,
            severity_score: context.severity_score,
            assessment,
            report,
            report_source,
            specialists,
            generated_at: Utc::now(),
        })
    }
}

/// Error raised by the triage service. Generator failures never surface
/// here; they are absorbed by the fallback report.
#[derive(Debug, thiserror::Error)]
pub enum TriageServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
