use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use triage_ai::config::CatalogConfig;
use triage_ai::error::AppError;
use triage_ai::workflows::triage::{
    AssessmentGenerator, CareReferral, CareReport, ConditionCatalog, DispatchError,
    GeneratorError, PromptContext, ReportDispatcher,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Deterministic generator used when no external generative service is wired
/// in. It renders the same five sections the fallback path produces, so the
/// service works end to end offline.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TemplateAssessmentGenerator;

impl AssessmentGenerator for TemplateAssessmentGenerator {
    fn generate(&self, context: &PromptContext) -> Result<CareReport, GeneratorError> {
        Ok(CareReport::fallback(
            &context.conditions,
            context.severity,
            &context.rationale,
        ))
    }
}

/// In-memory referral sink standing in for the doctor-matching backend.
#[derive(Default, Clone)]
pub(crate) struct RecordingDispatcher {
    referrals: Arc<Mutex<Vec<CareReferral>>>,
}

impl ReportDispatcher for RecordingDispatcher {
    fn dispatch(&self, referral: CareReferral) -> Result<(), DispatchError> {
        let mut guard = self.referrals.lock().expect("referral mutex poisoned");
        guard.push(referral);
        Ok(())
    }
}

impl RecordingDispatcher {
    pub(crate) fn referrals(&self) -> Vec<CareReferral> {
        self.referrals
            .lock()
            .expect("referral mutex poisoned")
            .clone()
    }
}

pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<ConditionCatalog, AppError> {
    match &config.path {
        Some(path) => ConditionCatalog::from_path(path).map_err(AppError::from),
        None => Ok(ConditionCatalog::standard()),
    }
}
