use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::workflows::triage::catalog::ConditionCatalog;
use crate::workflows::triage::domain::{
    AnswerKind, AnswerValue, ConditionDefinition, QuestionSpec, ResponseSet,
};
use crate::workflows::triage::gateway::{
    AssessmentGenerator, CareReferral, DispatchError, GeneratorError, ReportDispatcher,
};
use crate::workflows::triage::report::{CareReport, PromptContext};
use crate::workflows::triage::service::TriageService;

pub(super) fn question(id: u32, key: &str, kind: AnswerKind) -> QuestionSpec {
    QuestionSpec {
        id,
        text: format!("Tell us about {}", key.replace('_', " ")),
        key: key.to_string(),
        kind,
    }
}

pub(super) fn condition(
    entries: &[(&str, f64)],
    questions: Vec<QuestionSpec>,
    specialists: &[&str],
) -> ConditionDefinition {
    ConditionDefinition {
        questions,
        severity_formula: entries
            .iter()
            .map(|(key, weight)| (key.to_string(), *weight))
            .collect(),
        specialists: specialists.iter().map(|name| name.to_string()).collect(),
    }
}

pub(super) fn catalog_with(
    conditions: Vec<(&str, ConditionDefinition)>,
) -> ConditionCatalog {
    let map: BTreeMap<String, ConditionDefinition> = conditions
        .into_iter()
        .map(|(name, definition)| (name.to_string(), definition))
        .collect();
    ConditionCatalog::new(map).expect("test catalog is valid")
}

/// Catalog with one condition holding a single weighted key; the question
/// list mirrors the formula so the fixture stays well-formed.
pub(super) fn single_key_catalog(name: &str, key: &str, weight: f64) -> ConditionCatalog {
    catalog_with(vec![(
        name,
        condition(
            &[(key, weight)],
            vec![question(1, key, AnswerKind::Text)],
            &["General Physician"],
        ),
    )])
}

pub(super) fn selection(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn responses(entries: &[(&str, AnswerValue)]) -> ResponseSet {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

pub(super) fn yes() -> AnswerValue {
    AnswerValue::Text("yes".to_string())
}

pub(super) fn no() -> AnswerValue {
    AnswerValue::Text("no".to_string())
}

pub(super) fn num(value: f64) -> AnswerValue {
    AnswerValue::Number(value)
}

pub(super) fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

/// Generator double: records every context, optionally failing to force the
/// fallback path.
#[derive(Default)]
pub(super) struct StubGenerator {
    fail: bool,
    contexts: Mutex<Vec<PromptContext>>,
}

impl StubGenerator {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn contexts(&self) -> Vec<PromptContext> {
        self.contexts.lock().expect("context mutex poisoned").clone()
    }
}

impl AssessmentGenerator for StubGenerator {
    fn generate(&self, context: &PromptContext) -> Result<CareReport, GeneratorError> {
        self.contexts
            .lock()
            .expect("context mutex poisoned")
            .push(context.clone());

        if self.fail {
            return Err(GeneratorError::Transport("stub offline".to_string()));
        }

        Ok(CareReport {
            summary: format!("generated summary for {}", context.conditions.join(", ")),
            precautions: "generated precautions".to_string(),
            medications: "generated medications".to_string(),
            diet: "generated diet".to_string(),
            prevention: "generated prevention".to_string(),
        })
    }
}

/// Dispatcher double recording referrals, optionally failing.
#[derive(Default)]
pub(super) struct MemoryDispatcher {
    fail: bool,
    referrals: Mutex<Vec<CareReferral>>,
}

impl MemoryDispatcher {
    pub(super) fn failing() -> Self {
        Self {
            fail: true,
            referrals: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn referrals(&self) -> Vec<CareReferral> {
        self.referrals
            .lock()
            .expect("referral mutex poisoned")
            .clone()
    }
}

impl ReportDispatcher for MemoryDispatcher {
    fn dispatch(&self, referral: CareReferral) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Transport("stub offline".to_string()));
        }
        self.referrals
            .lock()
            .expect("referral mutex poisoned")
            .push(referral);
        Ok(())
    }
}

pub(super) fn build_service(
    catalog: ConditionCatalog,
) -> (
    TriageService<StubGenerator, MemoryDispatcher>,
    Arc<StubGenerator>,
    Arc<MemoryDispatcher>,
) {
    let generator = Arc::new(StubGenerator::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = TriageService::new(catalog, generator.clone(), dispatcher.clone());
    (service, generator, dispatcher)
}
