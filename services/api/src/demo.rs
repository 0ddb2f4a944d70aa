use crate::infra::{load_catalog, RecordingDispatcher, TemplateAssessmentGenerator};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use triage_ai::config::CatalogConfig;
use triage_ai::error::AppError;
use triage_ai::workflows::triage::{
    AnswerValue, AssessmentRequest, ResponseSet, SeverityEngine, TriageService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Comma-separated condition names from the catalog
    #[arg(long, value_delimiter = ',')]
    pub(crate) conditions: Vec<String>,
    /// Path to a JSON document mapping question keys to answers
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Optional catalog JSON overriding the built-in conditions
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog JSON overriding the built-in conditions
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Skip the referral dispatch portion of the demo
    #[arg(long)]
    pub(crate) skip_referral: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        conditions,
        responses,
        catalog,
    } = args;

    let catalog = load_catalog(&CatalogConfig { path: catalog })?;
    let raw = std::fs::read_to_string(&responses)?;
    let responses: ResponseSet = serde_json::from_str(&raw)?;

    let engine = SeverityEngine::standard();
    match engine.score(&catalog, &conditions, &responses) {
        Ok(assessment) => {
            println!(
                "Severity: {} ({:.1}/10)",
                assessment.label.label(),
                assessment.display_score()
            );
            println!("Rationale: {}", assessment.rationale);
            match serde_json::to_string_pretty(&assessment) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("Assessment payload unavailable: {err}"),
            }
        }
        Err(err) => println!("Selection rejected: {err}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog,
        skip_referral,
    } = args;

    println!(
        "Symptom triage demo (evaluated {})",
        Local::now().date_naive()
    );

    let catalog = load_catalog(&CatalogConfig { path: catalog })?;
    let generator = Arc::new(TemplateAssessmentGenerator);
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let service = TriageService::new(catalog, generator, dispatcher.clone());

    println!("\nCondition catalog");
    for summary in service.conditions() {
        println!(
            "- {} ({} questions) -> {}",
            summary.name,
            summary.question_count,
            summary.specialists.join(", ")
        );
    }

    let selection = vec!["fever".to_string(), "cough".to_string()];
    println!("\nSelected conditions: {}", selection.join(", "));

    let questions = match service.questionnaire(&selection) {
        Ok(questions) => questions,
        Err(err) => {
            println!("  Questionnaire unavailable: {err}");
            return Ok(());
        }
    };
    println!("Combined questionnaire ({} questions)", questions.len());
    for question in &questions {
        println!("  {}. {} [{}]", question.id, question.text, question.key);
    }

    let mut responses = ResponseSet::new();
    responses.insert("temperature".to_string(), AnswerValue::Number(103.2));
    responses.insert("duration".to_string(), AnswerValue::Number(4.0));
    responses.insert("chills".to_string(), AnswerValue::Text("yes".to_string()));
    responses.insert(
        "body_ache".to_string(),
        AnswerValue::Text("yes".to_string()),
    );
    responses.insert(
        "cough_type".to_string(),
        AnswerValue::Text("dry and constant".to_string()),
    );
    responses.insert(
        "difficulty_breathing".to_string(),
        AnswerValue::Text("yes".to_string()),
    );
    responses.insert("blood_sputum".to_string(), AnswerValue::Text("no".to_string()));

    println!("\nScoring canned responses");
    let report = match service.assess(AssessmentRequest {
        conditions: selection,
        responses,
        notify_care_team: !skip_referral,
    }) {
        Ok(report) => report,
        Err(err) => {
            println!("  Assessment unavailable: {err}");
            return Ok(());
        }
    };

    println!(
        "- Severity: {} (score {:.3}, {:.1}/10)",
        report.assessment.label.label(),
        report.assessment.score,
        report.severity_score
    );
    println!("- Rationale: {}", report.assessment.rationale);

    if report.assessment.critical_symptoms.is_empty() {
        println!("- Critical symptoms: none");
    } else {
        println!("- Critical symptoms:");
        for symptom in &report.assessment.critical_symptoms {
            println!("    - {symptom}");
        }
    }

    println!("- Score contributions:");
    for contribution in &report.assessment.contributions {
        println!(
            "    - {} / {}: {:.1} x {:.2} = {:.2} ({})",
            contribution.condition,
            contribution.key,
            contribution.weight,
            contribution.fraction,
            contribution.awarded,
            contribution.notes
        );
    }

    if !report.assessment.ignored_keys.is_empty() {
        println!(
            "- Ignored answers: {}",
            report.assessment.ignored_keys.join(", ")
        );
    }

    println!("\nCare report ({:?})", report.report_source);
    println!("  Summary: {}", report.report.summary);
    println!("  Precautions:\n{}", indent(&report.report.precautions));
    println!("  Medications:\n{}", indent(&report.report.medications));
    println!("  Diet:\n{}", indent(&report.report.diet));
    println!("  Prevention:\n{}", indent(&report.report.prevention));

    let referrals = dispatcher.referrals();
    if referrals.is_empty() {
        println!("\nReferrals: none dispatched");
    } else {
        println!("\nReferrals");
        for referral in referrals {
            println!(
                "- {} ({}/10) -> {}",
                referral.severity.label(),
                referral.severity_score,
                referral.specialists.join(", ")
            );
        }
    }

    Ok(())
}

fn indent(section: &str) -> String {
    section
        .lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
