use std::io::Cursor;

use super::common::*;
use crate::workflows::triage::catalog::{CatalogError, ConditionCatalog};
use crate::workflows::triage::domain::AnswerKind;

#[test]
fn combined_questions_deduplicate_shared_keys() {
    let catalog = catalog_with(vec![
        (
            "fever",
            condition(
                &[("temperature", 10.0), ("duration", 6.0)],
                vec![
                    question(1, "temperature", AnswerKind::Number),
                    question(2, "duration", AnswerKind::Number),
                ],
                &[],
            ),
        ),
        (
            "cold",
            condition(
                &[("temperature", 6.0), ("runny_nose", 3.0)],
                vec![
                    question(1, "temperature", AnswerKind::Number),
                    question(2, "runny_nose", AnswerKind::YesNo),
                ],
                &[],
            ),
        ),
    ]);

    let questions = catalog.combined_questions(&selection(&["fever", "cold"]));

    let keys: Vec<&str> = questions.iter().map(|q| q.key.as_str()).collect();
    assert_eq!(keys, vec!["temperature", "duration", "runny_nose"]);
}

#[test]
fn resolve_preserves_order_and_skips_unknowns() {
    let catalog = catalog_with(vec![
        (
            "cold",
            condition(&[("runny_nose", 3.0)], vec![question(1, "runny_nose", AnswerKind::YesNo)], &[]),
        ),
        (
            "fever",
            condition(&[("temperature", 10.0)], vec![question(1, "temperature", AnswerKind::Number)], &[]),
        ),
    ]);

    let chosen = selection(&["fever", "gout", "cold"]);
    let resolved = catalog.resolve(&chosen);

    let names: Vec<&str> = resolved.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["fever", "cold"]);
}

#[test]
fn specialists_deduplicate_in_encounter_order() {
    let catalog = catalog_with(vec![
        (
            "cough",
            condition(
                &[("cough_type", 6.0)],
                vec![question(1, "cough_type", AnswerKind::Text)],
                &["Pulmonologist", "General Physician"],
            ),
        ),
        (
            "fever",
            condition(
                &[("temperature", 10.0)],
                vec![question(1, "temperature", AnswerKind::Number)],
                &["General Physician"],
            ),
        ),
    ]);

    let specialists = catalog.specialists(&selection(&["cough", "fever"]));
    assert_eq!(
        specialists,
        vec!["Pulmonologist".to_string(), "General Physician".to_string()]
    );
}

#[test]
fn loads_catalog_from_json_document() {
    let document = r#"{
        "sinusitis": {
            "questions": [
                {"id": 1, "text": "What colour is your nasal discharge?", "key": "discharge_type", "kind": "text"},
                {"id": 2, "text": "For how many days?", "key": "duration", "kind": "number"}
            ],
            "severity_formula": {"discharge_type": 5.0, "duration": 4.0},
            "specialists": ["ENT Specialist"]
        }
    }"#;

    let catalog =
        ConditionCatalog::from_reader(Cursor::new(document)).expect("document parses");

    assert_eq!(catalog.len(), 1);
    let definition = catalog.get("sinusitis").expect("condition present");
    assert_eq!(definition.questions.len(), 2);
    assert_eq!(definition.specialists, vec!["ENT Specialist".to_string()]);
}

#[test]
fn rejects_empty_document() {
    let error = ConditionCatalog::from_reader(Cursor::new("{}"))
        .expect_err("empty catalog rejected");
    assert!(matches!(error, CatalogError::Empty));
}

#[test]
fn rejects_negative_weights() {
    let document = r#"{
        "fever": {
            "questions": [
                {"id": 1, "text": "Temperature?", "key": "temperature", "kind": "number"}
            ],
            "severity_formula": {"temperature": -1.0}
        }
    }"#;

    let error = ConditionCatalog::from_reader(Cursor::new(document))
        .expect_err("negative weight rejected");
    match error {
        CatalogError::NegativeWeight { condition, key } => {
            assert_eq!(condition, "fever");
            assert_eq!(key, "temperature");
        }
        other => panic!("expected negative weight error, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_question_ids() {
    let document = r#"{
        "fever": {
            "questions": [
                {"id": 1, "text": "Temperature?", "key": "temperature", "kind": "number"},
                {"id": 1, "text": "Days?", "key": "duration", "kind": "number"}
            ],
            "severity_formula": {"temperature": 10.0}
        }
    }"#;

    let error = ConditionCatalog::from_reader(Cursor::new(document))
        .expect_err("duplicate id rejected");
    assert!(matches!(
        error,
        CatalogError::DuplicateQuestionId { id: 1, .. }
    ));
}

#[test]
fn standard_catalog_is_consistent() {
    let catalog = ConditionCatalog::standard();
    assert!(!catalog.is_empty());

    // Every weighted key must be asked by that condition's questionnaire.
    for name in catalog.names().collect::<Vec<_>>() {
        let definition = catalog.get(name).expect("listed condition resolves");
        for key in definition.severity_formula.keys() {
            assert!(
                definition.questions.iter().any(|q| &q.key == key),
                "condition '{name}' weights unasked key '{key}'"
            );
        }
        assert!(
            !definition.specialists.is_empty(),
            "condition '{name}' has no referral target"
        );
    }
}

#[test]
fn standard_catalog_summaries_match_definitions() {
    let catalog = ConditionCatalog::standard();
    let summaries = catalog.summaries();
    assert_eq!(summaries.len(), catalog.len());

    let fever = summaries
        .iter()
        .find(|summary| summary.name == "fever")
        .expect("fever listed");
    assert_eq!(fever.question_count, 4);
}
