use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{QuestionSpec, ResponseSet};
use super::gateway::{AssessmentGenerator, ReportDispatcher};
use super::scoring::{ScoringError, SeverityAssessment};
use super::service::{AssessmentRequest, TriageService, TriageServiceError};

/// Router builder exposing the triage HTTP endpoints.
pub fn triage_router<G, D>(service: Arc<TriageService<G, D>>) -> Router
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/triage/conditions", get(conditions_handler::<G, D>))
        .route(
            "/api/v1/triage/questionnaire",
            post(questionnaire_handler::<G, D>),
        )
        .route("/api/v1/triage/severity", post(severity_handler::<G, D>))
        .route(
            "/api/v1/triage/assessments",
            post(assessment_handler::<G, D>),
        )
        .with_state(service)
}

/// Selection payload shared by the questionnaire and severity endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SelectionPayload {
    #[serde(default)]
    pub(crate) conditions: Vec<String>,
    #[serde(default)]
    pub(crate) responses: ResponseSet,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct QuestionnaireResponse {
    pub(crate) questions: Vec<QuestionSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SeverityResponse {
    pub(crate) assessment: SeverityAssessment,
    pub(crate) severity_score: f64,
}

pub(crate) async fn conditions_handler<G, D>(
    State(service): State<Arc<TriageService<G, D>>>,
) -> Response
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    (StatusCode::OK, axum::Json(service.conditions())).into_response()
}

pub(crate) async fn questionnaire_handler<G, D>(
    State(service): State<Arc<TriageService<G, D>>>,
    axum::Json(payload): axum::Json<SelectionPayload>,
) -> Response
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    if let Some(rejection) = reject_empty_selection(&payload.conditions) {
        return rejection;
    }

    match service.questionnaire(&payload.conditions) {
        Ok(questions) => (
            StatusCode::OK,
            axum::Json(QuestionnaireResponse { questions }),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn severity_handler<G, D>(
    State(service): State<Arc<TriageService<G, D>>>,
    axum::Json(payload): axum::Json<SelectionPayload>,
) -> Response
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    if let Some(rejection) = reject_empty_selection(&payload.conditions) {
        return rejection;
    }

    match service.severity(&payload.conditions, &payload.responses) {
        Ok(assessment) => {
            let severity_score = assessment.display_score();
            (
                StatusCode::OK,
                axum::Json(SeverityResponse {
                    assessment,
                    severity_score,
                }),
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_handler<G, D>(
    State(service): State<Arc<TriageService<G, D>>>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response
where
    G: AssessmentGenerator + 'static,
    D: ReportDispatcher + 'static,
{
    if let Some(rejection) = reject_empty_selection(&request.conditions) {
        return rejection;
    }

    match service.assess(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

/// The caller contract rejects an empty selection before the engine runs, so
/// clients can distinguish "nothing selected" from "nothing recognized".
fn reject_empty_selection(conditions: &[String]) -> Option<Response> {
    if conditions.is_empty() {
        let payload = json!({ "error": "no conditions selected" });
        return Some((StatusCode::BAD_REQUEST, axum::Json(payload)).into_response());
    }
    None
}

fn error_response(error: TriageServiceError) -> Response {
    match error {
        TriageServiceError::Scoring(ScoringError::InvalidSelection) => {
            let payload = json!({ "error": "no recognized conditions selected" });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
