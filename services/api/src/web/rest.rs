//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Local, NaiveDate};
use lesson_planner_core::{
    domain::UnknownTemplate, AuxiliaryInfo, GeneratedPlan, GenerationOutcome, GenerationRequest,
    TemplateChoice, UploadedDocument,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

pub const ENGINE_READY_MESSAGE: &str = "AI引擎已准备就绪！";
pub const ENGINE_MISSING_MESSAGE: &str = "请先在云端配置您的Google API密钥。";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_lesson_plan_handler,
        status_handler,
    ),
    components(
        schemas(LessonPlanResponse, OutcomeStatus, StatusResponse)
    ),
    tags(
        (name = "Lesson Plan Assistant API", description = "Generate lesson plan drafts from lecture transcripts.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// How a generation request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Generated,
    GenerationFailed,
    MissingCredential,
    MissingDocument,
    UnreadableDocument,
    InvalidForm,
}

/// The response payload sent after a generation request.
#[derive(Debug, Serialize, ToSchema)]
pub struct LessonPlanResponse {
    pub request_id: Uuid,
    pub status: OutcomeStatus,
    /// Banner text for warnings and errors.
    pub message: Option<String>,
    /// The draft, or the failure text when the model call failed.
    pub plan: Option<String>,
    /// Set when the model call failed: whether trying again later may help.
    pub retryable: Option<bool>,
}

impl LessonPlanResponse {
    fn banner(request_id: Uuid, status: OutcomeStatus, message: String) -> Self {
        Self {
            request_id,
            status,
            message: Some(message),
            plan: None,
            retryable: None,
        }
    }
}

/// Whether the generation engine can be used.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub ready: bool,
    pub message: String,
    pub model: Option<String>,
}

//=========================================================================================
// Form Parsing
//=========================================================================================

/// Raised when the multipart form itself is malformed.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Failed to read multipart data: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Template(#[from] UnknownTemplate),
    #[error("Invalid course date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Reads the generation form. Unknown fields are ignored.
pub async fn read_generation_form(mut multipart: Multipart) -> Result<GenerationRequest, FormError> {
    let mut template = TemplateChoice::default();
    let mut info = AuxiliaryInfo::default();
    let mut course_date: Option<String> = None;
    let mut document = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "template" => template = field.text().await?.parse()?,
            "course_name" => info.course_name = field.text().await?,
            "class_name" => info.class_name = field.text().await?,
            "course_date" => course_date = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // Browsers submit an empty part when no file was chosen.
                if !bytes.is_empty() {
                    document = Some(UploadedDocument::new(file_name, bytes));
                }
            }
            _ => {}
        }
    }

    info.course_date = parse_course_date(course_date.as_deref())?.to_string();

    Ok(GenerationRequest {
        template,
        info,
        document,
    })
}

/// A blank date means today, like the date picker's initial value.
fn parse_course_date(raw: Option<&str>) -> Result<NaiveDate, FormError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(s.to_string())),
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a lesson plan draft from an uploaded transcript.
///
/// Accepts a multipart/form-data request with the fields `template`,
/// `course_name`, `class_name`, `course_date` and a `.docx` part named `file`.
#[utoipa::path(
    post,
    path = "/lesson-plans",
    request_body(content_type = "multipart/form-data", description = "The transcript and lesson metadata."),
    responses(
        (status = 200, description = "The model was called; `plan` holds the draft or the failure text", body = LessonPlanResponse),
        (status = 400, description = "Malformed form or no transcript uploaded", body = LessonPlanResponse),
        (status = 422, description = "The transcript is not a readable document", body = LessonPlanResponse),
        (status = 503, description = "No model credential configured", body = LessonPlanResponse)
    )
)]
pub async fn generate_lesson_plan_handler(
    State(app_state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();

    // Checked before the form so a missing credential is reported even for a bad form.
    if !app_state.controller.is_ready() {
        warn!(%request_id, "Generation requested without a configured credential");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(LessonPlanResponse::banner(
                request_id,
                OutcomeStatus::MissingCredential,
                GenerationOutcome::MissingCredential.message(),
            )),
        );
    }

    let request = match read_generation_form(multipart).await {
        Ok(request) => request,
        Err(e) => {
            warn!(%request_id, "Rejected generation form: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(LessonPlanResponse::banner(
                    request_id,
                    OutcomeStatus::InvalidForm,
                    e.to_string(),
                )),
            );
        }
    };

    info!(
        %request_id,
        template = %request.template,
        file = request.document.as_ref().map(|d| d.file_name.as_str()).unwrap_or(""),
        "Generating lesson plan"
    );

    let outcome = app_state.controller.handle(request).await;
    let message = outcome.message();

    match outcome {
        GenerationOutcome::MissingCredential => {
            warn!(%request_id, "Generation requested without a configured credential");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(LessonPlanResponse::banner(
                    request_id,
                    OutcomeStatus::MissingCredential,
                    message,
                )),
            )
        }
        GenerationOutcome::MissingDocument => (
            StatusCode::BAD_REQUEST,
            Json(LessonPlanResponse::banner(
                request_id,
                OutcomeStatus::MissingDocument,
                message,
            )),
        ),
        GenerationOutcome::UnreadableDocument(e) => {
            warn!(%request_id, "Uploaded transcript could not be parsed: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(LessonPlanResponse::banner(
                    request_id,
                    OutcomeStatus::UnreadableDocument,
                    message,
                )),
            )
        }
        GenerationOutcome::Generated(GeneratedPlan::Draft(_)) => {
            info!(%request_id, plan_chars = message.chars().count(), "Lesson plan generated");
            (
                StatusCode::OK,
                Json(LessonPlanResponse {
                    request_id,
                    status: OutcomeStatus::Generated,
                    message: None,
                    plan: Some(message),
                    retryable: None,
                }),
            )
        }
        GenerationOutcome::Generated(GeneratedPlan::Failed(e)) => {
            error!(%request_id, "Lesson plan generation failed: {}", e);
            (
                StatusCode::OK,
                Json(LessonPlanResponse {
                    request_id,
                    status: OutcomeStatus::GenerationFailed,
                    message: None,
                    plan: Some(message),
                    retryable: Some(e.is_retryable()),
                }),
            )
        }
    }
}

/// Report whether a model credential was configured at startup.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Generation engine status", body = StatusResponse)
    )
)]
pub async fn status_handler(State(app_state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let controller = &app_state.controller;
    let message = if controller.is_ready() {
        ENGINE_READY_MESSAGE
    } else {
        ENGINE_MISSING_MESSAGE
    };
    Json(StatusResponse {
        ready: controller.is_ready(),
        message: message.to_string(),
        model: controller.model_name().map(str::to_string),
    })
}
