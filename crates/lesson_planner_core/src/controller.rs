//! crates/lesson_planner_core/src/controller.rs
//!
//! Runs one generation event: credential check, upload check, then
//! document loading, prompt building and generation in that order.

use std::sync::Arc;

use crate::domain::{GeneratedPlan, GenerationRequest};
use crate::ports::{DocumentError, DocumentLoader, PlanGenerator};
use crate::prompt::build_prompt;

pub const MISSING_CREDENTIAL_MESSAGE: &str = "请输入API密钥后再生成。";
pub const MISSING_DOCUMENT_MESSAGE: &str = "请先上传您的课程讲稿。";
pub const UNREADABLE_DOCUMENT_MESSAGE: &str = "讲稿解析失败，请确认上传的是有效的 .docx 文件。";

/// The single terminal state of a generation event.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// No model credential is configured; nothing was attempted.
    MissingCredential,
    /// No transcript was uploaded; nothing was attempted.
    MissingDocument,
    /// The upload could not be parsed; the model was not called.
    UnreadableDocument(DocumentError),
    /// The model was called; the plan holds its text or the failure.
    Generated(GeneratedPlan),
}

impl GenerationOutcome {
    /// Text for the result area or the warning banner.
    pub fn message(&self) -> String {
        match self {
            GenerationOutcome::MissingCredential => MISSING_CREDENTIAL_MESSAGE.to_string(),
            GenerationOutcome::MissingDocument => MISSING_DOCUMENT_MESSAGE.to_string(),
            GenerationOutcome::UnreadableDocument(e) => {
                format!("{UNREADABLE_DOCUMENT_MESSAGE}（{e}）")
            }
            GenerationOutcome::Generated(plan) => plan.render(),
        }
    }
}

/// Wires the form inputs to the loader and the generator.
#[derive(Clone)]
pub struct LessonPlanController {
    loader: Arc<dyn DocumentLoader>,
    generator: Option<Arc<dyn PlanGenerator>>,
}

impl LessonPlanController {
    /// `generator` is `None` when no credential was configured at startup.
    pub fn new(loader: Arc<dyn DocumentLoader>, generator: Option<Arc<dyn PlanGenerator>>) -> Self {
        Self { loader, generator }
    }

    pub fn is_ready(&self) -> bool {
        self.generator.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.model_name())
    }

    pub async fn handle(&self, request: GenerationRequest) -> GenerationOutcome {
        let Some(generator) = self.generator.as_ref() else {
            return GenerationOutcome::MissingCredential;
        };
        let Some(document) = request.document else {
            return GenerationOutcome::MissingDocument;
        };

        let lecture = match self.loader.load_lecture_text(&document.bytes) {
            Ok(lecture) => lecture,
            Err(e) => return GenerationOutcome::UnreadableDocument(e),
        };

        let prompt = build_prompt(request.template, &request.info, &lecture);
        let result = generator.generate(&prompt).await;

        GenerationOutcome::Generated(GeneratedPlan::from_result(result))
    }
}
