//! crates/lesson_planner_core/src/ports.rs
//!
//! Defines the service contracts (traits) the lesson planner depends on.
//! Document parsing and text generation live behind these traits so the core
//! stays independent of file formats and hosted model APIs.

use async_trait::async_trait;

use crate::domain::{FinalPrompt, LectureText};

//=========================================================================================
// Port Error Types
//=========================================================================================

/// Raised when an uploaded payload cannot be read as a transcript.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// Why a call to the generative model did not produce a plan.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Quota exceeded: {0}")]
    Quota(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Service error: {0}")]
    Service(String),
}

impl GenerationError {
    /// Whether trying the same request again later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Network(_) | GenerationError::Quota(_) | GenerationError::Service(_)
        )
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

pub trait DocumentLoader: Send + Sync {
    /// Extracts the paragraph text of a document, joined in document order.
    fn load_lecture_text(&self, payload: &[u8]) -> Result<LectureText, DocumentError>;
}

#[async_trait]
pub trait PlanGenerator: Send + Sync {
    /// Sends a prompt to the model and returns its text response.
    async fn generate(&self, prompt: &FinalPrompt) -> Result<String, GenerationError>;

    /// Name of the model behind this generator, for logs and status reporting.
    fn model_name(&self) -> &str;
}
