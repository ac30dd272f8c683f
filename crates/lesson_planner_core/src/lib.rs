pub mod controller;
pub mod domain;
pub mod ports;
pub mod prompt;
pub mod templates;

pub use controller::{GenerationOutcome, LessonPlanController};
pub use domain::{
    AuxiliaryInfo, FinalPrompt, GeneratedPlan, GenerationRequest, LectureText, TemplateChoice,
    UploadedDocument,
};
pub use ports::{DocumentError, DocumentLoader, GenerationError, PlanGenerator};
pub use prompt::build_prompt;
