pub mod docx_loader;
pub mod plan_llm;

pub use docx_loader::DocxLoader;
pub use plan_llm::{GenerationSettings, OpenAiPlanAdapter};
