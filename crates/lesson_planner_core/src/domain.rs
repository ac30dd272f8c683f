//! crates/lesson_planner_core/src/domain.rs
//!
//! Defines the pure, request-scoped data structures of the lesson planner.
//! Nothing here is persisted; every value lives for a single generation request.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ports::GenerationError;
use crate::templates::{INTEGRATED_THEORY_PRACTICE_TEMPLATE, THEORY_TEACHING_TEMPLATE};

/// Prefix put in front of a failure description when it is shown in place of a plan.
pub const GENERATION_FAILURE_PREFIX: &str = "生成失败，发生错误：";

//=========================================================================================
// Template Choice
//=========================================================================================

/// The lesson-plan template style selected by the teacher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateChoice {
    /// 理论教学
    #[default]
    TheoryTeaching,
    /// 理实一体教学
    IntegratedTheoryPractice,
}

impl TemplateChoice {
    /// Every selectable template, in the order the UI offers them.
    pub const ALL: [TemplateChoice; 2] = [
        TemplateChoice::TheoryTeaching,
        TemplateChoice::IntegratedTheoryPractice,
    ];

    /// The label shown on the radio button.
    pub fn label(self) -> &'static str {
        match self {
            TemplateChoice::TheoryTeaching => "理论教学",
            TemplateChoice::IntegratedTheoryPractice => "理实一体教学",
        }
    }

    /// The fixed instruction set sent to the model for this template.
    pub fn template_body(self) -> &'static str {
        match self {
            TemplateChoice::TheoryTeaching => THEORY_TEACHING_TEMPLATE,
            TemplateChoice::IntegratedTheoryPractice => INTEGRATED_THEORY_PRACTICE_TEMPLATE,
        }
    }

    fn identifier(self) -> &'static str {
        match self {
            TemplateChoice::TheoryTeaching => "theory_teaching",
            TemplateChoice::IntegratedTheoryPractice => "integrated_theory_practice",
        }
    }
}

impl fmt::Display for TemplateChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown template choice: '{0}'")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateChoice {
    type Err = UnknownTemplate;

    /// Accepts either the display label or the snake_case identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TemplateChoice::ALL
            .into_iter()
            .find(|choice| choice.label() == s || choice.identifier() == s)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

//=========================================================================================
// Request Inputs
//=========================================================================================

/// Metadata supplied alongside the transcript. Fields are free text and may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryInfo {
    pub course_name: String,
    pub class_name: String,
    /// The course date in its textual form, e.g. `2024-05-01`.
    pub course_date: String,
}

/// The raw bytes of the teacher's uploaded transcript.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Everything gathered from the form when the teacher presses the generate button.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub template: TemplateChoice,
    pub info: AuxiliaryInfo,
    pub document: Option<UploadedDocument>,
}

//=========================================================================================
// Derived Values
//=========================================================================================

/// The plain text extracted from a transcript, one paragraph per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureText(String);

impl LectureText {
    /// Joins paragraphs in document order with `\n`. Empty paragraphs are kept.
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, paragraph) in paragraphs.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(paragraph.as_ref());
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LectureText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for LectureText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// The complete prompt sent to the generative model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalPrompt(String);

impl FinalPrompt {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FinalPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the teacher sees after a generation attempt reached the model.
#[derive(Debug)]
pub enum GeneratedPlan {
    Draft(String),
    Failed(GenerationError),
}

impl GeneratedPlan {
    pub fn from_result(result: Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => GeneratedPlan::Draft(text),
            Err(e) => GeneratedPlan::Failed(e),
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, GeneratedPlan::Draft(_))
    }

    /// The displayable text: the draft itself, or the failure downgraded to a message.
    pub fn render(&self) -> String {
        match self {
            GeneratedPlan::Draft(text) => text.clone(),
            GeneratedPlan::Failed(e) => format!("{GENERATION_FAILURE_PREFIX}{e}"),
        }
    }
}
