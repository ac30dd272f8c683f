//! crates/lesson_planner_core/src/prompt.rs
//!
//! Builds the final prompt from a template choice, the auxiliary metadata and
//! the lecture text. User-supplied fields are inserted verbatim.

use crate::domain::{AuxiliaryInfo, FinalPrompt, LectureText, TemplateChoice};

/// Marks both ends of the lecture text inside the prompt.
pub const LECTURE_DELIMITER: &str = "---";

/// The last line of every prompt.
pub const CLOSING_INSTRUCTION: &str = "# 现在，请生成教案:";

/// Assembles the prompt for one generation request.
pub fn build_prompt(
    template: TemplateChoice,
    info: &AuxiliaryInfo,
    lecture: &LectureText,
) -> FinalPrompt {
    let prompt = format!(
        "{template_body}\n\n\
         # 辅助信息:\n\
         课程名称: {course_name}\n\
         授课班级: {class_name}\n\
         授课日期: {course_date}\n\n\
         # 课程讲稿内容:\n\
         {LECTURE_DELIMITER}\n\
         {lecture}\n\
         {LECTURE_DELIMITER}\n\n\
         {CLOSING_INSTRUCTION}\n",
        template_body = template.template_body(),
        course_name = info.course_name,
        class_name = info.class_name,
        course_date = info.course_date,
        lecture = lecture.as_str(),
    );

    FinalPrompt::new(prompt)
}
