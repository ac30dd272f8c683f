//! crates/lesson_planner_core/src/templates.rs
//!
//! The fixed instruction sets sent ahead of every transcript. Each
//! `TemplateChoice` maps to exactly one of these constants.

/// Instructions for a theory-only lesson (理论教学).
pub const THEORY_TEACHING_TEMPLATE: &str = r#"请严格按照【理论教学模板】的结构，为以下课程讲稿生成一份详细的教案。
规则：
1. 教学目标需包含素质、知识、能力三个维度。
2. 教学重难点的“解决措施”部分请简略描述方法即可。
3. 对于模板中要求，但讲稿未明确提及的环节（如复习旧课、课堂小结、教学反思），请你创造性地设计和生成。
4. 语言风格需专业、严谨，符合高职教学规范。"#;

/// Instructions for an integrated theory-and-practice lesson (理实一体教学).
pub const INTEGRATED_THEORY_PRACTICE_TEMPLATE: &str = r#"请严格按照【理实一体教学模板】的结构，为以下课程讲稿生成一份详细的教案。
规则：
1. 教学目标需包含素质、知识、能力三个维度。
2. 教学重难点的“解决措施”部分请简略描述方法即可。
3. 对于模板中要求，但讲稿未明确提及的环节（如组织教学、课堂小结、教学反思），请你创造性地设计和生成。
4. “新课教学”部分必须包含“知识储备”、“实操任务布置”、“实操”三个子环节。"#;

/// Labels of the subsections the integrated template makes mandatory.
pub const PRACTICE_SUBSECTION_LABELS: [&str; 3] = ["知识储备", "实操任务布置", "实操"];
