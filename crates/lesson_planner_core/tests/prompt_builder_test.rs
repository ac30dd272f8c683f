//! Integration tests for prompt construction.

use lesson_planner_core::prompt::{CLOSING_INSTRUCTION, LECTURE_DELIMITER};
use lesson_planner_core::templates::PRACTICE_SUBSECTION_LABELS;
use lesson_planner_core::{build_prompt, AuxiliaryInfo, LectureText, TemplateChoice};

fn sample_info() -> AuxiliaryInfo {
    AuxiliaryInfo {
        course_name: "数据结构".to_string(),
        class_name: "软件2301".to_string(),
        course_date: "2024-05-01".to_string(),
    }
}

/// Asserts that each needle appears after the previous one.
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        let offset = haystack[from..]
            .find(needle)
            .unwrap_or_else(|| panic!("'{needle}' missing or out of order in:\n{haystack}"));
        from += offset + needle.len();
    }
}

#[test]
fn identical_inputs_build_identical_prompts() {
    let info = sample_info();
    let lecture = LectureText::from("本课介绍栈与队列。\n\n栈是后进先出的结构。");

    for template in TemplateChoice::ALL {
        let first = build_prompt(template, &info, &lecture);
        let second = build_prompt(template, &info, &lecture);
        assert_eq!(first.as_str().as_bytes(), second.as_str().as_bytes());
    }
}

#[test]
fn prompt_contains_parts_in_order() {
    let info = sample_info();
    let lecture = LectureText::from("第一段讲稿\n第二段讲稿");

    for template in TemplateChoice::ALL {
        let prompt = build_prompt(template, &info, &lecture);
        assert_in_order(
            prompt.as_str(),
            &[
                template.template_body(),
                "数据结构",
                "软件2301",
                "2024-05-01",
                LECTURE_DELIMITER,
                "第一段讲稿\n第二段讲稿",
                LECTURE_DELIMITER,
                CLOSING_INSTRUCTION,
            ],
        );
    }
}

#[test]
fn integrated_template_requires_practice_subsections() {
    let prompt = build_prompt(
        TemplateChoice::IntegratedTheoryPractice,
        &sample_info(),
        &LectureText::from("本课讲解网线制作。"),
    );
    for label in PRACTICE_SUBSECTION_LABELS {
        assert!(
            prompt.as_str().contains(label),
            "integrated prompt should mention '{label}'"
        );
    }
}

#[test]
fn theory_template_does_not_require_practice_subsections() {
    let prompt = build_prompt(
        TemplateChoice::TheoryTeaching,
        &sample_info(),
        &LectureText::from("本课介绍栈与队列。"),
    );
    for label in PRACTICE_SUBSECTION_LABELS {
        assert!(
            !prompt.as_str().contains(label),
            "theory prompt should not mention '{label}'"
        );
    }
}

#[test]
fn blank_metadata_is_kept_as_blank_lines() {
    let prompt = build_prompt(
        TemplateChoice::TheoryTeaching,
        &AuxiliaryInfo::default(),
        &LectureText::from(""),
    );
    let text = prompt.as_str();
    assert!(text.contains("课程名称: \n"));
    assert!(text.contains("授课班级: \n"));
    assert!(text.contains("授课日期: \n"));
    assert!(text.contains("---\n\n---"));
}

#[test]
fn building_does_not_consume_or_change_inputs() {
    let info = sample_info();
    let lecture = LectureText::from("队列是先进先出的结构。");
    let _ = build_prompt(TemplateChoice::IntegratedTheoryPractice, &info, &lecture);

    assert_eq!(info, sample_info());
    assert_eq!(lecture.as_str(), "队列是先进先出的结构。");
}
