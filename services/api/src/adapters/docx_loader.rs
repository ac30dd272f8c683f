//! services/api/src/adapters/docx_loader.rs
//!
//! This module contains the adapter that reads `.docx` transcripts.
//! It implements the `DocumentLoader` port from the `core` crate.

use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use lesson_planner_core::{
    domain::LectureText,
    ports::{DocumentError, DocumentLoader},
};

/// Reads the top-level body paragraphs of a word-processing document.
#[derive(Clone, Debug, Default)]
pub struct DocxLoader;

impl DocxLoader {
    pub fn new() -> Self {
        Self
    }

    /// Paragraph texts of the document body, in order. Tables are skipped.
    pub fn paragraphs(&self, payload: &[u8]) -> Result<Vec<String>, DocumentError> {
        let docx =
            docx_rs::read_docx(payload).map_err(|e| DocumentError::Parse(e.to_string()))?;

        Ok(docx
            .document
            .children
            .iter()
            .filter_map(|child| match child {
                DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
                _ => None,
            })
            .collect())
    }
}

impl DocumentLoader for DocxLoader {
    fn load_lecture_text(&self, payload: &[u8]) -> Result<LectureText, DocumentError> {
        let paragraphs = self.paragraphs(payload)?;
        tracing::debug!(paragraphs = paragraphs.len(), "Parsed transcript document");
        Ok(LectureText::from_paragraphs(paragraphs))
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut line = String::new();
    for child in &para.children {
        push_paragraph_child(child, &mut line);
    }
    line
}

fn push_paragraph_child(child: &ParagraphChild, out: &mut String) {
    match child {
        ParagraphChild::Run(run) => push_run_text(run, out),
        ParagraphChild::Hyperlink(link) => {
            for inner in &link.children {
                push_paragraph_child(inner, out);
            }
        }
        ParagraphChild::Insert(insert) => {
            for inner in &insert.children {
                if let InsertChild::Run(run) = inner {
                    push_run_text(run, out);
                }
            }
        }
        // Deleted revisions and field markers carry no visible text.
        _ => {}
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}
