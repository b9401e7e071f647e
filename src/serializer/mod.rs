//! Serializer subsystem - note content to and from its persisted string
//!
//! Structured notes are stored as a small RTF dialect recognised by its
//! `{\rtf` signature. Anything else is legacy plain text and is imported one
//! unstyled paragraph per line.

pub mod reader;
pub mod writer;

use crate::document_model::Document;
use crate::error::Result;
use log::warn;

/// Prefix marking structured content.
pub const SIGNATURE: &str = "{\\rtf";

/// Longest preview shown for a note in a list of notes.
pub const MAX_PREVIEW_CHARS: usize = 100;

pub fn is_structured(content: &str) -> bool {
    content.trim_start().starts_with(SIGNATURE)
}

pub fn serialize(document: &Document) -> String {
    writer::write(document)
}

/// Parses `content`, reporting malformed structured content.
pub fn try_deserialize(content: &str) -> Result<Document> {
    if is_structured(content) {
        reader::read(content)
    } else {
        Ok(Document::from_plain_text(content))
    }
}

/// Parses `content`, importing it verbatim as plain text when it cannot be
/// parsed so no user text is ever dropped.
pub fn deserialize(content: &str) -> Document {
    match try_deserialize(content) {
        Ok(document) => document,
        Err(err) => {
            warn!("Falling back to plain text import: {err}");
            Document::from_raw_text(content)
        }
    }
}

/// Removes the one line terminator the always-present final paragraph adds.
pub fn strip_artifact_terminator(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Plain text of persisted content for display purposes.
pub fn plain_text_preview(content: &str) -> String {
    if !is_structured(content) {
        return content.to_string();
    }
    match reader::read(content) {
        Ok(document) => strip_artifact_terminator(&document.full_text()).to_string(),
        Err(err) => {
            warn!("Showing raw content in preview: {err}");
            content.to_string()
        }
    }
}

/// One-line summary of a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotePreview {
    pub text: String,
    pub truncated: bool,
}

impl NotePreview {
    pub fn from_content(content: &str) -> Self {
        let full = plain_text_preview(content);
        let trimmed = full.trim();
        let truncated = trimmed.chars().count() > MAX_PREVIEW_CHARS;
        Self {
            text: trimmed.chars().take(MAX_PREVIEW_CHARS).collect(),
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{
        Color, FontStyle, MarkerStyle, Paragraph, Run, RunStyle, TextAlignment, TextRange,
    };

    fn styled_document() -> Document {
        let mut document = Document::new();
        let mut heading = Paragraph::from_runs(vec![
            Run::new("Title", RunStyle::bold()),
            Run::new(
                " {braces} \\ é",
                RunStyle {
                    font_family: Some("Segoe UI".to_string()),
                    font_size: Some(14.5),
                    style: FontStyle::Italic,
                    underline: true,
                    foreground: Some(Color::rgb(10, 20, 30)),
                    ..RunStyle::default()
                },
            ),
        ]);
        heading.alignment = TextAlignment::Right;
        heading.margin = 40.0;
        document.push_paragraph(heading);
        let list = document.push_list(
            MarkerStyle::LowerLatin,
            vec![
                Paragraph::with_text("first\tpoint", RunStyle::default()),
                Paragraph::new(),
            ],
        ).unwrap();
        document.set_list_indent(list, 20.0, 20.0);
        document.push_paragraph(Paragraph::with_text("", RunStyle::default()));
        document
    }

    fn runs_of(document: &Document) -> Vec<Vec<Run>> {
        document
            .paragraph_ids()
            .into_iter()
            .filter_map(|id| document.paragraph(id).map(|p| p.runs.clone()))
            .collect()
    }

    #[test]
    fn test_round_trip_keeps_text_and_styles() {
        let document = styled_document();
        let restored = deserialize(&serialize(&document));
        assert_eq!(restored.full_text(), document.full_text());
        assert_eq!(runs_of(&restored), runs_of(&document));

        let heading = restored.paragraph(restored.paragraph_ids()[0]).unwrap();
        assert_eq!(heading.alignment, TextAlignment::Right);
        assert_eq!(heading.margin, 40.0);
        let list = restored.list(restored.root_blocks()[1]).unwrap();
        assert_eq!(list.marker_style, MarkerStyle::LowerLatin);
        assert_eq!(list.marker_offset, 20.0);
        assert_eq!(list.padding, 20.0);
        assert_eq!(list.items().len(), 2);
    }

    #[test]
    fn test_round_trip_keeps_font_names_verbatim() {
        let mut document = Document::new();
        document.push_paragraph(Paragraph::from_runs(vec![
            Run::new(
                "a",
                RunStyle {
                    font_family: Some("A;B".to_string()),
                    ..RunStyle::default()
                },
            ),
            Run::new(
                "b",
                RunStyle {
                    font_family: Some(" Spaced\tName ".to_string()),
                    ..RunStyle::default()
                },
            ),
        ]));
        let restored = deserialize(&serialize(&document));
        assert_eq!(runs_of(&restored), runs_of(&document));
    }

    #[test]
    fn test_round_trip_after_off_grid_edits() {
        let mut document = Document::from_plain_text("sized\nnext");
        crate::formatting::apply_font_size(&mut document, TextRange::new(0, 5), 14.25).unwrap();
        let ids = document.paragraph_ids();
        document.set_paragraph_margin(ids[1], 33.33);
        let list = document
            .push_list(MarkerStyle::Disc, vec![Paragraph::with_text("x", RunStyle::default())])
            .unwrap();
        document.set_list_indent(list, 7.77, 12.34);

        let restored = deserialize(&serialize(&document));
        assert_eq!(runs_of(&restored), runs_of(&document));
        assert_eq!(runs_of(&restored)[0][0].style.font_size, Some(14.5));
        let margin = |d: &Document| d.paragraph(d.paragraph_ids()[1]).unwrap().margin;
        assert_eq!(margin(&restored), margin(&document));
        let original = document.list(list).unwrap();
        let reread = restored.list(restored.root_blocks()[2]).unwrap();
        assert_eq!(reread.marker_offset, original.marker_offset);
        assert_eq!(reread.padding, original.padding);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let once = serialize(&styled_document());
        let twice = serialize(&deserialize(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_corrupt_content_is_preserved() {
        let raw = "{\\rtf1\\ansi\\pard {\\plain\\b unfinished";
        assert!(try_deserialize(raw).is_err());
        let document = deserialize(raw);
        assert_eq!(document.text(), raw);

        let crlf = "{\\rtf1\\ansi\r\n\\pard one\\par\r\n{\\plain\\b two";
        assert!(try_deserialize(crlf).is_err());
        let document = deserialize(crlf);
        assert_eq!(document.text(), crlf);
        let reloaded = deserialize(&serialize(&document));
        assert_eq!(reloaded.text(), crlf);
    }

    #[test]
    fn test_plain_legacy_content() {
        let document = deserialize("old note\r\nsecond line");
        assert_eq!(document.text(), "old note\nsecond line");
        assert_eq!(plain_text_preview("old note"), "old note");
    }

    #[test]
    fn test_preview_strips_one_terminator() {
        let document = Document::from_plain_text("keep\n");
        let content = serialize(&document);
        assert_eq!(plain_text_preview(&content), "keep\n");
        assert_eq!(strip_artifact_terminator("a\r\n"), "a");
        assert_eq!(strip_artifact_terminator("a\n\n"), "a\n");
    }

    #[test]
    fn test_note_preview_trims_and_truncates() {
        let long = format!("  {}  ", "x".repeat(150));
        let preview = NotePreview::from_content(&long);
        assert_eq!(preview.text.chars().count(), MAX_PREVIEW_CHARS);
        assert!(preview.truncated);
        let short = NotePreview::from_content(&serialize(&Document::from_plain_text(" hi ")));
        assert_eq!(short.text, "hi");
        assert!(!short.truncated);
    }
}
