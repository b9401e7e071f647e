//! Tab key handling: spaces to the next tab stop, dedent before the caret,
//! and indenting or dedenting every line of a multi-line selection.

use crate::config::EditorConfig;
use crate::document_model::{Document, TextRange};
use crate::error::Result;
use crossterm::event::KeyModifiers;
use unicode_width::UnicodeWidthChar;

/// Everything the tab decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct TabContext<'a> {
    pub has_selection: bool,
    /// The selected text contains a line break.
    pub multiline: bool,
    /// Shift is held, possibly with other modifiers.
    pub shift_held: bool,
    /// Shift is the only modifier held.
    pub shift_only: bool,
    pub tab_uses_spaces: bool,
    pub tab_width: usize,
    /// Text of the caret's line before the caret.
    pub text_before_caret: &'a str,
}

impl<'a> TabContext<'a> {
    pub fn new(
        has_selection: bool,
        multiline: bool,
        modifiers: KeyModifiers,
        config: &EditorConfig,
        text_before_caret: &'a str,
    ) -> Self {
        Self {
            has_selection,
            multiline,
            shift_held: modifiers.contains(KeyModifiers::SHIFT),
            shift_only: modifiers == KeyModifiers::SHIFT,
            tab_uses_spaces: config.tab_uses_spaces,
            tab_width: config.tab_width.max(1),
            text_before_caret,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDecision {
    /// Replace the selection with this many spaces.
    InsertSpaces(usize),
    /// Delete this many characters before the caret (possibly none).
    RemoveBeforeCaret(usize),
    IndentLines,
    DedentLines,
    /// Left to the host's plain tab insertion.
    NotHandled,
}

/// Display column at the end of `text`.
pub fn display_column(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(1)).sum()
}

/// Spaces needed to reach the next tab stop; a full width when aligned.
pub fn spaces_to_next_stop(column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    match tab_width - column % tab_width {
        0 => tab_width,
        count => count,
    }
}

/// Characters a dedent removes from the end of `before_caret`: one tab, or
/// up to `tab_width` spaces.
pub fn trailing_indent_len(before_caret: &str, tab_width: usize) -> usize {
    match before_caret.chars().last() {
        Some('\t') => 1,
        Some(' ') => before_caret
            .chars()
            .rev()
            .take_while(|&c| c == ' ')
            .take(tab_width)
            .count(),
        _ => 0,
    }
}

/// Characters a dedent removes from the start of `line`.
pub fn leading_indent_len(line: &str, tab_width: usize) -> usize {
    match line.chars().next() {
        Some('\t') => 1,
        Some(' ') => line.chars().take_while(|&c| c == ' ').take(tab_width).count(),
        _ => 0,
    }
}

pub fn decide_tab(context: &TabContext<'_>) -> TabDecision {
    let single_line = !context.has_selection || !context.multiline;
    if single_line && !context.shift_held && context.tab_uses_spaces {
        let column = display_column(context.text_before_caret);
        return TabDecision::InsertSpaces(spaces_to_next_stop(column, context.tab_width));
    }
    if !context.has_selection && context.shift_only {
        return TabDecision::RemoveBeforeCaret(trailing_indent_len(
            context.text_before_caret,
            context.tab_width,
        ));
    }
    if context.has_selection && context.multiline {
        return if context.shift_only {
            TabDecision::DedentLines
        } else {
            TabDecision::IndentLines
        };
    }
    TabDecision::NotHandled
}

/// Applies a tab key press; `false` when the host should insert the tab.
pub fn handle_tab(
    document: &mut Document,
    selection: &mut TextRange,
    modifiers: KeyModifiers,
    config: &EditorConfig,
) -> Result<bool> {
    let selected = document.plain_text(*selection)?;
    let line = document.line_range_at(selection.start)?;
    let before_caret = document.plain_text(TextRange::new(line.start, selection.start))?;
    let context = TabContext::new(
        !selection.is_empty(),
        selected.contains('\n'),
        modifiers,
        config,
        &before_caret,
    );

    match decide_tab(&context) {
        TabDecision::InsertSpaces(count) => {
            let inserted = document.replace(*selection, &" ".repeat(count))?;
            *selection = TextRange::caret(inserted.end);
        }
        TabDecision::RemoveBeforeCaret(count) => {
            if count > 0 {
                let start = selection.start - count;
                document.replace(TextRange::new(start, selection.start), "")?;
                *selection = TextRange::caret(start);
            }
        }
        TabDecision::IndentLines => {
            *selection = shift_lines(document, *selection, config, false)?;
        }
        TabDecision::DedentLines => {
            *selection = shift_lines(document, *selection, config, true)?;
        }
        TabDecision::NotHandled => return Ok(false),
    }
    Ok(true)
}

/// Indents or dedents each line segment of `selection` in place, leaving
/// run styles alone, and returns the selection over the edited text.
///
/// A selection ending at a line start still counts that line: indenting
/// prefixes it, dedenting finds nothing selected on it to remove.
fn shift_lines(
    document: &mut Document,
    selection: TextRange,
    config: &EditorConfig,
    dedent: bool,
) -> Result<TextRange> {
    let unit = config.indent_unit();
    let unit_len = unit.chars().count();
    let segments: Vec<TextRange> = document
        .spans()
        .into_iter()
        .filter(|span| span.start <= selection.end && selection.start <= span.end())
        .map(|span| {
            TextRange::new(
                span.start.max(selection.start),
                span.end().min(selection.end),
            )
        })
        .collect();

    let mut end = selection.end as isize;
    for segment in segments.into_iter().rev() {
        if dedent {
            let text = document.plain_text(segment)?;
            let count = leading_indent_len(&text, config.tab_width.max(1));
            if count > 0 {
                document.replace(TextRange::new(segment.start, segment.start + count), "")?;
                end -= count as isize;
            }
        } else {
            document.replace(TextRange::caret(segment.start), &unit)?;
            end += unit_len as isize;
        }
    }
    Ok(TextRange::new(selection.start, end.max(selection.start as isize) as usize))
}

/// Leading whitespace of the line holding `position`.
pub fn line_indentation(document: &Document, position: usize) -> Result<String> {
    let line = document.line_range_at(position)?;
    Ok(document
        .plain_text(line)?
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect())
}

/// Return key: replaces the selection with a paragraph break and, with
/// auto-indent on, repeats the current line's indentation.
pub fn insert_newline(
    document: &mut Document,
    selection: &mut TextRange,
    config: &EditorConfig,
) -> Result<()> {
    let indentation = if config.auto_indent {
        line_indentation(document, selection.start)?
    } else {
        String::new()
    };
    let inserted = document.replace(*selection, &format!("\n{indentation}"))?;
    *selection = TextRange::caret(inserted.end);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{Paragraph, Run, RunStyle};

    fn spaces_config(width: usize) -> EditorConfig {
        EditorConfig {
            tab_uses_spaces: true,
            tab_width: width,
            ..EditorConfig::default()
        }
    }

    fn context(before: &str) -> TabContext<'_> {
        TabContext {
            has_selection: false,
            multiline: false,
            shift_held: false,
            shift_only: false,
            tab_uses_spaces: true,
            tab_width: 4,
            text_before_caret: before,
        }
    }

    #[test]
    fn test_spaces_reach_next_stop() {
        assert_eq!(decide_tab(&context("ab")), TabDecision::InsertSpaces(2));
        assert_eq!(decide_tab(&context("abcd")), TabDecision::InsertSpaces(4));
        assert_eq!(decide_tab(&context("")), TabDecision::InsertSpaces(4));
    }

    #[test]
    fn test_column_counts_display_cells() {
        assert_eq!(display_column("日本"), 4);
        assert_eq!(display_column("\t"), 1);
        assert_eq!(decide_tab(&context("日")), TabDecision::InsertSpaces(2));
    }

    #[test]
    fn test_tab_without_spaces_is_not_handled() {
        let ctx = TabContext {
            tab_uses_spaces: false,
            ..context("ab")
        };
        assert_eq!(decide_tab(&ctx), TabDecision::NotHandled);
        let single_line_selection = TabContext {
            has_selection: true,
            ..ctx
        };
        assert_eq!(decide_tab(&single_line_selection), TabDecision::NotHandled);
    }

    #[test]
    fn test_shift_with_other_modifiers_is_not_a_dedent() {
        let ctx = TabContext {
            shift_held: true,
            shift_only: false,
            ..context("\t")
        };
        assert_eq!(decide_tab(&ctx), TabDecision::NotHandled);
    }

    #[test]
    fn test_dedent_before_caret_is_lenient() {
        let ctx = TabContext {
            shift_held: true,
            shift_only: true,
            ..context("x  ")
        };
        assert_eq!(decide_tab(&ctx), TabDecision::RemoveBeforeCaret(2));
        assert_eq!(trailing_indent_len("      ", 4), 4);
        assert_eq!(trailing_indent_len("  \t", 4), 1);
        assert_eq!(trailing_indent_len("abc", 4), 0);
    }

    #[test]
    fn test_multiline_selection_decisions() {
        let ctx = TabContext {
            has_selection: true,
            multiline: true,
            ..context("")
        };
        assert_eq!(decide_tab(&ctx), TabDecision::IndentLines);
        let dedent = TabContext {
            shift_held: true,
            shift_only: true,
            ..ctx
        };
        assert_eq!(decide_tab(&dedent), TabDecision::DedentLines);
    }

    #[test]
    fn test_handle_tab_inserts_spaces_on_empty_line() {
        let mut document = Document::from_plain_text("  ");
        let mut selection = TextRange::caret(2);
        let handled =
            handle_tab(&mut document, &mut selection, KeyModifiers::NONE, &spaces_config(4))
                .unwrap();
        assert!(handled);
        assert_eq!(document.text(), "    ");
        assert_eq!(selection, TextRange::caret(4));

        handle_tab(&mut document, &mut selection, KeyModifiers::NONE, &spaces_config(4)).unwrap();
        assert_eq!(document.text(), " ".repeat(8));
    }

    #[test]
    fn test_handle_tab_dedents_before_caret() {
        let mut document = Document::from_plain_text("a\n   x");
        let mut selection = TextRange::caret(5);
        handle_tab(&mut document, &mut selection, KeyModifiers::SHIFT, &spaces_config(4)).unwrap();
        assert_eq!(document.text(), "a\nx");
        assert_eq!(selection, TextRange::caret(2));
    }

    #[test]
    fn test_dedent_with_nothing_to_remove_is_still_handled() {
        let mut document = Document::from_plain_text("abc");
        let mut selection = TextRange::caret(3);
        let handled =
            handle_tab(&mut document, &mut selection, KeyModifiers::SHIFT, &EditorConfig::default())
                .unwrap();
        assert!(handled);
        assert_eq!(document.text(), "abc");
    }

    #[test]
    fn test_indent_lines_keeps_run_styles() {
        let mut document = Document::new();
        document.push_paragraph(Paragraph::from_runs(vec![
            Run::new("bold", RunStyle::bold()),
            Run::plain(" tail"),
        ]));
        document.push_paragraph(Paragraph::with_text("second", RunStyle::default()));
        let mut selection = TextRange::new(0, 16);
        handle_tab(&mut document, &mut selection, KeyModifiers::NONE, &EditorConfig::default())
            .unwrap();
        assert_eq!(document.text(), "\tbold tail\n\tsecond");
        assert_eq!(selection, TextRange::new(0, 18));
        let first = document.paragraph(document.paragraph_ids()[0]).unwrap();
        assert_eq!(first.runs[0].text, "\tbold");
        assert!(first.runs[0].style.is_bold());
        assert_eq!(first.runs[1].text, " tail");
    }

    #[test]
    fn test_dedent_lines_removes_one_unit_each() {
        let mut document = Document::from_plain_text("\t\ta\n      b\n  c\nd");
        let mut selection = TextRange::new(0, document.len());
        handle_tab(&mut document, &mut selection, KeyModifiers::SHIFT, &spaces_config(4)).unwrap();
        assert_eq!(document.text(), "\ta\n  b\nc\nd");
        assert_eq!(selection, TextRange::new(0, document.len()));
    }

    #[test]
    fn test_indent_includes_line_after_trailing_break() {
        let mut document = Document::from_plain_text("a\nb\nc");
        let mut selection = TextRange::new(0, 4);
        handle_tab(&mut document, &mut selection, KeyModifiers::NONE, &spaces_config(2)).unwrap();
        assert_eq!(document.text(), "  a\n  b\n  c");
        assert_eq!(selection, TextRange::new(0, 10));

        let mut selection = TextRange::new(0, 8);
        handle_tab(&mut document, &mut selection, KeyModifiers::SHIFT, &spaces_config(2)).unwrap();
        assert_eq!(document.text(), "a\nb\n  c");
        assert_eq!(selection, TextRange::new(0, 4));
    }

    #[test]
    fn test_newline_repeats_indentation() {
        let mut document = Document::from_plain_text("\t  item");
        let mut selection = TextRange::caret(7);
        insert_newline(&mut document, &mut selection, &EditorConfig::default()).unwrap();
        assert_eq!(document.text(), "\t  item\n\t  ");
        assert_eq!(selection, TextRange::caret(11));

        let config = EditorConfig {
            auto_indent: false,
            ..EditorConfig::default()
        };
        insert_newline(&mut document, &mut selection, &config).unwrap();
        assert_eq!(document.text(), "\t  item\n\t  \n");
    }
}
