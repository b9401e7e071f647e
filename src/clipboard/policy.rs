use super::ClipboardProvider;
use crate::config::{CopyAction, CopyFallbackAction, CopyPolicy, EditorConfig, PasteAction};
use crate::document_model::{Document, TextRange};
use crate::error::Result;
use log::debug;

/// Text a copy would place on the clipboard and the span a cut removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCopy {
    pub text: String,
    pub span: TextRange,
}

enum Source {
    Selection,
    Line,
    Note,
}

/// Works out what a copy or cut takes. `None` means the operation does
/// nothing: the resolved action is `None` or the text came out empty.
pub fn resolve_copy(
    document: &Document,
    selection: TextRange,
    policy: CopyPolicy,
) -> Result<Option<ResolvedCopy>> {
    document.check_range(selection)?;

    let (source, trim) = if selection.is_empty() {
        let source = match policy.fallback {
            CopyFallbackAction::None => return Ok(None),
            CopyFallbackAction::CopyLine => Source::Line,
            CopyFallbackAction::CopyNote => Source::Note,
        };
        (source, policy.fallback_trim)
    } else {
        let source = match policy.action {
            CopyAction::None => return Ok(None),
            CopyAction::CopySelected => Source::Selection,
            CopyAction::CopyLine => Source::Line,
            CopyAction::CopyAll => Source::Note,
        };
        (source, policy.trim)
    };

    let (text, span) = match source {
        Source::Selection => (document.plain_text(selection)?, selection),
        Source::Line => {
            let line = document.line_range_at(selection.start)?;
            let span = if line.end < document.len() {
                TextRange::new(line.start, line.end + 1)
            } else {
                line
            };
            (document.plain_text(line)?, span)
        }
        Source::Note => (document.text(), TextRange::new(0, document.len())),
    };

    let text = if trim { text.trim().to_string() } else { text };
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(ResolvedCopy { text, span }))
}

/// Copies per the configured policy; `true` when the clipboard took text.
pub fn copy(
    document: &Document,
    selection: TextRange,
    config: &EditorConfig,
    modifier_active: bool,
    clipboard: &mut dyn ClipboardProvider,
) -> Result<bool> {
    let Some(resolved) = resolve_copy(document, selection, config.copy_policy(modifier_active))?
    else {
        return Ok(false);
    };
    let accepted = clipboard.set_text(&resolved.text);
    if !accepted {
        debug!("Copy skipped: clipboard unavailable");
    }
    Ok(accepted)
}

/// Like [`copy`], then removes the resolved span. Nothing is removed when
/// the clipboard refused the text.
pub fn cut(
    document: &mut Document,
    selection: &mut TextRange,
    config: &EditorConfig,
    modifier_active: bool,
    clipboard: &mut dyn ClipboardProvider,
) -> Result<bool> {
    let Some(resolved) = resolve_copy(document, *selection, config.copy_policy(modifier_active))?
    else {
        return Ok(false);
    };
    if !clipboard.set_text(&resolved.text) {
        debug!("Cut skipped: clipboard unavailable");
        return Ok(false);
    }
    document.replace(resolved.span, "")?;
    *selection = TextRange::caret(resolved.span.start);
    Ok(true)
}

/// Swaps leading tabs for `tab_width` spaces, or whole groups of
/// `tab_width` leading spaces for tabs.
pub fn convert_indentation(text: &str, to_spaces: bool, tab_width: usize) -> String {
    let spaces = " ".repeat(tab_width.max(1));
    text.split('\n')
        .map(|line| {
            let body = line.trim_start_matches([' ', '\t']);
            let (indent, rest) = line.split_at(line.len() - body.len());
            let indent = if to_spaces {
                indent.replace('\t', &spaces)
            } else {
                indent.replace(&spaces, "\t")
            };
            indent + rest
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pastes per the configured policy and leaves the caret after the pasted
/// text; `true` when the document changed.
pub fn paste(
    document: &mut Document,
    selection: &mut TextRange,
    config: &EditorConfig,
    modifier_active: bool,
    clipboard: &mut dyn ClipboardProvider,
) -> Result<bool> {
    document.check_range(*selection)?;
    let policy = config.paste_policy(modifier_active);
    if policy.action == PasteAction::None || !clipboard.has_text() {
        return Ok(false);
    }
    let Some(mut text) = clipboard.get_text() else {
        debug!("Paste skipped: clipboard unavailable");
        return Ok(false);
    };
    if policy.trim {
        text = text.trim().to_string();
    }
    if text.is_empty() {
        return Ok(false);
    }
    if config.convert_indentation_on_paste {
        text = convert_indentation(&text, config.tab_uses_spaces, config.tab_width);
    }

    let target = match policy.action {
        PasteAction::None => return Ok(false),
        PasteAction::Paste => *selection,
        PasteAction::PasteAndReplaceAll => TextRange::new(0, document.len()),
        PasteAction::PasteAtEnd => TextRange::caret(document.len()),
    };
    let inserted = document.replace(target, &text)?;
    *selection = TextRange::caret(inserted.end);
    Ok(true)
}
