//! Character, paragraph and list formatting over a selection.
//!
//! Every operation validates its range before touching the document, so a
//! call either applies completely or fails with `InvalidRange` and leaves the
//! document as it was. Ranges with no addressable paragraph are no-ops.

use crate::document_model::{
    Block, BlockId, Color, Container, Document, FontStyle, FontWeight, ItemId, ListItem,
    MarkerStyle, RunStyle, TextAlignment, TextRange, snap_font_size,
};
use crate::error::Result;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}'\u{2019}]+").expect("word pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseTransform {
    Lower,
    Upper,
    Title,
}

impl CaseTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            CaseTransform::Lower => text.to_lowercase(),
            CaseTransform::Upper => text.to_uppercase(),
            CaseTransform::Title => title_case(text),
        }
    }
}

/// Lowercases `text`, then capitalises the first letter of each word.
pub fn title_case(text: &str) -> String {
    let lower = text.to_lowercase();
    WORD.replace_all(&lower, |caps: &Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Applies `update` to the style of every character in `range`.
fn restyle(
    document: &mut Document,
    range: TextRange,
    mut update: impl FnMut(&mut RunStyle),
) -> Result<()> {
    document.check_range(range)?;
    if range.is_empty() {
        return Ok(());
    }
    for span in document.spans() {
        let start = range.start.max(span.start);
        let end = range.end.min(span.end());
        if start >= end {
            continue;
        }
        if let Some(paragraph) = document.paragraph_mut(span.id) {
            paragraph.restyle(start - span.start, end - span.start, &mut update);
        }
    }
    Ok(())
}

pub fn apply_font_family(document: &mut Document, range: TextRange, family: &str) -> Result<()> {
    restyle(document, range, |style| style.font_family = Some(family.to_string()))
}

/// Sets the font size, rounded to the half point grid.
pub fn apply_font_size(document: &mut Document, range: TextRange, size: f64) -> Result<()> {
    if !(size.is_finite() && size > 0.0) {
        return document.check_range(range);
    }
    let size = snap_font_size(size);
    restyle(document, range, |style| style.font_size = Some(size))
}

pub fn apply_foreground(document: &mut Document, range: TextRange, color: Color) -> Result<()> {
    restyle(document, range, |style| style.foreground = Some(color))
}

pub fn toggle_bold(document: &mut Document, range: TextRange) -> Result<()> {
    document.check_range(range)?;
    let weight = if document.style_at(range.start).is_bold() {
        FontWeight::Normal
    } else {
        FontWeight::Bold
    };
    restyle(document, range, |style| style.weight = weight)
}

pub fn toggle_italic(document: &mut Document, range: TextRange) -> Result<()> {
    document.check_range(range)?;
    let font_style = if document.style_at(range.start).is_italic() {
        FontStyle::Normal
    } else {
        FontStyle::Italic
    };
    restyle(document, range, |style| style.style = font_style)
}

pub fn toggle_underline(document: &mut Document, range: TextRange) -> Result<()> {
    document.check_range(range)?;
    let underline = !document.style_at(range.start).underline;
    restyle(document, range, |style| style.underline = underline)
}

pub fn clear_formatting(document: &mut Document, range: TextRange) -> Result<()> {
    restyle(document, range, |style| *style = RunStyle::default())
}

/// Paragraphs whose span touches `range`, both ends inclusive.
fn paragraphs_touching(document: &Document, range: TextRange) -> Vec<BlockId> {
    document
        .spans()
        .into_iter()
        .filter(|span| span.start <= range.end && range.start <= span.end())
        .map(|span| span.id)
        .collect()
}

pub fn apply_alignment(
    document: &mut Document,
    range: TextRange,
    alignment: TextAlignment,
) -> Result<()> {
    document.check_range(range)?;
    for id in paragraphs_touching(document, range) {
        document.set_paragraph_alignment(id, alignment);
    }
    Ok(())
}

fn enclosing_item(document: &Document, id: BlockId) -> Option<ItemId> {
    match document.parent_of(id)? {
        Container::Item(item) => Some(item),
        Container::Root => None,
    }
}

/// Items from `start` to `end` following next-item links; stops at the end
/// of `start`'s list when `end` is not reached.
fn item_chain(document: &Document, start: ItemId, end: Option<ItemId>) -> Vec<ItemId> {
    let mut chain = Vec::new();
    let mut current = Some(start);
    while let Some(item) = current {
        chain.push(item);
        if Some(item) == end {
            break;
        }
        current = document.next_list_item(item);
    }
    chain
}

/// Wraps the selected paragraphs in a list, changes the marker of the lists
/// they are already in, or with `MarkerStyle::None` unwraps them.
pub fn apply_list(document: &mut Document, range: TextRange, marker: MarkerStyle) -> Result<()> {
    document.check_range(range)?;
    let Some((start_paragraph, _)) = document.paragraph_at(range.start)? else {
        return Ok(());
    };
    let end_paragraph = document.paragraph_at(range.end)?.map(|(id, _)| id);
    let start_item = enclosing_item(document, start_paragraph);
    let end_item = end_paragraph.and_then(|id| enclosing_item(document, id));

    if marker == MarkerStyle::None {
        if let Some(start_item) = start_item {
            let items = item_chain(document, start_item, end_item);
            document.unwrap_list_items(&items);
        }
        return Ok(());
    }

    if let Some(start_item) = start_item {
        let mut lists: Vec<BlockId> = Vec::new();
        for item in item_chain(document, start_item, end_item) {
            if let Some(list) = document.list_item(item).map(ListItem::list) {
                if !lists.contains(&list) {
                    lists.push(list);
                }
            }
        }
        for list in lists {
            document.set_list_marker_style(list, marker);
        }
        return Ok(());
    }

    let mut paragraphs = Vec::new();
    let mut current = Some(start_paragraph);
    while let Some(id) = current {
        if document.paragraph(id).is_some() {
            paragraphs.push(id);
        }
        if Some(id) == end_paragraph {
            break;
        }
        current = document.next_block(id);
    }
    document.wrap_paragraphs_in_list(&paragraphs, marker);
    Ok(())
}

/// Snaps indented paragraphs to multiples of `spacing` and gives every list
/// that marker offset and padding. Nested content is visited too.
pub fn apply_tab_spacing(document: &mut Document, spacing: f64) {
    if !(spacing.is_finite() && spacing > 0.0) {
        return;
    }
    let roots = document.root_blocks().to_vec();
    for id in roots {
        resnap_block(document, id, spacing);
    }
}

fn resnap_block(document: &mut Document, id: BlockId, spacing: f64) {
    let children: Vec<BlockId> = match document.block(id) {
        Some(Block::Paragraph(paragraph)) => {
            let margin = paragraph.margin;
            if margin > 0.0 {
                let mut snapped = (margin / spacing).round() * spacing;
                if snapped < spacing {
                    snapped = 0.0;
                }
                document.set_paragraph_margin(id, snapped);
            }
            return;
        }
        Some(Block::List(list)) => list
            .items()
            .iter()
            .filter_map(|&item| document.list_item(item))
            .flat_map(|item| item.blocks().iter().copied())
            .collect(),
        None => return,
    };
    document.set_list_indent(id, spacing, spacing);
    for child in children {
        resnap_block(document, child, spacing);
    }
}

/// Changes letter case. A selection is rewritten as one edit and the new
/// selection is returned; without one every run of the document is
/// rewritten in place so run styles stay where they were.
pub fn apply_case_transform(
    document: &mut Document,
    range: TextRange,
    kind: CaseTransform,
) -> Result<TextRange> {
    document.check_range(range)?;
    if !range.is_empty() {
        let text = document.plain_text(range)?;
        if text.is_empty() {
            return Ok(range);
        }
        return document.replace(range, &kind.apply(&text));
    }

    for id in document.paragraph_ids() {
        if let Some(paragraph) = document.paragraph_mut(id) {
            paragraph.map_run_text(|text| kind.apply(text));
        }
    }
    Ok(range)
}
