use crate::document_model::{
    Block, BlockId, Color, Document, List, Paragraph, Run, TextAlignment, TWIPS_PER_UNIT,
};
use std::fmt::Write as _;

/// Fonts and colors referenced by the runs, in first-use order.
#[derive(Default)]
struct Tables {
    fonts: Vec<String>,
    colors: Vec<Color>,
}

impl Tables {
    fn collect(document: &Document) -> Self {
        let mut tables = Self::default();
        for id in document.paragraph_ids() {
            let Some(paragraph) = document.paragraph(id) else {
                continue;
            };
            for run in &paragraph.runs {
                if let Some(family) = &run.style.font_family {
                    if !tables.fonts.contains(family) {
                        tables.fonts.push(family.clone());
                    }
                }
                if let Some(color) = run.style.foreground {
                    if !tables.colors.contains(&color) {
                        tables.colors.push(color);
                    }
                }
            }
        }
        tables
    }

    fn font_index(&self, family: &str) -> usize {
        self.fonts.iter().position(|f| f == family).unwrap_or(0)
    }

    /// Color table indices are 1-based; entry 0 is the automatic color.
    fn color_index(&self, color: Color) -> usize {
        self.colors.iter().position(|&c| c == color).map_or(0, |i| i + 1)
    }
}

pub fn write(document: &Document) -> String {
    let tables = Tables::collect(document);
    let mut out = String::from("{\\rtf1\\ansi\\deff0\\uc1");

    out.push_str("{\\fonttbl");
    for (index, family) in tables.fonts.iter().enumerate() {
        let _ = write!(out, "{{\\f{index}\\fnil {};}}", escape_font_name(family));
    }
    out.push('}');

    out.push_str("{\\colortbl;");
    for color in &tables.colors {
        let _ = write!(out, "\\red{}\\green{}\\blue{};", color.r, color.g, color.b);
    }
    out.push_str("}\n");

    for &id in document.root_blocks() {
        write_block(document, id, &tables, &mut out);
    }
    out.push('}');
    out
}

fn write_block(document: &Document, id: BlockId, tables: &Tables, out: &mut String) {
    match document.block(id) {
        Some(Block::Paragraph(paragraph)) => write_paragraph(paragraph, tables, out),
        Some(Block::List(list)) => write_list(document, list, tables, out),
        None => {}
    }
}

fn write_paragraph(paragraph: &Paragraph, tables: &Tables, out: &mut String) {
    out.push_str("\\pard");
    out.push_str(match paragraph.alignment {
        TextAlignment::Left => "\\ql",
        TextAlignment::Center => "\\qc",
        TextAlignment::Right => "\\qr",
        TextAlignment::Justify => "\\qj",
    });
    if paragraph.margin > 0.0 {
        let _ = write!(out, "\\li{}", to_twips(paragraph.margin));
    }
    for run in &paragraph.runs {
        write_run(run, tables, out);
    }
    out.push_str("\\par\n");
}

fn write_run(run: &Run, tables: &Tables, out: &mut String) {
    let style = &run.style;
    out.push_str("{\\plain");
    if let Some(family) = &style.font_family {
        let _ = write!(out, "\\f{}", tables.font_index(family));
    }
    if let Some(size) = style.font_size {
        let _ = write!(out, "\\fs{}", (size * 2.0).round() as i64);
    }
    if style.is_bold() {
        out.push_str("\\b");
    }
    if style.is_italic() {
        out.push_str("\\i");
    }
    if style.underline {
        out.push_str("\\ul");
    }
    if let Some(color) = style.foreground {
        let _ = write!(out, "\\cf{}", tables.color_index(color));
    }
    out.push(' ');
    out.push_str(&escape(&run.text));
    out.push('}');
}

fn write_list(document: &Document, list: &List, tables: &Tables, out: &mut String) {
    let _ = writeln!(
        out,
        "{{\\rnlist\\rnmarker{}\\rnoffset{}\\rnpad{}",
        list.marker_style.code(),
        to_twips(list.marker_offset),
        to_twips(list.padding)
    );
    for &item in list.items() {
        let Some(item) = document.list_item(item) else {
            continue;
        };
        out.push_str("{\\rnitem\n");
        for &child in item.blocks() {
            write_block(document, child, tables, out);
        }
        out.push_str("}\n");
    }
    out.push_str("}\n");
}

fn to_twips(value: f64) -> i64 {
    (value * TWIPS_PER_UNIT).round() as i64
}

/// Font table entries end at `;`, so it and the characters the body form
/// spells as control words are written as hex bytes.
fn escape_font_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        match ch {
            ';' | '\t' | '\n' => {
                let _ = write!(out, "\\'{:02x}", ch as u32);
            }
            _ => out.push_str(&escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    out
}

/// Escapes text for an RTF body; output is pure ASCII.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\t' => out.push_str("\\tab "),
            '\n' => out.push_str("\\line "),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }
    out
}
