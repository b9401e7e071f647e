use crate::document_model::{
    Block, BlockId, Color, Container, Document, FontStyle, FontWeight, ItemId, List,
    MarkerStyle, Paragraph, Run, RunStyle, TextAlignment, TWIPS_PER_UNIT,
};
use crate::error::{EditorError, Result};

/// Destinations whose content never reaches the document body.
const IGNORED_DESTINATIONS: &[&str] = &[
    "stylesheet",
    "info",
    "listtable",
    "listoverridetable",
    "listtext",
    "pntext",
    "pict",
    "header",
    "footer",
    "filetbl",
    "rsidtbl",
    "xmlnstbl",
    "generator",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
];

/// Windows-1252 characters for bytes 0x80..=0x9F; the rest maps like Latin-1.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{81}', '\u{201A}', '\u{192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{2C6}', '\u{2030}', '\u{160}', '\u{2039}', '\u{152}', '\u{8D}', '\u{17D}', '\u{8F}',
    '\u{90}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{2DC}', '\u{2122}', '\u{161}', '\u{203A}', '\u{153}', '\u{9D}', '\u{17E}', '\u{178}',
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    GroupStart,
    GroupEnd,
    Word { name: String, param: Option<i32> },
    Symbol(char),
    Byte(u8),
    Text(char),
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn failure(&self, reason: impl Into<String>) -> EditorError {
        EditorError::ParseFailure {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(ch) = self.bump() else {
            return Ok(None);
        };
        let token = match ch {
            '{' => Token::GroupStart,
            '}' => Token::GroupEnd,
            '\\' => self.control()?,
            _ => Token::Text(ch),
        };
        Ok(Some(token))
    }

    fn control(&mut self) -> Result<Token> {
        let Some(first) = self.bump() else {
            return Err(self.failure("dangling backslash"));
        };
        if !first.is_ascii_alphabetic() {
            if first == '\'' {
                return self.hex_byte();
            }
            return Ok(Token::Symbol(first));
        }

        let mut name = String::from(first);
        while let Some(ch) = self.peek().filter(char::is_ascii_alphabetic) {
            name.push(ch);
            self.bump();
        }

        let mut digits = String::new();
        if self.peek() == Some('-') {
            digits.push('-');
            self.bump();
        }
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.bump();
        }
        let param = match digits.as_str() {
            "" => None,
            "-" => return Err(self.failure(format!("missing parameter for \\{name}"))),
            _ => Some(
                digits
                    .parse::<i64>()
                    .map_err(|_| self.failure(format!("bad parameter for \\{name}")))?
                    .clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            ),
        };
        if self.peek() == Some(' ') {
            self.bump();
        }
        Ok(Token::Word { name, param })
    }

    fn hex_byte(&mut self) -> Result<Token> {
        let mut value = 0u8;
        for _ in 0..2 {
            let digit = self
                .bump()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| self.failure("bad hex escape"))?;
            value = value * 16 + digit as u8;
        }
        Ok(Token::Byte(value))
    }
}

fn decode_byte(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_HIGH[(byte - 0x80) as usize],
        _ => char::from(byte),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Destination {
    Body,
    FontTable,
    ColorTable,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Structure {
    List(BlockId),
    Item(ItemId),
}

#[derive(Debug, Clone, Default)]
struct CharState {
    font: Option<usize>,
    font_size: Option<f64>,
    bold: bool,
    italic: bool,
    underline: bool,
    color: Option<usize>,
}

#[derive(Debug, Clone)]
struct Frame {
    chars: CharState,
    unicode_skip: usize,
    destination: Destination,
    structure: Option<Structure>,
    /// Set by `\*`; the next control word names an optional destination.
    starred: bool,
    /// No token seen yet in this group.
    fresh: bool,
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    document: Document,
    stack: Vec<Frame>,
    fonts: Vec<(usize, String)>,
    font_entry: Option<usize>,
    font_name: String,
    colors: Vec<Option<Color>>,
    color_entry: (Option<u8>, Option<u8>, Option<u8>),
    alignment: TextAlignment,
    margin: f64,
    runs: Vec<Run>,
    pending_skip: usize,
    high_surrogate: Option<u16>,
    saw_header: bool,
    finished: bool,
}

/// Parses a structured note into a document.
pub fn read(input: &str) -> Result<Document> {
    Parser::new(input).run()
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            document: Document::new(),
            stack: Vec::new(),
            fonts: Vec::new(),
            font_entry: None,
            font_name: String::new(),
            colors: Vec::new(),
            color_entry: (None, None, None),
            alignment: TextAlignment::Left,
            margin: 0.0,
            runs: Vec::new(),
            pending_skip: 0,
            high_surrogate: None,
            saw_header: false,
            finished: false,
        }
    }

    fn run(mut self) -> Result<Document> {
        while let Some(token) = self.lexer.next_token()? {
            if self.finished {
                match token {
                    Token::Text(ch) if ch.is_whitespace() => continue,
                    Token::Text('\0') => continue,
                    _ => return Err(self.lexer.failure("content after closing brace")),
                }
            }
            self.handle(token)?;
        }
        if !self.finished {
            return Err(self.lexer.failure("unexpected end of input"));
        }
        self.document.prune_empty();
        Ok(self.document)
    }

    fn frame(&self) -> Option<&Frame> {
        self.stack.last()
    }

    fn frame_mut(&mut self) -> Option<&mut Frame> {
        self.stack.last_mut()
    }

    fn destination(&self) -> Destination {
        self.frame().map_or(Destination::Body, |frame| frame.destination)
    }

    fn handle(&mut self, token: Token) -> Result<()> {
        if self.stack.is_empty() {
            return match token {
                Token::GroupStart => {
                    self.stack.push(Frame {
                        chars: CharState::default(),
                        unicode_skip: 1,
                        destination: Destination::Body,
                        structure: None,
                        starred: false,
                        fresh: true,
                    });
                    Ok(())
                }
                Token::Text(ch) if ch.is_whitespace() => Ok(()),
                _ => Err(self.lexer.failure("missing opening brace")),
            };
        }

        if !self.saw_header {
            return match token {
                Token::Word { ref name, .. } if name == "rtf" => {
                    self.saw_header = true;
                    self.mark_seen();
                    Ok(())
                }
                _ => Err(self.lexer.failure("missing rtf header")),
            };
        }

        let fresh = self.frame().is_some_and(|frame| frame.fresh);
        self.mark_seen();

        match token {
            Token::GroupStart => {
                let mut frame = self.frame().cloned().ok_or_else(|| self.lexer.failure("no group"))?;
                frame.structure = None;
                frame.starred = false;
                frame.fresh = true;
                self.stack.push(frame);
                Ok(())
            }
            Token::GroupEnd => self.close_group(),
            Token::Symbol('*') if fresh => {
                if let Some(frame) = self.frame_mut() {
                    frame.starred = true;
                    frame.fresh = true;
                }
                Ok(())
            }
            Token::Word { name, param } => {
                let starred = self.frame().is_some_and(|frame| frame.starred);
                if let Some(frame) = self.frame_mut() {
                    frame.starred = false;
                }
                if fresh && self.open_destination(&name, starred) {
                    return Ok(());
                }
                self.word(&name, param);
                Ok(())
            }
            Token::Symbol(symbol) => {
                match symbol {
                    '\\' | '{' | '}' => self.text(symbol),
                    '~' => self.text('\u{A0}'),
                    '_' => self.text('\u{2011}'),
                    '\n' | '\r' => self.end_paragraph(),
                    _ => {}
                }
                Ok(())
            }
            Token::Byte(byte) => {
                if self.pending_skip > 0 {
                    self.pending_skip -= 1;
                } else if self.destination() == Destination::FontTable {
                    self.high_surrogate = None;
                    self.font_name.push(decode_byte(byte));
                } else {
                    self.text(decode_byte(byte));
                }
                Ok(())
            }
            Token::Text(ch) => {
                if ch == '\r' || ch == '\n' {
                    return Ok(());
                }
                if self.pending_skip > 0 {
                    self.pending_skip -= 1;
                } else {
                    self.text(ch);
                }
                Ok(())
            }
        }
    }

    fn mark_seen(&mut self) {
        if let Some(frame) = self.frame_mut() {
            frame.fresh = false;
        }
    }

    /// Handles the first control word of a group; returns whether it opened
    /// a destination.
    fn open_destination(&mut self, name: &str, starred: bool) -> bool {
        let destination = match name {
            "fonttbl" => Destination::FontTable,
            "colortbl" => Destination::ColorTable,
            "rnlist" if self.destination() == Destination::Body => {
                self.start_list();
                return true;
            }
            "rnitem" if self.destination() == Destination::Body => {
                self.start_item();
                return true;
            }
            _ if starred || IGNORED_DESTINATIONS.contains(&name) => Destination::Skip,
            _ => return false,
        };
        if let Some(frame) = self.frame_mut() {
            frame.destination = destination;
        }
        true
    }

    fn close_group(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| self.lexer.failure("unbalanced closing brace"))?;
        match frame.destination {
            Destination::FontTable => self.finish_font_entry(),
            Destination::ColorTable | Destination::Skip | Destination::Body => {}
        }
        if frame.structure.is_some() {
            self.flush_paragraph();
        }
        if self.stack.is_empty() {
            self.flush_paragraph();
            self.finished = true;
        }
        Ok(())
    }

    fn container(&self) -> Container {
        self.stack
            .iter()
            .rev()
            .find_map(|frame| match frame.structure {
                Some(Structure::Item(item)) => Some(Container::Item(item)),
                _ => None,
            })
            .unwrap_or(Container::Root)
    }

    fn current_list(&self) -> Option<BlockId> {
        self.stack.iter().rev().find_map(|frame| match frame.structure {
            Some(Structure::List(list)) => Some(list),
            _ => None,
        })
    }

    fn start_list(&mut self) {
        self.flush_paragraph();
        let container = self.container();
        let list = self
            .document
            .add_block(container, Block::List(List::new(MarkerStyle::None)));
        if let Some(frame) = self.frame_mut() {
            frame.structure = Some(Structure::List(list));
        }
    }

    fn start_item(&mut self) {
        self.flush_paragraph();
        let Some(list) = self.current_list() else {
            return;
        };
        let Some(item) = self.document.add_item(list) else {
            return;
        };
        if let Some(frame) = self.frame_mut() {
            frame.structure = Some(Structure::Item(item));
        }
    }

    fn word(&mut self, name: &str, param: Option<i32>) {
        match self.destination() {
            Destination::Skip => {}
            Destination::FontTable => {
                if name == "f" {
                    self.finish_font_entry();
                    self.font_entry = param.and_then(|p| usize::try_from(p).ok());
                }
            }
            Destination::ColorTable => {
                let value = param.map(|p| p.clamp(0, 255) as u8);
                match name {
                    "red" => self.color_entry.0 = value,
                    "green" => self.color_entry.1 = value,
                    "blue" => self.color_entry.2 = value,
                    _ => {}
                }
            }
            Destination::Body => self.body_word(name, param),
        }
    }

    fn body_word(&mut self, name: &str, param: Option<i32>) {
        let on = param.is_none_or(|value| value != 0);
        match name {
            "par" | "line" => self.end_paragraph(),
            "pard" => {
                self.alignment = TextAlignment::Left;
                self.margin = 0.0;
            }
            "ql" => self.alignment = TextAlignment::Left,
            "qc" => self.alignment = TextAlignment::Center,
            "qr" => self.alignment = TextAlignment::Right,
            "qj" => self.alignment = TextAlignment::Justify,
            "li" => self.margin = (param.unwrap_or(0).max(0) as f64) / TWIPS_PER_UNIT,
            "tab" => self.text('\t'),
            "emdash" => self.text('\u{2014}'),
            "endash" => self.text('\u{2013}'),
            "bullet" => self.text('\u{2022}'),
            "lquote" => self.text('\u{2018}'),
            "rquote" => self.text('\u{2019}'),
            "ldblquote" => self.text('\u{201C}'),
            "rdblquote" => self.text('\u{201D}'),
            "u" => self.unicode(param.unwrap_or(0)),
            "uc" => {
                let skip = param.unwrap_or(1).max(0) as usize;
                if let Some(frame) = self.frame_mut() {
                    frame.unicode_skip = skip;
                }
            }
            "rnmarker" => self.update_list(|list| {
                list.marker_style = MarkerStyle::from_code(param.unwrap_or(0));
            }),
            "rnoffset" => self.update_list(|list| {
                list.marker_offset = param.unwrap_or(0) as f64 / TWIPS_PER_UNIT;
            }),
            "rnpad" => self.update_list(|list| {
                list.padding = param.unwrap_or(0) as f64 / TWIPS_PER_UNIT;
            }),
            _ => {
                if let Some(frame) = self.frame_mut() {
                    apply_char_word(&mut frame.chars, name, param, on);
                }
            }
        }
    }

    fn update_list(&mut self, update: impl FnOnce(&mut List)) {
        let Some(id) = self.current_list() else {
            return;
        };
        let Some(mut list) = self.document.list(id).cloned() else {
            return;
        };
        update(&mut list);
        self.document.set_list_marker_style(id, list.marker_style);
        self.document.set_list_indent(id, list.marker_offset, list.padding);
    }

    fn unicode(&mut self, param: i32) {
        let unit = (if param < 0 { param + 65536 } else { param }) as u16;
        self.pending_skip = self.frame().map_or(1, |frame| frame.unicode_skip);

        if (0xD800..0xDC00).contains(&unit) {
            self.high_surrogate = Some(unit);
            return;
        }
        let decoded = match self.high_surrogate.take() {
            Some(high) if (0xDC00..0xE000).contains(&unit) => {
                char::decode_utf16([high, unit]).next().and_then(|r| r.ok())
            }
            _ => char::from_u32(unit as u32),
        };
        self.emit(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
    }

    fn text(&mut self, ch: char) {
        self.high_surrogate = None;
        self.emit(ch);
    }

    fn emit(&mut self, ch: char) {
        match self.destination() {
            Destination::Body => {
                let style = self.resolve_style();
                match self.runs.last_mut() {
                    Some(run) if run.style == style => run.text.push(ch),
                    _ => self.runs.push(Run::new(ch.to_string(), style)),
                }
            }
            Destination::FontTable => {
                if ch == ';' {
                    self.finish_font_entry();
                } else {
                    self.font_name.push(ch);
                }
            }
            Destination::ColorTable => {
                if ch == ';' {
                    let color = match self.color_entry {
                        (None, None, None) => None,
                        (r, g, b) => Some(Color::rgb(
                            r.unwrap_or(0),
                            g.unwrap_or(0),
                            b.unwrap_or(0),
                        )),
                    };
                    self.colors.push(color);
                    self.color_entry = (None, None, None);
                }
            }
            Destination::Skip => {}
        }
    }

    fn finish_font_entry(&mut self) {
        let name = std::mem::take(&mut self.font_name);
        if let Some(index) = self.font_entry.take() {
            self.fonts.push((index, name));
        }
    }

    fn resolve_style(&self) -> RunStyle {
        let chars = self.frame().map(|frame| frame.chars.clone()).unwrap_or_default();
        RunStyle {
            font_family: chars.font.and_then(|index| {
                self.fonts
                    .iter()
                    .find(|(entry, _)| *entry == index)
                    .map(|(_, name)| name.clone())
            }),
            font_size: chars.font_size,
            weight: if chars.bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            },
            style: if chars.italic {
                FontStyle::Italic
            } else {
                FontStyle::Normal
            },
            underline: chars.underline,
            foreground: chars
                .color
                .and_then(|index| self.colors.get(index).copied().flatten()),
        }
    }

    fn end_paragraph(&mut self) {
        if self.destination() != Destination::Body {
            return;
        }
        let mut paragraph = Paragraph::from_runs(std::mem::take(&mut self.runs));
        paragraph.alignment = self.alignment;
        paragraph.margin = self.margin;
        let container = self.container();
        self.document.add_block(container, Block::Paragraph(paragraph));
    }

    /// Closes a paragraph left open by a missing `\par`.
    fn flush_paragraph(&mut self) {
        if !self.runs.is_empty() {
            self.end_paragraph();
        }
    }
}

fn apply_char_word(chars: &mut CharState, name: &str, param: Option<i32>, on: bool) {
    match name {
        "plain" => *chars = CharState::default(),
        "b" => chars.bold = on,
        "i" => chars.italic = on,
        "ul" => chars.underline = on,
        "ulnone" => chars.underline = false,
        "f" => chars.font = param.and_then(|p| usize::try_from(p).ok()),
        "fs" => chars.font_size = param.filter(|&p| p > 0).map(|p| p as f64 / 2.0),
        "cf" => chars.color = param.and_then(|p| usize::try_from(p).ok()),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_runs_and_paragraph_layout() {
        let input = "{\\rtf1\\ansi{\\fonttbl{\\f0\\fnil Consolas;}}{\\colortbl;\\red0\\green128\\blue0;}\n\\pard\\qc\\li450{\\plain\\b Hi}{\\plain\\f0\\fs24\\cf1  there}\\par\n}";
        let document = read(input).unwrap();
        assert_eq!(document.text(), "Hi there");
        let id = document.paragraph_ids()[0];
        let paragraph = document.paragraph(id).unwrap();
        assert_eq!(paragraph.alignment, TextAlignment::Center);
        assert_eq!(paragraph.margin, 30.0);
        assert!(paragraph.runs[0].style.is_bold());
        let second = &paragraph.runs[1].style;
        assert_eq!(second.font_family.as_deref(), Some("Consolas"));
        assert_eq!(second.font_size, Some(12.0));
        assert_eq!(second.foreground, Some(Color::rgb(0, 128, 0)));
    }

    #[test]
    fn test_reads_nested_lists() {
        let input = "{\\rtf1{\\rnlist\\rnmarker2\\rnoffset150\\rnpad300{\\rnitem\\pard one\\par{\\rnlist\\rnmarker3{\\rnitem\\pard inner\\par}}}}}";
        let document = read(input).unwrap();
        assert_eq!(document.text(), "one\ninner");
        let outer = document.root_blocks()[0];
        let list = document.list(outer).unwrap();
        assert_eq!(list.marker_style, MarkerStyle::Decimal);
        assert_eq!(list.marker_offset, 10.0);
        assert_eq!(list.padding, 20.0);
        let item = document.list_item(list.items()[0]).unwrap();
        assert_eq!(item.blocks().len(), 2);
        assert_eq!(
            document.list(item.blocks()[1]).unwrap().marker_style,
            MarkerStyle::LowerLatin
        );
    }

    #[test]
    fn test_escapes_and_unicode() {
        let input = "{\\rtf1\\uc1 a\\{b\\}\\\\ \\'e9\\'93\\u8364?\\u-10179?\\u-8704?\\tab x\\par}";
        let document = read(input).unwrap();
        assert_eq!(document.text(), "a{b}\\ é\u{201C}€\u{1F600}\tx");
    }

    #[test]
    fn test_skips_optional_destinations() {
        let input = "{\\rtf1{\\*\\generator Foo 1.0;}{\\info{\\title T}}{\\stylesheet{\\s0 Normal;}}\\pard kept\\par}";
        let document = read(input).unwrap();
        assert_eq!(document.text(), "kept");
    }

    #[test]
    fn test_unknown_words_are_ignored() {
        let input = "{\\rtf1\\ansicpg1252\\htmautsp\\pard\\ltrpar\\sa0 text\\ri0\\par}";
        assert_eq!(read(input).unwrap().text(), "text");
    }

    #[test]
    fn test_truncated_input_fails() {
        let err = read("{\\rtf1\\pard {\\plain\\b bold").unwrap_err();
        assert!(matches!(err, EditorError::ParseFailure { .. }));
    }

    #[test]
    fn test_unbalanced_brace_fails() {
        assert!(read("{\\rtf1 a\\par}}").is_err());
        assert!(read("{\\rtf1 a\\'zz\\par}").is_err());
        assert!(read("{\\pard a\\par}").is_err());
    }

    #[test]
    fn test_missing_final_par_keeps_text() {
        let document = read("{\\rtf1\\pard tail}").unwrap();
        assert_eq!(document.text(), "tail");
    }

    #[test]
    fn test_empty_list_items_are_pruned() {
        let document = read("{\\rtf1{\\rnlist{\\rnitem}}\\pard x\\par}").unwrap();
        assert_eq!(document.root_blocks().len(), 1);
        assert_eq!(document.text(), "x");
    }
}
