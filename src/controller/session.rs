use crate::clipboard::{self, ClipboardProvider, SystemClipboard};
use crate::config::EditorConfig;
use crate::controller::command::EditorCommand;
use crate::controller::key_handler::KeyHandler;
use crate::document_model::{Document, TextRange, TextStats};
use crate::error::Result;
use crate::formatting;
use crate::indent;
use crate::serializer;
use crossterm::event::{KeyEvent, KeyModifiers};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Largest file accepted by [`EditorSession::import_file`].
pub const MAX_IMPORT_BYTES: u64 = 10 * 1024 * 1024;

type ContentListener = Box<dyn FnMut(&str)>;

/// One open note: its document, selection, options and clipboard.
///
/// Every command that changes the document ends by emitting the serialized
/// snapshot to the `on_content_changed` listeners, once per distinct
/// snapshot. A read-only (locked) session still selects and copies but
/// refuses every command that could edit.
pub struct EditorSession {
    document: Document,
    selection: TextRange,
    config: EditorConfig,
    read_only: bool,
    clipboard: Box<dyn ClipboardProvider>,
    listeners: Vec<ContentListener>,
    last_snapshot: String,
}

impl EditorSession {
    pub fn new(config: EditorConfig, clipboard: Box<dyn ClipboardProvider>) -> Self {
        let document = Document::from_plain_text("");
        let last_snapshot = serializer::serialize(&document);
        Self {
            document,
            selection: TextRange::default(),
            config,
            read_only: false,
            clipboard,
            listeners: Vec::new(),
            last_snapshot,
        }
    }

    pub fn with_system_clipboard(config: EditorConfig) -> Self {
        Self::new(config, Box::new(SystemClipboard::new()))
    }

    /// Replaces the document with persisted content without notifying.
    pub fn load(&mut self, content: &str) {
        self.document = serializer::deserialize(content);
        self.selection = TextRange::caret(0);
        self.last_snapshot = serializer::serialize(&self.document);
    }

    /// The serialized form of the current document.
    pub fn content(&self) -> String {
        serializer::serialize(&self.document)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Swaps in a new options snapshot; later operations read it.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Locks or unlocks the note against edits.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn ClipboardProvider {
        self.clipboard.as_mut()
    }

    pub fn on_content_changed(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn plain_text(&self) -> String {
        self.document.text()
    }

    /// Line, word and character counts of the selection, or of the whole
    /// note when nothing is selected.
    pub fn stats(&self) -> TextStats {
        let text = if self.selection.is_empty() {
            self.document.text()
        } else {
            self.document
                .plain_text(self.selection)
                .unwrap_or_else(|_| self.document.text())
        };
        TextStats::of(&text)
    }

    /// Moves the selection; copies it straight away when copy-on-select is on.
    pub fn set_selection(&mut self, selection: TextRange) -> Result<()> {
        self.document.check_range(selection)?;
        self.selection = selection;
        if self.config.copy_on_select && !selection.is_empty() {
            self.copy(KeyModifiers::NONE)?;
        }
        Ok(())
    }

    /// Range character styling applies to: the selection, or the whole
    /// document when the selection is empty.
    fn styling_range(&self) -> TextRange {
        if self.selection.is_empty() {
            TextRange::new(0, self.document.len())
        } else {
            self.selection
        }
    }

    fn copy(&mut self, modifiers: KeyModifiers) -> Result<bool> {
        clipboard::copy(
            &self.document,
            self.selection,
            &self.config,
            modifiers.contains(KeyModifiers::SHIFT),
            self.clipboard.as_mut(),
        )
    }

    pub fn execute(&mut self, command: EditorCommand, modifiers: KeyModifiers) -> Result<()> {
        if self.read_only && command.is_edit() {
            debug!("Ignoring {command:?}: note is read-only");
            return Ok(());
        }
        debug!("Executing {command:?}");
        let alternate = modifiers.contains(KeyModifiers::SHIFT);
        let styling = self.styling_range();
        match command {
            EditorCommand::InsertText(text) => {
                let inserted = self.document.replace(self.selection, &text)?;
                self.selection = TextRange::caret(inserted.end);
            }
            EditorCommand::Newline => {
                indent::insert_newline(&mut self.document, &mut self.selection, &self.config)?;
            }
            EditorCommand::Tab => {
                let handled = indent::handle_tab(
                    &mut self.document,
                    &mut self.selection,
                    modifiers,
                    &self.config,
                )?;
                if !handled {
                    let inserted = self.document.replace(self.selection, "\t")?;
                    self.selection = TextRange::caret(inserted.end);
                }
            }
            EditorCommand::Backspace => {
                let target = if self.selection.is_empty() && self.selection.start > 0 {
                    TextRange::new(self.selection.start - 1, self.selection.start)
                } else {
                    self.selection
                };
                self.document.replace(target, "")?;
                self.selection = TextRange::caret(target.start);
            }
            EditorCommand::Delete => {
                let target = if self.selection.is_empty() && self.selection.end < self.document.len()
                {
                    TextRange::new(self.selection.start, self.selection.start + 1)
                } else {
                    self.selection
                };
                self.document.replace(target, "")?;
                self.selection = TextRange::caret(target.start);
            }

            EditorCommand::Select(range) => self.set_selection(range)?,
            EditorCommand::SelectAll => self.set_selection(TextRange::new(0, self.document.len()))?,

            EditorCommand::Copy => {
                self.copy(modifiers)?;
            }
            EditorCommand::Cut => {
                clipboard::cut(
                    &mut self.document,
                    &mut self.selection,
                    &self.config,
                    alternate,
                    self.clipboard.as_mut(),
                )?;
            }
            EditorCommand::Paste => {
                clipboard::paste(
                    &mut self.document,
                    &mut self.selection,
                    &self.config,
                    alternate,
                    self.clipboard.as_mut(),
                )?;
            }

            EditorCommand::ToggleBold => formatting::toggle_bold(&mut self.document, styling)?,
            EditorCommand::ToggleItalic => formatting::toggle_italic(&mut self.document, styling)?,
            EditorCommand::ToggleUnderline => {
                formatting::toggle_underline(&mut self.document, styling)?
            }
            EditorCommand::FontFamily(family) => {
                formatting::apply_font_family(&mut self.document, styling, &family)?
            }
            EditorCommand::FontSize(size) => {
                formatting::apply_font_size(&mut self.document, styling, size)?
            }
            EditorCommand::Foreground(color) => {
                formatting::apply_foreground(&mut self.document, styling, color)?
            }
            EditorCommand::ClearFormatting => {
                formatting::clear_formatting(&mut self.document, styling)?
            }

            EditorCommand::Align(alignment) => {
                formatting::apply_alignment(&mut self.document, self.selection, alignment)?
            }
            EditorCommand::List(marker) => {
                formatting::apply_list(&mut self.document, self.selection, marker)?
            }
            EditorCommand::TabSpacing(spacing) => {
                formatting::apply_tab_spacing(&mut self.document, spacing)
            }
            EditorCommand::Case(kind) => {
                self.selection =
                    formatting::apply_case_transform(&mut self.document, self.selection, kind)?;
            }
            EditorCommand::ClearDocument => {
                self.document.clear();
                self.selection = TextRange::caret(0);
            }
        }
        self.notify_if_changed();
        Ok(())
    }

    /// Runs the command bound to a key press; `false` for unbound keys.
    pub fn handle_key(&mut self, key_event: &KeyEvent) -> Result<bool> {
        match KeyHandler::parse_key(key_event) {
            Some(command) => {
                self.execute(command, KeyHandler::effective_modifiers(key_event))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Middle mouse button released over the note.
    pub fn middle_click(&mut self, modifiers: KeyModifiers) -> Result<bool> {
        if !self.config.middle_click_paste || self.read_only {
            return Ok(false);
        }
        self.execute(EditorCommand::Paste, modifiers)?;
        Ok(true)
    }

    /// Double click that selected `word`; with Control held the word is
    /// copied.
    pub fn double_click(&mut self, word: TextRange, modifiers: KeyModifiers) -> Result<bool> {
        self.set_selection(word)?;
        if word.is_empty() || !modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(false);
        }
        self.copy(modifiers)
    }

    /// Replaces the note with the text of a dropped file. Missing,
    /// unreadable and oversized files are ignored, as is any drop on a
    /// read-only note.
    pub fn import_file(&mut self, path: &Path) -> Result<bool> {
        if self.read_only {
            return Ok(false);
        }
        let size = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            Ok(_) => return Ok(false),
            Err(e) => {
                debug!("Ignoring dropped file {}: {e}", path.display());
                return Ok(false);
            }
        };
        if size > MAX_IMPORT_BYTES {
            info!("Ignoring dropped file {}: {size} bytes", path.display());
            return Ok(false);
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("Ignoring dropped file {}: {e}", path.display());
                return Ok(false);
            }
        };
        self.document = Document::from_plain_text(&text);
        self.selection = TextRange::caret(0);
        self.notify_if_changed();
        Ok(true)
    }

    fn notify_if_changed(&mut self) {
        let snapshot = serializer::serialize(&self.document);
        if snapshot == self.last_snapshot {
            return;
        }
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
        self.last_snapshot = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::document_model::MarkerStyle;
    use crossterm::event::KeyCode;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::default(), Box::new(MemoryClipboard::new()))
    }

    fn recorder(session: &mut EditorSession) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.on_content_changed(move |snapshot| sink.borrow_mut().push(snapshot.to_string()));
        seen
    }

    fn type_text(session: &mut EditorSession, text: &str) {
        session
            .execute(EditorCommand::InsertText(text.to_string()), KeyModifiers::NONE)
            .unwrap();
    }

    #[test]
    fn test_edits_emit_snapshots_and_load_does_not() {
        let mut session = session();
        let seen = recorder(&mut session);
        session.load("plain note");
        assert!(seen.borrow().is_empty());

        session.set_selection(TextRange::caret(10)).unwrap();
        type_text(&mut session, "!");
        assert_eq!(seen.borrow().len(), 1);
        let restored = serializer::deserialize(&seen.borrow()[0]);
        assert_eq!(restored.text(), "plain note!");

        session.execute(EditorCommand::Copy, KeyModifiers::NONE).unwrap();
        session
            .execute(EditorCommand::TabSpacing(10.0), KeyModifiers::NONE)
            .unwrap();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_empty_selection_styles_whole_document() {
        let mut session = session();
        type_text(&mut session, "one\ntwo");
        session.execute(EditorCommand::ToggleBold, KeyModifiers::NONE).unwrap();
        let document = session.document();
        for id in document.paragraph_ids() {
            assert!(document.paragraph(id).unwrap().runs[0].style.is_bold());
        }
    }

    #[test]
    fn test_keys_drive_editing() {
        let mut session = session();
        for c in "ab".chars() {
            session
                .handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
        session
            .handle_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE))
            .unwrap();
        session
            .handle_key(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(session.plain_text(), "a\t");
        let handled = session
            .handle_key(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE))
            .unwrap();
        assert!(!handled);
    }

    #[test]
    fn test_back_tab_dedents() {
        let mut session = session();
        type_text(&mut session, "\t\tx");
        session.set_selection(TextRange::caret(2)).unwrap();
        session
            .handle_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(session.plain_text(), "\tx");
        assert_eq!(session.selection(), TextRange::caret(1));
    }

    #[test]
    fn test_cut_and_paste_through_session() {
        let mut session = session();
        type_text(&mut session, "first\nsecond");
        session.set_selection(TextRange::caret(2)).unwrap();
        session.execute(EditorCommand::Cut, KeyModifiers::NONE).unwrap();
        assert_eq!(session.plain_text(), "second");
        assert_eq!(session.clipboard_mut().get_text().as_deref(), Some("first"));

        session.set_selection(TextRange::caret(6)).unwrap();
        session.execute(EditorCommand::Paste, KeyModifiers::NONE).unwrap();
        assert_eq!(session.plain_text(), "secondfirst");
        assert_eq!(session.selection(), TextRange::caret(11));
    }

    #[test]
    fn test_copy_on_select_and_control_double_click() {
        let mut session = session();
        type_text(&mut session, "word other");
        session.set_selection(TextRange::new(0, 4)).unwrap();
        assert_eq!(session.clipboard_mut().get_text(), None);

        session
            .double_click(TextRange::new(5, 10), KeyModifiers::CONTROL)
            .unwrap();
        assert_eq!(session.clipboard_mut().get_text().as_deref(), Some("other"));

        let mut config = session.config().clone();
        config.copy_on_select = true;
        session.set_config(config);
        session.set_selection(TextRange::new(0, 4)).unwrap();
        assert_eq!(session.clipboard_mut().get_text().as_deref(), Some("word"));
    }

    #[test]
    fn test_middle_click_paste_follows_config() {
        let mut session = session();
        session.clipboard_mut().set_text("x");
        assert!(session.middle_click(KeyModifiers::NONE).unwrap());
        assert_eq!(session.plain_text(), "x");

        let mut config = session.config().clone();
        config.middle_click_paste = false;
        session.set_config(config);
        assert!(!session.middle_click(KeyModifiers::NONE).unwrap());
        assert_eq!(session.plain_text(), "x");
    }

    #[test]
    fn test_list_and_case_commands() {
        let mut session = session();
        type_text(&mut session, "alpha\nbeta");
        session.set_selection(TextRange::new(0, 10)).unwrap();
        session
            .execute(EditorCommand::List(MarkerStyle::Decimal), KeyModifiers::NONE)
            .unwrap();
        assert!(session.document().list(session.document().root_blocks()[0]).is_some());
        session
            .execute(
                EditorCommand::Case(crate::formatting::CaseTransform::Upper),
                KeyModifiers::NONE,
            )
            .unwrap();
        assert_eq!(session.plain_text(), "ALPHA\nBETA");
        assert_eq!(session.selection(), TextRange::new(0, 10));

        session
            .execute(EditorCommand::ClearDocument, KeyModifiers::NONE)
            .unwrap();
        assert_eq!(session.plain_text(), "");
        assert_eq!(session.selection(), TextRange::caret(0));
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let mut session = session();
        assert!(session.set_selection(TextRange::new(0, 3)).is_err());
        assert_eq!(session.selection(), TextRange::caret(0));
    }

    #[test]
    fn test_import_file_replaces_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "dropped\ntext").unwrap();
        let mut session = session();
        let seen = recorder(&mut session);
        assert!(session.import_file(file.path()).unwrap());
        assert_eq!(session.plain_text(), "dropped\ntext");
        assert_eq!(seen.borrow().len(), 1);
        assert!(!session.import_file(Path::new("/nonexistent/file.txt")).unwrap());
    }

    #[test]
    fn test_import_file_ignores_unreadable_content() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let mut session = session();
        type_text(&mut session, "kept");
        assert!(!session.import_file(file.path()).unwrap());
        assert_eq!(session.plain_text(), "kept");
    }

    #[test]
    fn test_read_only_note_refuses_edits_but_copies() {
        let mut session = session();
        type_text(&mut session, "locked text");
        let seen = recorder(&mut session);
        session.set_read_only(true);
        assert!(session.is_read_only());

        type_text(&mut session, "x");
        session.execute(EditorCommand::ToggleBold, KeyModifiers::NONE).unwrap();
        session.execute(EditorCommand::Backspace, KeyModifiers::NONE).unwrap();
        session.clipboard_mut().set_text("pasted");
        session.execute(EditorCommand::Paste, KeyModifiers::NONE).unwrap();
        assert!(!session.middle_click(KeyModifiers::NONE).unwrap());
        assert_eq!(session.plain_text(), "locked text");
        assert!(seen.borrow().is_empty());

        session.execute(EditorCommand::SelectAll, KeyModifiers::NONE).unwrap();
        session.execute(EditorCommand::Copy, KeyModifiers::NONE).unwrap();
        assert_eq!(session.clipboard_mut().get_text().as_deref(), Some("locked text"));

        session.set_read_only(false);
        type_text(&mut session, "!");
        assert_eq!(session.plain_text(), "!");
    }

    #[test]
    fn test_stats_follow_selection() {
        let mut session = session();
        type_text(&mut session, "one two\nthree");
        assert_eq!(session.stats().words, 3);
        assert_eq!(session.stats().lines, 2);
        session.set_selection(TextRange::new(0, 3)).unwrap();
        assert_eq!(session.stats().words, 1);
    }
}
