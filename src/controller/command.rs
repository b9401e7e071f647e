use crate::document_model::{Color, MarkerStyle, TextAlignment, TextRange};
use crate::formatting::CaseTransform;

/// An editing request routed through [`crate::controller::EditorSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    // Text entry
    InsertText(String),
    Newline,
    Tab,
    Backspace,
    Delete,

    // Selection
    Select(TextRange),
    SelectAll,

    // Clipboard
    Copy,
    Cut,
    Paste,

    // Character styling
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    FontFamily(String),
    FontSize(f64),
    Foreground(Color),
    ClearFormatting,

    // Blocks
    Align(TextAlignment),
    List(MarkerStyle),
    TabSpacing(f64),
    Case(CaseTransform),
    ClearDocument,
}

impl EditorCommand {
    /// Whether the command may change the document.
    pub fn is_edit(&self) -> bool {
        !matches!(
            self,
            EditorCommand::Select(_) | EditorCommand::SelectAll | EditorCommand::Copy
        )
    }
}
