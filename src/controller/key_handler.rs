use crate::controller::command::EditorCommand;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    /// Maps a key press to an editor command.
    pub fn parse_key(key_event: &KeyEvent) -> Option<EditorCommand> {
        if key_event.kind == KeyEventKind::Release {
            return None;
        }
        let modifiers = key_event.modifiers;
        let control = modifiers.contains(KeyModifiers::CONTROL);

        match key_event.code {
            KeyCode::Tab | KeyCode::BackTab => Some(EditorCommand::Tab),
            KeyCode::Enter => Some(EditorCommand::Newline),
            KeyCode::Backspace => Some(EditorCommand::Backspace),
            KeyCode::Delete => Some(EditorCommand::Delete),

            KeyCode::Char(c) if control => Self::parse_control_key(c),
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Char(c) => Some(EditorCommand::InsertText(c.to_string())),
            _ => None,
        }
    }

    /// Control shortcuts; shifted variants arrive as upper case letters.
    fn parse_control_key(c: char) -> Option<EditorCommand> {
        match c.to_ascii_lowercase() {
            'a' => Some(EditorCommand::SelectAll),
            'b' => Some(EditorCommand::ToggleBold),
            'i' => Some(EditorCommand::ToggleItalic),
            'u' => Some(EditorCommand::ToggleUnderline),
            'c' => Some(EditorCommand::Copy),
            'x' => Some(EditorCommand::Cut),
            'v' => Some(EditorCommand::Paste),
            _ => None,
        }
    }

    /// Modifiers to act on: `BackTab` implies Shift even when the terminal
    /// does not report it.
    pub fn effective_modifiers(key_event: &KeyEvent) -> KeyModifiers {
        match key_event.code {
            KeyCode::BackTab => key_event.modifiers | KeyModifiers::SHIFT,
            _ => key_event.modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_characters_insert() {
        let command = KeyHandler::parse_key(&key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(command, Some(EditorCommand::InsertText("q".to_string())));
        let shifted = KeyHandler::parse_key(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT));
        assert_eq!(shifted, Some(EditorCommand::InsertText("Q".to_string())));
        assert_eq!(
            KeyHandler::parse_key(&key(KeyCode::Char('q'), KeyModifiers::ALT)),
            None
        );
    }

    #[test]
    fn test_control_shortcuts() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(
            KeyHandler::parse_key(&key(KeyCode::Char('b'), ctrl)),
            Some(EditorCommand::ToggleBold)
        );
        assert_eq!(
            KeyHandler::parse_key(&key(KeyCode::Char('C'), ctrl | KeyModifiers::SHIFT)),
            Some(EditorCommand::Copy)
        );
        assert_eq!(
            KeyHandler::parse_key(&key(KeyCode::Char('v'), ctrl)),
            Some(EditorCommand::Paste)
        );
        assert_eq!(KeyHandler::parse_key(&key(KeyCode::Char('z'), ctrl)), None);
    }

    #[test]
    fn test_back_tab_implies_shift() {
        let event = key(KeyCode::BackTab, KeyModifiers::NONE);
        assert_eq!(KeyHandler::parse_key(&event), Some(EditorCommand::Tab));
        assert_eq!(KeyHandler::effective_modifiers(&event), KeyModifiers::SHIFT);
    }
}
