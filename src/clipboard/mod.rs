//! Clipboard subsystem - the external clipboard and the copy/paste policy
//!
//! The platform clipboard can be held by another process at any moment, so
//! providers report failure as `false`/`None` and never as an error.

pub mod policy;

pub use policy::{convert_indentation, copy, cut, paste, resolve_copy, ResolvedCopy};

use crate::error::EditorError;
use arboard::Clipboard;
use log::debug;

pub trait ClipboardProvider {
    /// Places `text` on the clipboard; `false` when it was not accepted.
    fn set_text(&mut self, text: &str) -> bool;
    fn get_text(&mut self) -> Option<String>;
    fn has_text(&mut self) -> bool;
}

/// The desktop clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Option<&mut Clipboard> {
        if self.inner.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.inner = Some(clipboard),
                Err(e) => {
                    debug!("Could not open clipboard: {}", EditorError::from(e));
                    return None;
                }
            }
        }
        self.inner.as_mut()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> bool {
        let Some(clipboard) = self.handle() else {
            return false;
        };
        match clipboard.set_text(text.to_owned()) {
            Ok(()) => true,
            Err(e) => {
                debug!("Clipboard write failed: {}", EditorError::from(e));
                false
            }
        }
    }

    fn get_text(&mut self) -> Option<String> {
        let clipboard = self.handle()?;
        match clipboard.get_text() {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("Clipboard read failed: {}", EditorError::from(e));
                None
            }
        }
    }

    fn has_text(&mut self) -> bool {
        self.get_text().is_some_and(|text| !text.is_empty())
    }
}

/// In-process clipboard for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
    /// While set every access fails, like a clipboard held elsewhere.
    pub locked: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            locked: false,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> bool {
        if self.locked {
            return false;
        }
        self.text = Some(text.to_string());
        true
    }

    fn get_text(&mut self) -> Option<String> {
        if self.locked {
            return None;
        }
        self.text.clone()
    }

    fn has_text(&mut self) -> bool {
        !self.locked && self.text.as_deref().is_some_and(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::new();
        assert!(!clipboard.has_text());
        assert!(clipboard.set_text("abc"));
        assert!(clipboard.has_text());
        assert_eq!(clipboard.get_text().as_deref(), Some("abc"));
    }

    #[test]
    fn test_locked_clipboard_fails_softly() {
        let mut clipboard = MemoryClipboard::with_text("kept");
        clipboard.locked = true;
        assert!(!clipboard.set_text("new"));
        assert_eq!(clipboard.get_text(), None);
        assert!(!clipboard.has_text());
        clipboard.locked = false;
        assert_eq!(clipboard.contents(), Some("kept"));
    }

    #[test]
    fn test_platform_errors_map_to_clipboard_unavailable() {
        let err = EditorError::from(arboard::Error::ContentNotAvailable);
        assert!(matches!(err, EditorError::ClipboardUnavailable(_)));
        assert!(err.to_string().starts_with("clipboard unavailable"));
    }
}
