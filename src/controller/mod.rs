//! Controller subsystem - routes key presses and mouse gestures to editing
//! commands
//!
//! This module maps input events to commands and owns the per-note session
//! that runs them against the document, clipboard and options.

pub mod command;
pub mod key_handler;
pub mod session;

// Re-export public interface
pub use command::EditorCommand;
pub use key_handler::KeyHandler;
pub use session::{EditorSession, MAX_IMPORT_BYTES};
