//! Rich-text note editing engine.
//!
//! A note is a [`Document`] of styled paragraphs and nested lists. It is
//! persisted through [`serializer`] and edited through an
//! [`EditorSession`], which applies formatting, clipboard and tab-key
//! behavior according to an [`EditorConfig`].

pub mod clipboard;
pub mod config;
pub mod controller;
pub mod document_model;
pub mod error;
pub mod formatting;
pub mod indent;
pub mod logging;
pub mod serializer;

pub use config::{EditorConfig, RcLoader};
pub use controller::{EditorCommand, EditorSession};
pub use document_model::{Document, TextRange};
pub use error::{EditorError, Result};
