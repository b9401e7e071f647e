//! Document model subsystem - structured note content and selections
//!
//! This module contains the block/run tree of a note, the char-offset
//! selection type addressing it, and the text primitives every editing
//! operation is built on.

pub mod document;
pub mod paragraph;
pub mod selection;
pub mod style;

// Re-export main types for convenience
pub use document::{
    Block, BlockId, Container, Document, ItemId, List, ListItem, ParagraphSpan, TextStats,
    PARAGRAPH_TERMINATOR,
};
pub use paragraph::Paragraph;
pub use selection::TextRange;
pub use style::{
    snap_font_size, snap_length, Color, FontStyle, FontWeight, MarkerStyle, Run, RunStyle,
    TextAlignment, TWIPS_PER_UNIT,
};
