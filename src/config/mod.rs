//! Configuration subsystem - editing options and where they come from
//!
//! The engine reads an [`EditorConfig`] snapshot at the time of each
//! operation. Hosts build one directly or load it from a `.richnoterc` file.

pub mod rc;

pub use rc::{
    CopyAction, CopyFallbackAction, CopyPolicy, EditorConfig, PasteAction, PastePolicy, RcLoader,
};
