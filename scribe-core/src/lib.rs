//! Scribe Core - rich-text formatting engine
//!
//! This crate holds the document tree, selections over it, and the
//! formatting commands (block types, alignment, inline marks) a toolbar or
//! hotkey triggers. It does no rendering and no text input; hosts such as
//! the terminal front end feed it selections and key presses.

pub mod commands;
pub mod editor;
pub mod error;
pub mod export;
pub mod format;
pub mod hotkeys;
pub mod matcher;
pub mod model;
pub mod seed;
pub mod session;
pub mod transforms;

pub use commands::{
    active_marks, is_block_active, is_mark_active, toggle_block, toggle_checked, toggle_mark,
};
pub use editor::Editor;
pub use error::{FormatError, FormatResult, ParseError};
pub use export::{from_json, session_to_json, to_json, ExportSession};
pub use format::{BlockFormat, Format};
pub use hotkeys::{Hotkey, HotkeyTable, KeyOutcome, KeyPress, Modifiers, Platform};
pub use model::{
    Alignment, Block, BlockType, Document, Leaf, MarkSet, MarkType, Node, Path, Point, Range,
    Selection,
};
pub use seed::seed_document;
pub use session::Session;
