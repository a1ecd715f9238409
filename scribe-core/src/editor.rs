use serde::{Deserialize, Serialize};

use crate::model::{Document, MarkSet, Selection};

/// The state one formatting command reads and produces.
///
/// Commands take an `&Editor` and hand back a new one, so a failed command
/// simply never replaces the caller's copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Editor {
    pub document: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    /// Marks the next typed character would get at a collapsed selection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<MarkSet>,
}

impl Editor {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            selection: None,
            marks: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.select(Some(selection));
        self
    }

    /// Replace the selection; pending cursor marks do not survive a move
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.marks = None;
    }
}
