use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::commands;
use crate::editor::Editor;
use crate::error::FormatResult;
use crate::format::{BlockFormat, Format};
use crate::hotkeys::{HotkeyTable, KeyOutcome, KeyPress};
use crate::model::{Document, MarkSet, MarkType, Selection};
use crate::seed::seed_document;

/// One editing session: the editor state every command runs against plus
/// the bookkeeping a host needs around it
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub title: String,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    editor: Editor,
    pub hotkeys: HotkeyTable,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(title: String, document: Document) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            filename: None,
            filepath: None,
            editor: Editor::new(document),
            hotkeys: HotkeyTable::default(),
            created_at: now,
            updated_at: now,
            status_message: None,
        }
    }

    /// A session over the welcome document
    pub fn seeded() -> Self {
        Self::new("Untitled".to_string(), seed_document())
    }

    pub fn with_file_info(
        title: String,
        document: Document,
        filepath: String,
        filename: String,
    ) -> Self {
        let mut session = Self::new(title, document);
        session.filepath = Some(filepath);
        session.filename = Some(filename);
        session
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn document(&self) -> &Document {
        &self.editor.document
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.editor.selection.as_ref()
    }

    /// Host-reported selection change; pending cursor marks are dropped
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.editor.select(selection);
    }

    pub fn cursor_marks(&self) -> Option<&MarkSet> {
        self.editor.marks.as_ref()
    }

    pub fn toggle_block(&mut self, format: BlockFormat) -> bool {
        let result = commands::toggle_block(&self.editor, format);
        self.commit(&format.to_string(), result)
    }

    pub fn toggle_mark(&mut self, mark: MarkType) -> bool {
        let result = commands::toggle_mark(&self.editor, mark);
        self.commit(mark.as_str(), result)
    }

    /// Returns false, with a status message, when no check-list item is
    /// selected
    pub fn toggle_checked(&mut self) -> bool {
        let result = commands::toggle_checked(&self.editor);
        let unchanged = matches!(&result, Ok(next) if next.document == self.editor.document);
        if unchanged {
            self.set_status("checked: no check-list item selected");
            return false;
        }
        self.commit("checked", result)
    }

    pub fn toggle(&mut self, format: Format) -> bool {
        match format {
            Format::Block(block) => self.toggle_block(block),
            Format::Mark(mark) => self.toggle_mark(mark),
        }
    }

    pub fn is_block_active(&self, format: BlockFormat) -> bool {
        commands::is_block_active(&self.editor, format)
    }

    pub fn is_mark_active(&self, mark: MarkType) -> bool {
        commands::is_mark_active(&self.editor, mark)
    }

    pub fn is_active(&self, format: Format) -> bool {
        match format {
            Format::Block(block) => self.is_block_active(block),
            Format::Mark(mark) => self.is_mark_active(mark),
        }
    }

    /// Run the mark bound to `press`, if any.
    ///
    /// A bound key is consumed even when the toggle had no effect, so it
    /// never falls through to the text surface.
    pub fn handle_key(&mut self, press: &KeyPress) -> KeyOutcome {
        match self.hotkeys.lookup(press) {
            Some(mark) => {
                self.toggle_mark(mark);
                KeyOutcome::Consumed(mark)
            }
            None => KeyOutcome::Ignored,
        }
    }

    fn commit(&mut self, what: &str, result: FormatResult<Editor>) -> bool {
        match result {
            Ok(next) => {
                let changed = next.document != self.editor.document;
                self.editor = next;
                if changed {
                    self.updated_at = Utc::now();
                }
                true
            }
            Err(err) if err.is_no_selection() => {
                self.set_status(&format!("{what}: nothing selected"));
                false
            }
            Err(err) => {
                warn!(command = what, error = %err, "command rejected");
                self.set_status(&format!("{what}: {err}"));
                false
            }
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn word_count(&self) -> usize {
        self.editor.document.word_count()
    }

    /// Get title for display
    pub fn display_title(&self) -> String {
        self.filename.clone().unwrap_or_else(|| self.title.clone())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkeys::{Modifiers, Platform};
    use crate::model::{BlockType, Point, Range};

    fn select_first_paragraph(session: &mut Session) {
        let end = session.document().end(&[0]).unwrap();
        session.set_selection(Some(Range::new(Point::new(vec![0, 0], 0), end)));
    }

    #[test]
    fn test_commands_without_selection_report_no_effect() {
        let mut session = Session::seeded();
        let before = session.document().clone();

        assert!(!session.toggle_block(BlockType::HeadingOne.into()));
        assert!(!session.toggle_mark(MarkType::Bold));
        assert_eq!(session.document(), &before);
        assert!(session.status_message.is_some());
    }

    #[test]
    fn test_rejected_command_keeps_state() {
        let mut session = Session::seeded();
        session.set_selection(Some(Range::collapsed(Point::new(vec![40, 0], 0))));
        let before = session.editor().clone();

        assert!(!session.toggle_block(BlockType::BlockQuote.into()));
        assert_eq!(session.editor(), &before);
    }

    #[test]
    fn test_toggle_checked_outside_check_list_reports_nothing_to_do() {
        let mut session = Session::seeded();
        select_first_paragraph(&mut session);
        let before = session.editor().clone();

        assert!(!session.toggle_checked());
        assert_eq!(session.editor(), &before);
        assert_eq!(
            session.status_message.as_deref(),
            Some("checked: no check-list item selected")
        );

        session.set_selection(Some(Range::collapsed(Point::new(vec![4, 0], 0))));
        assert!(session.toggle_checked());
        assert_eq!(session.document().block(&[4]).unwrap().checked, Some(true));
    }

    #[test]
    fn test_toggle_updates_document() {
        let mut session = Session::seeded();
        select_first_paragraph(&mut session);

        assert!(session.toggle_block(BlockType::HeadingTwo.into()));
        assert!(session.is_active(Format::Block(BlockType::HeadingTwo.into())));
        assert_eq!(session.document().block(&[0]).unwrap().block_type, BlockType::HeadingTwo);
    }

    #[test]
    fn test_hotkey_is_consumed() {
        let mut session = Session::seeded();
        session.hotkeys = HotkeyTable::default_for(Platform::Other);
        select_first_paragraph(&mut session);

        let outcome = session.handle_key(&KeyPress::new("b", Modifiers::CTRL));
        assert_eq!(outcome, KeyOutcome::Consumed(MarkType::Bold));
        assert!(session.is_mark_active(MarkType::Bold));

        let outcome = session.handle_key(&KeyPress::new("q", Modifiers::NONE));
        assert_eq!(outcome, KeyOutcome::Ignored);
    }

    #[test]
    fn test_selection_change_drops_cursor_marks() {
        let mut session = Session::seeded();
        let caret = Point::new(vec![0, 0], 3);
        session.set_selection(Some(Range::collapsed(caret.clone())));
        assert!(session.toggle_mark(MarkType::Code));
        assert!(session.cursor_marks().is_some());

        session.set_selection(Some(Range::collapsed(caret)));
        assert!(session.cursor_marks().is_none());
        assert!(!session.is_mark_active(MarkType::Code));
    }
}
