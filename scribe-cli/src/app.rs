//! Interactive editor state

use scribe_core::matcher::{self, Mode as MatchMode};
use scribe_core::{Block, Document, Format, KeyOutcome, KeyPress, Node, Path, Point, Range, Session};

use crate::config::CheckListStyle;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

/// Paths of every block holding text, in document order
pub fn text_blocks(document: &Document) -> Vec<Path> {
    matcher::nodes(document, None, MatchMode::All, |node| {
        node.as_block().is_some_and(Block::is_text_block)
    })
    .map(|(_, path)| path)
    .collect()
}

/// The terminal playground: a session plus a block-granular selection.
///
/// The selection always covers whole text blocks, from the anchor block to
/// the cursor block.
pub struct App {
    pub session: Session,
    pub mode: Mode,
    pub running: bool,
    pub check_list: CheckListStyle,
    pub cursor: usize,
    pub anchor: usize,
}

impl App {
    pub fn new(session: Session, check_list: CheckListStyle) -> Self {
        let mut app = Self {
            session,
            mode: Mode::Normal,
            running: true,
            check_list,
            cursor: 0,
            anchor: 0,
        };
        app.sync_selection();
        app
    }

    pub fn block_count(&self) -> usize {
        text_blocks(self.session.document()).len()
    }

    /// Index range of the selected text blocks
    pub fn selected_blocks(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    /// Push the block selection down to the session
    fn sync_selection(&mut self) {
        let document = self.session.document();
        let blocks = text_blocks(document);
        let (Some(anchor_path), Some(cursor_path)) =
            (blocks.get(self.anchor), blocks.get(self.cursor))
        else {
            self.session.set_selection(None);
            return;
        };

        let edge = |path: &[usize], at_end: bool| -> Option<Point> {
            if at_end {
                document.end(path)
            } else {
                document.start(path)
            }
        };
        let backward = self.cursor < self.anchor;
        let selection = match (edge(anchor_path, backward), edge(cursor_path, !backward)) {
            (Some(anchor), Some(focus)) => Some(Range::new(anchor, focus)),
            _ => None,
        };
        self.session.set_selection(selection);
    }

    pub fn move_down(&mut self) {
        self.move_to(self.cursor + 1, false);
    }

    pub fn move_up(&mut self) {
        self.move_to(self.cursor.saturating_sub(1), false);
    }

    pub fn extend_down(&mut self) {
        self.move_to(self.cursor + 1, true);
    }

    pub fn extend_up(&mut self) {
        self.move_to(self.cursor.saturating_sub(1), true);
    }

    pub fn move_to_top(&mut self) {
        self.move_to(0, false);
    }

    pub fn move_to_bottom(&mut self) {
        self.move_to(usize::MAX, false);
    }

    fn move_to(&mut self, index: usize, extend: bool) {
        let last = self.block_count().saturating_sub(1);
        self.cursor = index.min(last);
        if !extend {
            self.anchor = self.cursor;
        }
        self.sync_selection();
    }

    pub fn toggle(&mut self, format: Format) {
        if self.session.toggle(format) {
            let state = if self.session.is_active(format) { "on" } else { "off" };
            self.set_status(&format!("{format} {state}"));
        }
    }

    pub fn toggle_checked(&mut self) {
        if self.session.toggle_checked() {
            self.set_status("Toggled checked");
        }
    }

    /// Offer a key press to the hotkey table first
    pub fn handle_hotkey(&mut self, press: &KeyPress) -> bool {
        match self.session.handle_key(press) {
            KeyOutcome::Consumed(mark) => {
                if self.session.status_message.is_none() {
                    let state = if self.session.is_mark_active(mark) { "on" } else { "off" };
                    self.set_status(&format!("{mark} {state}"));
                }
                true
            }
            KeyOutcome::Ignored => false,
        }
    }

    pub fn is_checked(&self, node: &Node) -> bool {
        node.as_block().and_then(|b| b.checked).unwrap_or(false)
    }

    pub fn set_status(&mut self, msg: &str) {
        self.session.set_status(msg);
    }

    pub fn clear_status(&mut self) {
        self.session.clear_status();
    }

    /// Get title for display
    pub fn title(&self) -> String {
        self.session.display_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::{Alignment, BlockFormat, BlockType, MarkType, Modifiers};

    fn app() -> App {
        let mut session = Session::seeded();
        session.hotkeys = scribe_core::HotkeyTable::default_for(scribe_core::Platform::Other);
        App::new(session, CheckListStyle::Boxes)
    }

    #[test]
    fn test_starts_with_first_block_selected() {
        let app = app();
        let selection = app.session.selection().unwrap();
        assert_eq!(selection.anchor, Point::new(vec![0, 0], 0));
        assert_eq!(selection.focus, app.session.document().end(&[0]).unwrap());
        assert_eq!(app.block_count(), 12);
    }

    #[test]
    fn test_extend_up_selects_backward() {
        let mut app = app();
        app.move_down();
        app.move_down();
        app.extend_up();
        assert_eq!(app.selected_blocks(), (1, 2));

        let selection = app.session.selection().unwrap();
        assert!(selection.is_backward());
        assert_eq!(selection.anchor, app.session.document().end(&[2]).unwrap());
        assert_eq!(selection.focus, Point::new(vec![1, 0], 0));
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut app = app();
        app.move_up();
        assert_eq!(app.cursor, 0);
        app.move_to_bottom();
        assert_eq!(app.cursor, 11);
        app.move_down();
        assert_eq!(app.cursor, 11);
    }

    #[test]
    fn test_block_toggle_keeps_block_selection() {
        let mut app = app();
        app.move_to_bottom();
        app.extend_up();
        app.toggle(Format::Block(BlockType::NumberedList.into()));

        assert_eq!(app.block_count(), 12);
        assert!(app.session.is_block_active(BlockFormat::Type(BlockType::NumberedList)));
        assert!(!app.session.is_block_active(BlockFormat::Align(Alignment::Center)));
        assert_eq!(app.session.status_message.as_deref(), Some("numbered-list on"));
    }

    #[test]
    fn test_hotkey_toggles_mark() {
        let mut app = app();
        assert!(app.handle_hotkey(&KeyPress::new("u", Modifiers::CTRL)));
        assert!(app.session.is_mark_active(MarkType::Underline));
        assert!(!app.handle_hotkey(&KeyPress::new("j", Modifiers::NONE)));
    }
}
