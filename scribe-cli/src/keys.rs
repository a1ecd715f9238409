//! Key bindings for the interactive editor

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use scribe_core::{Alignment, BlockFormat, BlockType, KeyPress, Modifiers};

/// Plain keys that toggle block formats
pub const BLOCK_KEYS: [(char, BlockFormat); 9] = [
    ('1', BlockFormat::Type(BlockType::HeadingOne)),
    ('2', BlockFormat::Type(BlockType::HeadingTwo)),
    ('>', BlockFormat::Type(BlockType::BlockQuote)),
    ('n', BlockFormat::Type(BlockType::NumberedList)),
    ('b', BlockFormat::Type(BlockType::BulletedList)),
    ('l', BlockFormat::Align(Alignment::Left)),
    ('c', BlockFormat::Align(Alignment::Center)),
    ('r', BlockFormat::Align(Alignment::Right)),
    ('f', BlockFormat::Align(Alignment::Justify)),
];

pub fn block_format_for(c: char) -> Option<BlockFormat> {
    BLOCK_KEYS.iter().find(|(key, _)| *key == c).map(|(_, format)| *format)
}

/// Translate a terminal key event for the hotkey table.
///
/// Shift is dropped for printable characters, since it is already part of
/// the character the terminal reports.
pub fn key_press(event: &KeyEvent) -> Option<KeyPress> {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Esc => "escape".to_string(),
        _ => return None,
    };
    let printable = matches!(event.code, KeyCode::Char(_));
    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT) && !printable,
        meta: event.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    };
    Some(KeyPress::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_char_becomes_hotkey_press() {
        let event = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(key_press(&event), Some(KeyPress::new("b", Modifiers::CTRL)));

        let event = KeyEvent::new(KeyCode::Char('B'), KeyModifiers::CONTROL | KeyModifiers::SHIFT);
        assert_eq!(key_press(&event), Some(KeyPress::new("B", Modifiers::CTRL)));

        assert_eq!(key_press(&KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_block_keys() {
        assert_eq!(block_format_for('c'), Some(BlockFormat::Align(Alignment::Center)));
        assert_eq!(block_format_for('n'), Some(BlockFormat::Type(BlockType::NumberedList)));
        assert_eq!(block_format_for('z'), None);
    }
}
