//! Keyboard shortcuts for inline marks

use std::fmt;

use crate::error::ParseError;
use crate::model::MarkType;

/// Platform convention for the `mod` modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// `mod` is Cmd
    Mac,
    /// `mod` is Ctrl
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
}

/// A key event as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// A parsed hotkey such as `mod+b` or `ctrl+shift+x`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    key: String,
    modifiers: Modifiers,
    source: String,
}

impl Hotkey {
    pub fn parse_for(s: &str, platform: Platform) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidHotkey {
            hotkey: s.to_string(),
            reason: reason.to_string(),
        };

        // `+` itself is a valid key, so split off the last segment by hand
        let (prefix, key) = match s.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None => match s.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", s),
            },
        };
        if key.is_empty() {
            return Err(invalid("missing key"));
        }

        let mut modifiers = Modifiers::NONE;
        for name in prefix.split('+').filter(|n| !n.is_empty()) {
            let flag = match name.to_ascii_lowercase().as_str() {
                "mod" => match platform {
                    Platform::Mac => &mut modifiers.meta,
                    Platform::Other => &mut modifiers.ctrl,
                },
                "ctrl" | "control" => &mut modifiers.ctrl,
                "alt" | "option" | "opt" => &mut modifiers.alt,
                "shift" => &mut modifiers.shift,
                "meta" | "cmd" | "command" | "super" => &mut modifiers.meta,
                _ => return Err(invalid(&format!("unknown modifier {name:?}"))),
            };
            if *flag {
                return Err(invalid(&format!("modifier {name:?} given twice")));
            }
            *flag = true;
        }

        Ok(Self {
            key: key.to_lowercase(),
            modifiers,
            source: s.to_string(),
        })
    }

    /// Modifiers must match exactly; the key ignores case
    pub fn matches(&self, press: &KeyPress) -> bool {
        self.modifiers == press.modifiers && self.key == press.key.to_lowercase()
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// What the editor did with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key toggled a mark and must not reach the text surface
    Consumed(MarkType),
    Ignored,
}

/// Ordered hotkey bindings; the first match wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyTable {
    bindings: Vec<(Hotkey, MarkType)>,
}

impl HotkeyTable {
    pub fn default_for(platform: Platform) -> Self {
        let defaults = [
            ("mod+b", MarkType::Bold),
            ("mod+i", MarkType::Italic),
            ("mod+u", MarkType::Underline),
            ("mod+`", MarkType::Code),
        ];
        let bindings = defaults
            .into_iter()
            .filter_map(|(s, mark)| Hotkey::parse_for(s, platform).ok().map(|h| (h, mark)))
            .collect();
        Self { bindings }
    }

    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, MarkType)>,
        platform: Platform,
    ) -> Result<Self, ParseError> {
        let bindings = pairs
            .into_iter()
            .map(|(s, mark)| Hotkey::parse_for(s, platform).map(|h| (h, mark)))
            .collect::<Result<_, _>>()?;
        Ok(Self { bindings })
    }

    pub fn lookup(&self, press: &KeyPress) -> Option<MarkType> {
        self.bindings
            .iter()
            .find(|(hotkey, _)| hotkey.matches(press))
            .map(|(_, mark)| *mark)
    }

    pub fn bindings(&self) -> &[(Hotkey, MarkType)] {
        &self.bindings
    }

    /// Hotkey bound to `mark`, for help screens
    pub fn hotkey_for(&self, mark: MarkType) -> Option<&Hotkey> {
        self.bindings.iter().find(|(_, m)| *m == mark).map(|(h, _)| h)
    }
}

impl Default for HotkeyTable {
    fn default() -> Self {
        Self::default_for(Platform::current())
    }
}
