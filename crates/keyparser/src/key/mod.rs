//! # Input keys
//!
//! ## Overview
//!
//! This module contains the literal key model used while tracking key chains. A [KeyInfo] is what
//! the user physically pressed, with any key mappings undone, and a [KeySequence] is the ordered
//! chain of those keys typed so far.
//!
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MediaKeyCode};

use self::parse::{parse_key_str, parse_macro_str};

pub(crate) mod parse;

/// Errors that occur while interpreting key strings.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum MacroError {
    /// Failure to interpret key string.
    #[error("Invalid key string: {0:?}")]
    InvalidMacro(String),

    /// Empty key string.
    #[error("Empty key string")]
    EmptyMacro,
}

/// A single physical key, without any press/release information.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct KeyInfo {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyInfo {
    /// Create a new key from a code and its held modifiers.
    pub fn new(code: KeyCode, mut modifiers: KeyModifiers) -> Self {
        if let KeyCode::Char(_) = code {
            // Some platforms report SHIFT alongside shifted characters like ':' and 'A', and some
            // don't, so drop it to keep hashing and comparisons stable.
            modifiers -= KeyModifiers::SHIFT;
        }

        Self { code, modifiers }
    }

    /// The key code.
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// The modifiers held while this key was pressed.
    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Whether this is a bare modifier key (Shift, Control, Alt, Super, ...) being pressed on its
    /// own.
    pub fn is_modifier_key(&self) -> bool {
        matches!(self.code, KeyCode::Modifier(_))
    }

    /// Return the character this key types, if it types one.
    pub fn get_char(&self) -> Option<char> {
        if let KeyCode::Char(c) = self.code {
            if self.modifiers.is_empty() {
                return Some(c);
            }
        }

        None
    }

    /// Build a toolkit event of the given kind for this key.
    pub fn to_event(&self, kind: KeyEventKind) -> KeyEvent {
        let mut modifiers = self.modifiers;

        if let KeyCode::Char(c) = self.code {
            if c.is_uppercase() {
                modifiers |= KeyModifiers::SHIFT;
            }
        }

        KeyEvent::new_with_kind(self.code, modifiers, kind)
    }
}

impl FromStr for KeyInfo {
    type Err = MacroError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(MacroError::EmptyMacro);
        } else if let Ok((_, key)) = parse_key_str(input) {
            return Ok(key);
        } else {
            return Err(MacroError::InvalidMacro(input.to_string()));
        }
    }
}

impl fmt::Display for KeyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut mods = String::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            mods.push_str("C-");
        }

        if self.modifiers.contains(KeyModifiers::SHIFT) {
            mods.push_str("S-");
        }

        if self.modifiers.contains(KeyModifiers::ALT) {
            mods.push_str("A-");
        }

        let named = |f: &mut fmt::Formatter<'_>, name: &str| write!(f, "<{mods}{name}>");

        match self.code {
            KeyCode::Left => named(f, "Left"),
            KeyCode::Right => named(f, "Right"),
            KeyCode::Up => named(f, "Up"),
            KeyCode::Down => named(f, "Down"),
            KeyCode::Backspace => named(f, "BS"),
            KeyCode::Enter => named(f, "Enter"),
            KeyCode::Home => named(f, "Home"),
            KeyCode::End => named(f, "End"),
            KeyCode::PageUp => named(f, "PageUp"),
            KeyCode::PageDown => named(f, "PageDown"),
            KeyCode::Null => named(f, "Nul"),
            KeyCode::Esc => named(f, "Esc"),
            KeyCode::Delete => named(f, "Del"),
            KeyCode::Insert => named(f, "Insert"),
            KeyCode::CapsLock => named(f, "CapsLock"),
            KeyCode::ScrollLock => named(f, "ScrollLock"),
            KeyCode::NumLock => named(f, "NumLock"),
            KeyCode::PrintScreen => named(f, "PrintScreen"),
            KeyCode::Pause => named(f, "Pause"),
            KeyCode::Menu => named(f, "Menu"),
            KeyCode::Tab => named(f, "Tab"),
            KeyCode::BackTab => write!(f, "<S-Tab>"),
            KeyCode::F(n) => named(f, &format!("F{n}")),
            KeyCode::Char(' ') if !self.modifiers.is_empty() => named(f, "Space"),
            KeyCode::Char('<') if self.modifiers.is_empty() => write!(f, "<lt>"),
            KeyCode::Char(c) if self.modifiers.is_empty() => write!(f, "{c}"),
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                named(f, &c.to_uppercase().to_string())
            },
            KeyCode::Char(c) => named(f, &c.to_string()),
            KeyCode::Media(mc) => {
                let name = match mc {
                    MediaKeyCode::PlayPause => "MediaPlayPause",
                    MediaKeyCode::Play => "MediaPlay",
                    MediaKeyCode::Pause => "MediaPause",
                    MediaKeyCode::Stop => "MediaStop",
                    MediaKeyCode::TrackNext => "MediaTrackNext",
                    MediaKeyCode::TrackPrevious => "MediaTrackPrevious",
                    MediaKeyCode::Record => "MediaRecord",
                    MediaKeyCode::RaiseVolume => "MediaVolumeUp",
                    MediaKeyCode::LowerVolume => "MediaVolumeDown",
                    MediaKeyCode::MuteVolume => "MediaVolumeMute",
                    _ => "Media",
                };

                named(f, name)
            },
            KeyCode::Modifier(mk) => named(f, &format!("{mk:?}")),
            KeyCode::KeypadBegin => named(f, "KeypadBegin"),
        }
    }
}

impl From<KeyCode> for KeyInfo {
    fn from(code: KeyCode) -> Self {
        KeyInfo::new(code, KeyModifiers::NONE)
    }
}

impl From<KeyEvent> for KeyInfo {
    fn from(ke: KeyEvent) -> Self {
        KeyInfo::new(ke.code, ke.modifiers)
    }
}

impl From<&KeyEvent> for KeyInfo {
    fn from(ke: &KeyEvent) -> Self {
        KeyInfo::new(ke.code, ke.modifiers)
    }
}

/// An ordered chain of literal keys.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct KeySequence {
    keys: Vec<KeyInfo>,
}

impl KeySequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this sequence with the key from `event` appended.
    ///
    /// The receiver is left untouched, so that callers can decide afterwards whether to commit
    /// the longer chain.
    pub fn append_event(&self, event: &KeyEvent) -> KeySequence {
        let mut keys = self.keys.clone();
        keys.push(KeyInfo::from(event));

        KeySequence { keys }
    }

    /// Number of keys in the chain.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the chain has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over the keys in typed order.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyInfo> {
        self.keys.iter()
    }

    /// Whether this sequence begins with every key in `prefix`.
    pub fn starts_with(&self, prefix: &KeySequence) -> bool {
        self.keys.starts_with(&prefix.keys)
    }
}

impl<'a> IntoIterator for &'a KeySequence {
    type Item = &'a KeyInfo;
    type IntoIter = std::slice::Iter<'a, KeyInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl FromIterator<KeyInfo> for KeySequence {
    fn from_iter<T: IntoIterator<Item = KeyInfo>>(iter: T) -> Self {
        KeySequence { keys: iter.into_iter().collect() }
    }
}

impl From<Vec<KeyInfo>> for KeySequence {
    fn from(keys: Vec<KeyInfo>) -> Self {
        KeySequence { keys }
    }
}

impl FromStr for KeySequence {
    type Err = MacroError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.is_empty() {
            return Err(MacroError::EmptyMacro);
        } else if let Ok((_, keys)) = parse_macro_str(input) {
            return Ok(KeySequence { keys });
        } else {
            return Err(MacroError::InvalidMacro(input.to_string()));
        }
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for key in self.keys.iter() {
            write!(f, "{key}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::ModifierKeyCode;

    #[test]
    fn test_modifier_keys() {
        assert!(key!(KeyCode::Modifier(ModifierKeyCode::LeftShift)).is_modifier_key());
        assert!(key!(KeyCode::Modifier(ModifierKeyCode::RightControl)).is_modifier_key());
        assert!(key!(KeyCode::Modifier(ModifierKeyCode::LeftSuper)).is_modifier_key());

        assert!(!key!('a').is_modifier_key());
        assert!(!ctl!('a').is_modifier_key());
        assert!(!key!(KeyCode::Esc).is_modifier_key());
        assert!(!key!(KeyCode::CapsLock).is_modifier_key());
    }

    #[test]
    fn test_shift_normalized() {
        let shifted = KeyInfo::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        let plain = KeyInfo::new(KeyCode::Char('A'), KeyModifiers::NONE);

        assert_eq!(shifted, plain);
        assert_eq!(shifted.get_char(), Some('A'));
        assert_eq!(ctl!('a').get_char(), None);
    }

    #[test]
    fn test_to_event() {
        let press = key!('j').to_event(KeyEventKind::Press);
        assert_eq!(press.code, KeyCode::Char('j'));
        assert_eq!(press.modifiers, KeyModifiers::NONE);
        assert_eq!(press.kind, KeyEventKind::Press);

        let release = ctl!('w').to_event(KeyEventKind::Release);
        assert_eq!(release.code, KeyCode::Char('w'));
        assert_eq!(release.modifiers, KeyModifiers::CONTROL);
        assert_eq!(release.kind, KeyEventKind::Release);

        let upper = key!('G').to_event(KeyEventKind::Press);
        assert_eq!(upper.modifiers, KeyModifiers::SHIFT);
        assert_eq!(KeyInfo::from(upper), key!('G'));
    }

    #[test]
    fn test_append_event() {
        let empty = KeySequence::new();
        let one = empty.append_event(&key_event!('j'));
        let two = one.append_event(&key_event!('k'));

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(two.iter().cloned().collect::<Vec<_>>(), vec![key!('j'), key!('k')]);
        assert!(two.starts_with(&one));
        assert!(!one.starts_with(&two));
    }

    #[test]
    fn test_parse_sequence() {
        let seq = KeySequence::from_str("<C-w>v").unwrap();
        assert_eq!(seq, KeySequence::from(vec![ctl!('w'), key!('v')]));

        let seq = KeySequence::from_str("jk").unwrap();
        assert_eq!(seq, KeySequence::from(vec![key!('j'), key!('k')]));

        assert_eq!(KeySequence::from_str(""), Err(MacroError::EmptyMacro));

        // An unterminated special key falls back to its literal characters.
        let seq = KeySequence::from_str("<C-w").unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.iter().next(), Some(&key!('<')));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(KeyInfo::from_str("<Esc>").unwrap(), key!(KeyCode::Esc));
        assert_eq!(KeyInfo::from_str("<C-[>").unwrap(), key!(KeyCode::Esc));
        assert_eq!(KeyInfo::from_str("x").unwrap(), key!('x'));
        assert_eq!(KeyInfo::from_str(""), Err(MacroError::EmptyMacro));
        assert!(KeyInfo::from_str("xy").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(key!('j').to_string(), "j");
        assert_eq!(key!('<').to_string(), "<lt>");
        assert_eq!(ctl!('w').to_string(), "<C-W>");
        assert_eq!(key!('x', KeyModifiers::ALT).to_string(), "<A-x>");
        assert_eq!(key!(KeyCode::F(5)).to_string(), "<F5>");
        assert_eq!(key!(KeyCode::BackTab).to_string(), "<S-Tab>");
        assert_eq!(ctl!(' ').to_string(), "<C-Space>");

        let seq = KeySequence::from(vec![ctl!('w'), key!('v'), key!(KeyCode::Enter)]);
        assert_eq!(seq.to_string(), "<C-W>v<Enter>");
        assert_eq!(KeySequence::from_str(&seq.to_string()).unwrap(), seq);
    }
}
