//! Key events delivered by the terminal widget.

use bitflags::bitflags;

use crate::config::keys;

bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const ALT = 1 << 0;
        const CTRL = 1 << 1;
        const META = 1 << 2;
    }
}

/// Physical keys the controller dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Backspace,
    Tab,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Anything else, carrying the raw numeric identifier.
    Other(u32),
}

impl KeyCode {
    pub fn from_code(code: u32) -> Self {
        match code {
            keys::BACKSPACE => Self::Backspace,
            keys::TAB => Self::Tab,
            keys::ENTER => Self::Enter,
            keys::ARROW_LEFT => Self::ArrowLeft,
            keys::ARROW_RIGHT => Self::ArrowRight,
            keys::ARROW_UP => Self::ArrowUp,
            keys::ARROW_DOWN => Self::ArrowDown,
            other => Self::Other(other),
        }
    }
}

/// A single key press as reported by the terminal.
///
/// `key` is the printable text or the raw control sequence the terminal
/// produced for the key (e.g. `"\x1b[D"` for the left arrow).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub code: u32,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, code: u32) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::empty(),
            code,
        }
    }

    /// A printable character with no modifiers held.
    ///
    /// Letters, digits and space carry their browser key code; punctuation
    /// reports 0 so it never aliases a control key.
    pub fn char(c: char) -> Self {
        let code = if c.is_ascii_alphanumeric() || c == ' ' {
            u32::from(c.to_ascii_uppercase())
        } else {
            0
        };
        Self::new(c.to_string(), code)
    }

    pub fn backspace() -> Self {
        Self::new("\u{7f}", keys::BACKSPACE)
    }

    pub fn tab() -> Self {
        Self::new("\t", keys::TAB)
    }

    pub fn enter() -> Self {
        Self::new("\r", keys::ENTER)
    }

    pub fn arrow_left() -> Self {
        Self::new("\u{1b}[D", keys::ARROW_LEFT)
    }

    pub fn arrow_right() -> Self {
        Self::new("\u{1b}[C", keys::ARROW_RIGHT)
    }

    pub fn arrow_up() -> Self {
        Self::new("\u{1b}[A", keys::ARROW_UP)
    }

    pub fn arrow_down() -> Self {
        Self::new("\u{1b}[B", keys::ARROW_DOWN)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn key_code(&self) -> KeyCode {
        KeyCode::from_code(self.code)
    }

    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_mapping() {
        assert_eq!(KeyCode::from_code(8), KeyCode::Backspace);
        assert_eq!(KeyCode::from_code(9), KeyCode::Tab);
        assert_eq!(KeyCode::from_code(13), KeyCode::Enter);
        assert_eq!(KeyCode::from_code(37), KeyCode::ArrowLeft);
        assert_eq!(KeyCode::from_code(38), KeyCode::ArrowUp);
        assert_eq!(KeyCode::from_code(39), KeyCode::ArrowRight);
        assert_eq!(KeyCode::from_code(40), KeyCode::ArrowDown);
        assert_eq!(KeyCode::from_code(65), KeyCode::Other(65));
    }

    #[test]
    fn test_char_event() {
        let event = KeyEvent::char('h');
        assert_eq!(event.key, "h");
        assert_eq!(event.key_code(), KeyCode::Other(72));
        assert!(!event.has_modifiers());

        // Apostrophe is ASCII 39, which must not read as the right arrow.
        assert_eq!(KeyEvent::char('\'').key_code(), KeyCode::Other(0));
    }

    #[test]
    fn test_modifiers() {
        let event = KeyEvent::char('c').with_modifiers(Modifiers::CTRL);
        assert!(event.has_modifiers());
        assert!(event.modifiers.contains(Modifiers::CTRL));
        assert!(!event.modifiers.contains(Modifiers::ALT));
    }
}
