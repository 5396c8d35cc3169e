//! The line being edited, and the terminal sequences that mirror it.
//!
//! The terminal is write-only: there is no way to ask where its cursor is.
//! Every mutation therefore returns the exact characters to write so the
//! visual cursor ends up where [`LineBuffer::cursor`] says it is, using
//! backspace runs (`\b`) to step left.

use super::parser::{self, CompletionSplit, Tokenized};

const BACKSPACE: char = '\u{8}';

fn backspaces(count: usize) -> String {
    std::iter::repeat_n(BACKSPACE, count).collect()
}

/// Text plus a cursor index counted in characters.
///
/// Invariant: `0 <= cursor <= len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    text: Vec<char>,
    cursor: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a buffer holding `line` with the cursor at `cursor` (clamped).
    pub fn with_value(line: &str, cursor: usize) -> Self {
        let text: Vec<char> = line.chars().collect();
        let cursor = cursor.min(text.len());
        Self { text, cursor }
    }

    pub fn value(&self) -> String {
        self.text.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Insert `s` at the cursor.
    ///
    /// Returns the inserted text, the redrawn tail of the line, and one
    /// backspace per tail character to bring the visual cursor back.
    pub fn insert(&mut self, s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }

        let tail = self.text.split_off(self.cursor);
        let before = self.text.len();
        self.text.extend(s.chars());
        self.cursor += self.text.len() - before;
        self.text.extend(tail.iter());

        let redrawn: String = tail.iter().collect();
        format!("{}{}{}", s, redrawn, backspaces(tail.len()))
    }

    /// Remove the character before the cursor. Returns `false` at position 0.
    ///
    /// The caller erases it on screen with `"\b \b"`.
    pub fn delete(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.text.remove(self.cursor);
        true
    }

    pub fn move_next(&mut self) -> bool {
        if self.cursor < self.text.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn move_previous(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the whole line and put the cursor at its end.
    ///
    /// The returned sequence steps back over what was left of the old cursor,
    /// writes the new text, blanks out any leftover old characters, and
    /// finally steps back to the new cursor.
    pub fn set_value(&mut self, value: &str) -> String {
        let new_text: Vec<char> = value.chars().collect();
        let old_len = self.text.len();
        let new_len = new_text.len();

        let mut sequence = backspaces(self.cursor);
        sequence.push_str(value);

        if new_len < old_len {
            let diff = old_len - new_len;
            sequence.extend(std::iter::repeat_n(' ', diff));
            sequence.push_str(&backspaces(diff));
        }

        self.text = new_text;
        self.cursor = self.text.len();

        sequence.push_str(&backspaces(self.text.len() - self.cursor));
        sequence
    }

    /// The whole line, followed by a backspace run placing the cursor.
    pub fn render(&self) -> String {
        format!("{}{}", self.value(), backspaces(self.text.len() - self.cursor))
    }

    /// Tokenize the whole line.
    pub fn split_args(&self) -> Tokenized {
        parser::tokenize(&self.value())
    }

    /// Split the text left of the cursor into completed args and search prefix.
    pub fn split_args_up_to_cursor(&self) -> CompletionSplit {
        let before: String = self.text[..self.cursor].iter().collect();
        parser::split_for_completion(&before)
    }
}

// ============================================================================
// Tests
// ============================================================================
