//! Navigable command history with a draft slot.
//!
//! Entries are ordered oldest first. The last slot is always the draft: the
//! line the user is typing but has not submitted. Navigating saves whatever
//! the caller currently holds into the slot being left, so in-progress edits
//! survive a trip up and back down.

use std::collections::HashSet;

use crate::config::MAX_COMMAND_HISTORY;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: Vec<String>,
    cursor: usize,
    capacity: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMMAND_HISTORY)
    }

    /// Empty history keeping at most `capacity` submitted lines.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: vec![String::new()],
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// History seeded with `lines`, oldest first.
    pub fn seeded<I, S>(lines: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut history = Self::with_capacity(capacity);
        for line in lines {
            history.submit(line.as_ref());
        }
        history
    }

    /// Record a submitted line as the most recent entry.
    ///
    /// Any earlier copy of the same line is dropped, so resubmitting moves it
    /// to the end instead of duplicating it. Drafts saved while navigating
    /// that repeat an older entry are folded into it. The cursor returns to
    /// the draft.
    pub fn submit(&mut self, line: &str) {
        let line = line.trim();

        let mut seen = HashSet::new();
        self.entries
            .retain(|entry| !entry.is_empty() && entry != line && seen.insert(entry.clone()));
        if !line.is_empty() {
            self.entries.push(line.to_string());
        }

        let overflow = self.entries.len().saturating_sub(self.capacity);
        self.entries.drain(..overflow);

        self.entries.push(String::new());
        self.cursor = self.last_index();
    }

    /// Save `draft` into the current slot and step back toward the oldest entry.
    pub fn previous(&mut self, draft: &str) -> String {
        self.entries[self.cursor] = draft.to_string();
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.entries[self.cursor].clone()
    }

    /// Save `draft` into the current slot and step forward toward the draft slot.
    pub fn next(&mut self, draft: &str) -> String {
        self.entries[self.cursor] = draft.to_string();
        if self.cursor < self.last_index() {
            self.cursor += 1;
        }
        self.entries[self.cursor].clone()
    }

    /// Submitted lines, oldest first. An empty draft slot is left out.
    pub fn list(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_empty())
            .cloned()
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn last_index(&self) -> usize {
        self.entries.len() - 1
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
