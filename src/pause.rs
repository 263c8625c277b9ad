use std::collections::HashMap;

use crate::segment::TERMINAL_PUNCTUATION;

/// Default pause after a sentence terminal, in milliseconds.
pub const SENTENCE_PAUSE_MS: u32 = 500;

/// Silence to insert after each punctuation character, in milliseconds.
///
/// The table covers exactly the characters the segmenter splits on, so every
/// entry is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauseTable {
    entries: HashMap<char, u32>,
}

impl Default for PauseTable {
    fn default() -> Self {
        Self::uniform(SENTENCE_PAUSE_MS)
    }
}

impl PauseTable {
    /// Same pause for every sentence terminal.
    pub fn uniform(millis: u32) -> Self {
        Self::from_entries(TERMINAL_PUNCTUATION.iter().map(|&ch| (ch, millis)))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (char, u32)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Pause for `punct`, or 0 when it has no entry.
    pub fn lookup(&self, punct: char) -> u32 {
        self.entries.get(&punct).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_terminals_pause_half_a_second() {
        let table = PauseTable::default();
        for ch in ['.', '。', '!', '！', '?', '？'] {
            assert_eq!(table.lookup(ch), 500, "pause for {ch:?}");
        }
    }

    #[test]
    fn unknown_punctuation_gets_no_pause() {
        let table = PauseTable::default();
        for ch in [',', '，', ';', '；', ':', '：', '-', '—', 'a'] {
            assert_eq!(table.lookup(ch), 0, "pause for {ch:?}");
        }
    }

    #[test]
    fn every_entry_is_a_segment_terminal() {
        let table = PauseTable::default();
        assert_eq!(table.len(), TERMINAL_PUNCTUATION.len());
        for (ch, _) in &table.entries {
            assert!(TERMINAL_PUNCTUATION.contains(ch));
        }
    }

    #[test]
    fn uniform_overrides_duration() {
        let table = PauseTable::uniform(250);
        assert_eq!(table.lookup('。'), 250);
        assert_eq!(table.lookup(','), 0);
    }
}
