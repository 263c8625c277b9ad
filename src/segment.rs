//! Sentence segmentation for prosody-aware voices.
//!
//! Text is cut at sentence-terminal punctuation. Each piece keeps the
//! punctuation that closed it so the driver can look up a pause for it.

/// Sentence-terminal characters, ASCII and full-width forms.
pub const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?', '。', '！', '？'];

/// One sentence of input text and the punctuation that ended it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    /// Trimmed sentence text. May be empty when terminals are adjacent.
    pub content: String,
    /// `None` only for an unterminated tail.
    pub trailing_punctuation: Option<char>,
}

impl TextSegment {
    pub fn new(content: impl Into<String>, trailing_punctuation: Option<char>) -> Self {
        Self {
            content: content.into(),
            trailing_punctuation,
        }
    }
}

/// Split `text` into ordered sentence segments.
///
/// Text without any terminal punctuation yields exactly one segment holding
/// the trimmed input. A trailing piece that is empty after trimming is
/// dropped when at least one terminated segment precedes it.
pub fn segment_text(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut start = 0usize;

    for (idx, ch) in text.char_indices() {
        if !is_terminal(text, idx, ch) {
            continue;
        }
        segments.push(TextSegment::new(text[start..idx].trim(), Some(ch)));
        start = idx + ch.len_utf8();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() || segments.is_empty() {
        segments.push(TextSegment::new(tail, None));
    }

    segments
}

fn is_terminal(text: &str, idx: usize, ch: char) -> bool {
    TERMINAL_PUNCTUATION.contains(&ch) && !is_decimal_point(text, idx, ch)
}

// "3.14" reads as one number, not two sentences.
fn is_decimal_point(text: &str, idx: usize, ch: char) -> bool {
    if ch != '.' {
        return false;
    }

    let prev = text[..idx].chars().next_back();
    let next = text[idx + ch.len_utf8()..].chars().next();

    matches!(
        (prev, next),
        (Some(left), Some(right)) if left.is_ascii_digit() && right.is_ascii_digit()
    )
}
