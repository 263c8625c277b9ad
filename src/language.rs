//! Script detection used to bias default voice selection.

/// Returns true if `text` contains at least one CJK Unified Ideograph
/// in the range U+4E00..=U+9FA5.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|ch| ('\u{4e00}'..='\u{9fa5}').contains(&ch))
}

#[cfg(test)]
mod tests {
    use super::contains_cjk;

    #[test]
    fn detects_ideographs_anywhere_in_text() {
        assert!(contains_cjk("你好"));
        assert!(contains_cjk("Hello 世界!"));
        assert!(contains_cjk("a\u{4e00}"));
        assert!(contains_cjk("\u{9fa5}"));
    }

    #[test]
    fn ascii_and_other_scripts_are_not_cjk() {
        assert!(!contains_cjk(""));
        assert!(!contains_cjk("Hello, world. 3.14!"));
        // Full-width punctuation alone is outside the ideograph range.
        assert!(!contains_cjk("。！？"));
        assert!(!contains_cjk("\u{9fa6}"));
        assert!(!contains_cjk("こんにちは"));
    }
}
