use std::path::Path;

use crate::error::TtsError;

/// Resolve the text argument: an existing `.txt` file is read as UTF-8,
/// anything else is taken literally.
pub fn resolve_input_text(arg: &str) -> Result<String, TtsError> {
    let path = Path::new(arg);
    if arg.to_lowercase().ends_with(".txt") && path.is_file() {
        let text = std::fs::read_to_string(path).map_err(|source| TtsError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Read input text from {}", path.display());
        return Ok(text);
    }

    log::info!("Using argument as literal text");
    Ok(arg.to_string())
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_existing_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.TXT");
        std::fs::write(&path, "你好。世界！\n").unwrap();

        let text = resolve_input_text(path.to_str().unwrap()).unwrap();
        assert_eq!(text, "你好。世界！\n");
    }

    #[test]
    fn missing_text_file_is_literal() {
        assert_eq!(
            resolve_input_text("does/not/exist.txt").unwrap(),
            "does/not/exist.txt"
        );
    }

    #[test]
    fn non_txt_path_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.md");
        std::fs::write(&path, "ignored").unwrap();

        let arg = path.to_str().unwrap();
        assert_eq!(resolve_input_text(arg).unwrap(), arg);
    }

    #[test]
    fn invalid_utf8_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        assert!(matches!(
            resolve_input_text(path.to_str().unwrap()),
            Err(TtsError::ReadInput { .. })
        ));
    }

    #[test]
    fn preview_truncates_by_characters() {
        assert_eq!(preview("你好世界", 2), "你好...");
        assert_eq!(preview("short", 30), "short");
        assert_eq!(preview("exact", 5), "exact");
    }
}
