//! Voice model selection.
//!
//! Chinese text degrades through the installed Chinese voices before
//! falling back to the English voice. English text uses the English voice
//! only.

use std::path::{Path, PathBuf};

use crate::error::TtsError;

/// Generic English voice, assumed present in every deployment.
pub const ENGLISH_GENERIC_MODEL: &str = "en_US-libritts-high.onnx";
/// Highest-quality Chinese voice; the only prosody-aware one.
pub const CHINESE_MEDIUM_MODEL: &str = "zh_CN-huayan-medium.onnx";
pub const CHINESE_LOW_MODEL: &str = "zh_CN-huayan-x_low.onnx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceKind {
    EnglishGeneric,
    ChineseMedium,
    ChineseLow,
    UserSpecified,
}

/// A resolved voice model on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceModelRef {
    pub path: PathBuf,
    pub kind: VoiceKind,
    /// Synthesize sentence by sentence with punctuation pauses.
    pub prosody_aware: bool,
}

impl VoiceModelRef {
    fn new(path: PathBuf, kind: VoiceKind) -> Self {
        let prosody_aware = match kind {
            VoiceKind::ChineseMedium => true,
            VoiceKind::UserSpecified => {
                path.file_name().and_then(|n| n.to_str()) == Some(CHINESE_MEDIUM_MODEL)
            }
            VoiceKind::EnglishGeneric | VoiceKind::ChineseLow => false,
        };
        Self {
            path,
            kind,
            prosody_aware,
        }
    }

    /// Whether this voice speaks English, judged by its file name.
    pub fn is_english(&self) -> bool {
        match self.kind {
            VoiceKind::EnglishGeneric => true,
            VoiceKind::ChineseMedium | VoiceKind::ChineseLow => false,
            VoiceKind::UserSpecified => self
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("en_")),
        }
    }
}

/// Resolve the voice model for one run.
///
/// An explicit `override_name` wins over language-based selection and must
/// exist under `voices_dir`.
pub fn select_voice(
    has_cjk: bool,
    override_name: Option<&str>,
    voices_dir: &Path,
) -> Result<VoiceModelRef, TtsError> {
    if let Some(name) = override_name {
        let path = voices_dir.join(name);
        if !path.exists() {
            return Err(TtsError::ModelNotFound { tried: vec![path] });
        }
        log::info!("Using requested voice {}", path.display());
        return Ok(VoiceModelRef::new(path, VoiceKind::UserSpecified));
    }

    let candidates: &[(&str, VoiceKind)] = if has_cjk {
        &[
            (CHINESE_MEDIUM_MODEL, VoiceKind::ChineseMedium),
            (CHINESE_LOW_MODEL, VoiceKind::ChineseLow),
            (ENGLISH_GENERIC_MODEL, VoiceKind::EnglishGeneric),
        ]
    } else {
        &[(ENGLISH_GENERIC_MODEL, VoiceKind::EnglishGeneric)]
    };

    let mut tried = Vec::with_capacity(candidates.len());
    for &(file, kind) in candidates {
        let path = voices_dir.join(file);
        if path.exists() {
            if !tried.is_empty() {
                log::warn!(
                    "Preferred voice not installed, falling back to {}",
                    path.display()
                );
            }
            log::info!("Selected voice {} ({kind:?})", path.display());
            return Ok(VoiceModelRef::new(path, kind));
        }
        log::debug!("Voice not found: {}", path.display());
        tried.push(path);
    }

    Err(TtsError::ModelNotFound { tried })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn install(dir: &Path, names: &[&str]) {
        for name in names {
            fs::write(dir.join(name), b"onnx").unwrap();
        }
    }

    #[test]
    fn chinese_prefers_medium_voice() {
        let dir = tempfile::tempdir().unwrap();
        install(
            dir.path(),
            &[CHINESE_MEDIUM_MODEL, CHINESE_LOW_MODEL, ENGLISH_GENERIC_MODEL],
        );

        let voice = select_voice(true, None, dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::ChineseMedium);
        assert_eq!(voice.path, dir.path().join(CHINESE_MEDIUM_MODEL));
        assert!(voice.prosody_aware);
    }

    #[test]
    fn chinese_falls_back_to_low_voice() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[CHINESE_LOW_MODEL, ENGLISH_GENERIC_MODEL]);

        let voice = select_voice(true, None, dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::ChineseLow);
        assert!(!voice.prosody_aware);
    }

    #[test]
    fn chinese_falls_back_to_english_voice() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[ENGLISH_GENERIC_MODEL]);

        let voice = select_voice(true, None, dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::EnglishGeneric);
        assert!(voice.is_english());
    }

    #[test]
    fn chinese_with_no_voices_reports_all_tiers() {
        let dir = tempfile::tempdir().unwrap();

        match select_voice(true, None, dir.path()) {
            Err(TtsError::ModelNotFound { tried }) => assert_eq!(
                tried,
                vec![
                    dir.path().join(CHINESE_MEDIUM_MODEL),
                    dir.path().join(CHINESE_LOW_MODEL),
                    dir.path().join(ENGLISH_GENERIC_MODEL),
                ]
            ),
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn english_never_uses_chinese_voices() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[CHINESE_MEDIUM_MODEL, CHINESE_LOW_MODEL]);

        assert!(matches!(
            select_voice(false, None, dir.path()),
            Err(TtsError::ModelNotFound { .. })
        ));

        install(dir.path(), &[ENGLISH_GENERIC_MODEL]);
        let voice = select_voice(false, None, dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::EnglishGeneric);
        assert!(!voice.prosody_aware);
    }

    #[test]
    fn override_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[ENGLISH_GENERIC_MODEL]);

        match select_voice(false, Some("en_GB-alan-low.onnx"), dir.path()) {
            Err(TtsError::ModelNotFound { tried }) => {
                assert_eq!(tried, vec![dir.path().join("en_GB-alan-low.onnx")])
            }
            other => panic!("expected ModelNotFound, got {other:?}"),
        }
    }

    #[test]
    fn override_wins_over_language() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[CHINESE_MEDIUM_MODEL, "en_GB-alan-low.onnx"]);

        let voice = select_voice(true, Some("en_GB-alan-low.onnx"), dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::UserSpecified);
        assert!(!voice.prosody_aware);
        assert!(voice.is_english());
    }

    #[test]
    fn override_naming_medium_chinese_voice_is_prosody_aware() {
        let dir = tempfile::tempdir().unwrap();
        install(dir.path(), &[CHINESE_MEDIUM_MODEL]);

        let voice = select_voice(false, Some(CHINESE_MEDIUM_MODEL), dir.path()).unwrap();
        assert_eq!(voice.kind, VoiceKind::UserSpecified);
        assert!(voice.prosody_aware);
        assert!(!voice.is_english());
    }
}
