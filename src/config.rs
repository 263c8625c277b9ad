//! Runtime configuration shared by the CLI and library callers.

use std::path::{Path, PathBuf};

use crate::driver::SynthesisOptions;
use crate::pause::PauseTable;

/// Environment variable overriding the voices directory.
pub const VOICES_DIR_ENV: &str = "PIPER_SAY_VOICES_DIR";

/// Name of the voices directory next to the executable.
pub const VOICES_DIR_NAME: &str = "voices";

/// Default voices directory: `voices/` beside the running executable, or
/// `./voices` when the executable path is unknown.
pub fn default_voices_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .as_deref()
        .and_then(Path::parent)
        .map(|dir| dir.join(VOICES_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(VOICES_DIR_NAME))
}

/// Driver options with an optional uniform sentence pause override.
pub fn synthesis_options(pause_ms: Option<u32>) -> SynthesisOptions {
    match pause_ms {
        Some(ms) => SynthesisOptions {
            pauses: PauseTable::uniform(ms),
            ..Default::default()
        },
        None => SynthesisOptions::default(),
    }
}
