use std::path::PathBuf;

/// Boxed error type returned by synthesis engines across the trait boundary.
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

#[derive(thiserror::Error, Debug)]
pub enum TtsError {
    #[error("{0}")]
    Usage(String),
    #[error("no voice model found (tried: {})", display_paths(.tried))]
    ModelNotFound { tried: Vec<PathBuf> },
    #[error("failed to load voice model {}: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
    #[error("synthesis failed: {0}")]
    SynthesisFailed(#[source] EngineError),
    #[error("synthesis produced no audio")]
    NoAudioProduced,
    #[error("failed to read input text from {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("WAV write error: {0}")]
    Wav(#[from] hound::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_lists_every_tried_path() {
        let err = TtsError::ModelNotFound {
            tried: vec![PathBuf::from("voices/a.onnx"), PathBuf::from("voices/b.onnx")],
        };
        assert_eq!(
            err.to_string(),
            "no voice model found (tried: voices/a.onnx, voices/b.onnx)"
        );
    }

    #[test]
    fn synthesis_failure_keeps_engine_cause() {
        let cause: EngineError = "espeak-ng exited with code 1".into();
        let err = TtsError::SynthesisFailed(cause);
        let source = std::error::Error::source(&err).expect("cause should be preserved");
        assert_eq!(source.to_string(), "espeak-ng exited with code 1");
    }
}
