use std::path::{Path, PathBuf};

use crate::{EngineError, SynthesisChunk, SynthesisEngine};

use super::model::{PiperError, PiperModel, Scales};
use super::phonemizer::EspeakConfig;

/// Parameters for configuring Piper model loading.
#[derive(Debug, Clone, Default)]
pub struct PiperModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the ORT default (typically all available cores).
    pub num_threads: Option<usize>,
}

/// Parameters for configuring a Piper synthesis request.
///
/// `None` fields use the values from the voice's `.onnx.json`.
#[derive(Debug, Clone, Default)]
pub struct PiperInferenceParams {
    /// Speaker index for multi-speaker voices.
    pub speaker_id: Option<i64>,
    /// Phoneme duration multiplier; larger is slower speech.
    pub length_scale: Option<f32>,
    pub noise_scale: Option<f32>,
    pub noise_w: Option<f32>,
}

/// Piper text-to-speech engine.
///
/// Runs Piper VITS voices exported to ONNX. Requires espeak-ng for
/// phonemization.
///
/// ```rust,no_run
/// use piper_say::{SynthesisEngine, engines::piper::PiperEngine};
/// use std::path::PathBuf;
///
/// let mut engine = PiperEngine::new();
/// engine.load_model(&PathBuf::from("voices/en_US-libritts-high.onnx"))?;
/// let chunks = engine.synthesize("Hello, world!", None)?;
/// # Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
/// ```
pub struct PiperEngine {
    model: Option<PiperModel>,
    model_path: Option<PathBuf>,
    espeak: EspeakConfig,
}

impl Default for PiperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PiperEngine {
    /// Create a new engine that uses `espeak-ng` from PATH.
    pub fn new() -> Self {
        Self::with_espeak(None, None)
    }

    /// Create a new engine with explicit espeak-ng binary and data paths.
    ///
    /// Either path can be `None` to fall back to the system default.
    pub fn with_espeak(bin_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Self {
        Self {
            model: None,
            model_path: None,
            espeak: EspeakConfig {
                bin_path,
                data_path,
            },
        }
    }

    /// Path of the loaded voice, if any.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Output sample rate of the loaded voice.
    pub fn sample_rate(&self) -> Option<u32> {
        self.model.as_ref().map(|m| m.config().audio.sample_rate)
    }
}

impl Drop for PiperEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for PiperEngine {
    type SynthesisParams = PiperInferenceParams;
    type ModelParams = PiperModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), EngineError> {
        let model = PiperModel::load(model_path, params.num_threads)?;
        self.model = Some(model);
        self.model_path = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Vec<SynthesisChunk>, EngineError> {
        let model = self.model.as_mut().ok_or(PiperError::ModelNotLoaded)?;

        let p = params.unwrap_or_default();
        let defaults = &model.config().inference;
        let scales = Scales {
            noise_scale: p.noise_scale.unwrap_or(defaults.noise_scale),
            length_scale: p.length_scale.unwrap_or(defaults.length_scale),
            noise_w: p.noise_w.unwrap_or(defaults.noise_w),
        };

        Ok(model.synthesize_text(text, scales, p.speaker_id, &self.espeak)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesize_without_model_fails() {
        let mut engine = PiperEngine::new();
        let err = engine.synthesize("hello", None).unwrap_err();
        assert!(err.to_string().starts_with("Model not loaded"));
        assert_eq!(engine.sample_rate(), None);
    }

    #[test]
    fn missing_voice_config_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("voice.onnx");
        std::fs::write(&model, b"not a model").unwrap();

        let mut engine = PiperEngine::new();
        let err = engine.load_model(&model).unwrap_err();
        assert!(err.to_string().contains("voice.onnx.json"), "got {err}");
        assert!(engine.model_path().is_none());
    }
}
