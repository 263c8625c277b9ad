//! # piper-say
//!
//! Text-to-speech to WAV with Piper voices.
//!
//! ## Features
//!
//! - **Voice selection**: Chinese text picks the best installed Chinese voice,
//!   degrading to lower-quality voices before falling back to English
//! - **Prosody pauses**: prosody-aware voices are driven sentence by sentence,
//!   with silence after each terminal punctuation mark
//! - **Piper engine**: runs Piper ONNX voices through onnxruntime
//!   (`piper` feature, espeak-ng required)
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! piper-say = { version = "2026.10", features = ["piper"] }
//! ```
//!
//! ```ignore
//! use std::path::Path;
//! use piper_say::{
//!     contains_cjk, select_voice, synthesize_to_file, SynthesisEngine, SynthesisOptions,
//!     engines::piper::PiperEngine,
//! };
//!
//! let text = "你好。世界！";
//! let voice = select_voice(contains_cjk(text), None, Path::new("voices"))?;
//!
//! let mut engine = PiperEngine::new();
//! engine.load_model(&voice.path)?;
//! synthesize_to_file(&mut engine, text, &voice, None, &SynthesisOptions::default(), Path::new("out.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod audio;
pub mod config;
pub mod driver;
pub mod engines;
pub mod error;
pub mod input;
pub mod language;
pub mod pause;
pub mod segment;
pub mod voice;

use std::path::Path;

pub use audio::{AudioBuffer, DEFAULT_SAMPLE_RATE};
pub use driver::{synthesize, synthesize_to_file, SynthesisOptions, SynthesisOptionsBuilder};
pub use error::{EngineError, TtsError};
pub use language::contains_cjk;
pub use pause::PauseTable;
pub use segment::{segment_text, TextSegment};
pub use voice::{select_voice, VoiceKind, VoiceModelRef};

/// A piece of audio produced by a synthesis engine.
///
/// Engines may split their output arbitrarily; consumers only concatenate
/// chunks in the order they were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisChunk {
    /// Mono 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate of this chunk, if the engine reports one.
    pub sample_rate: Option<u32>,
}

/// Common interface for text-to-speech synthesis engines.
///
/// Each engine may have different parameter types for model loading and
/// inference configuration.
pub trait SynthesisEngine {
    /// Parameters for configuring inference behavior (speaker, speed, etc.)
    type SynthesisParams;
    /// Parameters for configuring model loading (threads, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), EngineError> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), EngineError>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given text, in playback order.
    fn synthesize(
        &mut self,
        text: &str,
        params: Option<Self::SynthesisParams>,
    ) -> Result<Vec<SynthesisChunk>, EngineError>;
}
