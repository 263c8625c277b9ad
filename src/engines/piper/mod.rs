//! Piper text-to-speech engine implementation.
//!
//! Runs Piper VITS voices exported to ONNX through onnxruntime, with
//! espeak-ng for phonemization.
//!
//! # System Requirements
//!
//! **espeak-ng** must be installed on your system:
//! - **Linux**: `sudo apt-get install espeak-ng`
//! - **macOS**: `brew install espeak-ng`
//! - **Windows**: Download installer from <https://espeak-ng.org/download>
//!
//! # Voice Directory Layout
//!
//! ```text
//! voices/
//! ├── en_US-libritts-high.onnx
//! ├── en_US-libritts-high.onnx.json
//! ├── zh_CN-huayan-medium.onnx
//! ├── zh_CN-huayan-medium.onnx.json
//! ├── zh_CN-huayan-x_low.onnx
//! └── zh_CN-huayan-x_low.onnx.json
//! ```
//!
//! Every `.onnx` voice needs its `.onnx.json` config beside it. Voices are
//! published at <https://huggingface.co/rhasspy/piper-voices>.
//!
//! # Output
//!
//! The engine yields one [`SynthesisChunk`](crate::SynthesisChunk) per
//! sentence espeak-ng reports, each peak-normalized to 16-bit PCM and tagged
//! with the voice's sample rate.

pub mod config;
pub mod engine;
pub mod model;
pub mod phonemizer;

pub use engine::{PiperEngine, PiperInferenceParams, PiperModelParams};
pub use model::PiperError;
pub use phonemizer::EspeakConfig;
