use std::collections::HashMap;
use std::path::Path;

use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use super::config::{config_path_for, load_config, phoneme_map, PiperConfig, BOS, EOS, PAD};
use super::phonemizer::{phonemize, EspeakConfig};
use crate::SynthesisChunk;

/// Floor for peak normalization so near-silent output is not blown up.
const MIN_PEAK: f32 = 0.01;

#[derive(thiserror::Error, Debug)]
pub enum PiperError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error(
        "espeak-ng not found. Install: Linux: `sudo apt-get install espeak-ng`, \
         macOS: `brew install espeak-ng`, Windows: https://espeak-ng.org/download"
    )]
    EspeakNotFound,
    #[error("Phonemization failed: {0}")]
    PhonemizerFailed(String),
    #[error("Speaker {0} out of range for this voice ({1} speakers)")]
    SpeakerOutOfRange(i64, u32),
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
    #[error("Invalid voice config: {0}")]
    Config(String),
}

/// VITS sampling scales for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub noise_scale: f32,
    pub length_scale: f32,
    pub noise_w: f32,
}

/// Internal Piper ONNX model state.
pub struct PiperModel {
    session: Session,
    config: PiperConfig,
    phonemes: HashMap<char, Vec<i64>>,
    /// True if the graph takes a `sid` speaker input.
    has_sid_input: bool,
}

impl PiperModel {
    /// Load a Piper voice: `model_path` is the `.onnx` file, and its
    /// `.onnx.json` config must sit next to it.
    pub fn load(model_path: &Path, num_threads: Option<usize>) -> Result<Self, PiperError> {
        let config_path = config_path_for(model_path);
        let config = load_config(&config_path)?;
        let phonemes = phoneme_map(&config);

        log::info!("Loading Piper voice from {}", model_path.display());
        let session = init_session(model_path, num_threads)?;
        let has_sid_input = detect_sid_input(&session);

        log::info!(
            "Detected: espeak_voice='{}', sample_rate={}, speakers={}, sid_input={}",
            config.espeak.voice,
            config.audio.sample_rate,
            config.num_speakers,
            has_sid_input
        );

        Ok(Self {
            session,
            config,
            phonemes,
            has_sid_input,
        })
    }

    pub fn config(&self) -> &PiperConfig {
        &self.config
    }

    /// Synthesize `text`, one chunk per sentence espeak-ng reports.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        scales: Scales,
        speaker_id: Option<i64>,
        espeak: &EspeakConfig,
    ) -> Result<Vec<SynthesisChunk>, PiperError> {
        let speaker = self.resolve_speaker(speaker_id)?;
        let sentences = phonemize(text, &self.config.espeak.voice, espeak)?;
        let sample_rate = self.config.audio.sample_rate;

        let mut chunks = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            let Some(ids) = phonemes_to_ids(sentence, &self.phonemes) else {
                log::warn!("No known phonemes in sentence: {sentence:?}");
                continue;
            };

            let audio = self.synthesize_ids(&ids, scales, speaker)?;
            if audio.is_empty() {
                continue;
            }
            chunks.push(SynthesisChunk {
                samples: audio_to_i16(&audio),
                sample_rate: Some(sample_rate),
            });
        }

        Ok(chunks)
    }

    fn resolve_speaker(&self, speaker_id: Option<i64>) -> Result<Option<i64>, PiperError> {
        if !self.has_sid_input {
            if speaker_id.is_some() {
                log::warn!("Voice has a single speaker, ignoring speaker id");
            }
            return Ok(None);
        }
        let sid = speaker_id.unwrap_or(0);
        if sid < 0 || sid >= self.config.num_speakers as i64 {
            return Err(PiperError::SpeakerOutOfRange(sid, self.config.num_speakers));
        }
        Ok(Some(sid))
    }

    /// Run ONNX inference on a single sentence of phoneme token IDs.
    fn synthesize_ids(
        &mut self,
        ids: &[i64],
        scales: Scales,
        speaker: Option<i64>,
    ) -> Result<Vec<f32>, PiperError> {
        let input = Array2::from_shape_vec((1, ids.len()), ids.to_vec())?;
        let input_lengths = ndarray::arr1(&[ids.len() as i64]);
        let scales_arr = ndarray::arr1(&[scales.noise_scale, scales.length_scale, scales.noise_w]);

        let output = match speaker {
            Some(sid) => {
                let sid_arr = ndarray::arr1(&[sid]);
                let inputs = inputs![
                    "input" => TensorRef::from_array_view(input.view())?,
                    "input_lengths" => TensorRef::from_array_view(input_lengths.view())?,
                    "scales" => TensorRef::from_array_view(scales_arr.view())?,
                    "sid" => TensorRef::from_array_view(sid_arr.view())?,
                ];
                self.session.run(inputs)?
            }
            None => {
                let inputs = inputs![
                    "input" => TensorRef::from_array_view(input.view())?,
                    "input_lengths" => TensorRef::from_array_view(input_lengths.view())?,
                    "scales" => TensorRef::from_array_view(scales_arr.view())?,
                ];
                self.session.run(inputs)?
            }
        };

        // Waveform is the first output, shaped [1, 1, samples].
        let first_output = output
            .iter()
            .next()
            .ok_or_else(|| PiperError::Ort(ort::Error::new("No output from model")))?;
        let waveform = first_output.1.try_extract_array::<f32>()?;

        Ok(waveform.iter().copied().collect())
    }
}

/// Map one sentence of IPA to model ids: BOS, then every known phoneme
/// followed by PAD, then EOS. `None` when no phoneme of the sentence is known.
pub fn phonemes_to_ids(ipa: &str, phonemes: &HashMap<char, Vec<i64>>) -> Option<Vec<i64>> {
    let mut ids = Vec::with_capacity(ipa.chars().count() * 2 + 3);
    let pad = phonemes.get(&PAD).map(Vec::as_slice).unwrap_or(&[]);

    if let Some(bos) = phonemes.get(&BOS) {
        ids.extend_from_slice(bos);
    }
    ids.extend_from_slice(pad);

    let mut kept = 0usize;
    for ch in ipa.chars() {
        match phonemes.get(&ch) {
            Some(phoneme_ids) => {
                ids.extend_from_slice(phoneme_ids);
                ids.extend_from_slice(pad);
                kept += 1;
            }
            None => log::debug!("Dropping unknown phoneme {ch:?}"),
        }
    }

    if kept == 0 {
        return None;
    }

    if let Some(eos) = phonemes.get(&EOS) {
        ids.extend_from_slice(eos);
    }
    Some(ids)
}

/// Scale float audio to full 16-bit range by its peak and clip.
pub fn audio_to_i16(audio: &[f32]) -> Vec<i16> {
    let peak = audio.iter().fold(0f32, |max, s| max.max(s.abs()));
    let gain = i16::MAX as f32 / peak.max(MIN_PEAK);
    audio
        .iter()
        .map(|&s| (s * gain).clamp(i16::MIN as f32, i16::MAX as f32) as i16)
        .collect()
}

fn init_session(onnx_path: &Path, num_threads: Option<usize>) -> Result<Session, PiperError> {
    let providers = vec![CPUExecutionProvider::default().build()];

    let mut builder = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_execution_providers(providers)?;

    if let Some(threads) = num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(onnx_path)?)
}

/// Detect whether the graph expects a speaker id input.
fn detect_sid_input(session: &Session) -> bool {
    session.inputs().iter().any(|input| input.name() == "sid")
}
