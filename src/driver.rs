//! Synthesis driver: runs the engine over the input text and assembles the
//! final waveform.
//!
//! Prosody-aware voices get the text sentence by sentence, with silence
//! after each terminal punctuation mark looked up in the [`PauseTable`].
//! Every other voice gets the whole text in a single engine call.

use std::path::Path;

use derive_builder::Builder;

use crate::audio::{AudioBuffer, DEFAULT_SAMPLE_RATE};
use crate::error::TtsError;
use crate::pause::PauseTable;
use crate::segment::{segment_text, TextSegment};
use crate::voice::VoiceModelRef;
use crate::SynthesisEngine;

/// Options for one synthesis run.
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct SynthesisOptions {
    /// Sample rate assumed until the engine reports one.
    pub default_sample_rate: u32,
    /// Pause durations for prosody-aware voices.
    pub pauses: PauseTable,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            default_sample_rate: DEFAULT_SAMPLE_RATE,
            pauses: PauseTable::default(),
        }
    }
}

/// Synthesize `text` with the loaded `engine` into an in-memory buffer.
///
/// Fails with [`TtsError::NoAudioProduced`] when the engine contributes no
/// samples at all; inserted pauses do not count as audio.
pub fn synthesize<E>(
    engine: &mut E,
    text: &str,
    voice: &VoiceModelRef,
    params: Option<E::SynthesisParams>,
    options: &SynthesisOptions,
) -> Result<AudioBuffer, TtsError>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    let mut buffer = AudioBuffer::new(options.default_sample_rate);

    let speech_samples = if voice.prosody_aware {
        let segments = segment_text(text);
        log::debug!("Split text into {} segments", segments.len());
        synthesize_segments(engine, &segments, params, &options.pauses, &mut buffer)?
    } else {
        synthesize_into(engine, text, params, &mut buffer)?
    };

    if speech_samples == 0 {
        return Err(TtsError::NoAudioProduced);
    }

    log::info!(
        "Synthesized {:.2}s of audio ({} samples at {} Hz)",
        buffer.duration_secs(),
        buffer.len(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

/// Synthesize `text` and write it to `wav_path`.
///
/// The file is only created once the complete buffer exists, so a failed
/// run leaves no output behind.
pub fn synthesize_to_file<E>(
    engine: &mut E,
    text: &str,
    voice: &VoiceModelRef,
    params: Option<E::SynthesisParams>,
    options: &SynthesisOptions,
    wav_path: &Path,
) -> Result<AudioBuffer, TtsError>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    let buffer = synthesize(engine, text, voice, params, options)?;
    buffer.write_wav(wav_path)?;
    Ok(buffer)
}

/// Run each segment through the engine and follow it with its pause.
/// Returns the number of engine samples appended.
pub fn synthesize_segments<E>(
    engine: &mut E,
    segments: &[TextSegment],
    params: Option<E::SynthesisParams>,
    pauses: &PauseTable,
    buffer: &mut AudioBuffer,
) -> Result<usize, TtsError>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    let mut speech_samples = 0;

    for segment in segments {
        if !segment.content.is_empty() {
            log::debug!("Synthesizing segment {:?}", segment.content);
            speech_samples += synthesize_into(engine, &segment.content, params.clone(), buffer)?;
        }

        if let Some(punct) = segment.trailing_punctuation {
            let millis = pauses.lookup(punct);
            if millis > 0 {
                buffer.append_silence(millis);
            }
        }
    }

    Ok(speech_samples)
}

fn synthesize_into<E: SynthesisEngine>(
    engine: &mut E,
    text: &str,
    params: Option<E::SynthesisParams>,
    buffer: &mut AudioBuffer,
) -> Result<usize, TtsError> {
    let chunks = engine
        .synthesize(text, params)
        .map_err(TtsError::SynthesisFailed)?;

    let mut appended = 0;
    for chunk in &chunks {
        appended += chunk.samples.len();
        buffer.append_chunk(chunk);
    }
    Ok(appended)
}
