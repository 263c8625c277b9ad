use std::io::BufWriter;
use std::path::Path;

use crate::error::TtsError;
use crate::SynthesisChunk;

/// Sample rate used until an engine chunk reports its own.
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Mono 16-bit PCM accumulated over one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    /// Last sample rate reported by the engine, or the default.
    sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(default_sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate: default_sample_rate,
        }
    }

    /// Append an engine chunk, adopting its sample rate if it reports one.
    ///
    /// The WAV header can carry a single rate, so a chunk that changes the
    /// rate after audio was already buffered relabels everything before it.
    pub fn append_chunk(&mut self, chunk: &SynthesisChunk) {
        if let Some(rate) = chunk.sample_rate {
            if rate != self.sample_rate && !self.samples.is_empty() {
                log::warn!(
                    "Engine switched sample rate mid-run ({} -> {rate} Hz); \
                     earlier audio will play at the new rate",
                    self.sample_rate
                );
            }
            self.sample_rate = rate;
        }
        self.samples.extend_from_slice(&chunk.samples);
    }

    /// Append `millis` of silence at the current sample rate.
    pub fn append_silence(&mut self, millis: u32) {
        let count = (self.sample_rate as u64 * millis as u64 / 1000) as usize;
        self.samples.resize(self.samples.len() + count, 0);
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Raw little-endian 16-bit PCM bytes, as stored in the WAV data chunk.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    /// Write the audio to a mono 16-bit PCM WAV file.
    ///
    /// The file is assembled next to `path` and moved into place only once
    /// complete, so a failed write leaves any existing file untouched.
    pub fn write_wav(&self, path: &Path) -> Result<(), TtsError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut writer =
                hound::WavWriter::new(BufWriter::new(tmp.as_file_mut()), spec).map_err(wav_error)?;
            for &sample in &self.samples {
                writer.write_sample(sample).map_err(wav_error)?;
            }
            writer.finalize().map_err(wav_error)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| TtsError::Io(e.error))?;
        Ok(())
    }
}

fn wav_error(err: hound::Error) -> TtsError {
    match err {
        hound::Error::IoError(e) => TtsError::Io(e),
        other => TtsError::Wav(other),
    }
}
