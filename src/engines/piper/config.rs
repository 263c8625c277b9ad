use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::model::PiperError;

/// Beginning-of-sentence phoneme.
pub const BOS: char = '^';
/// End-of-sentence phoneme.
pub const EOS: char = '$';
/// Padding phoneme interleaved after every phoneme.
pub const PAD: char = '_';

/// Contents of a Piper `<voice>.onnx.json` file.
#[derive(Debug, Clone, Deserialize)]
pub struct PiperConfig {
    pub audio: AudioConfig,
    #[serde(default)]
    pub espeak: EspeakVoice,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default = "default_num_speakers")]
    pub num_speakers: u32,
    /// Phoneme (single code point) to one or more model token ids.
    pub phoneme_id_map: HashMap<String, Vec<i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EspeakVoice {
    pub voice: String,
}

impl Default for EspeakVoice {
    fn default() -> Self {
        Self {
            voice: "en-us".to_string(),
        }
    }
}

/// Default VITS sampling scales shipped with the voice.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub noise_scale: f32,
    pub length_scale: f32,
    pub noise_w: f32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            noise_scale: 0.667,
            length_scale: 1.0,
            noise_w: 0.8,
        }
    }
}

fn default_num_speakers() -> u32 {
    1
}

/// Path of the config that accompanies `model_path` (`voice.onnx.json`).
pub fn config_path_for(model_path: &Path) -> PathBuf {
    let mut name = model_path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Load a Piper voice config from disk.
pub fn load_config(config_path: &Path) -> Result<PiperConfig, PiperError> {
    if !config_path.exists() {
        return Err(PiperError::Config(format!(
            "voice config not found at {}",
            config_path.display()
        )));
    }
    let content = std::fs::read_to_string(config_path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<PiperConfig, PiperError> {
    let config: PiperConfig = serde_json::from_str(content)
        .map_err(|e| PiperError::Config(format!("Failed to parse JSON: {e}")))?;

    for required in [BOS, EOS, PAD] {
        if !config.phoneme_id_map.contains_key(required.to_string().as_str()) {
            return Err(PiperError::Config(format!(
                "phoneme_id_map is missing {required:?}"
            )));
        }
    }

    Ok(config)
}

/// Key the phoneme map by `char`, dropping multi-character entries.
pub fn phoneme_map(config: &PiperConfig) -> HashMap<char, Vec<i64>> {
    let mut map = HashMap::with_capacity(config.phoneme_id_map.len());
    for (key, ids) in &config.phoneme_id_map {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => {
                map.insert(ch, ids.clone());
            }
            _ => log::debug!("Skipping multi-character phoneme {key:?}"),
        }
    }
    map
}
