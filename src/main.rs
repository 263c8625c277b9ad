use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{info, warn};

use piper_say::config::{default_voices_dir, synthesis_options, VOICES_DIR_ENV};
use piper_say::engines::piper::{PiperEngine, PiperInferenceParams, PiperModelParams};
use piper_say::input::{preview, resolve_input_text};
use piper_say::{contains_cjk, select_voice, synthesize_to_file, SynthesisEngine, TtsError};

#[derive(Parser, Debug)]
#[command(version, about = "Synthesize speech from text into a WAV file")]
struct Args {
    #[arg(help = "text to speak, or a path to a .txt file")]
    input: String,

    #[arg(help = "output WAV path")]
    output: PathBuf,

    #[arg(help = "voice model file name inside the voices directory")]
    voice: Option<String>,

    #[arg(long, env = VOICES_DIR_ENV, help = "directory holding .onnx voices")]
    voices_dir: Option<PathBuf>,

    #[arg(long, help = "speaker index for multi-speaker voices")]
    speaker: Option<i64>,

    #[arg(long, help = "phoneme duration multiplier (larger is slower)")]
    length_scale: Option<f32>,

    #[arg(long, help = "pause after each sentence for prosody-aware voices, in ms")]
    pause_ms: Option<u32>,

    #[arg(long, help = "inference threads (default: all cores)")]
    threads: Option<usize>,

    #[arg(long, help = "path to the espeak-ng binary if it's not in your $PATH")]
    espeak_bin: Option<PathBuf>,

    #[arg(long, help = "path to espeak-ng-data")]
    espeak_data: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "verbose level logging")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if !e.use_stderr() {
                let _ = e.print();
                return ExitCode::SUCCESS;
            }
            eprintln!("{}", TtsError::Usage(e.render().to_string()));
            return ExitCode::FAILURE;
        }
    };

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), TtsError> {
    let text = resolve_input_text(&args.input)?;
    info!("Input: {} characters, preview: {}", text.chars().count(), preview(&text, 30));

    let has_cjk = contains_cjk(&text);
    let voices_dir = args.voices_dir.unwrap_or_else(default_voices_dir);
    let voice = select_voice(has_cjk, args.voice.as_deref(), &voices_dir)?;
    if has_cjk && voice.is_english() {
        warn!("Text contains Chinese but the selected voice is English; Chinese will not be pronounced correctly");
    }

    let mut engine = PiperEngine::with_espeak(args.espeak_bin, args.espeak_data);
    let load_start = Instant::now();
    engine
        .load_model_with_params(
            &voice.path,
            PiperModelParams {
                num_threads: args.threads,
            },
        )
        .map_err(|source| TtsError::ModelLoad {
            path: voice.path.clone(),
            source,
        })?;
    info!("Voice loaded in {:.2?}", load_start.elapsed());

    let params = PiperInferenceParams {
        speaker_id: args.speaker,
        length_scale: args.length_scale,
        ..Default::default()
    };

    let synth_start = Instant::now();
    let buffer = synthesize_to_file(
        &mut engine,
        &text,
        &voice,
        Some(params),
        &synthesis_options(args.pause_ms),
        &args.output,
    )?;
    let synth_dur = synth_start.elapsed();

    let size = std::fs::metadata(&args.output)?.len();
    info!(
        "Wrote {} ({} bytes, {:.2}s audio, {:.1}x real-time)",
        args.output.display(),
        size,
        buffer.duration_secs(),
        buffer.duration_secs() / synth_dur.as_secs_f64()
    );

    engine.unload_model();
    Ok(())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
