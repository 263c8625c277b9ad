use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use super::model::PiperError;

/// Location of the espeak-ng binary and its data directory.
#[derive(Debug, Clone, Default)]
pub struct EspeakConfig {
    /// `None` runs `espeak-ng` from PATH.
    pub bin_path: Option<PathBuf>,
    /// `None` uses the data directory compiled into espeak-ng.
    pub data_path: Option<PathBuf>,
}

impl EspeakConfig {
    fn command(&self) -> Command {
        let mut cmd = match &self.bin_path {
            Some(bin) => Command::new(bin),
            None => Command::new("espeak-ng"),
        };
        if let Some(data) = &self.data_path {
            let mut arg = std::ffi::OsString::from("--path=");
            arg.push(data);
            cmd.arg(arg);
        }
        cmd
    }
}

/// Convert text to IPA phoneme strings via espeak-ng, one per sentence line
/// that espeak-ng emits. Blank lines are dropped.
pub fn phonemize(text: &str, voice: &str, espeak: &EspeakConfig) -> Result<Vec<String>, PiperError> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Ok(Vec::new());
    }

    let output = run_espeak(&normalized, voice, espeak)?;
    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Collapse runs of spaces and tabs while keeping line breaks, which
/// espeak-ng treats as sentence boundaries.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_espeak(input: &str, voice: &str, espeak: &EspeakConfig) -> Result<String, PiperError> {
    let mut child = espeak
        .command()
        .args(["--ipa", "--stdin", "-q", "-v", voice])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PiperError::EspeakNotFound
            } else {
                PiperError::Io(e)
            }
        })?;

    // Feed stdin from another thread so a full stdout pipe cannot block the
    // writer while nobody is reading.
    let writer = child.stdin.take().map(|mut stdin| {
        // espeak-ng under-processes a final line that lacks a terminator.
        let stdin_payload = canonicalize_espeak_stdin_payload(input).into_owned();
        thread::spawn(move || stdin.write_all(stdin_payload.as_bytes()))
    });

    let output = child.wait_with_output().map_err(PiperError::Io)?;

    let written = match writer {
        Some(writer) => writer
            .join()
            .map_err(|_| PiperError::PhonemizerFailed("stdin writer panicked".to_string()))?,
        None => Ok(()),
    };

    // A failed exit explains a broken stdin pipe, so report it first.
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PiperError::PhonemizerFailed(format!(
            "espeak-ng exited with code {:?}: {stderr}",
            output.status.code()
        )));
    }
    written.map_err(PiperError::Io)?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn canonicalize_espeak_stdin_payload(input: &str) -> Cow<'_, str> {
    if input.ends_with('\n') {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("{input}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize_espeak_stdin_payload, normalize_whitespace, phonemize, EspeakConfig};
    use std::process::Command;

    #[test]
    fn collapses_spaces_but_keeps_lines() {
        assert_eq!(
            normalize_whitespace("  Hello \t world.\n\n  Next   line "),
            "Hello world.\nNext line"
        );
    }

    #[test]
    fn appends_trailing_newline_for_espeak_stdin() {
        assert_eq!(canonicalize_espeak_stdin_payload("America"), "America\n");
        assert_eq!(canonicalize_espeak_stdin_payload("America\n"), "America\n");
    }

    #[test]
    fn blank_text_needs_no_espeak() {
        let espeak = EspeakConfig {
            bin_path: Some("/nonexistent/espeak-ng".into()),
            data_path: None,
        };
        assert!(phonemize(" \n\t ", "en-us", &espeak).unwrap().is_empty());
    }

    #[test]
    fn missing_binary_is_reported() {
        let espeak = EspeakConfig {
            bin_path: Some("/nonexistent/espeak-ng".into()),
            data_path: None,
        };
        assert!(matches!(
            phonemize("hello", "en-us", &espeak),
            Err(super::PiperError::EspeakNotFound)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn large_input_does_not_deadlock_on_pipes() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in for espeak-ng that echoes stdin, so output grows with input.
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("echo-espeak");
        std::fs::write(&bin, "#!/bin/sh\nexec cat\n").unwrap();
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755)).unwrap();

        let espeak = EspeakConfig {
            bin_path: Some(bin),
            data_path: None,
        };
        let text = "hello world.\n".repeat(20_000);
        let lines = phonemize(&text, "en-us", &espeak).unwrap();
        assert_eq!(lines.len(), 20_000);
        assert!(lines.iter().all(|line| line == "hello world."));
    }

    #[test]
    fn phonemizes_english_with_stress_marks() {
        // Skip when espeak-ng is unavailable in the execution environment.
        if Command::new("espeak-ng").arg("--version").output().is_err() {
            return;
        }

        let lines = phonemize("America", "en-us", &EspeakConfig::default())
            .expect("espeak should succeed");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('ˈ'), "got {:?}", lines[0]);
    }
}
