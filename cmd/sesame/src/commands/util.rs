//! Shared helpers for commands: config, store, recording input, output.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use sesame_cli::{load_config, Config, Output};
use sesame_voicegate::{
    capture, CaptureConfig, Extractor, Matcher, PcmSampler, PcmSamplerConfig, RedbStore, Sample,
    VecSource, VoiceGate, VoicegateError,
};
use tracing::debug;

use crate::Cli;

/// App name used for the config directory.
pub const APP_NAME: &str = "sesame";

/// Where a recording comes from.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Sample file (JSON or YAML list of {timestamp, volume, peakAmplitude})
    #[arg(short = 'f', long = "file", conflicts_with = "pcm")]
    pub file: Option<PathBuf>,

    /// Raw PCM16 signed little-endian mono audio
    #[arg(long)]
    pub pcm: Option<PathBuf>,

    /// Sample rate of the PCM input in Hz
    #[arg(long, default_value_t = 16000)]
    pub sample_rate: usize,
}

impl InputArgs {
    /// Loads the recording and runs it through a capture session, so the
    /// time budget and ordering rules apply to file input as they do live.
    pub fn load_samples(&self, cfg: CaptureConfig) -> anyhow::Result<Vec<Sample>> {
        match (&self.file, &self.pcm) {
            (Some(path), _) => {
                let samples = read_sample_file(path)?;
                let started_at = samples.first().map(|s| s.timestamp).unwrap_or(0);
                debug!(path = %path.display(), count = samples.len(), "loaded sample file");
                let mut src = VecSource::new(samples);
                capture(&mut src, cfg, started_at).map_err(explain)
            }
            (None, Some(path)) => {
                let audio = std::fs::read(path)
                    .with_context(|| format!("read pcm file {}", path.display()))?;
                let mut src = PcmSampler::new(
                    &audio,
                    PcmSamplerConfig {
                        sample_rate: self.sample_rate,
                        ..PcmSamplerConfig::default()
                    },
                );
                debug!(path = %path.display(), ticks = src.tick_count(), "loaded pcm file");
                capture(&mut src, cfg, 0).map_err(explain)
            }
            (None, None) => anyhow::bail!("a recording is required: use -f <file> or --pcm <file>"),
        }
    }
}

/// Parses a sample file. `.json` files are read as JSON, anything else as YAML.
pub fn read_sample_file(path: &Path) -> anyhow::Result<Vec<Sample>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read sample file {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let samples: Vec<Sample> = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(samples)
}

/// Loads the CLI config, honoring `--config`.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref().map(Path::new))
}

/// Opens the gate over the configured redb store, honoring `--store`.
pub fn open_gate(cli: &Cli, cfg: &Config) -> anyhow::Result<VoiceGate<RedbStore>> {
    let path = match &cli.store {
        Some(p) => PathBuf::from(p),
        None => cfg.store_path(),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    debug!(path = %path.display(), "opening fingerprint store");
    let store = RedbStore::open(&path)
        .with_context(|| format!("open fingerprint store {}", path.display()))?;
    Ok(VoiceGate::with_parts(
        store,
        Extractor::with_config(cfg.extractor_config()),
        Matcher::with_config(cfg.matcher_config()),
    ))
}

/// Converts a voicegate error into a user-facing error. Recoverable errors
/// lead with the prompt the speaker should see.
pub fn explain(err: VoicegateError) -> anyhow::Error {
    if err.is_recoverable() {
        anyhow::anyhow!("{} ({})", err.user_prompt(), err)
    } else {
        anyhow::Error::new(err)
    }
}

/// Writes a result using the global output flags.
pub fn output_result<T: Serialize>(value: &T, cli: &Cli) -> anyhow::Result<()> {
    Output::from_flags(cli.json, cli.output.clone()).write(value)
}

/// Prints a status line to stderr.
pub fn print_status(message: &str) {
    eprintln!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_json_and_yaml_samples() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("take.json");
        std::fs::write(
            &json,
            r#"[{"timestamp":0,"volume":0.1,"peakAmplitude":140},{"time":16,"volume":0.2,"peak":150}]"#,
        )
        .unwrap();
        let samples = read_sample_file(&json).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].timestamp, 16);
        assert_eq!(samples[1].peak_amplitude, 150.0);

        let yaml = dir.path().join("take.yaml");
        std::fs::write(&yaml, "- timestamp: 0\n  volume: 0.3\n- timestamp: 16\n  volume: 0.4\n")
            .unwrap();
        let samples = read_sample_file(&yaml).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].volume, 0.3);
    }

    #[test]
    fn sample_file_respects_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.json");
        let samples: Vec<Sample> = (0..400).map(|i| Sample::new(1000 + i * 16, 0.2, 0.0)).collect();
        std::fs::write(&path, serde_json::to_string(&samples).unwrap()).unwrap();

        let input = InputArgs {
            file: Some(path),
            pcm: None,
            sample_rate: 16000,
        };
        let got = input.load_samples(CaptureConfig::default()).unwrap();
        assert_eq!(got.len(), 313);
    }

    #[test]
    fn out_of_order_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"[{"timestamp":100,"volume":0.1},{"timestamp":50,"volume":0.1}]"#,
        )
        .unwrap();
        let input = InputArgs {
            file: Some(path),
            pcm: None,
            sample_rate: 16000,
        };
        let err = input.load_samples(CaptureConfig::default()).unwrap_err();
        assert!(err.to_string().contains("earlier than previous"), "{err}");
    }

    #[test]
    fn missing_input() {
        let input = InputArgs {
            file: None,
            pcm: None,
            sample_rate: 16000,
        };
        assert!(input.load_samples(CaptureConfig::default()).is_err());
    }

    #[test]
    fn explain_recoverable() {
        let err = explain(VoicegateError::NoSignal { min: 5, got: 2 });
        assert!(err.to_string().starts_with("No sound detected. Speak louder!"));
    }
}
