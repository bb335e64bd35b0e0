//! Configuration management for sesame tools.
//!
//! Configuration is stored in ~/.sesame/{app_name}/config.yaml. Every
//! section is optional; missing sections use the built-in matching rules.
//!
//! ```yaml
//! store: /var/lib/sesame/fingerprint.redb
//! extractor:
//!   silence_threshold: 0.01
//! matcher:
//!   rhythm_tolerance: 0.4
//!   min_agreement: 3
//! capture:
//!   max_duration_ms: 5000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sesame_voicegate::{CaptureConfig, ExtractorConfig, MatcherConfig};

use crate::paths::{store_file_in, Paths};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application name (not serialized).
    #[serde(skip)]
    pub app_name: String,

    /// Fingerprint store path (optional, defaults next to the config file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,

    /// Feature extraction overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<ExtractorConfig>,

    /// Matching tolerance overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<MatcherConfig>,

    /// Capture window overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureConfig>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

impl Config {
    /// Returns the config file path.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Returns the config directory path.
    pub fn dir(&self) -> Option<&Path> {
        self.config_path.parent()
    }

    /// Returns the effective extractor configuration.
    pub fn extractor_config(&self) -> ExtractorConfig {
        self.extractor.clone().unwrap_or_default()
    }

    /// Returns the effective matcher configuration.
    pub fn matcher_config(&self) -> MatcherConfig {
        self.matcher.clone().unwrap_or_default()
    }

    /// Returns the effective capture configuration.
    pub fn capture_config(&self) -> CaptureConfig {
        self.capture.clone().unwrap_or_default()
    }

    /// Resolves the store path: the configured one, or `data/fingerprint.redb`
    /// next to the config file.
    pub fn store_path(&self) -> PathBuf {
        match &self.store {
            Some(p) => p.clone(),
            None => store_file_in(self.dir().unwrap_or_else(|| Path::new("."))),
        }
    }
}

/// Loads configuration for the specified app.
///
/// The file is created empty if it does not exist yet.
pub fn load_config(app_name: &str, custom_path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => p.to_path_buf(),
        None => Paths::new(app_name)?.config_file(),
    };

    // Ensure config directory exists
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        }
    } else {
        let cfg = Config::default();
        let content = serde_yaml::to_string(&cfg)?;
        std::fs::write(&config_path, content)?;
        cfg
    };

    cfg.app_name = app_name.to_string();
    cfg.config_path = config_path;

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let cfg = load_config("sesame", Some(path.as_path())).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.app_name, "sesame");
        assert_eq!(cfg.path(), path.as_path());
        assert_eq!(cfg.extractor_config(), ExtractorConfig::default());
        assert_eq!(cfg.matcher_config(), MatcherConfig::default());
        assert_eq!(cfg.capture_config(), CaptureConfig::default());
        assert_eq!(
            cfg.store_path(),
            dir.path().join("nested").join("data").join("fingerprint.redb")
        );
    }

    #[test]
    fn test_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "store: /tmp/voice.redb\nmatcher:\n  min_agreement: 4\ncapture:\n  max_duration_ms: 3000\n",
        )
        .unwrap();

        let cfg = load_config("sesame", Some(path.as_path())).unwrap();
        assert_eq!(cfg.store_path(), PathBuf::from("/tmp/voice.redb"));
        let m = cfg.matcher_config();
        assert_eq!(m.min_agreement, 4);
        assert_eq!(m.rhythm_tolerance, 0.40);
        assert_eq!(cfg.capture_config().max_duration_ms, 3000);
        assert!(cfg.extractor.is_none());
    }

    #[test]
    fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        let cfg = load_config("sesame", Some(path.as_path())).unwrap();
        assert!(cfg.store.is_none());
    }

    #[test]
    fn test_extractor_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "extractor:\n  peak_threshold: 0.2\n").unwrap();

        let cfg = load_config("sesame", Some(path.as_path())).unwrap();
        let ex = cfg.extractor_config();
        assert_eq!(ex.peak_threshold, 0.2);
        assert_eq!(ex.silence_threshold, 0.01);
    }
}
