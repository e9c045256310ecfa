use crate::defaults;
use crate::error::{OverdubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "config-paths")]
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub translation: TranslationConfig,
    pub memory: MemoryConfig,
}

/// Audio capture/playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub input_device: Option<String>,
    pub output_device: Option<String>,
    pub sample_rate: u32,
    pub chunk_size: usize,
}

/// Language pair configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    pub source_language: String,
    pub target_language: String,
}

/// Coordination store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemoryConfig {
    /// Overlay reads required before a subtitle slot may be replaced.
    pub required_reads: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            input_device: None,
            output_device: None,
            sample_rate: defaults::SAMPLE_RATE,
            chunk_size: defaults::CHUNK_SIZE,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            required_reads: defaults::REQUIRED_OVERLAY_READS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - OVERDUB_SOURCE_LANGUAGE → translation.source_language
    /// - OVERDUB_TARGET_LANGUAGE → translation.target_language
    /// - OVERDUB_AUDIO_DEVICE → audio.input_device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(lang) = std::env::var("OVERDUB_SOURCE_LANGUAGE")
            && !lang.is_empty()
        {
            self.translation.source_language = lang;
        }

        if let Ok(lang) = std::env::var("OVERDUB_TARGET_LANGUAGE")
            && !lang.is_empty()
        {
            self.translation.target_language = lang;
        }

        if let Ok(device) = std::env::var("OVERDUB_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.input_device = Some(device);
        }

        self
    }

    /// Validate values that must fail fast before a session starts.
    pub fn validate(&self) -> Result<()> {
        if self.memory.required_reads == 0 {
            return Err(OverdubError::ConfigInvalidValue {
                key: "memory.required_reads".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.audio.sample_rate == 0 {
            return Err(OverdubError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.audio.chunk_size == 0 {
            return Err(OverdubError::ConfigInvalidValue {
                key: "audio.chunk_size".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/overdub/config.toml on Linux
    #[cfg(feature = "config-paths")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("overdub").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: These helpers are only used in tests with ENV_LOCK held,
    // ensuring no concurrent access to environment variables.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_overdub_env() {
        remove_env("OVERDUB_SOURCE_LANGUAGE");
        remove_env("OVERDUB_TARGET_LANGUAGE");
        remove_env("OVERDUB_AUDIO_DEVICE");
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.audio.input_device, None);
        assert_eq!(config.audio.output_device, None);
        assert_eq!(config.audio.sample_rate, 16000);
        assert_eq!(config.audio.chunk_size, 1024);

        assert_eq!(config.translation.source_language, "es");
        assert_eq!(config.translation.target_language, "en");

        assert_eq!(config.memory.required_reads, 3);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [audio]
            input_device = "hw:0,0"
            sample_rate = 48000
            chunk_size = 2048

            [translation]
            source_language = "de"
            target_language = "fr"

            [memory]
            required_reads = 5
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.audio.input_device, Some("hw:0,0".to_string()));
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.audio.chunk_size, 2048);
        assert_eq!(config.translation.source_language, "de");
        assert_eq!(config.translation.target_language, "fr");
        assert_eq!(config.memory.required_reads, 5);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let toml_content = r#"
            [translation]
            source_language = "ja"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.translation.source_language, "ja");
        assert_eq!(config.translation.target_language, "en");
        assert_eq!(config.memory.required_reads, 3);
    }

    #[test]
    fn test_parse_invalid_toml_maps_to_config_error() {
        match Config::parse("not = valid = toml") {
            Err(OverdubError::Config(_)) => {}
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_load_invalid_toml_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"not = valid = toml").unwrap();

        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Path::new("/nonexistent/overdub.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_validate_rejects_zero_required_reads() {
        let config = Config {
            memory: MemoryConfig { required_reads: 0 },
            ..Default::default()
        };
        match config.validate() {
            Err(OverdubError::ConfigInvalidValue { key, .. }) => {
                assert_eq!(key, "memory.required_reads");
            }
            _ => panic!("Expected ConfigInvalidValue error"),
        }
    }

    #[test]
    fn test_validate_rejects_zero_sample_rate() {
        let mut config = Config::default();
        config.audio.sample_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let mut config = Config::default();
        config.audio.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_overdub_env();

        set_env("OVERDUB_SOURCE_LANGUAGE", "pt");
        set_env("OVERDUB_TARGET_LANGUAGE", "it");
        set_env("OVERDUB_AUDIO_DEVICE", "pipewire");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.translation.source_language, "pt");
        assert_eq!(config.translation.target_language, "it");
        assert_eq!(config.audio.input_device, Some("pipewire".to_string()));

        clear_overdub_env();
    }

    #[test]
    fn test_env_overrides_ignore_empty_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_overdub_env();

        set_env("OVERDUB_SOURCE_LANGUAGE", "");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.translation.source_language, "es");

        clear_overdub_env();
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config {
            translation: TranslationConfig {
                source_language: "ko".to_string(),
                target_language: "en".to_string(),
            },
            ..Default::default()
        };

        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }
}
