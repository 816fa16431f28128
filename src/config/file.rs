//! TOML configuration file loading
//!
//! Supports `~/.config/phonics-coach/config.toml` as a persistent config
//! source. All fields are optional — the file is a partial overlay on top
//! of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct CoachConfigFile {
    /// API credential (env and flags take precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model selection
    #[serde(default)]
    pub models: ModelsFileConfig,

    /// Voice selection
    #[serde(default)]
    pub voices: VoicesFileConfig,
}

/// Model overrides
#[derive(Debug, Default, Deserialize)]
pub struct ModelsFileConfig {
    /// Live conversation model id
    pub live: Option<String>,

    /// One-shot TTS model id
    pub tts: Option<String>,
}

/// Voice overrides
#[derive(Debug, Default, Deserialize)]
pub struct VoicesFileConfig {
    /// Prebuilt voice for live feedback
    pub live: Option<String>,

    /// Prebuilt voice for pronunciation clips
    pub tts: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `CoachConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
#[must_use]
pub fn load_config_file() -> CoachConfigFile {
    let Some(path) = config_file_path() else {
        return CoachConfigFile::default();
    };

    if !path.exists() {
        return CoachConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                CoachConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            CoachConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/phonics-coach/config.toml`
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("phonics-coach").join("config.toml"))
}
