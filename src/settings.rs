//! Persisted reader settings and the JSON config plumbing under them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::color::ColorConfig;

pub(crate) const SETTINGS_FILE: &str = "settings.json";
pub(crate) const PUNCTUATION_FILE: &str = "punctuation.json";

/// Platform config directory for this crate's files.
///
/// - macOS: `~/Library/Application Support/readalong/`
/// - Linux: `~/.config/readalong/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/readalong/`
///
/// Falls back to `~/.readalong/` when no platform dir is available.
pub fn settings_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("readalong"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".readalong")
        })
}

/// Load a JSON config file from the settings dir, falling back to
/// `Default` when the file is missing or unreadable. Corrupt files are
/// logged rather than silently resetting state.
pub(crate) fn load_json_config<T: DeserializeOwned + Default>(filename: &str) -> T {
    load_json_from(&settings_dir().join(filename))
}

pub(crate) fn load_json_from<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        return T::default();
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                T::default()
            }
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
            T::default()
        }
    }
}

/// Save a JSON config file into the settings dir atomically: write a
/// temp file, then rename it into place.
pub(crate) fn save_json_config<T: Serialize>(filename: &str, config: &T) -> Result<(), String> {
    save_json_to(&settings_dir().join(filename), config)
}

pub(crate) fn save_json_to<T: Serialize>(path: &Path, config: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize {}: {}", path.display(), e))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).map_err(|e| format!("Failed to write {}: {}", tmp.display(), e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600)) {
            warn!(path = %tmp.display(), error = %e, "could not restrict config permissions");
        }
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        format!("Failed to move {} into place: {}", tmp.display(), e)
    })
}

/// User-tunable speech and highlight settings, kept in one JSON file.
/// Unknown or missing fields fall back to defaults so older files keep
/// loading across upgrades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReaderSettings {
    #[serde(default = "default_rate")]
    pub rate: f64,
    #[serde(default = "default_pitch")]
    pub pitch: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Engine voice identifier; None selects the engine default.
    #[serde(default)]
    pub voice_uri: Option<String>,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_highlight_opacity")]
    pub highlight_opacity: f64,
    #[serde(default = "default_true")]
    pub enable_highlight: bool,
    #[serde(default = "default_stt_language")]
    pub stt_language: String,
    #[serde(default = "default_true")]
    pub continuous_stt: bool,
}

fn default_rate() -> f64 {
    1.0
}

fn default_pitch() -> f64 {
    1.0
}

fn default_volume() -> f64 {
    1.0
}

fn default_highlight_color() -> String {
    "#FFFF00".to_string()
}

fn default_highlight_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_stt_language() -> String {
    "en-US".to_string()
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
            voice_uri: None,
            highlight_color: default_highlight_color(),
            highlight_opacity: default_highlight_opacity(),
            enable_highlight: true,
            stt_language: default_stt_language(),
            continuous_stt: true,
        }
    }
}

impl ReaderSettings {
    /// Copy with every numeric field clamped into the range the speech
    /// engine accepts. Non-finite values fall back to defaults.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        s.rate = clamp_or(s.rate, 0.1, 10.0, default_rate());
        s.pitch = clamp_or(s.pitch, 0.0, 2.0, default_pitch());
        s.volume = clamp_or(s.volume, 0.0, 1.0, default_volume());
        s.highlight_opacity = clamp_or(
            s.highlight_opacity,
            0.0,
            1.0,
            default_highlight_opacity(),
        );
        s
    }

    pub fn color_config(&self) -> ColorConfig {
        ColorConfig {
            color: self.highlight_color.clone(),
            opacity: self.highlight_opacity,
        }
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

pub fn load_reader_settings() -> ReaderSettings {
    load_json_config(SETTINGS_FILE)
}

pub fn save_reader_settings(settings: &ReaderSettings) -> Result<(), String> {
    save_json_config(SETTINGS_FILE, settings)
}
