/// Application configuration: load, save, and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Spaces inserted by Tab and added by auto-indent.
    pub indent_width: usize,
    /// Indent with one tab character instead of `indent_width` spaces.
    pub indent_with_tabs: bool,
    /// Fixed pixel height of one editor line, used by caret scrolling.
    pub line_height_px: f32,
    /// Vertical padding subtracted from the viewport height.
    pub viewport_padding_px: f32,
    /// Quiet period before the current code is persisted.
    pub autosave_delay_ms: u64,
    /// Maximum number of saved snapshots kept (newest first).
    pub snapshot_limit: usize,
    /// How long a status notice stays visible.
    pub notice_duration_ms: u64,
    /// Storage directory. Empty = resolved via [`resolve_data_dir`].
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            indent_with_tabs: false,
            line_height_px: 21.0,
            viewport_padding_px: 32.0,
            autosave_delay_ms: 1000,
            snapshot_limit: 10,
            notice_duration_ms: 3000,
            data_dir: String::new(),
        }
    }
}

impl AppConfig {
    /// Returns the config file path: exe directory + `markpad.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("markpad.json")))
            .unwrap_or_else(|| PathBuf::from("markpad.json"))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left alone
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Returns the storage directory, honoring an explicit `data_dir`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if self.data_dir.trim().is_empty() {
            resolve_data_dir()
        } else {
            PathBuf::from(self.data_dir.trim())
        }
    }

    /// Clamps values to valid ranges.
    pub fn sanitize(&mut self) {
        self.indent_width = self.indent_width.clamp(1, 8);
        if !self.line_height_px.is_finite() {
            self.line_height_px = 21.0;
        }
        self.line_height_px = self.line_height_px.clamp(8.0, 96.0);
        if !self.viewport_padding_px.is_finite() {
            self.viewport_padding_px = 32.0;
        }
        self.viewport_padding_px = self.viewport_padding_px.clamp(0.0, 256.0);
        self.autosave_delay_ms = self.autosave_delay_ms.max(100);
        self.snapshot_limit = self.snapshot_limit.clamp(1, 100);
        self.notice_duration_ms = self.notice_duration_ms.max(500);
    }
}

/// Resolves the default storage directory.
///
/// Resolution order:
/// 1. `MARKPAD_DATA_DIR` environment variable
/// 2. the platform data directory + `markpad`
/// 3. `.markpad` in the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("MARKPAD_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .map(|d| d.join("markpad"))
        .unwrap_or_else(|| PathBuf::from(".markpad"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.indent_width, 2);
        assert!(!config.indent_with_tabs);
        assert!((config.line_height_px - 21.0).abs() < f32::EPSILON);
        assert!((config.viewport_padding_px - 32.0).abs() < f32::EPSILON);
        assert_eq!(config.autosave_delay_ms, 1000);
        assert_eq!(config.snapshot_limit, 10);
        assert_eq!(config.notice_duration_ms, 3000);
        assert!(config.data_dir.is_empty());
    }

    #[test]
    fn test_sanitize_clamps_indent_width() {
        let mut config = AppConfig {
            indent_width: 0,
            ..Default::default()
        };
        config.sanitize();
        assert_eq!(config.indent_width, 1);

        config.indent_width = 40;
        config.sanitize();
        assert_eq!(config.indent_width, 8);
    }

    #[test]
    fn test_sanitize_clamps_line_height() {
        let mut config = AppConfig {
            line_height_px: 1.0,
            ..Default::default()
        };
        config.sanitize();
        assert!((config.line_height_px - 8.0).abs() < f32::EPSILON);

        config.line_height_px = f32::NAN;
        config.sanitize();
        assert!((config.line_height_px - 21.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_sanitize_autosave_delay_minimum() {
        let mut config = AppConfig {
            autosave_delay_ms: 0,
            ..Default::default()
        };
        config.sanitize();
        assert_eq!(config.autosave_delay_ms, 100);
    }

    #[test]
    fn test_sanitize_snapshot_limit_bounds() {
        let mut config = AppConfig {
            snapshot_limit: 0,
            ..Default::default()
        };
        config.sanitize();
        assert_eq!(config.snapshot_limit, 1);

        config.snapshot_limit = 1000;
        config.sanitize();
        assert_eq!(config.snapshot_limit, 100);
    }

    #[test]
    fn test_sanitize_preserves_valid_values() {
        let mut config = AppConfig::default();
        let before = config.clone();
        config.sanitize();
        assert_eq!(config, before);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let json = r#"{"indent_width": 4}"#;
        let parsed: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.indent_width, 4);
        assert_eq!(parsed.autosave_delay_ms, 1000);
        assert_eq!(parsed.snapshot_limit, 10);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let config = AppConfig {
            data_dir: "/tmp/markpad-data".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/markpad-data"));
    }
}
