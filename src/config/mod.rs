use crate::tui::components::dialogs::{DialogConfig, PresentationHints};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::{Path, PathBuf}, time::Duration};
use tracing::debug;

/// Dialog timing and presentation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogSettings {
    /// Delay between hiding content and finalizing a close
    pub exit_delay_ms: u64,

    /// Backdrop fade-in duration
    pub backdrop_fade_ms: u64,

    /// Inner panel fade-in-down duration
    pub inner_fade_ms: u64,

    /// Backdrop opacity once fully faded in
    pub backdrop_opacity: f32,

    /// Maximum inner panel width in cells
    pub max_width: u16,

    /// Skip the inner panel slide
    pub reduced_motion: bool,

    /// Whether a keyboard is available for the Escape dismissal
    pub has_keyboard: bool,

    /// Whether a pointer is available for backdrop dismissal
    pub has_pointer: bool,
}

impl Default for DialogSettings {
    fn default() -> Self {
        let config = DialogConfig::default();
        Self {
            exit_delay_ms: config.exit_delay.as_millis() as u64,
            backdrop_fade_ms: config.backdrop_fade.as_millis() as u64,
            inner_fade_ms: config.inner_fade.as_millis() as u64,
            backdrop_opacity: config.backdrop_opacity,
            max_width: config.max_width,
            reduced_motion: config.hints.reduced_motion,
            has_keyboard: config.hints.has_keyboard,
            has_pointer: config.hints.has_pointer,
        }
    }
}

impl DialogSettings {
    /// Initialize settings from defaults, the first config file found and the
    /// environment, in that order
    pub async fn init() -> Result<Self> {
        debug!("Initializing dialog settings");

        let mut settings = match Self::load_from_file().await? {
            Some(file_settings) => file_settings,
            None => Self::default(),
        };
        settings.load_from_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Candidate config files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("./.dialog-control.json"),
            PathBuf::from("./dialog-control.json"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("dialog-control").join("config.json"));
        }
        paths
    }

    /// Load from the first existing config file, if any
    pub async fn load_from_file() -> Result<Option<Self>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await.map(Some);
            }
        }
        Ok(None)
    }

    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading dialog settings from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Apply `DIALOG_*` overrides read through `lookup`
    pub fn load_from_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("DIALOG_EXIT_DELAY_MS") {
            self.exit_delay_ms = parse_env("DIALOG_EXIT_DELAY_MS", &value)?;
        }
        if let Some(value) = lookup("DIALOG_BACKDROP_FADE_MS") {
            self.backdrop_fade_ms = parse_env("DIALOG_BACKDROP_FADE_MS", &value)?;
        }
        if let Some(value) = lookup("DIALOG_INNER_FADE_MS") {
            self.inner_fade_ms = parse_env("DIALOG_INNER_FADE_MS", &value)?;
        }
        if let Some(value) = lookup("DIALOG_BACKDROP_OPACITY") {
            let opacity: f32 = parse_env("DIALOG_BACKDROP_OPACITY", &value)?;
            if !opacity.is_finite() {
                anyhow::bail!("Invalid value for DIALOG_BACKDROP_OPACITY: {}", value);
            }
            self.backdrop_opacity = opacity;
        }
        if let Some(value) = lookup("DIALOG_MAX_WIDTH") {
            self.max_width = parse_env("DIALOG_MAX_WIDTH", &value)?;
        }
        if let Some(value) = lookup("DIALOG_REDUCED_MOTION") {
            self.reduced_motion = matches!(value.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(())
    }

    /// Base dialog configuration carrying these settings
    pub fn dialog_config(&self) -> DialogConfig {
        DialogConfig::new()
            .with_exit_delay(Duration::from_millis(self.exit_delay_ms))
            .with_backdrop_fade(Duration::from_millis(self.backdrop_fade_ms))
            .with_inner_fade(Duration::from_millis(self.inner_fade_ms))
            .with_backdrop_opacity(self.backdrop_opacity)
            .with_max_width(self.max_width)
            .with_hints(PresentationHints {
                has_keyboard: self.has_keyboard,
                has_pointer: self.has_pointer,
                reduced_motion: self.reduced_motion,
            })
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {} ({})", key, value, e))
}
