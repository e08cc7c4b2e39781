use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_BOX_FADE_MS: u64 = 500;
const DEFAULT_BOX_GROW_MS: u64 = 700;
const DEFAULT_LABEL_FADE_MS: u64 = 500;
const DEFAULT_LABEL_REVEAL_MS: u64 = 1000;
const DEFAULT_HOLD_MS: u64 = 2000;
const DEFAULT_PLACEHOLDER: &str = "...";

#[derive(Debug, Deserialize, Default)]
struct PlaybackConfigFile {
    timings: Option<TimingsFile>,
    placeholder: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TimingsFile {
    box_fade_ms: Option<u64>,
    box_grow_ms: Option<u64>,
    label_fade_ms: Option<u64>,
    label_reveal_ms: Option<u64>,
    hold_ms: Option<u64>,
}

/// Playback timing knobs. The defaults are the choreography's fixed
/// durations; the config file and environment overrides exist so render
/// previews can be sped up without touching catalogs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Bounding-box opacity fade-in.
    pub box_fade_ms: u64,
    /// Bounding-box height grow.
    pub box_grow_ms: u64,
    /// Label-box opacity fade-in.
    pub label_fade_ms: u64,
    /// Placeholder-to-final label text reveal.
    pub label_reveal_ms: u64,
    /// Unconditional hold after each subject.
    pub hold_ms: u64,
    /// Label text shown before the final text ("scanning" effect).
    pub placeholder: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            box_fade_ms: DEFAULT_BOX_FADE_MS,
            box_grow_ms: DEFAULT_BOX_GROW_MS,
            label_fade_ms: DEFAULT_LABEL_FADE_MS,
            label_reveal_ms: DEFAULT_LABEL_REVEAL_MS,
            hold_ms: DEFAULT_HOLD_MS,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl PlaybackConfig {
    /// Loads the config named by `ANNOREEL_CONFIG` (TOML, optional), applies
    /// `ANNOREEL_*` environment overrides, then validates.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("ANNOREEL_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PlaybackConfigFile) -> Self {
        let timings = file.timings.unwrap_or_default();
        Self {
            box_fade_ms: timings.box_fade_ms.unwrap_or(DEFAULT_BOX_FADE_MS),
            box_grow_ms: timings.box_grow_ms.unwrap_or(DEFAULT_BOX_GROW_MS),
            label_fade_ms: timings.label_fade_ms.unwrap_or(DEFAULT_LABEL_FADE_MS),
            label_reveal_ms: timings.label_reveal_ms.unwrap_or(DEFAULT_LABEL_REVEAL_MS),
            hold_ms: timings.hold_ms.unwrap_or(DEFAULT_HOLD_MS),
            placeholder: file
                .placeholder
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        for (var, field) in [
            ("ANNOREEL_BOX_FADE_MS", &mut self.box_fade_ms),
            ("ANNOREEL_BOX_GROW_MS", &mut self.box_grow_ms),
            ("ANNOREEL_LABEL_FADE_MS", &mut self.label_fade_ms),
            ("ANNOREEL_LABEL_REVEAL_MS", &mut self.label_reveal_ms),
            ("ANNOREEL_HOLD_MS", &mut self.hold_ms),
        ] {
            if let Ok(raw) = std::env::var(var) {
                *field = raw
                    .parse::<u64>()
                    .map_err(|_| anyhow!("{} must be a whole number of milliseconds", var))?;
            }
        }
        if let Ok(placeholder) = std::env::var("ANNOREEL_PLACEHOLDER") {
            self.placeholder = placeholder;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.placeholder.is_empty() {
            return Err(anyhow!(
                "placeholder must be non-empty; the label reveal passes through it"
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<PlaybackConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
}
