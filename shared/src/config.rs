use crate::error::ConfigError;
use crate::overlay::OverlayConfig;
use crate::registry::ReentryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration stored in JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Whole-window alpha the overlay starts at (0-255)
    pub start_opacity: u8,
    pub fade_duration_ms: u64,
    pub fade_interval_ms: u64,
    pub redraw_interval_ms: u64,
    /// Clock diameter relative to the smaller screen side
    pub clock_scale: f32,
    pub edge_fade_width: f32,
    /// Keep the clock hands ticking during the fade
    pub live_hands: bool,
    pub reentry: ReentryPolicy,
    pub debug_logging: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            start_opacity: 128,
            fade_duration_ms: 3000,
            fade_interval_ms: 30,
            redraw_interval_ms: 1000,
            clock_scale: 0.8,
            edge_fade_width: 3.0,
            live_hands: true,
            reentry: ReentryPolicy::Replace,
            debug_logging: false,
        }
    }
}

impl AppConfig {
    /// Clamp values that would break the overlay into usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.fade_interval_ms = self.fade_interval_ms.max(1);
        self.redraw_interval_ms = self.redraw_interval_ms.max(1);
        if !self.clock_scale.is_finite() || self.clock_scale <= 0.0 {
            self.clock_scale = 0.8;
        }
        self.clock_scale = self.clock_scale.min(1.0);
        if !self.edge_fade_width.is_finite() || self.edge_fade_width < 0.0 {
            self.edge_fade_width = 0.0;
        }
        self
    }

    pub fn overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            start_opacity: self.start_opacity,
            fade_duration: Duration::from_millis(self.fade_duration_ms),
            fade_interval: Duration::from_millis(self.fade_interval_ms),
            redraw_interval: Duration::from_millis(self.redraw_interval_ms),
            clock_scale: self.clock_scale,
            edge_fade_width: self.edge_fade_width,
            live_hands: self.live_hands,
        }
    }
}

/// Per-user directory holding the config file and the log.
pub fn app_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("Clockveil")
}

pub fn config_path() -> PathBuf {
    app_dir().join("config.json")
}

/// Load from the default location, falling back to defaults on any problem.
pub fn load_config() -> AppConfig {
    let path = config_path();
    if !path.exists() {
        return AppConfig::default();
    }
    match load_config_from(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("ignoring {}: {e}", path.display());
            AppConfig::default()
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data = fs::read_to_string(path)?;
    let cfg: AppConfig = serde_json::from_str(&data)?;
    Ok(cfg.sanitized())
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(config)?;
    fs::write(path, data)?;
    Ok(())
}
