//! Configuration file loading with precedence handling.

use crate::model::{Behavior, LayoutStyle, NameStyle, Palette, Rgba, StripStyle};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or types.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/storystrip/config.toml`:
///
/// ```toml
/// read_opacity = 0.5
/// right_to_left = false
///
/// [full]
/// photo = 48
///
/// [palette]
/// unread_from = "#ff8800"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Compact row metrics.
    #[serde(default)]
    pub small: Option<LayoutSection>,

    /// Expanded panel metrics.
    #[serde(default)]
    pub full: Option<LayoutSection>,

    /// Name font metrics.
    #[serde(default)]
    pub name: Option<NameSection>,

    /// Colors.
    #[serde(default)]
    pub palette: Option<PaletteSection>,

    /// Opacity of fully read avatars, `0.0..=1.0`.
    #[serde(default)]
    pub read_opacity: Option<f64>,

    /// Clicks past the last item select the last visible one.
    #[serde(default)]
    pub full_clickable: Option<bool>,

    /// Expand/collapse animation duration in milliseconds.
    #[serde(default)]
    pub toggle_duration_ms: Option<u64>,

    /// Pointer travel that turns a press into a drag, in pixels.
    #[serde(default)]
    pub drag_distance: Option<i32>,

    /// Mirror wheel and drag directions.
    #[serde(default)]
    pub right_to_left: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Pixels per terminal column in the demo host.
    #[serde(default)]
    pub cell_width: Option<u16>,

    /// Pixels per terminal row in the demo host.
    #[serde(default)]
    pub cell_height: Option<u16>,
}

/// `[small]` / `[full]` section; every key overrides one metric.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutSection {
    /// Widget height.
    pub height: Option<i32>,
    /// Avatar diameter.
    pub photo: Option<i32>,
    /// Avatar padding inside a cell.
    pub photo_left: Option<i32>,
    /// Avatar offset from the top.
    pub photo_top: Option<i32>,
    /// Leading margin.
    pub left: Option<i32>,
    /// Compact stride.
    pub shift: Option<i32>,
    /// Name label offset from the top.
    pub name_top: Option<i32>,
    /// Unread ring thickness, doubled.
    pub line_twice: Option<i32>,
    /// Read ring thickness, doubled.
    pub line_read_twice: Option<i32>,
}

impl LayoutSection {
    /// `base` with every present key replaced.
    pub fn apply(&self, base: LayoutStyle) -> LayoutStyle {
        LayoutStyle {
            height: self.height.unwrap_or(base.height),
            photo: self.photo.unwrap_or(base.photo),
            photo_left: self.photo_left.unwrap_or(base.photo_left),
            photo_top: self.photo_top.unwrap_or(base.photo_top),
            left: self.left.unwrap_or(base.left),
            shift: self.shift.unwrap_or(base.shift),
            name_top: self.name_top.unwrap_or(base.name_top),
            line_twice: self.line_twice.unwrap_or(base.line_twice),
            line_read_twice: self.line_read_twice.unwrap_or(base.line_read_twice),
        }
    }
}

/// `[name]` section.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct NameSection {
    /// Name line height.
    pub font_height: Option<i32>,
    /// Name inset on each side.
    pub space_width: Option<i32>,
}

/// `[palette]` section; colors are `#rrggbb` or `#rrggbbaa` strings.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PaletteSection {
    /// Name text.
    pub name_fg: Option<Rgba>,
    /// Fill behind avatars.
    pub background: Option<Rgba>,
    /// Unread gradient, top-right stop.
    pub unread_from: Option<Rgba>,
    /// Unread gradient, bottom-left stop.
    pub unread_to: Option<Rgba>,
    /// Read ring stroke.
    pub read_line: Option<Rgba>,
}

impl PaletteSection {
    /// `base` with every present color replaced.
    pub fn apply(&self, base: Palette) -> Palette {
        Palette {
            name_fg: self.name_fg.unwrap_or(base.name_fg),
            background: self.background.unwrap_or(base.background),
            unread_from: self.unread_from.unwrap_or(base.unread_from),
            unread_to: self.unread_to.unwrap_or(base.unread_to),
            read_line: self.read_line.unwrap_or(base.read_line),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Style injected into the list.
    pub style: StripStyle,
    /// Interaction tuning.
    pub behavior: Behavior,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Pixels per terminal column.
    pub cell_width: u16,
    /// Pixels per terminal row.
    pub cell_height: u16,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            style: StripStyle::default(),
            behavior: Behavior::default(),
            log_file_path: default_log_path(),
            cell_width: 8,
            cell_height: 16,
        }
    }
}

impl ResolvedConfig {
    /// Style to construct the list with.
    pub fn strip_style(&self) -> StripStyle {
        self.style
    }

    /// Check ranges the TOML types cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.style.read_opacity) {
            return Err(ConfigError::InvalidValue {
                key: "read_opacity",
                reason: format!("{} is outside 0.0..=1.0", self.style.read_opacity),
            });
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cell_width/cell_height",
                reason: "cells must be at least one pixel".to_string(),
            });
        }
        for (key, layout) in [("small", &self.style.small), ("full", &self.style.full)] {
            if layout.photo <= 0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("photo must be positive, got {}", layout.photo),
                });
            }
        }
        Ok(())
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/storystrip/storystrip.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("storystrip").join("storystrip.log")
    } else {
        PathBuf::from("storystrip.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/storystrip/config.toml` on Unix, appropriate path on
/// other platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("storystrip").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `STORYSTRIP_CONFIG` environment variable
/// 3. Default path `~/.config/storystrip/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("STORYSTRIP_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(
                "STORYSTRIP_CONFIG is set but empty".to_string(),
            ));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Parse a boolean environment flag: `1/true/yes/on` or `0/false/no/off`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `STORYSTRIP_RTL`: mirror wheel and drag directions
/// - `STORYSTRIP_FULL_CLICKABLE`: clicks past the end select the last item
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(rtl) = std::env::var("STORYSTRIP_RTL").ok().as_deref().and_then(parse_flag) {
        config.behavior.right_to_left = rtl;
    }
    if let Some(clickable) = std::env::var("STORYSTRIP_FULL_CLICKABLE")
        .ok()
        .as_deref()
        .and_then(parse_flag)
    {
        config.style.full_clickable = clickable;
    }
    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let base = defaults.style;
    let name = config.name.unwrap_or_default();
    let style = StripStyle {
        small: config.small.unwrap_or_default().apply(base.small),
        full: config.full.unwrap_or_default().apply(base.full),
        name: NameStyle {
            font_height: name.font_height.unwrap_or(base.name.font_height),
            space_width: name.space_width.unwrap_or(base.name.space_width),
        },
        palette: config.palette.unwrap_or_default().apply(base.palette),
        read_opacity: config.read_opacity.unwrap_or(base.read_opacity),
        full_clickable: config.full_clickable.unwrap_or(base.full_clickable),
    };
    let behavior = Behavior {
        toggle_duration_ms: config
            .toggle_duration_ms
            .unwrap_or(defaults.behavior.toggle_duration_ms),
        drag_distance: config
            .drag_distance
            .unwrap_or(defaults.behavior.drag_distance),
        right_to_left: config
            .right_to_left
            .unwrap_or(defaults.behavior.right_to_left),
    };

    ResolvedConfig {
        style,
        behavior,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        cell_width: config.cell_width.unwrap_or(defaults.cell_width),
        cell_height: config.cell_height.unwrap_or(defaults.cell_height),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    rtl_override: Option<bool>,
    full_clickable_override: Option<bool>,
) -> ResolvedConfig {
    if let Some(rtl) = rtl_override {
        config.behavior.right_to_left = rtl;
    }

    if let Some(clickable) = full_clickable_override {
        config.style.full_clickable = clickable;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
