//! Subtitle Settings
//!
//! Persistent configuration for the subtitle engine:
//! - Named style default sets (one per entry point)
//! - Screen position and placement policy per entry point
//! - Matching service endpoint and audio extraction parameters
//!
//! Loading is tolerant: a missing or corrupt file yields defaults, and
//! `normalize()` corrects out-of-range values instead of failing.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    fs::atomic_write_json_pretty,
    subtitles::{PlacementPolicy, TextSource},
    text::{is_hex_color, ScreenPosition, StyleDefaults, StylePreset},
    CoreResult,
};

/// Settings schema version
pub const SETTINGS_VERSION: u32 = 1;

/// Environment variable that overrides `matching.serviceUrl`
pub const MATCHER_URL_ENV: &str = "SUBTRACK_MATCHER_URL";

/// Matching service used when nothing else is configured
pub const DEFAULT_MATCHER_URL: &str = "http://localhost:5000";

/// Subtitle engine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Named style default sets
    #[serde(default = "default_presets")]
    pub presets: BTreeMap<String, StylePreset>,

    /// SRT file import and demo insert
    #[serde(default)]
    pub import: ImportSettings,

    /// Matched-span batches
    #[serde(default)]
    pub matching: MatchingSettings,

    /// Audio extraction
    #[serde(default)]
    pub extraction: ExtractionSettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_presets() -> BTreeMap<String, StylePreset> {
    BTreeMap::from([
        (StylePreset::FILE_IMPORT.to_string(), StylePreset::file_import()),
        (StylePreset::MATCHED.to_string(), StylePreset::matched_batch()),
    ])
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            presets: default_presets(),
            import: ImportSettings::default(),
            matching: MatchingSettings::default(),
            extraction: ExtractionSettings::default(),
        }
    }
}

impl SubtitleSettings {
    /// Loads settings from disk, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!("Settings file {} not found, using defaults", path.display());
            return Self::default();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file: {}", e))
            .and_then(|content| {
                serde_json::from_str::<SubtitleSettings>(&content)
                    .map_err(|e| format!("Failed to parse settings file: {}", e))
            });

        match parsed {
            Ok(mut settings) => {
                settings.normalize();
                settings
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Normalizes and saves settings atomically. Returns what was written.
    pub fn save(&self, path: &Path) -> CoreResult<Self> {
        let mut normalized = self.clone();
        normalized.normalize();
        atomic_write_json_pretty(path, &normalized)?;
        info!("Saved settings to {}", path.display());
        Ok(normalized)
    }

    /// Applies `SUBTRACK_MATCHER_URL` if it is set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        self.override_service_url(std::env::var(MATCHER_URL_ENV).ok());
    }

    fn override_service_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.matching.service_url = normalize_url(&url);
        }
    }

    /// Corrects bad values in place so persisted state is always usable.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        for (name, preset) in default_presets() {
            self.presets.entry(name).or_insert(preset);
        }
        for preset in self.presets.values_mut() {
            normalize_preset(preset);
        }

        if !self.presets.contains_key(&self.import.preset_name) {
            warn!("Unknown import preset '{}', using default", self.import.preset_name);
            self.import.preset_name = StylePreset::FILE_IMPORT.to_string();
        }
        self.import.position = ScreenPosition::from_name(&self.import.position).to_string();

        if !self.presets.contains_key(&self.matching.preset_name) {
            warn!("Unknown matching preset '{}', using default", self.matching.preset_name);
            self.matching.preset_name = StylePreset::MATCHED.to_string();
        }
        self.matching.position = ScreenPosition::from_name(&self.matching.position).to_string();
        self.matching.service_url = normalize_url(&self.matching.service_url);
        self.matching.timeout_secs = self.matching.timeout_secs.clamp(5, 3600);

        if self.extraction.ffmpeg_path.trim().is_empty() {
            self.extraction.ffmpeg_path = default_ffmpeg_path();
        }
        self.extraction.bitrate = normalize_enum(
            &self.extraction.bitrate,
            &["64k", "96k", "128k", "160k", "192k", "256k", "320k"],
            default_bitrate(),
        );
        self.extraction.channels = self.extraction.channels.clamp(1, 2);
    }

    /// Preset by name, or the built-in file-import preset.
    pub fn preset(&self, name: &str) -> StylePreset {
        match self.presets.get(name) {
            Some(preset) => preset.clone(),
            None => {
                warn!("Unknown preset '{}', using '{}'", name, StylePreset::FILE_IMPORT);
                StylePreset::file_import()
            }
        }
    }

    pub fn import_defaults(&self) -> StyleDefaults {
        StyleDefaults::new(self.preset(&self.import.preset_name))
    }

    pub fn matching_defaults(&self) -> StyleDefaults {
        StyleDefaults::new(self.preset(&self.matching.preset_name))
    }

    pub fn import_position(&self) -> ScreenPosition {
        ScreenPosition::from_name(&self.import.position)
    }

    pub fn matching_position(&self) -> ScreenPosition {
        ScreenPosition::from_name(&self.matching.position)
    }
}

fn normalize_preset(preset: &mut StylePreset) {
    let defaults = StylePreset::file_import();
    let style = &mut preset.style;

    style.font_size = clamp_f64(style.font_size, 1.0, 1000.0);
    style.word_wrap_width = clamp_f64(style.word_wrap_width, 1.0, 10_000.0);
    style.line_height = clamp_f64(style.line_height, 0.0, 2000.0);
    style.stroke_thickness = clamp_f64(style.stroke_thickness, 0.0, 100.0);
    if style.font_family.trim().is_empty() {
        style.font_family = defaults.style.font_family.clone();
    }
    if style.fill.is_empty() || !style.fill.iter().all(|c| is_hex_color(c)) {
        style.fill = defaults.style.fill.clone();
    }
    if !is_hex_color(&style.stroke) {
        style.stroke = defaults.style.stroke.clone();
    }

    let shadow = &mut preset.shadow;
    shadow.alpha = clamp_f64(shadow.alpha, 0.0, 1.0);
    shadow.blur = clamp_f64(shadow.blur, 0.0, 100.0);
    shadow.distance = clamp_f64(shadow.distance, 0.0, 100.0);
    if !is_hex_color(&shadow.color) {
        shadow.color = defaults.shadow.color.clone();
    }

    preset.box_width = clamp_f64(preset.box_width, 1.0, 10_000.0);
    preset.box_height = clamp_f64(preset.box_height, 1.0, 10_000.0);
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

fn normalize_enum(value: &str, allowed: &[&str], fallback: String) -> String {
    if allowed.iter().any(|v| v.eq_ignore_ascii_case(value)) {
        value.to_ascii_lowercase()
    } else {
        fallback
    }
}

fn normalize_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_MATCHER_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// SRT import settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportSettings {
    #[serde(default = "default_import_preset")]
    pub preset_name: String,

    #[serde(default = "default_position")]
    pub position: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            preset_name: default_import_preset(),
            position: default_position(),
        }
    }
}

fn default_import_preset() -> String {
    StylePreset::FILE_IMPORT.to_string()
}

fn default_position() -> String {
    ScreenPosition::default().to_string()
}

/// Matched-span import settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchingSettings {
    #[serde(default = "default_matched_preset")]
    pub preset_name: String,

    #[serde(default = "default_position")]
    pub position: String,

    /// Policy used when a batch is placed relative to the selected clip
    #[serde(default)]
    pub policy: PlacementPolicy,

    /// Which text of each match record becomes the subtitle
    #[serde(default)]
    pub text_source: TextSource,

    #[serde(default = "default_service_url")]
    pub service_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            preset_name: default_matched_preset(),
            position: default_position(),
            policy: PlacementPolicy::default(),
            text_source: TextSource::default(),
            service_url: default_service_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_matched_preset() -> String {
    StylePreset::MATCHED.to_string()
}

fn default_service_url() -> String {
    DEFAULT_MATCHER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// Audio extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSettings {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    #[serde(default = "default_channels")]
    pub channels: u8,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            bitrate: default_bitrate(),
            channels: default_channels(),
        }
    }
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

fn default_channels() -> u8 {
    2
}
