use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::yaml::load_yaml;

pub const DEFAULT_INSTALL_FOLDER: &str = "CatWallpaperInstaller";
pub const DEFAULT_WALLPAPER_FILE: &str = "cat-wallpaper.bmp";
pub const DEFAULT_SOUND_ALIAS: &str = "cat_startup_sound";
pub const DEFAULT_MEDIA_TYPE: &str = "mpegvideo";
pub const DEFAULT_TEMP_PREFIX: &str = "cat-startup-";

#[derive(Debug, Clone, PartialEq)]
pub struct InstallerConfig {
    pub debug: bool,
    pub log_level: String,
    pub settings: InstallerSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallerSettings {
    pub install: InstallSettings,
    pub audio: AudioSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallSettings {
    pub folder: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub enabled: bool,
    pub alias: String,
    pub media_type: String,
    pub temp_prefix: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "warn".to_string(),
            settings: InstallerSettings::default(),
        }
    }
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            install: InstallSettings::default(),
            audio: AudioSettings::default(),
        }
    }
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            folder: DEFAULT_INSTALL_FOLDER.to_string(),
            file_name: DEFAULT_WALLPAPER_FILE.to_string(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            alias: DEFAULT_SOUND_ALIAS.to_string(),
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }
}

impl InstallerConfig {
    pub fn load(path: &Path) -> Option<Self> {
        let value = load_yaml(path)?;
        Self::from_yaml(&value)
    }

    pub fn from_yaml(root: &Value) -> Option<Self> {
        let map = root.as_mapping()?;
        let mut config = Self::default();

        config.debug = bool_at(map, "debug").unwrap_or(config.debug);
        if let Some(level) = str_at(map, "log_level") {
            config.log_level = level.trim().to_lowercase();
        }

        let settings_map = mapping_at(map, "settings");

        if let Some(dev) = settings_map.and_then(|v| mapping_at(v, "development")) {
            config.debug = bool_any(dev, &["debug", "debug_mode"]).unwrap_or(config.debug);
            if let Some(level) = str_any(dev, &["log_level", "logging"]) {
                config.log_level = level.trim().to_lowercase();
            }
        }

        if let Some(install) = settings_map.and_then(|v| mapping_at(v, "install")) {
            parse_install(install, &mut config.settings.install);
        }

        if let Some(audio) = settings_map.and_then(|v| mapping_at(v, "audio")) {
            parse_audio(audio, &mut config.settings.audio);
        }

        Some(config)
    }
}

fn parse_install(map: &Mapping, install: &mut InstallSettings) {
    if let Some(folder) = str_any(map, &["folder", "directory", "dir"]).and_then(path_segment) {
        install.folder = folder;
    }

    if let Some(file) = str_any(map, &["file_name", "filename", "file"]).and_then(path_segment) {
        install.file_name = with_bmp_extension(&file);
    }
}

fn parse_audio(map: &Mapping, audio: &mut AudioSettings) {
    audio.enabled = bool_any(map, &["enabled", "play", "startup_sound"]).unwrap_or(audio.enabled);

    if let Some(alias) = str_at(map, "alias").and_then(command_token) {
        audio.alias = alias;
    }

    if let Some(media_type) = str_any(map, &["media_type", "type"]).and_then(command_token) {
        audio.media_type = media_type;
    }

    if let Some(prefix) = str_any(map, &["temp_prefix", "prefix"]).and_then(path_segment) {
        audio.temp_prefix = prefix;
    }
}

/// A single, non-empty file name component.
fn path_segment(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'));
    if invalid {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// MCI splits commands on whitespace, so aliases and device types must be single words.
fn command_token(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn with_bmp_extension(file: &str) -> String {
    let path = Path::new(file);
    let is_bmp = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("bmp"));
    if is_bmp {
        file.to_string()
    } else {
        format!("{file}.bmp")
    }
}

fn bool_at(map: &Mapping, key: &str) -> Option<bool> {
    map.get(Value::String(key.to_string()))?.as_bool()
}

fn bool_any(map: &Mapping, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| bool_at(map, k))
}

fn str_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(Value::String(key.to_string()))?.as_str()
}

fn str_any<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| str_at(map, k))
}

fn mapping_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(Value::String(key.to_string()))?.as_mapping()
}
