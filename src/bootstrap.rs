use std::{fs, path::Path};

use crate::{info, warn};

const DEFAULT_CONFIG: &str = r#"# Cat Wallpaper Installer settings. Delete this file to restore defaults.
debug: false
log_level: warn

settings:
  install:
    # Created under %ProgramData%.
    folder: "CatWallpaperInstaller"
    file_name: "cat-wallpaper.bmp"
  audio:
    enabled: true
    alias: "cat_startup_sound"
    media_type: "mpegvideo"
    temp_prefix: "cat-startup-"
"#;

/// Writes the default `installer.yaml` if none exists. Best effort.
pub fn scaffold_config(path: &Path) {
    if path.exists() {
        return;
    }

    match fs::write(path, DEFAULT_CONFIG) {
        Ok(()) => info!("Created {}", path.display()),
        Err(e) => warn!("Failed to create {}: {e}", path.display()),
    }
}
