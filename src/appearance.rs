use std::io;

use crate::{info, warn};

pub const DESKTOP_KEY_PATH: &str = r"Control Panel\Desktop";
pub const WALLPAPER_STYLE_VALUE: &str = "WallpaperStyle";
pub const TILE_WALLPAPER_VALUE: &str = "TileWallpaper";

pub const STYLE_FILL: &str = "10";
pub const TILE_OFF: &str = "0";

/// The per-user desktop appearance store.
pub trait PreferenceStore: Send + Sync {
    type Key: PreferenceKey;

    /// Opens the desktop key read-write. The key is released when dropped.
    fn open_desktop(&self) -> io::Result<Self::Key>;
}

pub trait PreferenceKey {
    fn set_string(&mut self, name: &str, value: &str) -> io::Result<()>;
}

/// Sets "fill, no tiling". Every failure here is logged and swallowed.
pub struct AppearanceConfigurator<S> {
    store: S,
}

impl<S: PreferenceStore> AppearanceConfigurator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn configure_fill(&self) {
        let mut key = match self.store.open_desktop() {
            Ok(key) => key,
            Err(e) => {
                warn!(
                    "[APPEARANCE] Could not open HKCU\\{}; leaving wallpaper style unchanged: {e}",
                    DESKTOP_KEY_PATH
                );
                return;
            }
        };

        for (name, value) in [(WALLPAPER_STYLE_VALUE, STYLE_FILL), (TILE_WALLPAPER_VALUE, TILE_OFF)] {
            match key.set_string(name, value) {
                Ok(()) => info!("[APPEARANCE] {} = \"{}\"", name, value),
                Err(e) => warn!("[APPEARANCE] Failed to write {}: {e}", name),
            }
        }
    }
}

#[cfg(windows)]
pub use self::registry::UserDesktopPreferences;

#[cfg(windows)]
mod registry {
    use std::io;

    use winreg::{
        enums::{HKEY_CURRENT_USER, KEY_READ, KEY_WRITE},
        RegKey,
    };

    use super::{PreferenceKey, PreferenceStore, DESKTOP_KEY_PATH};

    /// `HKEY_CURRENT_USER\Control Panel\Desktop`
    pub struct UserDesktopPreferences;

    impl PreferenceStore for UserDesktopPreferences {
        type Key = RegKey;

        fn open_desktop(&self) -> io::Result<RegKey> {
            RegKey::predef(HKEY_CURRENT_USER).open_subkey_with_flags(DESKTOP_KEY_PATH, KEY_READ | KEY_WRITE)
        }
    }

    impl PreferenceKey for RegKey {
        fn set_string(&mut self, name: &str, value: &str) -> io::Result<()> {
            self.set_value(name, &value.to_string())
        }
    }
}
