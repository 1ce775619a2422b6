use std::path::Path;

use crate::{
    error::{InstallError, InstallResult},
    info, warn,
};

/// The OS call that switches the desktop background immediately.
pub trait DesktopWallpaperApi: Send + Sync {
    /// Sets, persists and broadcasts the wallpaper. On failure returns the
    /// platform's last-error code untouched.
    fn set_desk_wallpaper(&self, path: &Path) -> Result<(), u32>;
}

pub struct NotificationInvoker<A> {
    api: A,
}

impl<A: DesktopWallpaperApi> NotificationInvoker<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn apply_wallpaper(&self, path: &Path) -> InstallResult<()> {
        match self.api.set_desk_wallpaper(path) {
            Ok(()) => {
                info!("[NOTIFY] Desktop wallpaper applied from {}", path.display());
                Ok(())
            }
            Err(code) => {
                warn!(
                    "[NOTIFY] SPI_SETDESKWALLPAPER rejected {} with error {}",
                    path.display(),
                    code
                );
                Err(InstallError::OsNotification { code })
            }
        }
    }
}

#[cfg(windows)]
pub use self::spi::SystemParametersApi;

#[cfg(windows)]
mod spi {
    use std::path::Path;

    use windows::Win32::UI::WindowsAndMessaging::{
        SystemParametersInfoW, SPIF_SENDWININICHANGE, SPIF_UPDATEINIFILE, SPI_SETDESKWALLPAPER,
    };

    use super::DesktopWallpaperApi;
    use crate::paths::to_wstring;

    /// `SystemParametersInfoW(SPI_SETDESKWALLPAPER, 0, path, SPIF_UPDATEINIFILE | SPIF_SENDWININICHANGE)`
    pub struct SystemParametersApi;

    impl DesktopWallpaperApi for SystemParametersApi {
        fn set_desk_wallpaper(&self, path: &Path) -> Result<(), u32> {
            let mut wide = to_wstring(path.as_os_str());
            unsafe {
                SystemParametersInfoW(
                    SPI_SETDESKWALLPAPER,
                    0,
                    Some(wide.as_mut_ptr().cast()),
                    SPIF_UPDATEINIFILE | SPIF_SENDWININICHANGE,
                )
            }
            .map_err(|e| win32_code(&e))
        }
    }

    /// Unwraps a Win32 error code that the windows crate folded into an HRESULT.
    fn win32_code(err: &windows::core::Error) -> u32 {
        let hr = err.code().0 as u32;
        if hr & 0xFFFF_0000 == 0x8007_0000 {
            hr & 0xFFFF
        } else {
            hr
        }
    }
}
