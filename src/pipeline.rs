use crate::{
    appearance::{AppearanceConfigurator, PreferenceStore},
    error::InstallResult,
    image_normalizer::NormalizedImage,
    info,
    notifier::{DesktopWallpaperApi, NotificationInvoker},
    persister::{InstalledWallpaperFile, WallpaperPersister},
};

/// Persist, configure, notify. Always in that order, never rolled back.
///
/// If the notifier fails the file is already on disk and the style may
/// already be set; the visible wallpaper stays as it was until the user
/// retries.
pub struct InstallationPipeline<S, A> {
    persister: WallpaperPersister,
    configurator: AppearanceConfigurator<S>,
    notifier: NotificationInvoker<A>,
}

impl<S, A> InstallationPipeline<S, A>
where
    S: PreferenceStore,
    A: DesktopWallpaperApi,
{
    pub fn new(
        persister: WallpaperPersister,
        configurator: AppearanceConfigurator<S>,
        notifier: NotificationInvoker<A>,
    ) -> Self {
        Self {
            persister,
            configurator,
            notifier,
        }
    }

    #[cfg(test)]
    pub fn persister(&self) -> &WallpaperPersister {
        &self.persister
    }

    pub fn install(&self, image: &NormalizedImage) -> InstallResult<InstalledWallpaperFile> {
        info!("[INSTALL] Persisting wallpaper to {}", self.persister.target_path().display());
        let installed = self.persister.persist(image)?;

        self.configurator.configure_fill();

        self.notifier.apply_wallpaper(&installed.path)?;

        info!("[INSTALL] Wallpaper installed from {}", installed.path.display());
        Ok(installed)
    }
}
