use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    data_loaders::config::InstallSettings,
    error::{InstallError, InstallResult},
    image_normalizer::NormalizedImage,
    info, paths,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallpaperFormat {
    Bmp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledWallpaperFile {
    pub path: PathBuf,
    pub format: WallpaperFormat,
}

/// Writes the wallpaper to one fixed location so each install replaces the
/// previous file instead of leaving old copies behind.
#[derive(Debug, Clone)]
pub struct WallpaperPersister {
    install_dir: PathBuf,
    file_name: String,
}

impl WallpaperPersister {
    pub fn new(install_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            file_name: file_name.into(),
        }
    }

    /// `<ProgramData>/<folder>/<file_name>`
    pub fn for_machine(settings: &InstallSettings) -> InstallResult<Self> {
        let root = paths::machine_app_data_dir().ok_or(InstallError::AppDataUnavailable)?;
        Ok(Self::for_root(&root, settings))
    }

    pub fn for_root(root: &Path, settings: &InstallSettings) -> Self {
        Self::new(root.join(&settings.folder), settings.file_name.clone())
    }

    #[cfg(test)]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn target_path(&self) -> PathBuf {
        self.install_dir.join(&self.file_name)
    }

    pub fn persist(&self, image: &NormalizedImage) -> InstallResult<InstalledWallpaperFile> {
        fs::create_dir_all(&self.install_dir)
            .map_err(|e| InstallError::persistence(&self.install_dir, e))?;

        let target = self.target_path();
        let path = std::path::absolute(&target).map_err(|e| InstallError::persistence(&target, e))?;

        let bmp = image.to_bmp_bytes()?;
        fs::write(&path, &bmp).map_err(|e| InstallError::persistence(&path, e))?;

        info!(
            "Wrote {}x{} wallpaper ({} bytes) to {}",
            image.width(),
            image.height(),
            bmp.len(),
            path.display()
        );

        Ok(InstalledWallpaperFile {
            path,
            format: WallpaperFormat::Bmp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{image_normalizer::normalize, testing::png_bytes};

    #[test]
    fn creates_missing_directories_and_writes_a_bmp() {
        let root = tempfile::TempDir::new().unwrap();
        let persister = WallpaperPersister::new(root.path().join("a").join("b"), "cat-wallpaper.bmp");
        let image = normalize(&png_bytes(100, 100)).unwrap();

        let installed = persister.persist(&image).unwrap();

        assert_eq!(installed.format, WallpaperFormat::Bmp);
        assert!(installed.path.is_absolute());
        assert_eq!(installed.path, root.path().join("a").join("b").join("cat-wallpaper.bmp"));
        let reopened = image::open(&installed.path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (100, 100));
    }

    #[test]
    fn repeated_installs_overwrite_the_same_file_identically() {
        let root = tempfile::TempDir::new().unwrap();
        let persister = WallpaperPersister::new(root.path(), "cat-wallpaper.bmp");
        let image = normalize(&png_bytes(32, 16)).unwrap();

        let first = persister.persist(&image).unwrap();
        let first_bytes = fs::read(&first.path).unwrap();
        let second = persister.persist(&image).unwrap();

        assert_eq!(first.path, second.path);
        assert_eq!(fs::read(&second.path).unwrap(), first_bytes);
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 1);
    }

    #[test]
    fn newer_image_replaces_older_one() {
        let root = tempfile::TempDir::new().unwrap();
        let persister = WallpaperPersister::new(root.path(), "cat-wallpaper.bmp");

        persister.persist(&normalize(&png_bytes(8, 8)).unwrap()).unwrap();
        let installed = persister.persist(&normalize(&png_bytes(20, 10)).unwrap()).unwrap();

        let reopened = image::open(&installed.path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (20, 10));
    }

    #[test]
    fn unwritable_directory_is_a_persistence_error() {
        let root = tempfile::TempDir::new().unwrap();
        let blocker = root.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let persister = WallpaperPersister::new(blocker.join("inner"), "cat-wallpaper.bmp");
        let err = persister.persist(&normalize(&png_bytes(4, 4)).unwrap()).unwrap_err();

        assert!(matches!(err, InstallError::Persistence { .. }));
        assert!(!blocker.join("inner").exists());
    }

    #[test]
    fn machine_location_uses_configured_names() {
        let root = Path::new("machine-data");
        let persister = WallpaperPersister::for_root(root, &InstallSettings::default());

        assert_eq!(persister.install_dir(), root.join("CatWallpaperInstaller"));
        assert_eq!(
            persister.target_path(),
            root.join("CatWallpaperInstaller").join("cat-wallpaper.bmp")
        );
    }

    #[test]
    fn repeated_resolution_is_deterministic() {
        let root = Path::new("machine-data");
        let settings = InstallSettings {
            folder: "Cats".into(),
            file_name: "tabby.bmp".into(),
        };

        let first = WallpaperPersister::for_root(root, &settings).target_path();
        let second = WallpaperPersister::for_root(root, &settings).target_path();
        assert_eq!(first, second);
        assert_eq!(first, root.join("Cats").join("tabby.bmp"));
    }
}
