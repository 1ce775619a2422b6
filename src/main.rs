#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![cfg_attr(not(windows), allow(dead_code))]

mod appearance;
mod audio;
mod bootstrap;
mod data_loaders;
#[cfg(windows)]
mod dialog;
mod error;
mod image_normalizer;
mod installer;
mod logging;
mod notifier;
mod paths;
mod persister;
mod pipeline;
mod resources;
mod temp_files;
#[cfg(test)]
mod testing;

use crate::data_loaders::config::InstallerConfig;

pub const APP_NAME: &str = "CatWallpaperInstaller";

fn main() {
    let config_path = paths::config_path();
    let config = InstallerConfig::load(&config_path).unwrap_or_default();

    logging::init(config.debug, &config.log_level);
    std::panic::set_hook(Box::new(|panic_info| {
        error!("[{}] Panic: {}", APP_NAME, panic_info);
    }));

    bootstrap::scaffold_config(&config_path);

    info!("!---------- [{}] Starting ----------!", APP_NAME);
    info!("[{}] Config loaded from {}", APP_NAME, config_path.display());

    run(&config);

    info!("[{}] Exiting", APP_NAME);
}

#[cfg(windows)]
fn run(config: &InstallerConfig) {
    use std::sync::Arc;

    use crate::{
        appearance::{AppearanceConfigurator, UserDesktopPreferences},
        audio::{AudioPlaybackManager, MciCommands, PlaybackSettings},
        installer::InstallerSession,
        notifier::{NotificationInvoker, SystemParametersApi},
        persister::WallpaperPersister,
        pipeline::InstallationPipeline,
        resources::{EmbeddedResources, ResourceStore},
    };

    let resources: Arc<dyn ResourceStore> = Arc::new(EmbeddedResources::bundled());

    let persister = match WallpaperPersister::for_machine(&config.settings.install) {
        Ok(persister) => persister,
        Err(e) => {
            error!("[{}] {}", APP_NAME, e);
            dialog::show_error(&e);
            return;
        }
    };
    info!("[{}] Wallpaper target: {}", APP_NAME, persister.target_path().display());

    let pipeline = InstallationPipeline::new(
        persister,
        AppearanceConfigurator::new(UserDesktopPreferences),
        NotificationInvoker::new(SystemParametersApi),
    );

    let sound = config.settings.audio.enabled.then(|| {
        AudioPlaybackManager::new(
            MciCommands,
            Arc::clone(&resources),
            PlaybackSettings::from_config(&config.settings.audio),
        )
    });

    let mut session = InstallerSession::open(resources.as_ref(), pipeline, sound);
    session.on_shown();

    let preview = session.preview().map(|image| (image.width(), image.height()));

    if let Some(e) = session.load_error() {
        dialog::show_error(e);
    } else if let Some((width, height)) = preview.filter(|_| session.can_install()) {
        if dialog::confirm_install(width, height) {
            let outcome = session
                .begin_install()
                .and_then(|rx| dialog::wait_for_install(&rx));

            match outcome {
                Ok(installed) => {
                    info!(
                        "[{}] Installed {} ({:?})",
                        APP_NAME,
                        installed.path.display(),
                        installed.format
                    );
                    dialog::show_installed();
                }
                Err(e) => {
                    error!("[{}] Install failed: {}", APP_NAME, e);
                    dialog::show_error(&e);
                }
            }
        } else {
            info!("[{}] Install declined", APP_NAME);
        }
    } else {
        warn!("[{}] Install is not available", APP_NAME);
    }

    session.on_closed();
}

#[cfg(not(windows))]
fn run(_config: &InstallerConfig) {
    error!(
        "[{}] Installing a desktop wallpaper is only supported on Windows",
        APP_NAME
    );
    eprintln!("{APP_NAME}: installing a desktop wallpaper is only supported on Windows");
}
