use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver},
        Arc,
    },
    thread,
};

use crate::{
    appearance::PreferenceStore,
    audio::{AudioPlaybackManager, MediaCommandChannel},
    error::{InstallError, InstallResult},
    image_normalizer::{self, NormalizedImage},
    info,
    notifier::DesktopWallpaperApi,
    persister::InstalledWallpaperFile,
    pipeline::InstallationPipeline,
    resources::{ResourceStore, WALLPAPER_RESOURCE},
    warn,
};

pub type InstallOutcome = InstallResult<InstalledWallpaperFile>;

/// Clears the in-flight flag when the worker finishes, panics included.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Everything the installer dialog drives: the preview image loaded at open,
/// the install trigger and the startup sound.
pub struct InstallerSession<S, A, M: MediaCommandChannel> {
    pipeline: Arc<InstallationPipeline<S, A>>,
    image: Option<Arc<NormalizedImage>>,
    load_error: Option<InstallError>,
    in_flight: Arc<AtomicBool>,
    sound: Option<AudioPlaybackManager<M>>,
}

impl<S, A, M> InstallerSession<S, A, M>
where
    S: PreferenceStore + 'static,
    A: DesktopWallpaperApi + 'static,
    M: MediaCommandChannel,
{
    pub fn open(
        resources: &dyn ResourceStore,
        pipeline: InstallationPipeline<S, A>,
        sound: Option<AudioPlaybackManager<M>>,
    ) -> Self {
        let loaded = resources
            .load(WALLPAPER_RESOURCE)
            .and_then(|asset| image_normalizer::normalize(&asset.bytes));

        let (image, load_error) = match loaded {
            Ok(image) => {
                info!("[SESSION] Preview ready: {}x{}", image.width(), image.height());
                (Some(Arc::new(image)), None)
            }
            Err(e) => {
                warn!("[SESSION] Install disabled: {e}");
                (None, Some(e))
            }
        };

        Self {
            pipeline: Arc::new(pipeline),
            image,
            load_error,
            in_flight: Arc::new(AtomicBool::new(false)),
            sound,
        }
    }

    pub fn preview(&self) -> Option<&NormalizedImage> {
        self.image.as_deref()
    }

    pub fn load_error(&self) -> Option<&InstallError> {
        self.load_error.as_ref()
    }

    /// Whether the install trigger should be enabled right now.
    pub fn can_install(&self) -> bool {
        let blocked = self
            .load_error
            .as_ref()
            .is_some_and(InstallError::is_fatal_to_affordance);
        !blocked && self.image.is_some() && !self.in_flight.load(Ordering::Acquire)
    }

    /// Runs the pipeline on a worker thread. The outcome arrives on the
    /// returned channel; until then further requests are rejected with
    /// [`InstallError::Busy`].
    pub fn begin_install(&self) -> InstallResult<Receiver<InstallOutcome>> {
        let image = self.image.clone().ok_or(InstallError::NoImage)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(InstallError::Busy);
        }
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let (tx, rx) = mpsc::channel();
        let pipeline = Arc::clone(&self.pipeline);

        thread::Builder::new()
            .name("wallpaper-install".into())
            .spawn(move || {
                let outcome = pipeline.install(&image);
                drop(guard);
                let _ = tx.send(outcome);
            })
            .map_err(InstallError::Worker)?;

        Ok(rx)
    }

    /// Dialog shown.
    pub fn on_shown(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            sound.start();
            info!("[SESSION] Startup sound {:?}", sound.state());
        }
    }

    /// Dialog closed.
    pub fn on_closed(&mut self) {
        if let Some(sound) = self.sound.as_mut() {
            sound.stop();
        }
    }
}
