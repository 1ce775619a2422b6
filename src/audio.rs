use std::{env, path::PathBuf, sync::Arc};

use crate::{
    data_loaders::config::AudioSettings,
    info,
    resources::{ResourceStore, STARTUP_SOUND_RESOURCE},
    temp_files, warn,
};

const SOUND_SUFFIX: &str = ".mp3";

/// A textual multimedia command interface (`open`, `play`, `stop`, `close`).
pub trait MediaCommandChannel {
    /// Returns the device error code on failure.
    fn send(&self, command: &str) -> Result<(), u32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Opened,
    Playing,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct PlaybackSettings {
    pub alias: String,
    pub media_type: String,
    pub temp_prefix: String,
    pub temp_dir: PathBuf,
}

impl PlaybackSettings {
    pub fn from_config(audio: &AudioSettings) -> Self {
        Self {
            alias: audio.alias.clone(),
            media_type: audio.media_type.clone(),
            temp_prefix: audio.temp_prefix.clone(),
            temp_dir: env::temp_dir(),
        }
    }
}

/// Owns the startup sound's session and its extracted temp file. Nothing in
/// here can fail the caller: the sound is decoration. Dropping the manager
/// stops playback and deletes the file.
pub struct AudioPlaybackManager<M: MediaCommandChannel> {
    media: M,
    resources: Arc<dyn ResourceStore>,
    settings: PlaybackSettings,
    temp_path: Option<PathBuf>,
    state: PlaybackState,
}

impl<M: MediaCommandChannel> AudioPlaybackManager<M> {
    pub fn new(media: M, resources: Arc<dyn ResourceStore>, settings: PlaybackSettings) -> Self {
        Self {
            media,
            resources,
            settings,
            temp_path: None,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn temp_path(&self) -> Option<&std::path::Path> {
        self.temp_path.as_deref()
    }

    /// Reuses the previously extracted file while it still exists, otherwise
    /// extracts the sound to a new uniquely named temp file.
    pub fn ensure_extracted(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.temp_path.as_ref().filter(|p| p.exists()) {
            return Some(path.clone());
        }
        self.temp_path = None;

        let asset = match self.resources.load(STARTUP_SOUND_RESOURCE) {
            Ok(asset) if !asset.is_empty() => asset,
            Ok(_) => {
                info!("[AUDIO] Startup sound resource is empty; skipping playback");
                return None;
            }
            Err(e) => {
                info!("[AUDIO] {e}; skipping playback");
                return None;
            }
        };

        match temp_files::extract_to_temp(
            &self.settings.temp_dir,
            &self.settings.temp_prefix,
            SOUND_SUFFIX,
            &asset.bytes,
        ) {
            Ok(path) => {
                info!("[AUDIO] Extracted '{}' to {}", asset.name, path.display());
                self.temp_path = Some(path.clone());
                Some(path)
            }
            Err(e) => {
                warn!("[AUDIO] Failed to extract startup sound: {e}");
                None
            }
        }
    }

    pub fn start(&mut self) {
        let Some(path) = self.ensure_extracted() else {
            return;
        };

        let alias = &self.settings.alias;

        // A session under this alias may not exist yet.
        let _ = self.media.send(&format!("close {alias}"));
        self.state = PlaybackState::Idle;

        let open = format!(
            "open \"{}\" type {} alias {}",
            path.display(),
            self.settings.media_type,
            alias
        );
        if let Err(code) = self.media.send(&open) {
            warn!("[AUDIO] open failed with MCI error {code}; not playing");
            return;
        }
        self.state = PlaybackState::Opened;

        match self.media.send(&format!("play {alias}")) {
            Ok(()) => {
                self.state = PlaybackState::Playing;
                info!("[AUDIO] Playing startup sound as '{alias}'");
            }
            Err(code) => warn!("[AUDIO] play failed with MCI error {code}"),
        }
    }

    /// Stops and closes the session and deletes the temp file. Safe to call
    /// any number of times.
    pub fn stop(&mut self) {
        let session_open = matches!(self.state, PlaybackState::Opened | PlaybackState::Playing);
        if !session_open && self.temp_path.is_none() {
            return;
        }

        let alias = &self.settings.alias;
        let _ = self.media.send(&format!("stop {alias}"));
        let _ = self.media.send(&format!("close {alias}"));

        if let Some(path) = self.temp_path.take() {
            if temp_files::remove_quietly(&path) {
                info!("[AUDIO] Removed {}", path.display());
            }
        }

        self.state = PlaybackState::Stopped;
    }
}

impl<M: MediaCommandChannel> Drop for AudioPlaybackManager<M> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(windows)]
pub use self::mci::MciCommands;

#[cfg(windows)]
mod mci {
    use windows::{core::PCWSTR, Win32::Media::Multimedia::mciSendStringW};

    use super::MediaCommandChannel;
    use crate::paths::to_wstring;

    /// Sends MCI command strings through `mciSendStringW`.
    pub struct MciCommands;

    impl MediaCommandChannel for MciCommands {
        fn send(&self, command: &str) -> Result<(), u32> {
            let wide = to_wstring(command);
            let code = unsafe { mciSendStringW(PCWSTR(wide.as_ptr()), None, None) };
            if code == 0 {
                Ok(())
            } else {
                Err(code)
            }
        }
    }
}
