//! In-memory stand-ins for the OS seams, shared by the unit tests.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    io::{self, Cursor},
    path::{Path, PathBuf},
    sync::{mpsc::Receiver, Arc, Mutex},
};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::{
    appearance::{PreferenceKey, PreferenceStore},
    audio::MediaCommandChannel,
    notifier::DesktopWallpaperApi,
    resources::ResourceStore,
};

/// An opaque PNG with a simple gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, 200, 255])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

#[derive(Default)]
pub struct MemoryResources {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryResources {
    pub fn with(mut self, name: &str, bytes: &[u8]) -> Self {
        self.blobs.insert(name.to_string(), bytes.to_vec());
        self
    }
}

impl ResourceStore for MemoryResources {
    fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.blobs.get(name).map(Vec::as_slice)
    }
}

#[derive(Default)]
struct PreferenceState {
    values: BTreeMap<String, String>,
    rejected: HashSet<String>,
    releases: usize,
}

#[derive(Clone, Default)]
pub struct FakePreferences {
    unreachable: bool,
    state: Arc<Mutex<PreferenceState>>,
}

impl FakePreferences {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn seed(&self, name: &str, value: &str) {
        self.state.lock().unwrap().values.insert(name.into(), value.into());
    }

    pub fn reject_writes_to(&self, name: &str) {
        self.state.lock().unwrap().rejected.insert(name.into());
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.state.lock().unwrap().values.get(name).cloned()
    }

    /// How many opened keys have been dropped.
    pub fn releases(&self) -> usize {
        self.state.lock().unwrap().releases
    }
}

pub struct FakeKey {
    state: Arc<Mutex<PreferenceState>>,
}

impl PreferenceStore for FakePreferences {
    type Key = FakeKey;

    fn open_desktop(&self) -> io::Result<FakeKey> {
        if self.unreachable {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied"));
        }
        Ok(FakeKey {
            state: Arc::clone(&self.state),
        })
    }
}

impl PreferenceKey for FakeKey {
    fn set_string(&mut self, name: &str, value: &str) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.rejected.contains(name) {
            return Err(io::Error::other("write rejected"));
        }
        state.values.insert(name.into(), value.into());
        Ok(())
    }
}

impl Drop for FakeKey {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.releases += 1;
        }
    }
}

#[derive(Clone)]
pub struct FakeDesktop {
    result: Result<(), u32>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
    gate: Option<Arc<Mutex<Receiver<()>>>>,
}

impl FakeDesktop {
    pub fn accepting() -> Self {
        Self {
            result: Ok(()),
            calls: Arc::default(),
            gate: None,
        }
    }

    pub fn rejecting(code: u32) -> Self {
        Self {
            result: Err(code),
            ..Self::accepting()
        }
    }

    /// Blocks each call until a message arrives on `gate`.
    pub fn gated(gate: Receiver<()>) -> Self {
        Self {
            gate: Some(Arc::new(Mutex::new(gate))),
            ..Self::accepting()
        }
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl DesktopWallpaperApi for FakeDesktop {
    fn set_desk_wallpaper(&self, path: &Path) -> Result<(), u32> {
        if let Some(gate) = &self.gate {
            let _ = gate.lock().unwrap().recv();
        }
        self.calls.lock().unwrap().push(path.to_path_buf());
        self.result
    }
}

#[derive(Clone, Default)]
pub struct FakeMedia {
    failing_prefix: Option<(&'static str, u32)>,
    commands: Arc<Mutex<Vec<String>>>,
}

impl FakeMedia {
    /// Rejects every command starting with `prefix`.
    pub fn failing(prefix: &'static str, code: u32) -> Self {
        Self {
            failing_prefix: Some((prefix, code)),
            ..Self::default()
        }
    }

    pub fn failing_all(code: u32) -> Self {
        Self::failing("", code)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl MediaCommandChannel for FakeMedia {
    fn send(&self, command: &str) -> Result<(), u32> {
        self.commands.lock().unwrap().push(command.to_string());
        match self.failing_prefix {
            Some((prefix, code)) if command.starts_with(prefix) => Err(code),
            _ => Ok(()),
        }
    }
}
