use crate::{
    error::{InstallError, InstallResult},
    info,
};

// Generated by build.rs from the files in `assets/`.
include!(concat!(env!("OUT_DIR"), "/embedded_resources.rs"));

pub const WALLPAPER_RESOURCE: &str = "wallpaper";
pub const STARTUP_SOUND_RESOURCE: &str = "startup";

/// An immutable blob read out of the resource table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedAsset {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl EmbeddedAsset {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Name-keyed lookup of bundled blobs. Lookups have no side effects and are
/// not cached; callers keep whatever they need.
pub trait ResourceStore: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&[u8]>;

    fn load(&self, name: &str) -> InstallResult<EmbeddedAsset> {
        let bytes = self
            .lookup(name)
            .ok_or_else(|| InstallError::resource_missing(name))?;
        Ok(EmbeddedAsset {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        })
    }
}

/// Resources compiled into the executable.
pub struct EmbeddedResources {
    table: &'static [(&'static str, &'static [u8])],
}

impl EmbeddedResources {
    pub fn bundled() -> Self {
        let store = Self::from_table(EMBEDDED_RESOURCES);
        info!(
            "Embedded resources: [{}]",
            store.names().collect::<Vec<_>>().join(", ")
        );
        store
    }

    pub fn from_table(table: &'static [(&'static str, &'static [u8])]) -> Self {
        Self { table }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|(name, _)| *name)
    }
}

impl ResourceStore for EmbeddedResources {
    fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.table
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, bytes)| *bytes)
    }
}
