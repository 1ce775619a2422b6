use std::{io, path::PathBuf};

pub type InstallResult<T> = Result<T, InstallError>;

/// Failures the installer surfaces to the user. Preference-store and audio
/// failures are absorbed inside their components and never appear here.
#[derive(thiserror::Error, Debug)]
pub enum InstallError {
    #[error("embedded resource '{name}' was not found")]
    ResourceMissing { name: String },

    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("could not resolve the machine application data directory")]
    AppDataUnavailable,

    #[error("could not write wallpaper to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not encode wallpaper bitmap: {0}")]
    Encode(String),

    #[error("Windows rejected the wallpaper update. Error code: {code}")]
    OsNotification { code: u32 },

    #[error("No image is loaded.")]
    NoImage,

    #[error("an install is already in progress")]
    Busy,

    #[error("could not start install worker: {0}")]
    Worker(#[source] io::Error),
}

impl InstallError {
    pub fn resource_missing(name: impl Into<String>) -> Self {
        Self::ResourceMissing { name: name.into() }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Errors raised while loading the bundled image; these leave the
    /// install affordance disabled for the rest of the session.
    pub fn is_fatal_to_affordance(&self) -> bool {
        matches!(
            self,
            Self::ResourceMissing { .. } | Self::UnsupportedImageFormat(_)
        )
    }

    pub fn message_title(&self) -> &'static str {
        match self {
            Self::ResourceMissing { .. } | Self::UnsupportedImageFormat(_) => "Load Error",
            Self::NoImage => "Image Missing",
            _ => "Install Error",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::ResourceMissing { .. } | Self::UnsupportedImageFormat(_) => {
                format!("Could not load image:\n\n{self}")
            }
            Self::NoImage => self.to_string(),
            _ => format!("Install failed:\n\n{self}"),
        }
    }
}
