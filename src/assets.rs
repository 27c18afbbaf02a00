//! Logo retrieval for the letterhead.
//!
//! The header renderer does not care where the logos come from; it asks an
//! [`AssetSource`] and falls back to a text-only header on any failure.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// The two fixed letterhead logos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logo {
    /// School-group logo, top left.
    Arcadia,
    /// School logo, top right.
    Sma,
}

impl Logo {
    /// File name used by [`DirectoryAssets`].
    pub fn file_name(self) -> &'static str {
        match self {
            Logo::Arcadia => "arcadia.png",
            Logo::Sma => "sma_logo.png",
        }
    }

    /// Id the logo is registered under in the layout.
    pub fn image_id(self) -> &'static str {
        match self {
            Logo::Arcadia => "logo-arcadia",
            Logo::Sma => "logo-sma",
        }
    }
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("logo {0:?} is not available")]
    Missing(Logo),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can hand out the raw bytes of a logo.
pub trait AssetSource {
    fn fetch(&self, logo: Logo) -> Result<Vec<u8>, AssetError>;
}

/// Logos held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticAssets {
    pub arcadia: Option<Vec<u8>>,
    pub sma: Option<Vec<u8>>,
}

impl StaticAssets {
    pub fn new(arcadia: Vec<u8>, sma: Vec<u8>) -> Self {
        Self {
            arcadia: Some(arcadia),
            sma: Some(sma),
        }
    }
}

impl AssetSource for StaticAssets {
    fn fetch(&self, logo: Logo) -> Result<Vec<u8>, AssetError> {
        let bytes = match logo {
            Logo::Arcadia => &self.arcadia,
            Logo::Sma => &self.sma,
        };
        bytes.clone().ok_or(AssetError::Missing(logo))
    }
}

/// Logos read from a directory, using [`Logo::file_name`].
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectoryAssets {
    fn fetch(&self, logo: Logo) -> Result<Vec<u8>, AssetError> {
        let path = self.root.join(logo.file_name());
        fs::read(&path).map_err(|source| AssetError::Io { path, source })
    }
}

/// No logos at all; every fetch fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn fetch(&self, logo: Logo) -> Result<Vec<u8>, AssetError> {
        Err(AssetError::Missing(logo))
    }
}
