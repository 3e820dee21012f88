//! The in-memory bundle model.
//!
//! A [`Bundle`] is a version byte, a [`BundleKind`] flag and a map from asset
//! name to [`Asset`]. Names are unique and case-sensitive; adding an existing
//! name replaces it. Iteration order is unspecified.
//!
//! In [`BundleKind::Development`] bundles each asset holds a file-system path
//! instead of content, and [`Bundle::asset`] reads that file on every call.
//! There is no caching: repeated reads hit the disk again.

use crate::config::FORMAT_VERSION;
use crate::core::header::BundleKind;
use crate::error::{constants, BundleError, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// One opaque payload stored in a bundle
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Asset {
    #[serde(with = "serde_bytes")]
    data: Vec<u8>,
}

impl Asset {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// The stored bytes; a path in development bundles
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl From<Vec<u8>> for Asset {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// A named collection of assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    /// Format version, taken from the header on decode
    pub version: u8,
    /// Pipeline flag, taken from the header on decode
    pub info: BundleKind,
    assets: HashMap<String, Asset>,
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new(BundleKind::None)
    }
}

impl Bundle {
    /// Create an empty bundle with the current format version
    pub fn new(info: BundleKind) -> Self {
        Self {
            version: FORMAT_VERSION,
            info,
            assets: HashMap::new(),
        }
    }

    pub fn kind(&self) -> BundleKind {
        self.info
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Fetch an asset's content.
    ///
    /// Embedded content is borrowed. In development bundles the stored path is
    /// read from disk and returned owned.
    ///
    /// # Errors
    /// - `BundleError::AssetNotFound` if no asset has this name
    /// - `BundleError::AssetUnreadable` if a development path cannot be read
    pub fn asset(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        let asset = self
            .assets
            .get(name)
            .ok_or_else(|| BundleError::AssetNotFound(name.to_string()))?;

        if self.info != BundleKind::Development {
            return Ok(Cow::Borrowed(asset.data()));
        }

        let path = std::str::from_utf8(asset.data())
            .map(PathBuf::from)
            .map_err(|_| BundleError::AssetUnreadable {
                name: name.to_string(),
                path: PathBuf::from(String::from_utf8_lossy(asset.data()).into_owned()),
                source: io::Error::new(io::ErrorKind::InvalidData, constants::ERR_ASSET_PATH_UTF8),
            })?;

        debug!(asset = name, path = %path.display(), "Reading development asset");
        fs::read_all(&path)
            .map(Cow::Owned)
            .map_err(|source| BundleError::AssetUnreadable {
                name: name.to_string(),
                path,
                source,
            })
    }

    /// Insert or replace an asset
    pub fn add_asset(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.assets.insert(name.into(), Asset::new(data.into()));
    }

    /// Remove an asset
    ///
    /// # Errors
    /// Returns `BundleError::AssetNotFound` if no asset has this name
    pub fn delete_asset(&mut self, name: &str) -> Result<()> {
        self.assets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BundleError::AssetNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Asset names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    /// Raw stored entries, without development-mode resolution
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Asset)> {
        self.assets.iter().map(|(name, asset)| (name.as_str(), asset))
    }

    /// Write every asset into `dir` under its own name.
    ///
    /// Content is resolved through [`Bundle::asset`], so development bundles
    /// copy the live files. Returns the number of files written.
    ///
    /// # Errors
    /// Returns `BundleError::ConfigError` for a name that is not a plain file
    /// name, before anything is written, and propagates read and write failures.
    #[instrument(skip(self), fields(assets = self.len()))]
    pub fn extract_to(&self, dir: &Path) -> Result<usize> {
        if let Some(name) = self.assets.keys().find(|name| !is_plain_file_name(name)) {
            return Err(BundleError::ConfigError(format!(
                "{}: '{name}'",
                constants::ERR_ASSET_NAME_UNSAFE
            )));
        }

        let mut written = 0;
        for name in self.assets.keys() {
            let data = self.asset(name)?;
            fs::write_all(&dir.join(name), &data)?;
            written += 1;
        }
        Ok(written)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
