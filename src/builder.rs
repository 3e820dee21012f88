//! Directory-to-bundle builder.
//!
//! Walks directory trees and packs every regular file as an asset named by
//! its file name. Files with the same name in different directories collide
//! and the last one visited wins. In development mode the canonical path of
//! each file is stored instead of its content, so the resulting bundle reads
//! live files on access.
//!
//! ```no_run
//! use asset_bundle::builder::BundleBuilder;
//! use asset_bundle::config::BuilderConfig;
//! use std::path::Path;
//!
//! let mut builder = BundleBuilder::new(BuilderConfig::default());
//! builder.add_dir(Path::new("public")).unwrap();
//! let written_to = builder.write().unwrap();
//! println!("bundle written to {}", written_to.display());
//! ```

use crate::config::{BuilderConfig, CodecConfig};
use crate::core::bundle::Bundle;
use crate::core::codec::BundleCodec;
use crate::core::header::BundleKind;
use crate::error::{BundleError, Result};
use crate::utils::fs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Collects files into a bundle according to a [`BuilderConfig`]
pub struct BundleBuilder {
    config: BuilderConfig,
    codec: BundleCodec,
    bundle: Bundle,
}

impl BundleBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self::with_codec(config, CodecConfig::default())
    }

    /// Builder with explicit codec settings (serialization format, level, limits)
    pub fn with_codec(config: BuilderConfig, codec: CodecConfig) -> Self {
        let bundle = Bundle::new(config.mode_or(codec.mode));
        Self {
            config,
            codec: BundleCodec::new(codec),
            bundle,
        }
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// The pipeline [`BundleBuilder::write`] encodes with
    pub fn mode(&self) -> BundleKind {
        self.config.mode_or(self.codec.config().mode)
    }

    /// Recursively add every file under `dir`. Returns the number of files added.
    ///
    /// Symbolic links are followed; a directory reached twice is walked once.
    /// Entries whose metadata cannot be read, such as dangling links, are
    /// skipped with a warning.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn add_dir(&mut self, dir: &Path) -> Result<usize> {
        let mut visited = HashSet::new();
        self.walk(dir, &mut visited)
    }

    fn walk(&mut self, dir: &Path, visited: &mut HashSet<PathBuf>) -> Result<usize> {
        if !visited.insert(std::fs::canonicalize(dir)?) {
            warn!(dir = %dir.display(), "Skipping directory that was already visited");
            return Ok(0);
        }

        let mut entries = std::fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
        // Deterministic visiting order makes name collisions reproducible
        entries.sort_by_key(|entry| entry.file_name());

        let mut added = 0;
        for entry in entries {
            let path = entry.path();
            if self.config.skip_hidden && is_hidden(&path) {
                debug!(path = %path.display(), "Skipping hidden entry");
                continue;
            }

            let metadata = match std::fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if metadata.is_dir() {
                added += self.walk(&path, visited)?;
            } else {
                self.add_file(&path)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Add a single file under its file name
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                BundleError::ConfigError(format!(
                    "File name is not valid UTF-8: {}",
                    path.display()
                ))
            })?
            .to_string();

        let data = if self.config.development {
            let canonical = std::fs::canonicalize(path)?;
            canonical
                .to_str()
                .ok_or_else(|| {
                    BundleError::ConfigError(format!(
                        "Path is not valid UTF-8: {}",
                        canonical.display()
                    ))
                })?
                .as_bytes()
                .to_vec()
        } else {
            fs::read_all(path)?
        };

        if self.bundle.contains(&name) {
            debug!(asset = %name, path = %path.display(), "Replacing asset with same name");
        }
        info!(asset = %name, path = %path.display(), "Added asset");
        self.bundle.add_asset(name, data);
        Ok(())
    }

    /// The bundle collected so far
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Finish collecting and return the bundle
    pub fn build(self) -> Bundle {
        self.bundle
    }

    /// Encode the collected bundle and write it to the configured output.
    ///
    /// Development builds are written with the DEVELOPMENT flag, builds with a
    /// key are encrypted, everything else uses the codec's configured mode.
    pub fn write(&self) -> Result<PathBuf> {
        self.write_to(&self.config.output)
    }

    /// Like [`BundleBuilder::write`] with an explicit destination
    pub fn write_to(&self, output: &Path) -> Result<PathBuf> {
        self.config_check()?;
        let mode = self.mode();
        let key = self.config.key.as_deref().unwrap_or_default().as_bytes();
        self.codec.save_file(output, &self.bundle, mode, key)?;
        info!(
            output = %output.display(),
            mode = %mode,
            assets = self.bundle.len(),
            "Bundle written"
        );
        Ok(output.to_path_buf())
    }

    fn config_check(&self) -> Result<()> {
        let errors = self.config.validate_with(self.codec.config());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BundleError::ConfigError(errors.join("; ")))
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Pack one or more directories into a bundle file in one call
pub fn build_dirs(config: BuilderConfig, dirs: &[PathBuf]) -> Result<PathBuf> {
    let mut builder = BundleBuilder::new(config);
    for dir in dirs {
        builder.add_dir(dir)?;
    }
    builder.write()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_hidden_detection() {
        assert!(is_hidden(Path::new("/a/.git")));
        assert!(!is_hidden(Path::new("/a/index.html")));
    }

    #[test]
    fn test_add_file_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut builder = BundleBuilder::new(BuilderConfig::default());
        builder.add_file(&path).unwrap();
        let bundle = builder.build();
        assert_eq!(bundle.info, BundleKind::Compressed);
        assert_eq!(&*bundle.asset("logo.png").unwrap(), &[1, 2, 3]);
    }
}
