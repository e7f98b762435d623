// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Durable storage for serialized configuration documents

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Backing storage for one configuration document
#[cfg_attr(test, mockall::automock)]
pub trait ConfigSource: Send + Sync {
    /// Human-readable name used in logs and errors
    fn describe(&self) -> String;

    /// Read the raw document; `Ok(None)` means the document does not exist yet
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the document with `contents`, all or nothing
    fn write(&self, contents: &str) -> io::Result<()>;
}

/// A TOML file on disk, optionally backed by a fallback file for reads
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    fallback: Option<PathBuf>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
        }
    }

    /// Read from `fallback` when the primary path cannot be read
    pub fn with_fallback(mut self, fallback: impl Into<PathBuf>) -> Self {
        let fallback = fallback.into();
        if fallback != self.path {
            self.fallback = Some(fallback);
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_optional(path: &Path) -> io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

impl ConfigSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<Option<String>> {
        let primary = read_optional(&self.path);
        let Some(fallback) = &self.fallback else {
            return primary;
        };
        if matches!(primary, Ok(Some(_))) {
            return primary;
        }

        tracing::warn!(
            path = %self.path.display(),
            fallback = %fallback.display(),
            "failed to load configuration, falling back to default"
        );
        read_optional(fallback)
    }

    fn write(&self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        // Same-directory temp file so the final rename stays on one filesystem
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}
