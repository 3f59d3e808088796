use crate::error::{BrowserError, Result};
use std::path::{Path, PathBuf};

/// What happened to a payload handed to a [`Downloader`]
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Written to this path
    Saved(PathBuf),
    /// The target cannot accept files at all
    Unsupported(String),
}

/// Receives the finished CSV payload
pub trait Downloader {
    fn deliver(&self, filename: &str, payload: &str) -> Result<Delivery>;
}

/// Writes payloads into a local directory
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Downloader for DirectoryDownloader {
    fn deliver(&self, filename: &str, payload: &str) -> Result<Delivery> {
        if !self.dir.is_dir() {
            return Ok(Delivery::Unsupported(format!("{} is not a directory", self.dir.display())));
        }

        let path = self.dir.join(filename);
        std::fs::write(&path, payload)
            .map_err(|e| BrowserError::Download(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(Delivery::Saved(path))
    }
}
