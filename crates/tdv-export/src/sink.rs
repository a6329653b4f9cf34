//! Save capabilities for finished artifacts.
//!
//! An exporter renders the whole artifact in memory and then hands it to an
//! [`ArtifactSink`] in a single call, so a failed export never leaves a
//! partially written file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::error::SinkError;

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub filename: String,
    pub mime: String,
    /// Human-readable location (a path, or `memory`).
    pub location: String,
    pub size: usize,
}

pub trait ArtifactSink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<SavedArtifact, SinkError>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<SavedArtifact, SinkError> {
        (**self).save(bytes, filename, mime)
    }
}

/// Writes artifacts into a directory, replacing same-named files atomically.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, filename: &str) -> Result<PathBuf, SinkError> {
        let plain = Path::new(filename)
            .file_name()
            .is_some_and(|name| name == filename);
        if !plain || filename.starts_with('.') {
            return Err(SinkError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<SavedArtifact, SinkError> {
        let path = self.target(filename)?;
        let temp_path = self.dir.join(format!(".{filename}.tmp"));

        fs::create_dir_all(&self.dir).map_err(|e| SinkError::Io {
            operation: "create directory",
            path: self.dir.clone(),
            source: e,
        })?;

        let mut file = File::create(&temp_path).map_err(|e| SinkError::Io {
            operation: "create file",
            path: temp_path.clone(),
            source: e,
        })?;

        let written = file
            .write_all(bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| SinkError::Io {
                operation: "write file",
                path: temp_path.clone(),
                source: e,
            });
        if let Err(error) = written {
            drop(file);
            let _ = fs::remove_file(&temp_path);
            return Err(error);
        }
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(SinkError::AtomicWriteFailed {
                temp_path,
                target_path: path,
                source: e,
            });
        }

        info!(path = %path.display(), bytes = bytes.len(), mime, "saved artifact");
        Ok(SavedArtifact {
            filename: filename.to_string(),
            mime: mime.to_string(),
            location: path.display().to_string(),
            size: bytes.len(),
        })
    }
}

/// A saved artifact held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Keeps artifacts in memory; saving a filename twice replaces the first.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<Artifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, filename: &str) -> Option<Artifact> {
        self.artifacts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|artifact| artifact.filename == filename)
            .cloned()
    }
}

impl ArtifactSink for MemorySink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<SavedArtifact, SinkError> {
        let artifact = Artifact {
            filename: filename.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
        };
        let mut artifacts = self.artifacts.lock().unwrap_or_else(PoisonError::into_inner);
        match artifacts.iter_mut().find(|existing| existing.filename == filename) {
            Some(existing) => *existing = artifact,
            None => artifacts.push(artifact),
        }
        Ok(SavedArtifact {
            filename: filename.to_string(),
            mime: mime.to_string(),
            location: "memory".to_string(),
            size: bytes.len(),
        })
    }
}
