use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Extension of the files the scanner picks up.
pub const SOURCE_EXTENSION: &str = "md";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read content directory '{}'", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read file {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One markdown file read from the content directory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name including the extension, e.g. `post.md`.
    pub name: String,
    pub path: PathBuf,
    pub raw: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub documents: Vec<SourceDocument>,
    /// Regular files that were not source documents.
    pub skipped: Vec<PathBuf>,
}

impl ScanReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

pub struct ContentScanner {
    content_dir: PathBuf,
    extension: String,
}

impl ContentScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            content_dir: path.as_ref().to_path_buf(),
            extension: SOURCE_EXTENSION.to_string(),
        }
    }

    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// List the direct entries of the content directory and read every
    /// source document among them. Subdirectories are never descended into.
    pub fn scan(&self) -> Result<ScanReport, ScanError> {
        debug!(dir = %self.content_dir.display(), "scanning");

        let unreadable = |source| ScanError::DirectoryUnreadable {
            path: self.content_dir.clone(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(&self.content_dir).map_err(unreadable)? {
            paths.push(entry.map_err(unreadable)?.path());
        }
        paths.sort();

        let mut report = ScanReport::default();
        for path in paths {
            if path.is_dir() {
                continue;
            }

            if !self.is_source(&path) {
                info!("Skipping non-markdown file: {}", display_name(&path));
                report.skipped.push(path);
                continue;
            }

            let raw = std::fs::read(&path).map_err(|source| ScanError::ReadFile {
                path: path.clone(),
                source,
            })?;

            report.documents.push(SourceDocument {
                name: display_name(&path),
                path,
                raw,
            });
        }

        Ok(report)
    }

    // Everything after the last dot of the file name, so `.md` on its own
    // counts as a markdown file.
    fn is_source(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext == self.extension)
            .unwrap_or(false)
    }
}

fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => path.display().to_string(),
    }
}
