use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::site::Page;
use crate::template::{PageShell, TemplateError};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A page persisted to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub bytes_written: usize,
}

pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory and any missing parents. Does nothing if
    /// it already exists.
    pub fn prepare(&self) -> Result<(), WriteError> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }

        builder
            .create(&self.output_dir)
            .map_err(|source| WriteError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })
    }

    pub fn artifact_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{base_name}.html"))
    }

    /// Render `page` and write it to `<output_dir>/<base_name>.html`,
    /// replacing whatever was there.
    pub fn write(&self, base_name: &str, page: &Page, shell: &PageShell) -> Result<OutputArtifact, WriteError> {
        let path = self.artifact_path(base_name);

        let html = shell.render(page).map_err(|source| WriteError::Render {
            path: path.clone(),
            source,
        })?;

        std::fs::write(&path, &html).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(OutputArtifact {
            path,
            bytes_written: html.len(),
        })
    }
}
