use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::Settings;
use crate::markdown::{CmarkEngine, MarkupEngine};
use crate::output::{OutputArtifact, OutputWriter, WriteError};
use crate::scanner::{ContentScanner, SOURCE_EXTENSION, ScanError};
use crate::site::{Page, base_name};
use crate::template::{PageShell, TemplateError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("failed to generate HTML for {}", source_path.display())]
    Write {
        source_path: PathBuf,
        #[source]
        source: WriteError,
    },
    #[error(transparent)]
    Output(#[from] WriteError),
}

/// What one run of the pipeline produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub artifacts: Vec<OutputArtifact>,
    pub skipped: Vec<PathBuf>,
}

pub struct SiteBuilder {
    content_dir: PathBuf,
    output_dir: PathBuf,
    extension: String,
    engine: Box<dyn MarkupEngine>,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        let defaults = Settings::default();

        Self {
            content_dir: defaults.content_dir,
            output_dir: defaults.output_dir,
            extension: SOURCE_EXTENSION.to_string(),
            engine: Box::new(CmarkEngine::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new()
            .content_dir(&settings.content_dir)
            .output_dir(&settings.output_dir)
    }

    pub fn content_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.content_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Swap in a different markup engine
    pub fn engine<E: MarkupEngine + 'static>(mut self, engine: E) -> Self {
        self.engine = Box::new(engine);
        self
    }

    pub fn build(self) -> Result<Site, BuildError> {
        Ok(Site {
            scanner: ContentScanner::new(&self.content_dir).extension(self.extension.clone()),
            writer: OutputWriter::new(&self.output_dir),
            shell: PageShell::new()?,
            extension: self.extension,
            engine: self.engine,
        })
    }
}

pub struct Site {
    scanner: ContentScanner,
    writer: OutputWriter,
    shell: PageShell,
    extension: String,
    engine: Box<dyn MarkupEngine>,
}

impl Site {
    /// Scan the content directory and write one HTML file per source
    /// document. Stops at the first failure.
    ///
    /// The output directory is only created once the content directory has
    /// been listed successfully.
    pub fn render_all(&self) -> Result<BuildReport, BuildError> {
        let scan = self.scanner.scan()?;
        self.writer.prepare()?;

        let mut report = BuildReport {
            artifacts: Vec::with_capacity(scan.documents.len()),
            skipped: scan.skipped,
        };

        for document in &scan.documents {
            let fragment = self.engine.translate(&document.raw);
            let page = Page::assemble_with_extension(&document.name, &self.extension, fragment);
            let base = base_name(&document.name, &self.extension);

            let artifact = self
                .writer
                .write(base, &page, &self.shell)
                .map_err(|source| BuildError::Write {
                    source_path: document.path.clone(),
                    source,
                })?;

            info!("Generated: {}", artifact.path.display());
            report.artifacts.push(artifact);
        }

        info!(
            "Site generation complete. Output in '{}'.",
            self.writer.output_dir().display()
        );

        Ok(report)
    }
}

/// Run the whole pipeline for `settings` with the default markup engine.
pub fn build_site(settings: &Settings) -> Result<BuildReport, BuildError> {
    SiteBuilder::from_settings(settings).build()?.render_all()
}
