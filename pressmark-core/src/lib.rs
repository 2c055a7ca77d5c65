pub mod builder;
pub mod config;
pub mod markdown;
pub mod output;
pub mod scanner;
pub mod site;
pub mod template;

// Re-export main types
pub use builder::{BuildError, BuildReport, Site, SiteBuilder, build_site};
pub use config::{ConfigError, Settings, SettingsOverrides, persist, resolve};
pub use markdown::{CmarkEngine, MarkupEngine};
pub use output::{OutputArtifact, OutputWriter, WriteError};
pub use scanner::{ContentScanner, ScanError, ScanReport, SourceDocument};
pub use site::Page;
pub use template::{PageShell, TemplateError};
