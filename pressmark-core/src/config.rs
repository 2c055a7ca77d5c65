use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Settings file looked up when the caller does not name one.
pub const DEFAULT_CONFIG_PATH: &str = "pressmark.yaml";

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("settings file is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    TomlParse(#[from] toml::de::Error),
    #[error(transparent)]
    TomlWrite(#[from] toml::ser::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed settings file {}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
    #[error("could not serialize settings")]
    Serialize(#[source] FormatError),
    #[error("could not write settings file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The resolved configuration driving one command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub site_title: String,
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
    pub server_port: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_title: "Default Site Title".into(),
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("output"),
            server_port: "8080".into(),
        }
    }
}

impl Settings {
    /// Overlay every non-empty field of `layer` onto these settings.
    pub fn apply(&mut self, layer: &SettingsOverrides) {
        if let Some(title) = layer.site_title.as_ref().filter(|t| !t.is_empty()) {
            self.site_title = title.clone();
        }
        if let Some(dir) = layer.content_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            self.content_dir = dir.clone();
        }
        if let Some(dir) = layer.output_dir.as_ref().filter(|d| !d.as_os_str().is_empty()) {
            self.output_dir = dir.clone();
        }
        if let Some(port) = layer.server_port.as_ref().filter(|p| !p.is_empty()) {
            self.server_port = port.clone();
        }
    }
}

/// A partial settings layer. Used both for the parsed settings file and for
/// explicit command-line overrides; `None` leaves the previous layer alone.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsOverrides {
    #[serde(deserialize_with = "scalar_text")]
    pub site_title: Option<String>,
    #[serde(deserialize_with = "scalar_path")]
    pub content_dir: Option<PathBuf>,
    #[serde(deserialize_with = "scalar_path")]
    pub output_dir: Option<PathBuf>,
    #[serde(deserialize_with = "scalar_text")]
    pub server_port: Option<String>,
}

impl SettingsOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Any scalar reads as text: `serverPort: 8080` and `serverPort: "8080"`
// mean the same thing, and so do `siteTitle: 1984` and `siteTitle: "1984"`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Signed(i64),
        Unsigned(u64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Signed(number) => number.to_string(),
        Scalar::Unsigned(number) => number.to_string(),
        Scalar::Float(number) => number.to_string(),
        Scalar::Bool(flag) => flag.to_string(),
    }))
}

fn scalar_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.map(PathBuf::from))
}

/// On-disk encoding of a settings file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => FileFormat::Yaml,
        }
    }

    fn parse(self, contents: &str) -> Result<SettingsOverrides, FormatError> {
        if contents.trim().is_empty() {
            return Ok(SettingsOverrides::default());
        }

        let layer = match self {
            FileFormat::Yaml => {
                // A document holding only comments parses to null.
                let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
                if value.is_null() {
                    SettingsOverrides::default()
                } else {
                    serde_yaml::from_value(value)?
                }
            }
            FileFormat::Toml => toml::from_str(contents)?,
            FileFormat::Json => serde_json::from_str(contents)?,
        };

        Ok(layer)
    }

    fn render(self, settings: &Settings) -> Result<String, FormatError> {
        let text = match self {
            FileFormat::Yaml => serde_yaml::to_string(settings)?,
            FileFormat::Toml => toml::to_string_pretty(settings)?,
            FileFormat::Json => {
                let mut json = serde_json::to_string_pretty(settings)?;
                json.push('\n');
                json
            }
        };

        Ok(text)
    }
}

/// Resolve settings from defaults, an optional settings file and explicit
/// overrides, in that order of increasing precedence.
///
/// A settings file that is missing or cannot be read leaves the defaults in
/// place. A settings file that can be read but not parsed is an error.
pub fn resolve(file: Option<&Path>, overrides: &SettingsOverrides) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(path) = file {
        if let Some(layer) = read_layer(path)? {
            debug!(path = %path.display(), ?layer, "applying settings file");
            settings.apply(&layer);
        }
    }

    if !overrides.is_empty() {
        debug!(?overrides, "applying overrides");
        settings.apply(overrides);
    }

    Ok(settings)
}

fn read_layer(path: &Path) -> Result<Option<SettingsOverrides>, ConfigError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(None);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "settings file unreadable, using defaults");
            return Ok(None);
        }
    };

    let malformed = |source: FormatError| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let contents = String::from_utf8(bytes).map_err(|e| malformed(e.into()))?;
    let layer = FileFormat::from_path(path).parse(&contents).map_err(malformed)?;

    Ok(Some(layer))
}

/// Write `settings` to `path` in the format its extension names.
pub fn persist(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    let data = FileFormat::from_path(path)
        .render(settings)
        .map_err(ConfigError::Serialize)?;

    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn custom() -> Settings {
        Settings {
            site_title: "Field Notes".into(),
            content_dir: PathBuf::from("notes"),
            output_dir: PathBuf::from("public/site"),
            server_port: "4000".into(),
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = resolve(None, &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.site_title, "Default Site Title");
        assert_eq!(settings.content_dir, PathBuf::from("content"));
        assert_eq!(settings.output_dir, PathBuf::from("output"));
        assert_eq!(settings.server_port, "8080");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unreadable_file_falls_back_to_defaults() {
        // A directory exists but cannot be read as a file.
        let dir = tempdir().unwrap();

        let settings = resolve(Some(dir.path()), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_yaml_overlays_only_defined_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "siteTitle: My Notes\noutputDir: dist\ntheme: ignored\n").unwrap();

        let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.site_title, "My Notes");
        assert_eq!(settings.output_dir, PathBuf::from("dist"));
        assert_eq!(settings.content_dir, PathBuf::from("content"));
        assert_eq!(settings.server_port, "8080");
    }

    #[test]
    fn test_numeric_port_in_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "serverPort: 9000\n").unwrap();

        let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.server_port, "9000");
    }

    #[test]
    fn test_numeric_values_read_as_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "siteTitle: 1984\ncontentDir: 2024\noutputDir: 2025\n").unwrap();

        let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.site_title, "1984");
        assert_eq!(settings.content_dir, PathBuf::from("2024"));
        assert_eq!(settings.output_dir, PathBuf::from("2025"));
        assert_eq!(settings.server_port, "8080");
    }

    #[test]
    fn test_numeric_values_in_toml_and_json() {
        let dir = tempdir().unwrap();
        let toml_path = dir.path().join("pressmark.toml");
        std::fs::write(&toml_path, "siteTitle = 1984\nserverPort = 4000\n").unwrap();
        let json_path = dir.path().join("pressmark.json");
        std::fs::write(&json_path, r#"{"outputDir": 2024, "siteTitle": true}"#).unwrap();

        let settings = resolve(Some(&toml_path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.site_title, "1984");
        assert_eq!(settings.server_port, "4000");

        let settings = resolve(Some(&json_path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("2024"));
        assert_eq!(settings.site_title, "true");
    }

    #[test]
    fn test_comment_only_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "# nothing configured yet\n").unwrap();

        let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "siteTitle: [unclosed\n").unwrap();

        let err = resolve(Some(&path), &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.toml");
        std::fs::write(&path, "siteTitle = { nested = true }\n").unwrap();

        let err = resolve(Some(&path), &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        std::fs::write(&path, "siteTitle: From File\ncontentDir: posts\n").unwrap();

        let overrides = SettingsOverrides {
            site_title: Some("From Flag".into()),
            ..Default::default()
        };

        let settings = resolve(Some(&path), &overrides).unwrap();
        assert_eq!(settings.site_title, "From Flag");
        assert_eq!(settings.content_dir, PathBuf::from("posts"));
    }

    #[test]
    fn test_empty_values_do_not_clear_settings() {
        let overrides = SettingsOverrides {
            site_title: Some(String::new()),
            output_dir: Some(PathBuf::new()),
            ..Default::default()
        };

        let settings = resolve(None, &overrides).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_round_trip_in_every_format() {
        let dir = tempdir().unwrap();

        for name in ["site.yaml", "site.yml", "site.toml", "site.json", "site"] {
            let path = dir.path().join(name);
            persist(&custom(), &path).unwrap();

            let settings = resolve(Some(&path), &SettingsOverrides::default()).unwrap();
            assert_eq!(settings, custom(), "round trip through {name}");
        }
    }

    #[test]
    fn test_persist_writes_camel_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pressmark.yaml");
        persist(&Settings::default(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("siteTitle: Default Site Title"));
        assert!(written.contains("serverPort:"));
        assert!(written.contains("8080"));
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("pressmark.yaml");

        let err = persist(&Settings::default(), &path).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
    }
}
