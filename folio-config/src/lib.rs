//! Shared configuration loader for the folio tools.
//!
//! `defaults/folio.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`FolioConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use folio::ParseOptions;
use serde::Deserialize;
use std::path::Path;
use url::Url;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/folio.default.toml");

/// Top-level configuration consumed by folio applications.
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    pub parsing: ParsingConfig,
    pub logging: LoggingConfig,
    pub convert: ConvertConfig,
}

/// Knobs for reading blocks back from editable HTML.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    /// Empty means "no base url".
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub from: String,
    pub to: String,
    pub pretty_json: bool,
}

impl FolioConfig {
    /// Html parser options described by the `[parsing]` section.
    pub fn parse_options(&self) -> Result<ParseOptions, url::ParseError> {
        let base_url = self.parsing.base_url.trim();
        if base_url.is_empty() {
            return Ok(ParseOptions::default());
        }
        Ok(ParseOptions::with_base_url(Url::parse(base_url)?))
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FolioConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FolioConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.parsing.base_url, "");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.convert.from, "wire");
        assert_eq!(config.convert.to, "html");
        assert!(!config.convert.pretty_json);
        assert_eq!(config.parse_options().unwrap(), ParseOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.to", "text")
            .expect("override to apply")
            .set_override("convert.pretty_json", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.to, "text");
        assert!(config.convert.pretty_json);
    }

    #[test]
    fn base_url_becomes_parse_option() {
        let config = Loader::new()
            .set_override("parsing.base_url", "https://folio.example/projects/3/")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = config.parse_options().expect("valid url");
        assert_eq!(options.resolve_href("s/1"), "https://folio.example/projects/3/s/1");
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        let config = Loader::new()
            .set_override("parsing.base_url", "not a url")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.parse_options().is_err());
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[logging]\nlevel = \"debug\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.convert.from, "wire");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/folio.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(Loader::new()
            .with_file("/nonexistent/folio.toml")
            .build()
            .is_err());
    }
}
