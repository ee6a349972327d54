//! Shared configuration loader for the scrivpltr toolchain.
//!
//! `defaults/scrivpltr.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`ScrivpltrConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use scrivpltr_babel::Persistence;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/scrivpltr.default.toml");

/// Top-level configuration consumed by scrivpltr applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrivpltrConfig {
    pub mappings: MappingsConfig,
    pub convert: ConvertConfig,
    pub logging: LoggingConfig,
}

/// Where the mapping table lives and how a missing one is handled.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingsConfig {
    pub path: PathBuf,
    pub persist_defaults: bool,
}

impl MappingsConfig {
    pub fn persistence(&self) -> Persistence {
        if self.persist_defaults {
            Persistence::Write
        } else {
            Persistence::Skip
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub fail_on_omission: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "scrivpltr_babel=debug").
    pub level: String,
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

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ScrivpltrConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ScrivpltrConfig, ConfigError> {
    Loader::new().build()
}
