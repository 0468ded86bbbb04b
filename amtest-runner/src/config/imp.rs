// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::junit::{JunitConfig, JunitImpl};
use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    reporter::StatusLevel,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use itertools::Itertools;
use serde::Deserialize;
use std::collections::BTreeSet;
use swrite::{SWrite, swrite};
use tracing::warn;

/// Trait for handling configuration warnings.
///
/// This trait allows for different warning handling strategies, such as logging warnings
/// (the default behavior) or collecting them for testing purposes.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        base_dir: &Utf8Path,
        unknown: &BTreeSet<String>,
    );
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        base_dir: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        let mut unknown_str = String::new();
        if let (1, Some(key)) = (unknown.len(), unknown.first()) {
            // Print this on the same line.
            swrite!(unknown_str, "key: {key}");
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                swrite!(unknown_str, "\n  - {ignored_key}");
            }
        }

        warn!(
            "in config file {}, ignoring unknown configuration {unknown_str}",
            config_file.strip_prefix(base_dir).unwrap_or(config_file),
        )
    }
}

/// Overall configuration for amtest.
///
/// This is the root data structure for amtest configuration. Settings are read from the default
/// configuration embedded in amtest, layered with an optional user config file.
#[derive(Clone, Debug)]
pub struct AmtestConfig {
    base_dir: Utf8PathBuf,
    status_level: StatusLevel,
    final_status_level: StatusLevel,
    junit: JunitImpl,
}

impl AmtestConfig {
    /// The default location of the config within the directory amtest is run from.
    pub const CONFIG_PATH: &'static str = ".config/amtest.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../../default-config.toml");

    /// Reads the amtest config from the given file, or if not specified from
    /// `.config/amtest.toml` under `base_dir`.
    ///
    /// An explicitly specified file must exist. The default location is optional.
    pub fn from_sources(
        base_dir: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(base_dir, config_file, &mut DefaultConfigWarnings)
    }

    /// Like [`Self::from_sources`], but reports warnings through `warnings`.
    pub fn from_sources_with_warnings(
        base_dir: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let base_dir = base_dir.into();

        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = base_dir.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let (config, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(&config_file, &base_dir, &unknown);
        }

        Ok(config.into_config(base_dir))
    }

    /// Returns the default amtest config.
    pub fn default_config(base_dir: impl Into<Utf8PathBuf>) -> Self {
        let config = Self::make_default_config()
            .build()
            .expect("default config is always valid");

        let mut unknown = BTreeSet::new();
        let deserialized: AmtestConfigDeserialize =
            serde_ignored::deserialize(config, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("default config is always valid");

        // Unknown keys in the embedded default config are a bug.
        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default config: {}",
                unknown.iter().join(", ")
            );
        }

        deserialized.into_config(base_dir.into())
    }

    /// Returns the directory relative paths in the config are resolved against.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Returns the configured status level.
    pub fn status_level(&self) -> StatusLevel {
        self.status_level
    }

    /// Returns the configured final status level.
    pub fn final_status_level(&self) -> StatusLevel {
        self.final_status_level
    }

    /// Returns the JUnit configuration, if a report path is configured.
    pub fn junit(&self) -> Option<JunitConfig<'_>> {
        JunitConfig::new(&self.base_dir, &self.junit, None)
    }

    /// Returns the JUnit configuration with the report path replaced by `path`.
    ///
    /// The other JUnit settings still come from the config.
    pub fn junit_with_path(&self, path: &Utf8Path) -> Option<JunitConfig<'_>> {
        JunitConfig::new(&self.base_dir, &self.junit, Some(path))
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(AmtestConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: AmtestConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // serde_path_to_error already reports the key, so drop it from the config error.
                let path = error.path().clone();
                let config_error = error.into_inner();
                let error = match config_error {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AmtestConfigDeserialize {
    status_level: StatusLevel,
    final_status_level: StatusLevel,
    junit: JunitImpl,
}

impl AmtestConfigDeserialize {
    fn into_config(self, base_dir: Utf8PathBuf) -> AmtestConfig {
        AmtestConfig {
            base_dir,
            status_level: self.status_level,
            final_status_level: self.final_status_level,
            junit: self.junit,
        }
    }
}
