//! Configuration file support for bomtrace.
//!
//! Provides YAML-based configuration through `bomtrace.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use bomtrace::application::dto::OutputFormat;
use bomtrace::cataloging::policies::OwnershipTiePolicy;
use bomtrace::shared::error::CatalogError;
use bomtrace::shared::Result;

pub const CONFIG_FILENAME: &str = "bomtrace.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub catalogers: Option<Vec<String>>,
    pub parallelism: Option<usize>,
    pub output: Option<String>,
    pub ownership_ties: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Parsed `output`, already checked by validation.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_deref().and_then(|s| s.parse().ok())
    }

    /// Parsed `ownership_ties`, already checked by validation.
    pub fn ownership_tie_policy(&self) -> Option<OwnershipTiePolicy> {
        self.ownership_ties.as_deref().and_then(OwnershipTiePolicy::parse)
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);
    tracing::debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn invalid(field: &str, reason: impl Into<String>) -> anyhow::Error {
    CatalogError::Config {
        field: field.to_string(),
        reason: reason.into(),
    }
    .into()
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.parallelism == Some(0) {
        return Err(invalid("parallelism", "must be at least 1"));
    }

    if let Some(output) = &config.output {
        output
            .parse::<OutputFormat>()
            .map_err(|e| invalid("output", e))?;
    }

    if let Some(policy) = &config.ownership_ties {
        if OwnershipTiePolicy::parse(policy).is_none() {
            return Err(invalid(
                "ownership_ties",
                format!("'{}' is not one of: surface-all, skip", policy),
            ));
        }
    }

    if let Some(catalogers) = &config.catalogers {
        if let Some(i) = catalogers.iter().position(|c| c.trim().is_empty()) {
            return Err(invalid(
                &format!("catalogers[{}]", i),
                "must not be empty",
            ));
        }
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        tracing::warn!(field = %key, "unknown config field will be ignored");
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
