use crate::error::{ExplorerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Usage line shown when no spec location was given.
pub const SPEC_REQUIRED_MESSAGE: &str =
    "OpenAPI spec path is required. Usage: unrelated-openapi-explorer-mcp <path-to-spec>";

/// Configuration for one explorer instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerConfig {
    /// `OpenAPI` spec location (file path).
    #[serde(default)]
    pub spec: String,

    /// Codec used for detail payloads. Fixed for the whole process.
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Optional spec hash (`sha256:<hex>`) checked against the raw file bytes.
    #[serde(default)]
    pub spec_hash: Option<String>,

    /// Hash policy: warn, fail, or ignore.
    #[serde(default)]
    pub spec_hash_policy: HashPolicy,

    /// Structurally validate v3 documents at load time.
    #[serde(default)]
    pub strict: bool,
}

impl ExplorerConfig {
    #[must_use]
    pub fn new(spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            output_format: OutputFormat::default(),
            spec_hash: None,
            spec_hash_policy: HashPolicy::default(),
            strict: false,
        }
    }

    /// Load a config file (YAML or JSON).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExplorerError::Config(format!("failed to read config {}: {e}", path.display()))
        })?;
        // JSON is a valid subset of YAML.
        serde_yaml::from_str(&content).map_err(|e| {
            ExplorerError::Config(format!("failed to parse config {}: {e}", path.display()))
        })
    }

    /// Check the config is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if no spec location is set or the spec hash is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.spec.trim().is_empty() {
            return Err(ExplorerError::Config(SPEC_REQUIRED_MESSAGE.to_string()));
        }
        if let Some(hash) = &self.spec_hash
            && !hash.starts_with("sha256:")
        {
            return Err(ExplorerError::Config(format!(
                "Invalid spec hash '{hash}': expected 'sha256:<hex>'"
            )));
        }
        Ok(())
    }
}

/// Output codec selection.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(ExplorerError::Config(format!(
                "Invalid output format: {other}. Expected \"json\" or \"yaml\"."
            ))),
        }
    }
}

/// Hash verification policy.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashPolicy {
    /// Log warning if hash doesn't match.
    #[default]
    Warn,
    /// Fail loading if hash doesn't match.
    Fail,
    /// Ignore hash verification.
    Ignore,
}

impl FromStr for HashPolicy {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn" => Ok(HashPolicy::Warn),
            "fail" => Ok(HashPolicy::Fail),
            "ignore" => Ok(HashPolicy::Ignore),
            other => Err(ExplorerError::Config(format!(
                "Invalid spec hash policy: {other}. Expected \"warn\", \"fail\" or \"ignore\"."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_when_only_spec_is_set() {
        let cfg: ExplorerConfig = serde_yaml::from_str("spec: ./api.yaml").unwrap();
        assert_eq!(cfg.spec, "./api.yaml");
        assert_eq!(cfg.output_format, OutputFormat::Json);
        assert_eq!(cfg.spec_hash_policy, HashPolicy::Warn);
        assert!(!cfg.strict);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_spec_is_rejected_with_usage() {
        let err = ExplorerConfig::new("").validate().unwrap_err();
        assert!(err.to_string().contains(SPEC_REQUIRED_MESSAGE));
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let mut cfg = ExplorerConfig::new("spec.json");
        cfg.spec_hash = Some("md5:abc".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!(" json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("Invalid output format: xml"));
    }

    #[test]
    fn reads_camel_case_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("explorer.yaml");
        fs::write(
            &path,
            "spec: api.json\noutputFormat: yaml\nspecHashPolicy: fail\nstrict: true\n",
        )
        .unwrap();

        let cfg = ExplorerConfig::from_file(&path).unwrap();
        assert_eq!(cfg.output_format, OutputFormat::Yaml);
        assert_eq!(cfg.spec_hash_policy, HashPolicy::Fail);
        assert!(cfg.strict);
    }

    #[test]
    fn missing_config_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let err = ExplorerConfig::from_file(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ExplorerError::Config(_)));
    }
}
