//! Command-line interface.

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use unrelated_openapi_explorer::{ExplorerConfig, HashPolicy, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "unrelated-openapi-explorer-mcp")]
#[command(version)]
#[command(about = "Serve an OpenAPI document as navigable MCP resources")]
pub struct Cli {
    /// Path to the OpenAPI document (JSON or YAML)
    #[arg(value_name = "SPEC")]
    pub spec_arg: Option<String>,

    /// Path to the OpenAPI document (used when no positional SPEC is given)
    #[arg(long, env = "OPENAPI_EXPLORER_SPEC")]
    pub spec: Option<String>,

    /// Config file (YAML or JSON). Command-line values take precedence.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Format for detail payloads: json or yaml
    #[arg(long, env = "OPENAPI_EXPLORER_OUTPUT_FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Validate the document structure at startup (OpenAPI 3.x only)
    #[arg(long)]
    pub strict: bool,

    /// Expected document hash (`sha256:<hex>`)
    #[arg(long)]
    pub spec_hash: Option<String>,

    /// What to do on a hash mismatch: warn, fail, or ignore
    #[arg(long)]
    pub spec_hash_policy: Option<HashPolicy>,

    /// Transport to serve on
    #[arg(long, value_enum, default_value = "stdio")]
    pub transport: Transport,

    /// Bind address for the HTTP transport
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Log level (overridden by `RUST_LOG`)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Merge the optional config file with command-line values and validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the merged config is invalid.
    pub fn to_config(&self) -> anyhow::Result<ExplorerConfig> {
        let mut config = match &self.config {
            Some(path) => ExplorerConfig::from_file(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => ExplorerConfig::new(""),
        };

        if let Some(spec) = self.spec_arg.as_ref().or(self.spec.as_ref()) {
            config.spec.clone_from(spec);
        }
        if let Some(format) = self.output_format {
            config.output_format = format;
        }
        if self.strict {
            config.strict = true;
        }
        if let Some(hash) = &self.spec_hash {
            config.spec_hash = Some(hash.clone());
        }
        if let Some(policy) = self.spec_hash_policy {
            config.spec_hash_policy = policy;
        }

        config.validate()?;
        Ok(config)
    }
}
