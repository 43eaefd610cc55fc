//! Output codecs and final formatting of render results.

use crate::config::OutputFormat;
use crate::error::{ExplorerError, Result};
use crate::render::{RenderContext, RenderResultItem};
use serde_json::Value;
use std::sync::Arc;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_YAML: &str = "text/yaml";
pub const TEXT_PLAIN: &str = "text/plain";

/// Serializes detail values for the client.
pub trait OutputCodec: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExplorerError::RenderFormat`] if the value cannot be serialized.
    fn format(&self, value: &Value) -> Result<String>;

    fn media_type(&self) -> &'static str;
}

/// Pretty-printed JSON, two-space indent.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl OutputCodec for JsonCodec {
    fn format(&self, value: &Value) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| ExplorerError::RenderFormat(e.to_string()))
    }

    fn media_type(&self) -> &'static str {
        APPLICATION_JSON
    }
}

/// Block-style YAML, always newline-terminated.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl OutputCodec for YamlCodec {
    fn format(&self, value: &Value) -> Result<String> {
        let mut text =
            serde_yaml::to_string(value).map_err(|e| ExplorerError::RenderFormat(e.to_string()))?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    fn media_type(&self) -> &'static str {
        TEXT_YAML
    }
}

#[must_use]
pub fn create_codec(format: OutputFormat) -> Arc<dyn OutputCodec> {
    match format {
        OutputFormat::Json => Arc::new(JsonCodec),
        OutputFormat::Yaml => Arc::new(YamlCodec),
    }
}

/// One response content item, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedResultItem {
    pub uri: String,
    pub mime_type: &'static str,
    pub text: String,
    pub is_error: bool,
}

impl FormattedResultItem {
    /// Plain-text error for a request that failed as a whole.
    #[must_use]
    pub fn error(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: TEXT_PLAIN,
            text: message.into(),
            is_error: true,
        }
    }
}

/// Turn render results into content items, preserving order.
///
/// Errors and list views become plain text. Detail values go through the codec; a codec
/// failure turns that one item into an error.
#[must_use]
pub fn format_results(
    ctx: &RenderContext<'_>,
    items: Vec<RenderResultItem>,
) -> Vec<FormattedResultItem> {
    items
        .into_iter()
        .map(|item| format_item(ctx, item))
        .collect()
}

fn format_item(ctx: &RenderContext<'_>, item: RenderResultItem) -> FormattedResultItem {
    let uri = format!("{}{}", ctx.base_uri, item.uri_suffix);

    if item.is_error {
        let text = item
            .error_text
            .unwrap_or_else(|| "An unknown error occurred.".to_string());
        return FormattedResultItem::error(uri, text);
    }

    if item.render_as_list {
        let text = match item.data {
            Some(Value::String(text)) => text,
            _ => "Invalid list data".to_string(),
        };
        return FormattedResultItem {
            uri,
            mime_type: TEXT_PLAIN,
            text,
            is_error: false,
        };
    }

    let data = item.data.unwrap_or(Value::Null);
    match ctx.codec.format(&data) {
        Ok(text) => FormattedResultItem {
            uri,
            mime_type: ctx.codec.media_type(),
            text,
            is_error: false,
        },
        Err(e) => {
            tracing::warn!(uri = %uri, error = %e, "failed to format resource content");
            let message = format!("Error formatting data for {uri}: {e}");
            FormattedResultItem::error(uri, message)
        }
    }
}
