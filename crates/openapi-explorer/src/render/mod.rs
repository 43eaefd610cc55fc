//! Renderable views over parts of the (rewritten) document.
//!
//! Each view borrows from the document, lives for one request, and produces an ordered list of
//! [`RenderResultItem`]s: plain-text list views for discovery, or raw detail values that the
//! output codec formats later.

pub mod components;
pub mod document;
pub mod path_item;

use crate::codec::OutputCodec;
use serde_json::Value;

pub use components::{ComponentType, RenderableComponentMap, RenderableComponents};
pub use document::RenderableDocument;
pub use path_item::{RenderablePathItem, STANDARD_METHODS};

/// Per-request rendering inputs.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub codec: &'a dyn OutputCodec,
    pub base_uri: &'a str,
}

/// One addressed result produced by a view.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResultItem {
    /// Address relative to the base URI.
    pub uri_suffix: String,
    /// Detail value, or the list text for list views. `None` for errors.
    pub data: Option<Value>,
    pub is_error: bool,
    pub error_text: Option<String>,
    /// Emit `data` as plain text instead of running it through the codec.
    pub render_as_list: bool,
}

impl RenderResultItem {
    #[must_use]
    pub fn detail(uri_suffix: impl Into<String>, data: Value) -> Self {
        Self {
            uri_suffix: uri_suffix.into(),
            data: Some(data),
            is_error: false,
            error_text: None,
            render_as_list: false,
        }
    }

    #[must_use]
    pub fn list(uri_suffix: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri_suffix: uri_suffix.into(),
            data: Some(Value::String(text.into())),
            is_error: false,
            error_text: None,
            render_as_list: true,
        }
    }

    #[must_use]
    pub fn error(uri_suffix: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            uri_suffix: uri_suffix.into(),
            data: None,
            is_error: true,
            error_text: Some(message.into()),
            render_as_list: true,
        }
    }
}

/// A view that can render itself as a listing or as detail.
pub trait Renderable {
    fn render_list(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem>;

    fn render_detail(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem>;
}

/// Standard navigation hint appended to list views.
#[must_use]
pub fn list_hint(ctx: &RenderContext<'_>, item_kind: &str, detail_pattern: &str) -> String {
    format!(
        "Hint: Use '{}{detail_pattern}' to view details for a specific {item_kind}.",
        ctx.base_uri
    )
}

/// `- name` bullet lines, one per entry, each terminated by a newline.
fn bullet_list<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names.into_iter().map(|n| format!("- {n}\n")).collect()
}
