//! `$ref` rewriting.
//!
//! Internal cross-references (`#/components/schemas/Pet`) are meaningless to a client that only
//! sees individual resources, so before anything is rendered they are rewritten into resource
//! addresses (`openapi://schema/Pet`) the client can read directly.
//!
//! The rewrite is total (every value shape has a rule) and idempotent: rewritten addresses no
//! longer start with `#/`, so a second pass leaves them alone.

use crate::address::{BASE_URI, encode_segment};
use crate::error::{ExplorerError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const REF_KEY: &str = "$ref";
const SCHEMA_POINTER_PREFIX: &str = "#/components/schemas/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Endpoint,
    Schema,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    OpenApi,
    AsyncApi,
    GraphQl,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::OpenApi => f.write_str("openapi"),
            DocumentFormat::AsyncApi => f.write_str("asyncapi"),
            DocumentFormat::GraphQl => f.write_str("graphql"),
        }
    }
}

/// Passed through a rewrite so format-specific transformers can decide what to do.
///
/// Only `format` selects behavior today; the other fields are carried for transformers that
/// need to know which resource is being served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransformContext {
    pub resource_kind: ResourceKind,
    pub format: DocumentFormat,
    pub path: Option<String>,
    pub method: Option<String>,
}

impl TransformContext {
    #[must_use]
    pub fn openapi(resource_kind: ResourceKind) -> Self {
        Self {
            resource_kind,
            format: DocumentFormat::OpenApi,
            path: None,
            method: None,
        }
    }
}

/// Borrowed view of one value, classified for the rewrite.
#[derive(Debug)]
enum Node<'a> {
    Scalar(&'a Value),
    List(&'a [Value]),
    Map(&'a Map<String, Value>),
    Reference(&'a str),
}

impl<'a> Node<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => Node::List(items),
            Value::Object(map) => match map.get(REF_KEY) {
                Some(Value::String(pointer)) => Node::Reference(pointer),
                _ => Node::Map(map),
            },
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                Node::Scalar(value)
            }
        }
    }
}

/// A format-specific reference rewriter.
pub trait ReferenceTransform: Send + Sync {
    /// Produce a rewritten copy of `document`. The input is never modified.
    fn transform_refs(&self, document: &Value, context: &TransformContext) -> Value;
}

/// Rewrites `OpenAPI` schema references into `schema/<name>` addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApiTransformer;

impl OpenApiTransformer {
    fn transform_node(&self, value: &Value, context: &TransformContext) -> Value {
        match Node::classify(value) {
            Node::Scalar(v) => v.clone(),
            Node::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.transform_node(item, context))
                    .collect(),
            ),
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.transform_node(v, context)))
                    .collect(),
            ),
            // Sibling keys of a reference node are dropped.
            Node::Reference(pointer) => {
                let mut out = Map::new();
                out.insert(
                    REF_KEY.to_string(),
                    Value::String(rewrite_pointer(pointer)),
                );
                Value::Object(out)
            }
        }
    }
}

impl ReferenceTransform for OpenApiTransformer {
    fn transform_refs(&self, document: &Value, context: &TransformContext) -> Value {
        self.transform_node(document, context)
    }
}

/// Map one `$ref` pointer to its served form.
///
/// External references and internal pointers other than `#/components/schemas/<name>` are
/// returned unchanged.
#[must_use]
pub fn rewrite_pointer(pointer: &str) -> String {
    if !pointer.starts_with("#/") {
        return pointer.to_string();
    }

    match pointer.strip_prefix(SCHEMA_POINTER_PREFIX) {
        Some(name) if !name.is_empty() && !name.contains('/') => {
            let name = unescape_pointer_token(name);
            format!("{BASE_URI}schema/{}", encode_segment(&name))
        }
        _ => pointer.to_string(),
    }
}

/// RFC 6901 token unescaping (`~1` is `/`, `~0` is `~`).
fn unescape_pointer_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Registry of reference transformers keyed by document format.
#[derive(Clone, Default)]
pub struct ReferenceTransformService {
    transformers: HashMap<DocumentFormat, Arc<dyn ReferenceTransform>>,
}

impl ReferenceTransformService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with the `OpenAPI` transformer registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut service = Self::new();
        service.register(DocumentFormat::OpenApi, Arc::new(OpenApiTransformer));
        service
    }

    pub fn register(&mut self, format: DocumentFormat, transformer: Arc<dyn ReferenceTransform>) {
        self.transformers.insert(format, transformer);
    }

    /// Rewrite `document` with the transformer registered for `context.format`.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::NoTransformer`] if no transformer is registered for the format.
    pub fn transform_document(&self, document: &Value, context: &TransformContext) -> Result<Value> {
        let transformer = self
            .transformers
            .get(&context.format)
            .ok_or(ExplorerError::NoTransformer(context.format))?;
        Ok(transformer.transform_refs(document, context))
    }
}

impl fmt::Debug for ReferenceTransformService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<String> = self.transformers.keys().map(ToString::to_string).collect();
        formats.sort();
        f.debug_struct("ReferenceTransformService")
            .field("formats", &formats)
            .finish()
    }
}
