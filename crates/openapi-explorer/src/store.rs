//! Document store.
//!
//! The source document is parsed once and then held immutably. Rewritten views are derived from
//! it on demand and cached per [`TransformContext`].

use crate::config::{ExplorerConfig, HashPolicy};
use crate::error::{ExplorerError, Result};
use crate::rewrite::{ReferenceTransformService, TransformContext};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Produces the parsed source document.
#[async_trait]
pub trait SpecSource: Send + Sync {
    /// Human-readable location, used in logs and errors.
    fn location(&self) -> &str;

    /// Read and parse the document.
    async fn parse(&self) -> Result<Value>;
}

/// Reads a JSON or YAML document from disk.
#[derive(Debug, Clone)]
pub struct FileSpecSource {
    path: String,
    spec_hash: Option<String>,
    hash_policy: HashPolicy,
    strict: bool,
}

impl FileSpecSource {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            spec_hash: None,
            hash_policy: HashPolicy::default(),
            strict: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self {
            path: config.spec.clone(),
            spec_hash: config.spec_hash.clone(),
            hash_policy: config.spec_hash_policy,
            strict: config.strict,
        }
    }

    #[must_use]
    pub fn with_hash(mut self, spec_hash: impl Into<String>, policy: HashPolicy) -> Self {
        self.spec_hash = Some(spec_hash.into());
        self.hash_policy = policy;
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn verify_hash(&self, content: &str) -> Result<()> {
        let Some(expected) = &self.spec_hash else {
            return Ok(());
        };
        let actual = format!("sha256:{}", hex::encode(Sha256::digest(content)));
        if actual == *expected {
            return Ok(());
        }
        match self.hash_policy {
            HashPolicy::Fail => Err(ExplorerError::SpecHashMismatch {
                expected: expected.clone(),
                actual,
            }),
            HashPolicy::Warn => {
                tracing::warn!(
                    location = %self.path,
                    expected = %expected,
                    actual = %actual,
                    "spec hash mismatch"
                );
                Ok(())
            }
            HashPolicy::Ignore => Ok(()),
        }
    }

    fn validate_structure(&self, value: &Value) -> Result<()> {
        if !is_openapi_v3(value) {
            return Ok(());
        }
        serde_json::from_value::<openapiv3::OpenAPI>(value.clone())
            .map(|_| ())
            .map_err(|e| {
                ExplorerError::DocumentLoad(format!(
                    "invalid OpenAPI document '{}': {e}",
                    self.path
                ))
            })
    }
}

#[async_trait]
impl SpecSource for FileSpecSource {
    fn location(&self) -> &str {
        &self.path
    }

    async fn parse(&self) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ExplorerError::SpecReadFile {
                path: self.path.clone(),
                source: e,
            }
        })?;
        tracing::info!(location = %self.path, bytes = content.len(), "loading OpenAPI spec");

        self.verify_hash(&content)?;

        // JSON is a valid subset of YAML, so serde_yaml alone is enough.
        let value: Value =
            serde_yaml::from_str(&content).map_err(|e| ExplorerError::SpecParse {
                location: self.path.clone(),
                source: e,
            })?;
        if !value.is_object() {
            return Err(ExplorerError::DocumentLoad(format!(
                "'{}' does not contain a document object",
                self.path
            )));
        }

        if self.strict {
            self.validate_structure(&value)?;
        }
        Ok(value)
    }
}

/// An already-parsed document.
#[derive(Debug, Clone)]
pub struct StaticSpecSource {
    location: String,
    document: Value,
}

impl StaticSpecSource {
    #[must_use]
    pub fn new(document: Value) -> Self {
        Self {
            location: "<memory>".to_string(),
            document,
        }
    }
}

#[async_trait]
impl SpecSource for StaticSpecSource {
    fn location(&self) -> &str {
        &self.location
    }

    async fn parse(&self) -> Result<Value> {
        Ok(self.document.clone())
    }
}

/// Owns the source document and its rewritten views.
pub struct DocumentStore {
    source: Arc<dyn SpecSource>,
    transforms: ReferenceTransformService,
    raw: OnceCell<Arc<Value>>,
    rewritten: RwLock<HashMap<TransformContext, Arc<Value>>>,
}

impl DocumentStore {
    #[must_use]
    pub fn new(source: Arc<dyn SpecSource>, transforms: ReferenceTransformService) -> Self {
        Self {
            source,
            transforms,
            raw: OnceCell::new(),
            rewritten: RwLock::new(HashMap::new()),
        }
    }

    /// Store over `source` with the default transformers registered.
    #[must_use]
    pub fn with_source(source: Arc<dyn SpecSource>) -> Self {
        Self::new(source, ReferenceTransformService::with_defaults())
    }

    #[must_use]
    pub fn location(&self) -> &str {
        self.source.location()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.raw.initialized()
    }

    /// Parse the source document. After the first success this returns the cached value.
    ///
    /// # Errors
    ///
    /// Returns the source's load error. A failed load is not cached.
    pub async fn load(&self) -> Result<Arc<Value>> {
        self.raw
            .get_or_try_init(|| async {
                let document = self.source.parse().await?;
                tracing::info!(location = %self.source.location(), "OpenAPI spec loaded");
                Ok::<_, ExplorerError>(Arc::new(document))
            })
            .await
            .map(Arc::clone)
    }

    /// The source document, loading it first if needed.
    ///
    /// # Errors
    ///
    /// See [`DocumentStore::load`].
    pub async fn get_raw(&self) -> Result<Arc<Value>> {
        self.load().await
    }

    /// The document with references rewritten for `context`.
    ///
    /// # Errors
    ///
    /// Returns a load error, or [`ExplorerError::NoTransformer`] for an unregistered format.
    pub async fn get_rewritten(&self, context: &TransformContext) -> Result<Arc<Value>> {
        // Fast path: cache hit.
        if let Some(doc) = self.rewritten.read().get(context).cloned() {
            return Ok(doc);
        }

        let raw = self.get_raw().await?;
        let rewritten = Arc::new(self.transforms.transform_document(&raw, context)?);
        tracing::debug!(
            format = %context.format,
            kind = ?context.resource_kind,
            "rewritten document cached"
        );

        let mut cache = self.rewritten.write();
        let entry = cache
            .entry(context.clone())
            .or_insert_with(|| Arc::clone(&rewritten));
        Ok(Arc::clone(entry))
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("location", &self.source.location())
            .field("loaded", &self.is_loaded())
            .field("transforms", &self.transforms)
            .finish_non_exhaustive()
    }
}

fn is_openapi_v3(document: &Value) -> bool {
    document
        .get("openapi")
        .and_then(Value::as_str)
        .is_some_and(|v| v.starts_with("3."))
}

/// Require an `OpenAPI` 3.x document.
///
/// # Errors
///
/// Returns [`ExplorerError::UnsupportedVersion`] unless `openapi` is a string starting with `3.`.
pub fn ensure_openapi_v3(document: &Value) -> Result<()> {
    if is_openapi_v3(document) {
        Ok(())
    } else {
        Err(ExplorerError::UnsupportedVersion)
    }
}
