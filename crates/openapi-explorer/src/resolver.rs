//! Address resolution.
//!
//! [`Explorer`] is the request entry point: it parses an address, loads the rewritten document,
//! dispatches to the matching view and formats the results. Per-item failures are data; anything
//! that fails the request as a whole becomes a single error item addressed at the request URI.

use crate::address::{BASE_URI, ResourceAddress};
use crate::codec::{FormattedResultItem, OutputCodec, create_codec, format_results};
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::render::{
    ComponentType, RenderContext, RenderResultItem, Renderable, RenderableComponentMap,
    RenderableComponents, RenderableDocument, RenderablePathItem, document::endpoint_index_lines,
};
use crate::rewrite::{ResourceKind, TransformContext};
use crate::store::{DocumentStore, FileSpecSource, ensure_openapi_v3};
use serde_json::Value;
use std::sync::Arc;

/// Serves addresses against one document.
#[derive(Clone)]
pub struct Explorer {
    store: Arc<DocumentStore>,
    codec: Arc<dyn OutputCodec>,
}

impl Explorer {
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, codec: Arc<dyn OutputCodec>) -> Self {
        Self { store, codec }
    }

    /// Explorer over the file named in `config`. Nothing is read until [`Explorer::load`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let source = Arc::new(FileSpecSource::from_config(config));
        Ok(Self::new(
            Arc::new(DocumentStore::with_source(source)),
            create_codec(config.output_format),
        ))
    }

    #[must_use]
    pub fn codec(&self) -> &dyn OutputCodec {
        self.codec.as_ref()
    }

    /// Load the document eagerly so startup fails fast.
    ///
    /// # Errors
    ///
    /// Returns the document load error.
    pub async fn load(&self) -> Result<()> {
        self.store.load().await.map(|_| ())
    }

    #[must_use]
    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            codec: self.codec.as_ref(),
            base_uri: BASE_URI,
        }
    }

    /// Resolve `uri` into formatted content items. Never fails: request-level errors are
    /// returned as one error item addressed at `uri`.
    pub async fn read(&self, uri: &str) -> Vec<FormattedResultItem> {
        let ctx = self.render_context();
        match self.resolve_uri(uri).await {
            Ok(items) => format_results(&ctx, items),
            Err(e) => {
                tracing::warn!(uri = %uri, error = %e, "resource request failed");
                vec![FormattedResultItem::error(uri, e.to_string())]
            }
        }
    }

    async fn resolve_uri(&self, uri: &str) -> Result<Vec<RenderResultItem>> {
        let address = ResourceAddress::parse(uri)?;
        self.resolve(&address).await
    }

    /// Render one parsed address.
    ///
    /// # Errors
    ///
    /// Returns load and version errors. Per-item lookups never fail here.
    pub async fn resolve(&self, address: &ResourceAddress) -> Result<Vec<RenderResultItem>> {
        let kind = match address {
            ResourceAddress::Endpoints { .. } | ResourceAddress::EndpointList => {
                ResourceKind::Endpoint
            }
            _ => ResourceKind::Schema,
        };
        let doc = self
            .store
            .get_rewritten(&TransformContext::openapi(kind))
            .await?;
        ensure_openapi_v3(&doc)?;

        let ctx = self.render_context();
        Ok(dispatch(&ctx, &doc, address))
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("store", &self.store)
            .field("media_type", &self.codec.media_type())
            .finish()
    }
}

fn dispatch(
    ctx: &RenderContext<'_>,
    doc: &Value,
    address: &ResourceAddress,
) -> Vec<RenderResultItem> {
    let document = RenderableDocument::new(doc);
    let components = RenderableComponents::new(document.components_object());
    let path_item = |path: &str| RenderablePathItem::new(document.path_item(path), path);
    let component_map =
        |t: ComponentType| RenderableComponentMap::new(components.component_map(t), t);

    match address {
        ResourceAddress::Fields => document.render_list(ctx),
        ResourceAddress::Field(field) => document.render_top_level_field_detail(ctx, field),
        ResourceAddress::PathItem { path } => path_item(path).render_list(ctx),
        ResourceAddress::Operations { path, methods } => {
            path_item(path).render_operation_detail(ctx, methods.as_slice())
        }
        ResourceAddress::ComponentMap(t) => component_map(*t).render_list(ctx),
        ResourceAddress::Components {
            component_type,
            names,
        } => component_map(*component_type).render_component_detail(ctx, names.as_slice()),
        ResourceAddress::Schemas(names) => {
            component_map(ComponentType::Schemas).render_schema_detail(ctx, names.as_slice())
        }
        // Path-major, method-minor.
        ResourceAddress::Endpoints { methods, paths } => paths
            .iter()
            .flat_map(|path| path_item(path).render_endpoint_detail(ctx, methods.as_slice()))
            .collect(),
        ResourceAddress::EndpointList => vec![RenderResultItem::list(
            "endpoints/list",
            endpoint_index_lines(doc).join("\n"),
        )],
        ResourceAddress::SchemaList => vec![RenderResultItem::list(
            "schemas/list",
            component_map(ComponentType::Schemas).names().join("\n"),
        )],
    }
}
