//! MCP resource server.
//!
//! Every `resources/read` is answered by [`Explorer::read`]; this module only maps its output
//! onto rmcp's wire types. Wire types are built from their JSON form so that optional fields
//! added by newer protocol revisions keep their defaults.

use crate::catalog::{self, ResourceEntry};
use rmcp::ErrorData as McpError;
use rmcp::model::{
    Implementation, ListResourceTemplatesResult, ListResourcesResult, PaginatedRequestParam,
    ReadResourceRequestParam, ReadResourceResult, Resource, ResourceTemplate, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use unrelated_openapi_explorer::{Explorer, FormattedResultItem};

const INSTRUCTIONS: &str = "Browse the loaded OpenAPI document through openapi:// resources. \
Start with openapi://endpoints/list or openapi://schemas/list, then read \
openapi://endpoint/{method}/{path} or openapi://schema/{name}. \
Comma-separated values request several items at once.";

#[derive(Clone)]
pub struct ExplorerServer {
    explorer: Explorer,
}

impl ExplorerServer {
    #[must_use]
    pub fn new(explorer: Explorer) -> Self {
        Self { explorer }
    }

    /// Resolve one address into a `resources/read` result.
    ///
    /// # Errors
    ///
    /// Returns an internal error only if the result cannot be encoded.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let items = self.explorer.read(uri).await;
        for item in items.iter().filter(|i| i.is_error) {
            tracing::debug!(request = %uri, uri = %item.uri, text = %item.text, "error item");
        }
        from_json(read_result_json(&items))
    }

    /// Fixed resources.
    ///
    /// # Errors
    ///
    /// Returns an internal error if an entry cannot be encoded.
    pub fn resources(&self) -> Result<Vec<Resource>, McpError> {
        catalog::static_resources()
            .iter()
            .map(|e| from_json(resource_json(e)))
            .collect()
    }

    /// Templates, with detail media types following the configured codec.
    ///
    /// # Errors
    ///
    /// Returns an internal error if an entry cannot be encoded.
    pub fn resource_templates(&self) -> Result<Vec<ResourceTemplate>, McpError> {
        catalog::resource_templates(self.explorer.codec().media_type())
            .iter()
            .map(|e| from_json(template_json(e)))
            .collect()
    }
}

fn resource_json(entry: &ResourceEntry) -> Value {
    json!({
        "uri": entry.uri,
        "name": entry.name,
        "description": entry.description,
        "mimeType": entry.mime_type,
    })
}

fn template_json(entry: &ResourceEntry) -> Value {
    json!({
        "uriTemplate": entry.uri,
        "name": entry.name,
        "description": entry.description,
        "mimeType": entry.mime_type,
    })
}

/// `isError` has no place on text resource contents; error items are plain text.
fn read_result_json(items: &[FormattedResultItem]) -> Value {
    let contents: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "uri": item.uri,
                "mimeType": item.mime_type,
                "text": item.text,
            })
        })
        .collect();
    json!({ "contents": contents })
}

fn from_json<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[allow(deprecated)]
impl ServerHandler for ExplorerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_resources().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.resources()?,
            ..Default::default()
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult {
            resource_templates: self.resource_templates()?,
            ..Default::default()
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri).await
    }
}
