//! Advertised resources and resource templates.

use unrelated_openapi_explorer::codec::TEXT_PLAIN;

/// One advertised resource or template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Fixed URI, or an RFC 6570 template for templates.
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
}

/// Fixed entry points.
#[must_use]
pub fn static_resources() -> Vec<ResourceEntry> {
    vec![
        ResourceEntry {
            uri: "openapi://endpoints/list",
            name: "endpoints-list",
            description: "List of all OpenAPI endpoints, one `METHODS /path` line per path",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://schemas/list",
            name: "schemas-list",
            description: "Names of all schemas under components/schemas",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://fields",
            name: "fields",
            description: "Top-level fields of the OpenAPI document",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://paths",
            name: "paths",
            description: "Paths and their operations",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://components",
            name: "components",
            description: "Component types defined in the document",
            mime_type: TEXT_PLAIN,
        },
    ]
}

/// Parameterized addresses. Detail templates use `detail_mime_type`.
#[must_use]
pub fn resource_templates(detail_mime_type: &'static str) -> Vec<ResourceEntry> {
    vec![
        ResourceEntry {
            uri: "openapi://{field}",
            name: "top-level-field",
            description: "One top-level field of the document",
            mime_type: detail_mime_type,
        },
        ResourceEntry {
            uri: "openapi://paths/{path}",
            name: "path-methods",
            description: "Methods available on a path (path without leading slash, URL-encoded)",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://paths/{path}/{method*}",
            name: "operation-detail",
            description: "Operation details for one or more comma-separated methods on a path",
            mime_type: detail_mime_type,
        },
        ResourceEntry {
            uri: "openapi://components/{type}",
            name: "component-type-list",
            description: "Names of the components of one type",
            mime_type: TEXT_PLAIN,
        },
        ResourceEntry {
            uri: "openapi://components/{type}/{name*}",
            name: "component-detail",
            description: "One or more comma-separated components of one type",
            mime_type: detail_mime_type,
        },
        ResourceEntry {
            uri: "openapi://schema/{name*}",
            name: "schema",
            description: "One or more comma-separated schemas, with references rewritten to schema addresses",
            mime_type: detail_mime_type,
        },
        ResourceEntry {
            uri: "openapi://endpoint/{method*}/{path*}",
            name: "endpoint",
            description: "Operation details for every method x path combination",
            mime_type: detail_mime_type,
        },
    ]
}
