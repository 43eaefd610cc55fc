use super::components::RenderableComponents;
use super::path_item::endpoint_line;
use super::{RenderContext, RenderResultItem, Renderable, bullet_list, list_hint};
use serde_json::{Map, Value};

/// The whole document, seen through its top-level fields.
pub struct RenderableDocument<'a> {
    doc: &'a Value,
}

impl<'a> RenderableDocument<'a> {
    #[must_use]
    pub fn new(doc: &'a Value) -> Self {
        Self { doc }
    }

    fn fields(&self) -> Option<&'a Map<String, Value>> {
        self.doc.as_object()
    }

    /// `paths`, if present.
    #[must_use]
    pub fn paths_object(&self) -> Option<&'a Value> {
        self.fields()?.get("paths")
    }

    /// `components`, if present.
    #[must_use]
    pub fn components_object(&self) -> Option<&'a Value> {
        self.fields()?.get("components")
    }

    /// Path item for a normalized path, if present.
    #[must_use]
    pub fn path_item(&self, path: &str) -> Option<&'a Value> {
        self.paths_object()?.get(path)
    }

    /// Detail for one top-level field.
    ///
    /// `paths` and `components` are rendered as navigable listings instead of raw objects.
    #[must_use]
    pub fn render_top_level_field_detail(
        &self,
        ctx: &RenderContext<'_>,
        field: &str,
    ) -> Vec<RenderResultItem> {
        let Some(value) = self.fields().and_then(|f| f.get(field)) else {
            return vec![RenderResultItem::error(
                field,
                format!("Field \"{field}\" not found in the OpenAPI document."),
            )];
        };

        match field {
            "paths" => vec![render_paths_listing(ctx, value)],
            "components" => RenderableComponents::new(Some(value)).render_list(ctx),
            _ => vec![RenderResultItem::detail(field, value.clone())],
        }
    }
}

impl Renderable for RenderableDocument<'_> {
    fn render_list(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        let Some(fields) = self.fields().filter(|f| !f.is_empty()) else {
            return vec![RenderResultItem::error(
                "fields",
                "Error: Document object is empty or not an object.",
            )];
        };

        let mut names: Vec<&String> = fields.keys().collect();
        names.sort();
        let text = format!(
            "Available top-level fields:\n\n{}\n{}",
            bullet_list(names),
            list_hint(ctx, "field", "{field}")
        );
        vec![RenderResultItem::list("fields", text)]
    }

    fn render_detail(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        self.render_list(ctx)
    }
}

/// One `GET POST /path` line per path that has standard methods, sorted.
#[must_use]
pub fn endpoint_index_lines(doc: &Value) -> Vec<String> {
    doc.get("paths").map(paths_index_lines).unwrap_or_default()
}

fn paths_index_lines(paths: &Value) -> Vec<String> {
    let Some(paths) = paths.as_object() else {
        return Vec::new();
    };
    let mut lines: Vec<String> = paths
        .iter()
        .filter_map(|(path, item)| endpoint_line(path, item))
        .collect();
    lines.sort();
    lines
}

fn render_paths_listing(ctx: &RenderContext<'_>, paths: &Value) -> RenderResultItem {
    let lines = paths_index_lines(paths);
    if lines.is_empty() {
        return RenderResultItem::list("paths", "No paths found in the OpenAPI document.");
    }

    let header = [
        list_hint(ctx, "path", "paths/{encoded_path}"),
        list_hint(ctx, "operation", "paths/{encoded_path}/{method}"),
    ]
    .join("\n");
    RenderResultItem::list("paths", format!("{header}\n\n{}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::ctx;
    use serde_json::json;

    fn sample_doc() -> Value {
        json!({
            "openapi": "3.0.0",
            "info": { "title": "Test API", "version": "1.0.0" },
            "paths": {
                "/users": { "get": { "summary": "List users" }, "post": {} },
                "/health": { "get": {} },
                "/meta": { "parameters": [] }
            },
            "components": { "schemas": { "User": { "type": "object" } } }
        })
    }

    #[test]
    fn lists_top_level_fields_sorted() {
        let doc = sample_doc();
        let result = RenderableDocument::new(&doc).render_list(&ctx());
        assert_eq!(
            result,
            vec![RenderResultItem::list(
                "fields",
                "Available top-level fields:\n\n\
                 - components\n- info\n- openapi\n- paths\n\n\
                 Hint: Use 'openapi://{field}' to view details for a specific field."
            )]
        );
    }

    #[test]
    fn detail_of_document_is_its_field_list() {
        let doc = sample_doc();
        let renderable = RenderableDocument::new(&doc);
        assert_eq!(renderable.render_detail(&ctx()), renderable.render_list(&ctx()));
    }

    #[test]
    fn empty_document_is_an_error() {
        let doc = json!({});
        let result = RenderableDocument::new(&doc).render_list(&ctx());
        assert!(result[0].is_error);
        assert_eq!(result[0].uri_suffix, "fields");
    }

    #[test]
    fn field_detail_returns_raw_value() {
        let doc = sample_doc();
        let result = RenderableDocument::new(&doc).render_top_level_field_detail(&ctx(), "info");
        assert_eq!(
            result,
            vec![RenderResultItem::detail(
                "info",
                json!({ "title": "Test API", "version": "1.0.0" })
            )]
        );
    }

    #[test]
    fn missing_field_is_an_error() {
        let doc = sample_doc();
        let result =
            RenderableDocument::new(&doc).render_top_level_field_detail(&ctx(), "webhooks");
        assert_eq!(
            result,
            vec![RenderResultItem::error(
                "webhooks",
                "Field \"webhooks\" not found in the OpenAPI document."
            )]
        );
    }

    #[test]
    fn paths_field_is_a_navigable_listing() {
        let doc = sample_doc();
        let result = RenderableDocument::new(&doc).render_top_level_field_detail(&ctx(), "paths");
        assert_eq!(
            result,
            vec![RenderResultItem::list(
                "paths",
                "Hint: Use 'openapi://paths/{encoded_path}' to view details for a specific path.\n\
                 Hint: Use 'openapi://paths/{encoded_path}/{method}' to view details for a specific operation.\n\n\
                 GET /health\nGET POST /users"
            )]
        );
    }

    #[test]
    fn components_field_is_the_component_type_index() {
        let doc = sample_doc();
        let result =
            RenderableDocument::new(&doc).render_top_level_field_detail(&ctx(), "components");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].uri_suffix, "components");
        assert!(result[0].render_as_list);
        let Some(Value::String(text)) = &result[0].data else {
            panic!("expected list text");
        };
        assert!(text.starts_with("Available Component Types:\n\n- schemas\n"));
    }

    #[test]
    fn paths_without_operations_is_informational() {
        let doc = json!({ "paths": {} });
        let result = RenderableDocument::new(&doc).render_top_level_field_detail(&ctx(), "paths");
        assert_eq!(
            result,
            vec![RenderResultItem::list(
                "paths",
                "No paths found in the OpenAPI document."
            )]
        );
    }

    #[test]
    fn endpoint_index_skips_paths_without_methods() {
        assert_eq!(
            endpoint_index_lines(&sample_doc()),
            ["GET /health", "GET POST /users"]
        );
        assert!(endpoint_index_lines(&json!({ "info": {} })).is_empty());
    }
}
