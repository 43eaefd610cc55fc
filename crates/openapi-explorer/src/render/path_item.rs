use super::{RenderContext, RenderResultItem, Renderable, list_hint};
use crate::address::encode_path;
use serde_json::{Map, Value};

/// HTTP methods treated as operations, in the order endpoint lines list them.
pub const STANDARD_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// One path's method → operation mapping.
pub struct RenderablePathItem<'a> {
    item: Option<&'a Map<String, Value>>,
    path: String,
    encoded_path: String,
}

impl<'a> RenderablePathItem<'a> {
    /// `path` is the normalized document path (leading `/`).
    #[must_use]
    pub fn new(item: Option<&'a Value>, path: &str) -> Self {
        Self {
            item: item.and_then(Value::as_object),
            path: path.to_string(),
            encoded_path: encode_path(path),
        }
    }

    fn uri_suffix(&self) -> String {
        format!("paths/{}", self.encoded_path)
    }

    /// Case-insensitive lookup of a standard-method operation.
    #[must_use]
    pub fn operation(&self, method: &str) -> Option<&'a Value> {
        let method = method.to_ascii_lowercase();
        if !STANDARD_METHODS.contains(&method.as_str()) {
            return None;
        }
        self.item?
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&method))
            .map(|(_, op)| op)
    }

    /// Standard methods present on this path, in [`STANDARD_METHODS`] order.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        STANDARD_METHODS
            .into_iter()
            .filter(|m| self.operation(m).is_some())
            .collect()
    }

    /// Detail items for `paths/{path}/{methods}`, one per requested method.
    #[must_use]
    pub fn render_operation_detail(
        &self,
        _ctx: &RenderContext<'_>,
        methods: &[String],
    ) -> Vec<RenderResultItem> {
        let base = self.uri_suffix();
        methods
            .iter()
            .map(|method| {
                let suffix = format!("{base}/{}", method.to_ascii_lowercase());
                match self.lookup(method) {
                    Ok(op) => RenderResultItem::detail(suffix, op.clone()),
                    Err(message) => RenderResultItem::error(suffix, message),
                }
            })
            .collect()
    }

    /// Detail items for `endpoint/{methods}/{path}`.
    ///
    /// The operation is returned with `method` (uppercased) and `path` prepended.
    #[must_use]
    pub fn render_endpoint_detail(
        &self,
        _ctx: &RenderContext<'_>,
        methods: &[String],
    ) -> Vec<RenderResultItem> {
        methods
            .iter()
            .map(|method| {
                let suffix = format!(
                    "endpoint/{}/{}",
                    method.to_ascii_lowercase(),
                    self.encoded_path
                );
                match self.lookup(method) {
                    Ok(op) => {
                        let mut data = Map::new();
                        data.insert(
                            "method".to_string(),
                            Value::String(method.to_ascii_uppercase()),
                        );
                        data.insert("path".to_string(), Value::String(self.path.clone()));
                        if let Value::Object(fields) = op {
                            data.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                        }
                        RenderResultItem::detail(suffix, Value::Object(data))
                    }
                    Err(message) => RenderResultItem::error(suffix, message),
                }
            })
            .collect()
    }

    fn lookup(&self, method: &str) -> Result<&'a Value, String> {
        if self.item.is_none() {
            return Err("Path item not found.".to_string());
        }
        self.operation(method).ok_or_else(|| {
            format!(
                "Method \"{}\" not found for path.",
                method.to_ascii_uppercase()
            )
        })
    }
}

impl Renderable for RenderablePathItem<'_> {
    fn render_list(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        let suffix = self.uri_suffix();
        if self.item.is_none() {
            return vec![RenderResultItem::error(suffix, "Path item not found.")];
        }

        let mut methods = self.methods();
        if methods.is_empty() {
            return vec![RenderResultItem::list(
                suffix,
                format!("No standard HTTP methods found for path: {}", self.path),
            )];
        }
        methods.sort_unstable();

        let lines: Vec<String> = methods
            .into_iter()
            .map(|m| {
                let upper = m.to_ascii_uppercase();
                match self.operation(m).and_then(operation_summary) {
                    Some(summary) => format!("{upper}: {summary}"),
                    None => upper,
                }
            })
            .collect();

        let hint = list_hint(ctx, "operation", &format!("{suffix}/{{method}}"));
        vec![RenderResultItem::list(
            suffix,
            format!("{hint}\n\n{}", lines.join("\n")),
        )]
    }

    fn render_detail(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        self.render_list(ctx)
    }
}

/// `summary`, falling back to `operationId`. Empty strings count as absent.
#[must_use]
pub fn operation_summary(operation: &Value) -> Option<&str> {
    ["summary", "operationId"]
        .into_iter()
        .filter_map(|key| operation.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// `GET POST /path` for a path with at least one standard method.
#[must_use]
pub fn endpoint_line(path: &str, item: &Value) -> Option<String> {
    let renderable = RenderablePathItem::new(Some(item), path);
    let methods = renderable.methods();
    if methods.is_empty() {
        return None;
    }
    let methods: Vec<String> = methods.iter().map(|m| m.to_ascii_uppercase()).collect();
    Some(format!("{} {path}", methods.join(" ")))
}
