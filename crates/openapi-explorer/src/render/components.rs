use super::{RenderContext, RenderResultItem, Renderable, bullet_list, list_hint};
use crate::address::encode_segment;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Component-type keys served under `components/{type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentType {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
}

impl ComponentType {
    pub const ALL: [ComponentType; 9] = [
        ComponentType::Schemas,
        ComponentType::Responses,
        ComponentType::Parameters,
        ComponentType::Examples,
        ComponentType::RequestBodies,
        ComponentType::Headers,
        ComponentType::SecuritySchemes,
        ComponentType::Links,
        ComponentType::Callbacks,
    ];

    /// Key as it appears in the `components` object.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Schemas => "schemas",
            ComponentType::Responses => "responses",
            ComponentType::Parameters => "parameters",
            ComponentType::Examples => "examples",
            ComponentType::RequestBodies => "requestBodies",
            ComponentType::Headers => "headers",
            ComponentType::SecuritySchemes => "securitySchemes",
            ComponentType::Links => "links",
            ComponentType::Callbacks => "callbacks",
        }
    }

    /// Name of one entry of this type, used in hints.
    #[must_use]
    pub fn singular(self) -> &'static str {
        match self {
            ComponentType::Schemas => "schema",
            ComponentType::Responses => "response",
            ComponentType::Parameters => "parameter",
            ComponentType::Examples => "example",
            ComponentType::RequestBodies => "requestBody",
            ComponentType::Headers => "header",
            ComponentType::SecuritySchemes => "securityScheme",
            ComponentType::Links => "link",
            ComponentType::Callbacks => "callback",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// The `components` object: lists which component types exist.
pub struct RenderableComponents<'a> {
    components: Option<&'a Map<String, Value>>,
}

impl<'a> RenderableComponents<'a> {
    #[must_use]
    pub fn new(components: Option<&'a Value>) -> Self {
        Self {
            components: components.and_then(Value::as_object),
        }
    }

    /// The name → component mapping for one type, if present.
    #[must_use]
    pub fn component_map(&self, component_type: ComponentType) -> Option<&'a Value> {
        self.components?.get(component_type.as_str())
    }
}

impl Renderable for RenderableComponents<'_> {
    fn render_list(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        let Some(components) = self.components.filter(|c| !c.is_empty()) else {
            return vec![RenderResultItem::error(
                "components",
                "No components found in the specification.",
            )];
        };

        let mut types: Vec<String> = components
            .keys()
            .filter(|k| k.parse::<ComponentType>().is_ok())
            .cloned()
            .collect();
        if types.is_empty() {
            return vec![RenderResultItem::error(
                "components",
                "No valid component types found.",
            )];
        }
        types.sort();

        let text = format!(
            "Available Component Types:\n\n{}\n{}",
            bullet_list(&types),
            list_hint(ctx, "component type", "components/{type}")
        );
        vec![RenderResultItem::list("components", text)]
    }

    fn render_detail(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        self.render_list(ctx)
    }
}

/// One component type's name → object mapping.
pub struct RenderableComponentMap<'a> {
    map: Option<&'a Map<String, Value>>,
    component_type: ComponentType,
    uri_suffix: String,
}

impl<'a> RenderableComponentMap<'a> {
    #[must_use]
    pub fn new(map: Option<&'a Value>, component_type: ComponentType) -> Self {
        Self {
            map: map.and_then(Value::as_object),
            component_type,
            uri_suffix: format!("components/{component_type}"),
        }
    }

    #[must_use]
    pub fn component(&self, name: &str) -> Option<&'a Value> {
        self.map?.get(name)
    }

    /// Detail items for each requested name, in request order. Never stops early.
    #[must_use]
    pub fn render_component_detail(
        &self,
        _ctx: &RenderContext<'_>,
        names: &[String],
    ) -> Vec<RenderResultItem> {
        names
            .iter()
            .map(|name| {
                let suffix = format!("{}/{}", self.uri_suffix, encode_segment(name));
                if self.map.is_none() {
                    return RenderResultItem::error(
                        suffix,
                        format!(
                            "Component map for type \"{}\" not found.",
                            self.component_type
                        ),
                    );
                }
                match self.component(name) {
                    Some(component) => RenderResultItem::detail(suffix, component.clone()),
                    None => RenderResultItem::error(
                        suffix,
                        format!(
                            "Component \"{name}\" of type \"{}\" not found.",
                            self.component_type
                        ),
                    ),
                }
            })
            .collect()
    }

    /// Detail items for `schema/{name}` addresses.
    ///
    /// A failed lookup still yields a structured `{name, error}` payload (rendered through the
    /// codec into the error text) so clients can parse it like a detail response.
    #[must_use]
    pub fn render_schema_detail(
        &self,
        ctx: &RenderContext<'_>,
        names: &[String],
    ) -> Vec<RenderResultItem> {
        names
            .iter()
            .map(|name| {
                let suffix = format!("schema/{}", encode_segment(name));
                let error = match self.component(name) {
                    None => format!("Schema not found: {name}"),
                    Some(Value::Object(schema)) if schema.contains_key("$ref") => format!(
                        "Unexpected reference found for schema: {name}. Expected resolved schema."
                    ),
                    Some(schema) => return RenderResultItem::detail(suffix, schema.clone()),
                };
                let payload = json!({ "name": name, "error": error });
                let text = ctx.codec.format(&payload).unwrap_or(error);
                RenderResultItem::error(suffix, text)
            })
            .collect()
    }

    /// Sorted names, one per line, without decoration.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .map
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Renderable for RenderableComponentMap<'_> {
    fn render_list(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        let names = self.names();
        if names.is_empty() {
            return vec![RenderResultItem::error(
                self.uri_suffix.clone(),
                format!("No components of type \"{}\" found.", self.component_type),
            )];
        }

        let text = format!(
            "Available {}:\n\n{}\n{}",
            self.component_type,
            bullet_list(&names),
            list_hint(
                ctx,
                self.component_type.singular(),
                &format!("{}/{{name}}", self.uri_suffix)
            )
        );
        vec![RenderResultItem::list(self.uri_suffix.clone(), text)]
    }

    fn render_detail(&self, ctx: &RenderContext<'_>) -> Vec<RenderResultItem> {
        self.render_list(ctx)
    }
}
