//! Resource address parsing.
//!
//! Addresses look like `openapi://components/schemas/Task,TaskList`. Parsing turns them into a
//! closed set of [`ResourceAddress`] kinds; multi-valued segments become [`Keys`], which are
//! guaranteed non-empty.

use crate::error::{ExplorerError, Result};
use crate::render::components::ComponentType;
use std::fmt;

/// Scheme prefix of every address served.
pub const BASE_URI: &str = "openapi://";

/// A non-empty, ordered list of keys taken from one address segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys(Vec<String>);

impl Keys {
    /// Wrap an already-normalized list. Returns `None` if the list is empty.
    #[must_use]
    pub fn new(keys: Vec<String>) -> Option<Self> {
        if keys.is_empty() {
            None
        } else {
            Some(Self(keys))
        }
    }

    /// Split a raw segment on `,`, trim each element, drop empty elements, then percent-decode.
    ///
    /// Splitting happens before decoding so an encoded comma (`%2C`) stays part of its key.
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidAddress`] with `empty_message` if nothing is left, or if an
    /// element is not valid percent-encoded UTF-8.
    pub fn from_segment(raw: &str, empty_message: &str) -> Result<Self> {
        let keys = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect::<Result<Vec<_>>>()?;
        Self::new(keys).ok_or_else(|| ExplorerError::InvalidAddress(empty_message.to_string()))
    }

    fn map(self, f: impl Fn(String) -> String) -> Self {
        Self(self.0.into_iter().map(f).collect())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'a> IntoIterator for &'a Keys {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every address shape the explorer answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceAddress {
    /// `fields`: list of top-level document keys.
    Fields,
    /// `{field}`
    Field(String),
    /// `paths/{path}`
    PathItem { path: String },
    /// `paths/{path}/{method[,method...]}`
    Operations { path: String, methods: Keys },
    /// `components/{type}`
    ComponentMap(ComponentType),
    /// `components/{type}/{name[,name...]}`
    Components {
        component_type: ComponentType,
        names: Keys,
    },
    /// `schema/{name[,name...]}`
    Schemas(Keys),
    /// `endpoint/{method[,method...]}/{path[,path...]}`
    Endpoints { methods: Keys, paths: Keys },
    /// `endpoints/list`
    EndpointList,
    /// `schemas/list`
    SchemaList,
}

impl ResourceAddress {
    /// Parse a full address (`openapi://...`).
    ///
    /// # Errors
    ///
    /// Returns [`ExplorerError::InvalidAddress`] if the scheme is wrong, the shape is unknown, or
    /// a required segment is empty after normalization.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(BASE_URI).ok_or_else(|| {
            ExplorerError::InvalidAddress(format!(
                "Resource address must start with {BASE_URI}: {uri}"
            ))
        })?;
        let rest = rest.trim_end_matches('/');
        let segments: Vec<&str> = rest.split('/').collect();

        let address = match segments.as_slice() {
            [""] => return Err(unrecognized(uri)),
            ["endpoints", "list"] => ResourceAddress::EndpointList,
            ["schemas", "list"] => ResourceAddress::SchemaList,
            ["fields"] => ResourceAddress::Fields,
            [field] => ResourceAddress::Field(decode_segment(field)?),
            ["paths", path] => ResourceAddress::PathItem {
                path: parse_path(path)?,
            },
            ["paths", path, methods] => ResourceAddress::Operations {
                path: parse_path(path)?,
                methods: parse_methods(methods)?,
            },
            ["components", component_type] => {
                ResourceAddress::ComponentMap(parse_component_type(component_type)?)
            }
            ["components", component_type, names] => ResourceAddress::Components {
                component_type: parse_component_type(component_type)?,
                names: Keys::from_segment(names, "No valid component name specified.")?,
            },
            ["schema", names] => ResourceAddress::Schemas(Keys::from_segment(
                names,
                "No valid schema name specified.",
            )?),
            // Unencoded slashes in the path part are tolerated here.
            ["endpoint", methods, path @ ..] if !path.is_empty() => ResourceAddress::Endpoints {
                methods: parse_methods(methods)?,
                paths: Keys::from_segment(&path.join("/"), "No valid path specified.")?
                    .map(|p| normalize_path(&p)),
            },
            ["endpoint", methods] => {
                parse_methods(methods)?;
                return Err(ExplorerError::InvalidAddress(
                    "No valid path specified.".to_string(),
                ));
            }
            _ => return Err(unrecognized(uri)),
        };
        Ok(address)
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |keys: &Keys, encode: fn(&str) -> String| {
            keys.iter().map(|k| encode(k)).collect::<Vec<_>>().join(",")
        };
        match self {
            ResourceAddress::Fields => write!(f, "{BASE_URI}fields"),
            ResourceAddress::Field(field) => write!(f, "{BASE_URI}{}", encode_segment(field)),
            ResourceAddress::PathItem { path } => write!(f, "{BASE_URI}paths/{}", encode_path(path)),
            ResourceAddress::Operations { path, methods } => write!(
                f,
                "{BASE_URI}paths/{}/{}",
                encode_path(path),
                join(methods, encode_segment)
            ),
            ResourceAddress::ComponentMap(t) => write!(f, "{BASE_URI}components/{t}"),
            ResourceAddress::Components {
                component_type,
                names,
            } => write!(
                f,
                "{BASE_URI}components/{component_type}/{}",
                join(names, encode_segment)
            ),
            ResourceAddress::Schemas(names) => {
                write!(f, "{BASE_URI}schema/{}", join(names, encode_segment))
            }
            ResourceAddress::Endpoints { methods, paths } => write!(
                f,
                "{BASE_URI}endpoint/{}/{}",
                join(methods, encode_segment),
                join(paths, encode_path)
            ),
            ResourceAddress::EndpointList => write!(f, "{BASE_URI}endpoints/list"),
            ResourceAddress::SchemaList => write!(f, "{BASE_URI}schemas/list"),
        }
    }
}

fn unrecognized(uri: &str) -> ExplorerError {
    ExplorerError::InvalidAddress(format!("Unrecognized resource address: {uri}"))
}

fn parse_path(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExplorerError::InvalidAddress(
            "No valid path specified.".to_string(),
        ));
    }
    Ok(normalize_path(&decode_segment(raw)?))
}

fn parse_methods(raw: &str) -> Result<Keys> {
    Ok(Keys::from_segment(raw, "No valid HTTP method specified.")?.map(|m| m.to_ascii_lowercase()))
}

fn parse_component_type(raw: &str) -> Result<ComponentType> {
    let decoded = decode_segment(raw)?;
    decoded
        .parse()
        .map_err(|()| ExplorerError::InvalidAddress(format!("Invalid component type: {decoded}")))
}

/// Percent-decode one address segment.
///
/// # Errors
///
/// Returns [`ExplorerError::InvalidAddress`] if the decoded bytes are not UTF-8.
pub fn decode_segment(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| {
            ExplorerError::InvalidAddress(format!("Malformed percent-encoding in '{raw}': {e}"))
        })
}

/// Percent-encode a value so it fits in one address segment.
#[must_use]
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Make a decoded path start with exactly one `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Encode a document path for use in an address: leading `/` dropped, rest percent-encoded.
///
/// The root path `/` is encoded as `%2F` so the segment never ends up empty.
#[must_use]
pub fn encode_path(path: &str) -> String {
    match path.trim_start_matches('/') {
        "" => encode_segment("/"),
        trimmed => encode_segment(trimmed),
    }
}
