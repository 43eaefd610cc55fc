//! Addressable, token-efficient views over an `OpenAPI` document.
//!
//! This crate is used by:
//! - `unrelated-openapi-explorer-mcp` (serves the views as MCP resources)
//!
//! It contains **no** transport or protocol logic. Callers hand an `openapi://` address to
//! [`Explorer::read`] and get back formatted content items.

pub mod address;
pub mod codec;
pub mod config;
pub mod error;
pub mod render;
pub mod resolver;
pub mod rewrite;
pub mod store;

pub use address::{BASE_URI, Keys, ResourceAddress};
pub use codec::{FormattedResultItem, OutputCodec, create_codec};
pub use config::{ExplorerConfig, HashPolicy, OutputFormat};
pub use error::{ExplorerError, Result};
pub use resolver::Explorer;
pub use store::{DocumentStore, FileSpecSource, SpecSource, StaticSpecSource};
