//! Block trait and related types
//!
//! This module defines the capability contract every block type implements.
//! All capabilities except `path` have empty defaults, so a block overrides
//! only what it needs.

use serde_json::{Map, Value};
use std::path::PathBuf;

use super::attributes::{AttributeOverrides, BlockAttributes};
use super::fields::FieldGroup;

/// Core block trait that all block types must implement
pub trait Block: Send + Sync {
    /// Declared attribute defaults of the block type
    fn attributes(&self) -> BlockAttributes {
        BlockAttributes::default()
    }

    /// Attribute overrides merged onto the declared defaults before registration
    ///
    /// An empty result while the host extension API is unavailable leaves the
    /// block inert.
    fn register(&self) -> AttributeOverrides {
        AttributeOverrides::default()
    }

    /// Field group attached to the block
    ///
    /// Called once during composition, after overrides are applied and the slug
    /// is derived. An empty group attaches nothing.
    fn fields(&self, _context: &BlockContext<'_>) -> FieldGroup {
        FieldGroup::new()
    }

    /// Data passed to the view template
    fn with(&self, _context: &BlockContext<'_>) -> Map<String, Value> {
        Map::new()
    }

    /// Directory the block lives in; views and assets resolve under `views/`
    fn path(&self) -> PathBuf;
}

/// Composed state visible to `Block::fields` and `Block::with`
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    /// Attributes after overrides were applied
    pub attributes: &'a BlockAttributes,
    /// Derived slug
    pub slug: &'a str,
}

impl BlockContext<'_> {
    /// Name the block is registered under, `prefix + slug`
    pub fn registered_name(&self) -> String {
        format!("{}{}", self.attributes.prefix, self.slug)
    }
}

/// Block errors
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// The view template required for rendering is missing
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The host's template engine failed to render the view
    #[error("Render failed for block `{slug}`: {source}")]
    Render {
        slug: String,
        #[source]
        source: anyhow::Error,
    },

    /// The host rejected a block or field group registration
    #[error("Host registration failed for block `{slug}`: {source}")]
    Host {
        slug: String,
        #[source]
        source: anyhow::Error,
    },
}
