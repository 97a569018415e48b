//! Host collaborator seams
//!
//! The host runtime owns block registration, field storage, template rendering
//! and the asset pipeline. This module defines the shape of the calls made
//! into it, plus the descriptor handed over at registration.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::attributes::{BlockAlign, BlockMode};
use super::block::BlockError;
use super::fields::FieldGroup;
use super::hooks::HookSystem;
use crate::categories::BlockCategory;

/// Host extension API for blocks and field groups
pub trait BlockHost: Send + Sync {
    /// Register a block type with the host's block API
    fn register_block_type(&self, descriptor: BlockDescriptor) -> anyhow::Result<()>;

    /// Register a field group with the host's field storage
    fn add_local_field_group(&self, fields: FieldGroup) -> anyhow::Result<()>;
}

/// Host asset pipeline
pub trait AssetPipeline: Send + Sync {
    /// Enqueue a stylesheet without dependencies or version
    fn enqueue_style(&self, handle: &str, src: &str);

    /// Enqueue a script without dependencies or version
    fn enqueue_script(&self, handle: &str, src: &str, in_footer: bool);
}

/// Host template engine
pub trait ViewRenderer: Send + Sync {
    /// Render `template` with `data`, returning the markup
    fn render(&self, template: &Path, data: &Map<String, Value>) -> anyhow::Result<String>;
}

/// Asset-enqueue callback wired into the descriptor
pub type AssetCallback = Arc<dyn Fn(&dyn AssetPipeline, &UriResolver) + Send + Sync>;

/// Render callback wired into the descriptor
pub type RenderCallback =
    Arc<dyn Fn(&dyn ViewRenderer) -> Result<String, BlockError> + Send + Sync>;

/// Block metadata handed to the host's block registration API
///
/// Serializes with the host's field names: the slug travels as `name` and
/// the display name as `title`.
#[derive(Clone, Serialize)]
pub struct BlockDescriptor {
    #[serde(rename = "name")]
    pub slug: String,
    #[serde(rename = "title")]
    pub name: String,
    pub description: String,
    pub category: BlockCategory,
    pub icon: String,
    pub keywords: Vec<String>,
    pub post_types: Vec<String>,
    pub mode: BlockMode,
    pub align: Option<BlockAlign>,
    pub supports: BTreeMap<String, Value>,
    #[serde(skip)]
    pub enqueue_assets: AssetCallback,
    #[serde(skip)]
    pub render_callback: RenderCallback,
}

impl fmt::Debug for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDescriptor")
            .field("slug", &self.slug)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("icon", &self.icon)
            .field("keywords", &self.keywords)
            .field("post_types", &self.post_types)
            .field("mode", &self.mode)
            .field("align", &self.align)
            .field("supports", &self.supports)
            .finish_non_exhaustive()
    }
}

/// Translates local asset paths into public URLs
///
/// A pure prefix substitution: paths under `local_root` are rewritten under
/// `public_root`; anything else is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriResolver {
    local_root: PathBuf,
    public_root: String,
}

impl UriResolver {
    pub fn new(local_root: impl Into<PathBuf>, public_root: impl Into<String>) -> Self {
        Self {
            local_root: local_root.into(),
            public_root: public_root.into(),
        }
    }

    /// Public URL for a local path
    ///
    /// # Examples
    /// ```
    /// use block_composer::core::host::UriResolver;
    /// use std::path::Path;
    ///
    /// let uris = UriResolver::new("/srv/theme", "https://example.com/theme");
    /// assert_eq!(
    ///     uris.resolve(Path::new("/srv/theme/blocks/views/hero.css")),
    ///     "https://example.com/theme/blocks/views/hero.css"
    /// );
    /// ```
    pub fn resolve(&self, path: &Path) -> String {
        match path.strip_prefix(&self.local_root) {
            Ok(relative) => {
                let relative = relative.to_string_lossy().replace('\\', "/");
                format!("{}/{}", self.public_root.trim_end_matches('/'), relative)
            }
            Err(_) => path.to_string_lossy().into_owned(),
        }
    }
}

/// What composition needs from the host at bootstrap
#[derive(Clone)]
pub struct HostContext {
    hooks: Arc<dyn HookSystem>,
    extension_api: bool,
}

impl HostContext {
    pub fn new(hooks: Arc<dyn HookSystem>, extension_api_available: bool) -> Self {
        Self {
            hooks,
            extension_api: extension_api_available,
        }
    }

    pub fn hooks(&self) -> &dyn HookSystem {
        self.hooks.as_ref()
    }

    /// Whether the host's block extension API is installed
    pub fn extension_api_available(&self) -> bool {
        self.extension_api
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("extension_api", &self.extension_api)
            .finish_non_exhaustive()
    }
}
