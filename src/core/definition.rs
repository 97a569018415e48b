//! Block composition lifecycle
//!
//! A `BlockDefinition` wraps one block instance and carries it through
//! composition: guard, merge overrides, derive slug and fields, check the
//! enabled flag, and defer registration to the host's init phase. Once
//! composed the definition is shared read-only with the host, which calls
//! back into `view` and `assets` at render time.

use log::{debug, info};
use parking_lot::RwLock;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::attributes::BlockAttributes;
use super::block::{Block, BlockContext, BlockError};
use super::fields::{FieldGroup, LocationRule};
use super::hooks::{INIT_PHASE, REGISTRATION_PRIORITY};
use super::host::{
    AssetPipeline, BlockDescriptor, BlockHost, HostContext, UriResolver, ViewRenderer,
};
use super::slug::slugify;

/// Extension of view templates under `views/`
pub const TEMPLATE_EXTENSION: &str = "blade";

const VIEWS_DIR: &str = "views";

/// Where a definition is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionState {
    /// Not composed yet
    Pending,
    /// Composed but never offered to the host
    Inert(InertReason),
    /// Registration is waiting on the init phase
    Scheduled,
    /// Registered with the host
    Active,
}

/// Why a composed definition stays inert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InertReason {
    /// No overrides and no host extension API
    ExtensionApiUnavailable,
    /// The `enabled` attribute is false
    Disabled,
}

/// One block carried through composition
pub struct BlockDefinition {
    block: Arc<dyn Block>,
    attributes: BlockAttributes,
    slug: String,
    fields: FieldGroup,
    state: RwLock<CompositionState>,
}

impl BlockDefinition {
    pub fn new<B: Block + 'static>(block: B) -> Self {
        Self::from_arc(Arc::new(block))
    }

    pub fn from_arc(block: Arc<dyn Block>) -> Self {
        let attributes = block.attributes();
        Self {
            block,
            attributes,
            slug: String::new(),
            fields: FieldGroup::new(),
            state: RwLock::new(CompositionState::Pending),
        }
    }

    /// Compose the definition and schedule its registration
    ///
    /// Consumes the definition, so a block can only be composed once. The
    /// returned handle is shared with the deferred registration action.
    pub fn compose(mut self, host: &HostContext) -> Arc<Self> {
        let overrides = self.block.register();
        if overrides.is_empty() && !host.extension_api_available() {
            debug!("event=block_inert reason=extension_api_unavailable");
            *self.state.get_mut() = CompositionState::Inert(InertReason::ExtensionApiUnavailable);
            return Arc::new(self);
        }

        overrides.apply(&mut self.attributes);
        self.slug = slugify(&self.attributes.name);
        let context = BlockContext {
            attributes: &self.attributes,
            slug: &self.slug,
        };
        self.fields = self.block.fields(&context);

        if !self.attributes.enabled {
            debug!("event=block_inert reason=disabled slug={}", self.slug);
            *self.state.get_mut() = CompositionState::Inert(InertReason::Disabled);
            return Arc::new(self);
        }

        *self.state.get_mut() = CompositionState::Scheduled;
        let definition = Arc::new(self);
        let scheduled = Arc::clone(&definition);
        host.hooks().add_action(
            INIT_PHASE,
            REGISTRATION_PRIORITY,
            definition.registered_name(),
            Box::new(move |api: &dyn BlockHost| scheduled.register_with(api)),
        );
        debug!("event=block_scheduled slug={}", definition.slug);

        definition
    }

    /// Register the block and its field group with the host
    fn register_with(self: &Arc<Self>, api: &dyn BlockHost) -> Result<(), BlockError> {
        api.register_block_type(self.descriptor())
            .map_err(|source| BlockError::Host {
                slug: self.slug.clone(),
                source,
            })?;

        if !self.fields.is_empty() {
            let mut fields = self.fields.clone();
            let rule = LocationRule::block(&self.attributes.prefix, &self.slug);
            if fields.ensure_location(&rule) {
                debug!("event=location_injected slug={} value={}", self.slug, rule.value);
            }
            api.add_local_field_group(fields)
                .map_err(|source| BlockError::Host {
                    slug: self.slug.clone(),
                    source,
                })?;
        }

        *self.state.write() = CompositionState::Active;
        info!("event=block_registered name={}", self.registered_name());
        Ok(())
    }

    /// Descriptor for the host's block registration API
    ///
    /// The asset and render callbacks hold a handle to this definition.
    pub fn descriptor(self: &Arc<Self>) -> BlockDescriptor {
        let assets = Arc::clone(self);
        let view = Arc::clone(self);
        let attributes = &self.attributes;

        BlockDescriptor {
            slug: self.slug.clone(),
            name: attributes.name.clone(),
            description: attributes.description.clone(),
            category: attributes.category.clone(),
            icon: attributes.icon.clone(),
            keywords: attributes.keywords.clone(),
            post_types: attributes.post_types.clone(),
            mode: attributes.mode,
            align: attributes.align,
            supports: attributes.supports.clone(),
            enqueue_assets: Arc::new(move |pipeline: &dyn AssetPipeline, uris: &UriResolver| {
                assets.assets(pipeline, uris)
            }),
            render_callback: Arc::new(move |renderer: &dyn ViewRenderer| view.view(renderer)),
        }
    }

    /// Render the block's view template with the block's `with` data
    ///
    /// # Errors
    /// * `BlockError::TemplateNotFound` if `views/<slug>.blade` does not exist
    /// * `BlockError::Render` if the template engine fails
    pub fn view(&self, renderer: &dyn ViewRenderer) -> Result<String, BlockError> {
        let template = self.template_path();
        if !template.is_file() {
            return Err(BlockError::TemplateNotFound(template));
        }

        let data = self.block.with(&self.context());
        renderer
            .render(&template, &data)
            .map_err(|source| BlockError::Render {
                slug: self.slug.clone(),
                source,
            })
    }

    /// Enqueue the block's stylesheet and script, each only if present
    pub fn assets(&self, pipeline: &dyn AssetPipeline, uris: &UriResolver) {
        let handle = self.registered_name();

        let style = self.asset_path("css");
        if style.is_file() {
            pipeline.enqueue_style(&handle, &uris.resolve(&style));
        }

        let script = self.asset_path("js");
        if script.is_file() {
            pipeline.enqueue_script(&handle, &uris.resolve(&script), true);
        }
    }

    pub fn template_path(&self) -> PathBuf {
        self.asset_path(TEMPLATE_EXTENSION)
    }

    fn asset_path(&self, extension: &str) -> PathBuf {
        self.block
            .path()
            .join(VIEWS_DIR)
            .join(format!("{}.{}", self.slug, extension))
    }

    fn context(&self) -> BlockContext<'_> {
        BlockContext {
            attributes: &self.attributes,
            slug: &self.slug,
        }
    }

    /// Name the block is registered under, `prefix + slug`
    pub fn registered_name(&self) -> String {
        self.context().registered_name()
    }

    pub fn attributes(&self) -> &BlockAttributes {
        &self.attributes
    }

    /// Derived slug; empty until composition reaches the derive step
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Field group as returned by the block, before location injection
    pub fn fields(&self) -> &FieldGroup {
        &self.fields
    }

    pub fn state(&self) -> CompositionState {
        *self.state.read()
    }

    pub fn is_inert(&self) -> bool {
        matches!(self.state(), CompositionState::Inert(_))
    }
}

impl fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("slug", &self.slug)
            .field("attributes", &self.attributes)
            .field("fields", &self.fields)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
