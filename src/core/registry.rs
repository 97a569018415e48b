//! Block Registry - resolves and composes every configured block
//!
//! The registry runs once at bootstrap. It provisions the default block
//! configuration on first setup, resolves each configured block source into a
//! block instance, and composes it. Sources are processed in configuration
//! order, which is also the order registrations are scheduled in and the
//! order blocks appear in the host's block picker.

use log::{debug, info};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::block::Block;
use super::definition::BlockDefinition;
use super::host::HostContext;
use crate::config::{provision_default_config, Config, ConfigError};

/// Constructor for a block type referenced by name
///
/// Receives the registry so a block can reach host services while it is built.
pub type BlockFactory = fn(&BlockRegistry) -> Box<dyn Block>;

/// A configured block: a ready instance or a reference to a block type
pub enum BlockSource {
    Instance(Box<dyn Block>),
    Reference(String),
}

impl BlockSource {
    pub fn instance<B: Block + 'static>(block: B) -> Self {
        BlockSource::Instance(Box::new(block))
    }
}

impl From<&str> for BlockSource {
    fn from(reference: &str) -> Self {
        BlockSource::Reference(reference.to_string())
    }
}

impl From<String> for BlockSource {
    fn from(reference: String) -> Self {
        BlockSource::Reference(reference)
    }
}

impl<'de> Deserialize<'de> for BlockSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(BlockSource::Reference)
    }
}

impl fmt::Debug for BlockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSource::Instance(block) => f
                .debug_tuple("Instance")
                .field(&block.attributes().name)
                .finish(),
            BlockSource::Reference(reference) => {
                f.debug_tuple("Reference").field(reference).finish()
            }
        }
    }
}

/// Block registry for composing all configured blocks
pub struct BlockRegistry {
    config: Config,
    host: HostContext,
    factories: BTreeMap<String, BlockFactory>,
    composed: Vec<Arc<BlockDefinition>>,
}

impl BlockRegistry {
    /// Create a registry over an explicit configuration
    ///
    /// # Example
    /// ```
    /// use std::sync::Arc;
    /// use block_composer::{AppConfig, BlockRegistry, Config, HookQueue, HostContext};
    ///
    /// let hooks = Arc::new(HookQueue::new());
    /// let host = HostContext::new(hooks, true);
    /// let registry = BlockRegistry::new(Config::new(AppConfig::default()), host);
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new(config: Config, host: HostContext) -> Self {
        Self {
            config,
            host,
            factories: BTreeMap::new(),
            composed: Vec::new(),
        }
    }

    /// Make a block type resolvable by `reference`
    pub fn with_factory(mut self, reference: impl Into<String>, factory: BlockFactory) -> Self {
        self.register_factory(reference, factory);
        self
    }

    pub fn register_factory(&mut self, reference: impl Into<String>, factory: BlockFactory) {
        self.factories.insert(reference.into(), factory);
    }

    /// Make the bundled block types resolvable
    pub fn with_builtin_blocks(mut self) -> Self {
        for (reference, factory) in crate::blocks::builtin_factories() {
            self.register_factory(reference, factory);
        }
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    /// Provision configuration, then resolve and compose every block source
    ///
    /// Sources are consumed, so calling this again composes nothing new.
    ///
    /// # Errors
    /// * `RegistryError::Config` if provisioning the default configuration fails
    /// * `RegistryError::UnresolvedBlock` if a reference has no factory
    pub fn register(&mut self) -> Result<(), RegistryError> {
        if provision_default_config(&self.config)? {
            info!(
                "event=config_provisioned path={}",
                self.config.blocks_path().display()
            );
        }

        let sources = self
            .config
            .blocks
            .as_mut()
            .map(|blocks| std::mem::take(&mut blocks.blocks))
            .unwrap_or_default();

        for source in sources {
            let block = self.resolve(source)?;
            let definition = BlockDefinition::from_arc(block).compose(&self.host);
            debug!(
                "event=block_composed slug={} state={:?}",
                definition.slug(),
                definition.state()
            );
            self.composed.push(definition);
        }

        info!("event=blocks_composed count={}", self.composed.len());
        Ok(())
    }

    /// Startup hook; blocks need no work after registration
    pub fn boot(&self) {}

    fn resolve(&self, source: BlockSource) -> Result<Arc<dyn Block>, RegistryError> {
        match source {
            BlockSource::Instance(block) => Ok(Arc::from(block)),
            BlockSource::Reference(reference) => {
                let factory = self
                    .factories
                    .get(&reference)
                    .copied()
                    .ok_or(RegistryError::UnresolvedBlock(reference))?;
                Ok(Arc::from(factory(self)))
            }
        }
    }

    /// Composed definitions in configuration order
    pub fn blocks(&self) -> &[Arc<BlockDefinition>] {
        &self.composed
    }

    /// Look up a composed definition by slug
    pub fn get(&self, slug: &str) -> Option<&Arc<BlockDefinition>> {
        self.composed.iter().find(|definition| definition.slug() == slug)
    }

    pub fn count(&self) -> usize {
        self.composed.len()
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("composed", &self.composed)
            .finish()
    }
}

/// Registry error types
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A configured reference has no registered factory
    #[error("Block type not resolvable: {0}")]
    UnresolvedBlock(String),

    /// Block configuration could not be provisioned or read
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
