//! Block Composer - declarative registration of field-driven content blocks
//!
//! This crate turns declarative block definitions into blocks registered with a
//! host content runtime. It provides the block contract, the one-time
//! composition lifecycle, and the registry that composes every configured block.

pub mod core;
pub mod categories;
pub mod config;
pub mod blocks;
mod tests;

// Re-export commonly used types
pub use crate::core::{
    AttributeOverrides, Block, BlockAttributes, BlockContext, BlockDefinition, BlockDescriptor,
    BlockError, BlockHost, BlockRegistry, BlockSource, FieldGroup, HookQueue, HookSystem,
    HostContext, RegistryError,
};
pub use categories::BlockCategory;
pub use config::{AppConfig, BlocksConfig, Config, ConfigError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
