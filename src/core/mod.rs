//! Core block abstractions and types
//!
//! This module defines the block contract, the composition lifecycle, the host
//! collaborator seams, and the registry that drives composition at bootstrap.

pub mod attributes;
pub mod block;
pub mod definition;
pub mod fields;
pub mod hooks;
pub mod host;
pub mod registry;
pub mod slug;

pub use attributes::{AttributeOverrides, BlockAlign, BlockAttributes, BlockMode, DEFAULT_PREFIX};
pub use block::{Block, BlockContext, BlockError};
pub use definition::{BlockDefinition, CompositionState, InertReason};
pub use fields::{FieldGroup, LocationRule};
pub use hooks::{HookQueue, HookSystem, INIT_PHASE, REGISTRATION_PRIORITY};
pub use host::{AssetPipeline, BlockDescriptor, BlockHost, HostContext, UriResolver, ViewRenderer};
pub use registry::{BlockFactory, BlockRegistry, BlockSource, RegistryError};
pub use slug::slugify;
