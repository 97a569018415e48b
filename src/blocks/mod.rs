//! Bundled block types
//!
//! Block types shipped with the crate, resolvable from configuration by the
//! references returned from `builtin_factories`.

pub mod example;

use std::path::PathBuf;

use crate::core::registry::{BlockFactory, BlockRegistry};
use crate::core::Block;

pub use example::ExampleBlock;

/// Directory holding the bundled blocks and their `views/`
pub fn blocks_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src").join("blocks")
}

/// References and factories for every bundled block type
pub fn builtin_factories() -> Vec<(&'static str, BlockFactory)> {
    vec![("Example", example_factory)]
}

fn example_factory(_registry: &BlockRegistry) -> Box<dyn Block> {
    Box::new(ExampleBlock::new())
}
