//! Block categories and classification
//!
//! Categories group blocks in the host's block picker. The host ships a fixed
//! set of built-in categories and also accepts custom ones registered by themes.

use serde::{Deserialize, Serialize};

/// Block category enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockCategory {
    /// General purpose blocks
    #[default]
    Common,
    /// Text formatting blocks (e.g., quotes, code, tables)
    Formatting,
    /// Layout blocks (e.g., columns, separators)
    Layout,
    /// Widget blocks (e.g., archives, search)
    Widgets,
    /// Embedded third-party content
    Embed,
    /// Custom category registered by the host theme
    Custom(String),
}

impl BlockCategory {
    /// Get the identifier the host uses for the category
    pub fn as_str(&self) -> &str {
        match self {
            BlockCategory::Common => "common",
            BlockCategory::Formatting => "formatting",
            BlockCategory::Layout => "layout",
            BlockCategory::Widgets => "widgets",
            BlockCategory::Embed => "embed",
            BlockCategory::Custom(name) => name,
        }
    }
}

impl From<&str> for BlockCategory {
    fn from(value: &str) -> Self {
        match value {
            "common" => BlockCategory::Common,
            "formatting" => BlockCategory::Formatting,
            "layout" => BlockCategory::Layout,
            "widgets" => BlockCategory::Widgets,
            "embed" => BlockCategory::Embed,
            other => BlockCategory::Custom(other.to_string()),
        }
    }
}

impl From<String> for BlockCategory {
    fn from(value: String) -> Self {
        BlockCategory::from(value.as_str())
    }
}

impl From<BlockCategory> for String {
    fn from(category: BlockCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
