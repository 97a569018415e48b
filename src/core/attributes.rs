//! Block attributes and attribute overrides
//!
//! `BlockAttributes` holds the declared defaults of a block type.
//! `AttributeOverrides` is the patch a block returns from `Block::register`;
//! applying it is a field-by-field, last-write-wins merge that leaves
//! unspecified attributes at their defaults.

use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::categories::BlockCategory;

/// Default namespace prefix for block names
pub const DEFAULT_PREFIX: &str = "acf/";

/// Display mode offered to the editor when the block is inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockMode {
    /// Rendered preview, fields in the sidebar
    #[default]
    Preview,
    /// Field form shown in place of the preview
    Edit,
    /// Preview that switches to the form when selected
    Auto,
}

/// Block alignment class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAlign {
    Left,
    Center,
    Right,
    Wide,
    Full,
}

/// Declared attributes of a block type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockAttributes {
    /// Human-readable block name
    pub name: String,
    pub description: String,
    pub category: BlockCategory,
    /// Dashicon name or inline SVG
    pub icon: String,
    /// Search terms the block is found under
    pub keywords: Vec<String>,
    /// Post types the block is available to
    pub post_types: Vec<String>,
    pub mode: BlockMode,
    /// Alignment class; `None` leaves alignment to the editor
    #[serde(deserialize_with = "deserialize_align")]
    pub align: Option<BlockAlign>,
    /// Editor features supported by the block
    pub supports: BTreeMap<String, Value>,
    /// Disabled blocks are composed but never registered
    pub enabled: bool,
    /// Namespace prefix for the registered block name
    pub prefix: String,
    /// Attributes outside the known schema, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for BlockAttributes {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: BlockCategory::default(),
            icon: String::new(),
            keywords: Vec::new(),
            post_types: vec!["post".to_string(), "page".to_string()],
            mode: BlockMode::default(),
            align: None,
            supports: BTreeMap::new(),
            enabled: true,
            prefix: DEFAULT_PREFIX.to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl BlockAttributes {
    /// Default attributes with the given display name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Attribute overrides merged onto a block's declared attributes
///
/// Every field is optional; only the ones that are set are applied.
/// Keys outside the known schema deserialize into `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<BlockCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BlockMode>,
    /// `Some(None)` clears a declared alignment; `""` in JSON
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_align_override",
        serialize_with = "serialize_align_override"
    )]
    pub align: Option<Option<BlockAlign>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supports: Option<BTreeMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl AttributeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON object
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Whether no override is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.icon.is_none()
            && self.keywords.is_none()
            && self.post_types.is_none()
            && self.mode.is_none()
            && self.align.is_none()
            && self.supports.is_none()
            && self.enabled.is_none()
            && self.prefix.is_none()
            && self.extra.is_empty()
    }

    /// Apply every set override onto `attributes`
    pub fn apply(self, attributes: &mut BlockAttributes) {
        if let Some(name) = self.name {
            attributes.name = name;
        }
        if let Some(description) = self.description {
            attributes.description = description;
        }
        if let Some(category) = self.category {
            attributes.category = category;
        }
        if let Some(icon) = self.icon {
            attributes.icon = icon;
        }
        if let Some(keywords) = self.keywords {
            attributes.keywords = keywords;
        }
        if let Some(post_types) = self.post_types {
            attributes.post_types = post_types;
        }
        if let Some(mode) = self.mode {
            attributes.mode = mode;
        }
        if let Some(align) = self.align {
            attributes.align = align;
        }
        if let Some(supports) = self.supports {
            attributes.supports = supports;
        }
        if let Some(enabled) = self.enabled {
            attributes.enabled = enabled;
        }
        if let Some(prefix) = self.prefix {
            attributes.prefix = prefix;
        }
        attributes.extra.extend(self.extra);
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<BlockCategory>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = Some(keywords.into_iter().map(Into::into).collect());
        self
    }

    pub fn post_types<I, S>(mut self, post_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.post_types = Some(post_types.into_iter().map(Into::into).collect());
        self
    }

    pub fn mode(mut self, mode: BlockMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn align(mut self, align: BlockAlign) -> Self {
        self.align = Some(Some(align));
        self
    }

    /// Reset alignment to empty, whatever the block declared
    pub fn clear_align(mut self) -> Self {
        self.align = Some(None);
        self
    }

    pub fn support(mut self, feature: impl Into<String>, value: Value) -> Self {
        self.supports
            .get_or_insert_with(BTreeMap::new)
            .insert(feature.into(), value);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Attach an attribute outside the known schema
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Alignment from JSON; `null` and `""` both mean no alignment
fn deserialize_align<'de, D>(deserializer: D) -> Result<Option<BlockAlign>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(align) => {
            let align: serde::de::value::StrDeserializer<'_, D::Error> = align.into_deserializer();
            BlockAlign::deserialize(align).map(Some)
        }
    }
}

fn deserialize_align_override<'de, D>(
    deserializer: D,
) -> Result<Option<Option<BlockAlign>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_align(deserializer).map(Some)
}

fn serialize_align_override<S>(
    align: &Option<Option<BlockAlign>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match align {
        Some(Some(align)) => align.serialize(serializer),
        _ => serializer.serialize_str(""),
    }
}
