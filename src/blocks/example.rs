//! Example block
//!
//! A minimal block with a repeater of items, a view and a stylesheet. It is
//! what the bundled configuration registers on a fresh installation.

use serde_json::{json, Map, Value};
use std::path::PathBuf;

use crate::categories::BlockCategory;
use crate::core::{AttributeOverrides, Block, BlockAttributes, BlockContext, FieldGroup};

/// Example block listing a few items
#[derive(Debug, Clone)]
pub struct ExampleBlock {
    items: Vec<String>,
}

impl ExampleBlock {
    pub fn new() -> Self {
        Self {
            items: vec![
                "Item one".to_string(),
                "Item two".to_string(),
                "Item three".to_string(),
            ],
        }
    }

    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for ExampleBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for ExampleBlock {
    fn attributes(&self) -> BlockAttributes {
        BlockAttributes {
            category: BlockCategory::Formatting,
            ..BlockAttributes::default()
        }
    }

    fn register(&self) -> AttributeOverrides {
        AttributeOverrides::new()
            .name("Example")
            .description("Lorem ipsum...")
            .category(BlockCategory::Formatting)
            .icon("star-filled")
            .keywords(["example", "items"])
            .support("align", json!(false))
            .support("mode", json!(false))
    }

    fn fields(&self, context: &BlockContext<'_>) -> FieldGroup {
        let group = json!({
            "key": format!("group_{}", context.slug),
            "title": context.attributes.name,
            "fields": [
                {
                    "key": format!("field_{}_items", context.slug),
                    "label": "Items",
                    "name": "items",
                    "type": "repeater",
                    "layout": "table",
                    "sub_fields": [
                        {
                            "key": format!("field_{}_item", context.slug),
                            "label": "Item",
                            "name": "item",
                            "type": "text",
                        }
                    ],
                }
            ],
        });

        FieldGroup::from_value(group).unwrap_or_default()
    }

    fn with(&self, _context: &BlockContext<'_>) -> Map<String, Value> {
        let items = self
            .items
            .iter()
            .map(|item| json!({ "item": item }))
            .collect();

        let mut data = Map::new();
        data.insert("items".to_string(), Value::Array(items));
        data
    }

    fn path(&self) -> PathBuf {
        super::blocks_dir()
    }
}
