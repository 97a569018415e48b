//! Field group documents
//!
//! A field group is an opaque document consumed by the host's field storage.
//! The only structure this crate relies on is the location rule matrix under
//! the `location` key: a list of rule groups, each a list of rules.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

const LOCATION_KEY: &str = "location";

/// A single location rule deciding where a field group is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRule {
    pub param: String,
    pub operator: String,
    pub value: String,
}

impl LocationRule {
    /// Rule matching the block registered under `prefix + slug`
    pub fn block(prefix: &str, slug: &str) -> Self {
        Self {
            param: "block".to_string(),
            operator: "==".to_string(),
            value: format!("{prefix}{slug}"),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "param": self.param,
            "operator": self.operator,
            "value": self.value,
        })
    }
}

/// Field group document attached to a block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldGroup(Map<String, Value>);

impl FieldGroup {
    /// Create an empty field group
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a field group from a JSON value
    ///
    /// Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the first rule of the first rule group is present
    pub fn has_location(&self) -> bool {
        self.0
            .get(LOCATION_KEY)
            .and_then(|groups| groups.get(0))
            .and_then(|rules| rules.get(0))
            .is_some()
    }

    /// Insert `rule` at `location[0][0]` unless a rule is already there
    ///
    /// Returns `true` when the rule was injected. Malformed `location` entries
    /// are replaced by a well-formed matrix.
    pub fn ensure_location(&mut self, rule: &LocationRule) -> bool {
        if self.has_location() {
            return false;
        }

        let location = self
            .0
            .entry(LOCATION_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !location.is_array() {
            *location = Value::Array(Vec::new());
        }

        if let Value::Array(groups) = location {
            match groups.first_mut() {
                Some(Value::Array(rules)) => rules.insert(0, rule.to_value()),
                Some(first) => *first = Value::Array(vec![rule.to_value()]),
                None => groups.push(Value::Array(vec![rule.to_value()])),
            }
        }

        true
    }

    /// All rules in the location matrix, flattened in order
    pub fn location_rules(&self) -> Vec<LocationRule> {
        self.0
            .get(LOCATION_KEY)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_array)
            .flatten()
            .filter_map(|rule| serde_json::from_value(rule.clone()).ok())
            .collect()
    }
}

impl From<Map<String, Value>> for FieldGroup {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_without_location() -> FieldGroup {
        FieldGroup::from_value(json!({
            "key": "group_hero",
            "title": "Hero",
            "fields": [{ "key": "field_heading", "name": "heading", "type": "text" }],
        }))
        .unwrap()
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(FieldGroup::from_value(json!([1, 2])).is_none());
        assert!(FieldGroup::from_value(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_injects_rule_when_location_missing() {
        let mut group = group_without_location();
        assert!(!group.has_location());

        let injected = group.ensure_location(&LocationRule::block("acf/", "hero"));
        assert!(injected);
        assert_eq!(
            group.get("location").unwrap(),
            &json!([[{ "param": "block", "operator": "==", "value": "acf/hero" }]])
        );
    }

    #[test]
    fn test_existing_location_is_untouched() {
        let mut group = group_without_location();
        let existing = json!([[{ "param": "post_type", "operator": "==", "value": "page" }]]);
        group.0.insert("location".to_string(), existing.clone());

        assert!(!group.ensure_location(&LocationRule::block("acf/", "hero")));
        assert_eq!(group.get("location").unwrap(), &existing);
    }

    #[test]
    fn test_empty_location_matrix_gets_rule_at_origin() {
        let mut group = group_without_location();
        group.0.insert("location".to_string(), json!([[], [{ "param": "x", "operator": "==", "value": "y" }]]));

        assert!(group.ensure_location(&LocationRule::block("acf/", "hero")));
        let rules = group.location_rules();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], LocationRule::block("acf/", "hero"));
    }

    #[test]
    fn test_malformed_location_is_replaced() {
        let mut group = group_without_location();
        group.0.insert("location".to_string(), json!("block"));

        assert!(group.ensure_location(&LocationRule::block("theme/", "cta")));
        assert_eq!(group.location_rules(), vec![LocationRule::block("theme/", "cta")]);
    }

    #[test]
    fn test_injection_happens_once() {
        let mut group = group_without_location();
        let rule = LocationRule::block("acf/", "hero");

        assert!(group.ensure_location(&rule));
        assert!(!group.ensure_location(&rule));
        assert_eq!(group.location_rules().len(), 1);
    }
}
