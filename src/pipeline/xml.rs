//! XML source handling: parses a document into the same
//! [`serde_json::Value`] tree shape every pipe stage consumes, so
//! EA-XMI/Papyrus pipes and StarUML's native-JSON pipes share one
//! `DataBatch` payload representation.
//!
//! Grounded on `XmlModelProcessingPipe` in
//! `core/deserialization/abstract/xml/xml_pipeline.py` for the
//! attribute-condition and attribute-extraction helpers; XML parsing
//! itself uses `roxmltree`, the XML crate already in this pack
//! (`other_examples/0a2fb54e_bethmaloney-rust-sqlpackage__tests-e2e-parity-layer7_canonical.rs.rs`).

use serde_json::{Map, Value};

use crate::config::ConfigPath;
use crate::config::ConfigNamespace;
use crate::errors::{TranslationError, TranslationResult};

/// The keys a parsed XML element is represented under in the
/// [`Value`] tree every pipe downstream of [`parse_xml_to_value`]
/// consumes.
pub const TAG_KEY: &str = "#tag";
/// The key under which an element's attribute map is stored.
pub const ATTRIBUTES_KEY: &str = "#attributes";
/// The key under which an element's child element list is stored.
pub const CHILDREN_KEY: &str = "#children";
/// The key under which an element's concatenated text content is stored.
pub const TEXT_KEY: &str = "#text";

/// Parse an XML document into a [`Value`] tree, one object per
/// element, recursively.
pub fn parse_xml_to_value(source: &str) -> TranslationResult<Value> {
    let doc = roxmltree::Document::parse(source)?;
    Ok(element_to_value(doc.root_element()))
}

fn element_to_value(node: roxmltree::Node) -> Value {
    let mut attributes = Map::new();
    for attr in node.attributes() {
        let key = match attr.namespace() {
            Some(ns) => format!("{{{ns}}}{}", attr.name()),
            None => attr.name().to_string(),
        };
        attributes.insert(key, Value::String(attr.value().to_string()));
    }

    let children: Vec<Value> = node
        .children()
        .filter(|n| n.is_element())
        .map(element_to_value)
        .collect();

    let text: String = node
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<Vec<_>>()
        .join("");

    let tag = match node.tag_name().namespace() {
        Some(ns) => format!("{{{ns}}}{}", node.tag_name().name()),
        None => node.tag_name().name().to_string(),
    };

    let mut object = Map::new();
    object.insert(TAG_KEY.to_string(), Value::String(tag));
    object.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
    object.insert(CHILDREN_KEY.to_string(), Value::Array(children));
    object.insert(TEXT_KEY.to_string(), Value::String(text));
    Value::Object(object)
}

/// The tag name of an element-shaped [`Value`], or `None` if it isn't
/// one produced by [`parse_xml_to_value`].
pub fn tag_of(value: &Value) -> Option<&str> {
    value.get(TAG_KEY).and_then(Value::as_str)
}

/// The attribute map of an element-shaped [`Value`].
pub fn attributes_of(value: &Value) -> Option<&Map<String, Value>> {
    value.get(ATTRIBUTES_KEY).and_then(Value::as_object)
}

/// The child elements of an element-shaped [`Value`].
pub fn children_of(value: &Value) -> Vec<&Value> {
    value
        .get(CHILDREN_KEY)
        .and_then(Value::as_array)
        .map(|arr| arr.iter().collect())
        .unwrap_or_default()
}

/// Children of `value` whose tag equals `tag`.
pub fn children_with_tag<'a>(value: &'a Value, tag: &str) -> Vec<&'a Value> {
    children_of(value).into_iter().filter(|c| tag_of(c) == Some(tag)).collect()
}

/// A condition an element's attributes must satisfy, evaluated against
/// a resolved attribute name. Grounded on `XmlAttributeCondition`.
pub struct AttributeCondition {
    attribute_path: ConfigPath,
    expected_value: String,
    when_missing_raise: bool,
}

impl AttributeCondition {
    /// Construct a condition: `attribute_path` resolves (against a
    /// [`ConfigNamespace`]) to the attribute name to check.
    pub fn new(attribute_path: ConfigPath, expected_value: impl Into<String>) -> Self {
        Self {
            attribute_path,
            expected_value: expected_value.into(),
            when_missing_raise: false,
        }
    }

    /// Make a missing attribute a hard [`TranslationError::InvalidFormat`]
    /// rather than simply failing the condition.
    pub fn require_present(mut self) -> Self {
        self.when_missing_raise = true;
        self
    }

    /// Evaluate the condition against `element`'s attributes.
    pub fn evaluate(&self, element: &Value, config: &ConfigNamespace) -> TranslationResult<bool> {
        let attribute_name = config.resolve(&self.attribute_path)?;
        let attributes = attributes_of(element).ok_or_else(|| {
            TranslationError::invalid_format("expected a parsed xml element", "attribute condition")
        })?;
        match attributes.get(attribute_name).and_then(Value::as_str) {
            Some(actual) => Ok(actual == self.expected_value),
            None if self.when_missing_raise => Err(TranslationError::invalid_format(
                format!("attribute {attribute_name} not found"),
                tag_of(element).unwrap_or("<unknown>").to_string(),
            )),
            None => Ok(false),
        }
    }
}

/// Maps `values[key_to_map]` through `mapping`, in place, failing with
/// [`TranslationError::InvalidFormat`] if either the key or the mapped
/// value is absent. Grounded on `_map_value_from_key`.
pub fn map_value_from_key(
    values: &mut Map<String, Value>,
    key_to_map: &str,
    mapping: &std::collections::HashMap<String, String>,
) -> TranslationResult<()> {
    let current = values
        .get(key_to_map)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            TranslationError::invalid_format(format!("key {key_to_map} not found in values dict"), "mapping")
        })?
        .to_string();
    let mapped = mapping.get(&current).ok_or_else(|| {
        TranslationError::invalid_format(format!("value {current} not found in mapping dict"), key_to_map)
    })?;
    values.insert(key_to_map.to_string(), Value::String(mapped.clone()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xml_to_value_roundtrips_tag_and_attributes() {
        let xml = r#"<root xmi:id="m1"><child name="x"/></root>"#;
        let value = parse_xml_to_value(xml).unwrap();
        assert_eq!(tag_of(&value), Some("root"));
        assert_eq!(children_of(&value).len(), 1);
        assert_eq!(tag_of(children_of(&value)[0]), Some("child"));
    }

    #[test]
    fn test_attribute_condition_matches_expected_value() {
        let xml = r#"<packagedElement type="uml:Class"/>"#;
        let value = parse_xml_to_value(xml).unwrap();
        let config = ConfigNamespace::new().with_group("ATTRIBUTES", [("type", "type")]);
        let condition = AttributeCondition::new(ConfigPath::new().field("ATTRIBUTES").field("type"), "uml:Class");
        assert!(condition.evaluate(&value, &config).unwrap());
    }

    #[test]
    fn test_map_value_from_key_translates() {
        let mut values = Map::new();
        values.insert("kind".to_string(), Value::String("uml:Class".to_string()));
        let mut mapping = std::collections::HashMap::new();
        mapping.insert("uml:Class".to_string(), "class".to_string());
        map_value_from_key(&mut values, "kind", &mapping).unwrap();
        assert_eq!(values["kind"], Value::String("class".to_string()));
    }
}
