//! Attribute values and reserved attribute names
//!
//! Attributes are opaque scalar values attached to nodes and edges. A small
//! set of names is "first-class": consumers render them as native fields
//! (position, color, label) instead of generic typed attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A scalar attribute value as it appears on the wire.
///
/// The integer arm is tried before the float arm so that `5` survives a
/// round-trip as `5` and not `5.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
    Flag(bool),
}

impl AttrValue {
    /// The string content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric content widened to f64, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(f: f64) -> Self {
        AttrValue::Float(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

/// Attribute name to scalar value mapping. Insertion order is irrelevant to
/// the protocol; a BTreeMap keeps iteration deterministic.
pub type AttributeMap = BTreeMap<String, AttrValue>;

/// First-class node attribute names. `size`, `x` and `y` are conventional
/// extras consumers also understand, but only these are part of the format.
pub const NODE_PROPERTIES: &[&str] = &["label", "r", "g", "b"];

/// First-class edge attribute names. `source`, `target` and `directed` are
/// structural: the codec lifts them out of the generic attribute map.
pub const EDGE_PROPERTIES: &[&str] = &["source", "target", "directed", "label", "r", "g", "b"];

/// Edge payload keys that describe topology rather than appearance.
pub const EDGE_STRUCTURAL_KEYS: &[&str] = &["source", "target", "directed"];

/// Whether `name` is a first-class node attribute.
pub fn is_node_property(name: &str) -> bool {
    NODE_PROPERTIES.contains(&name)
}

/// Whether `name` is a first-class edge attribute.
pub fn is_edge_property(name: &str) -> bool {
    EDGE_PROPERTIES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_serialization() {
        assert_eq!(serde_json::to_string(&AttrValue::Text("a".into())).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&AttrValue::Int(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&AttrValue::Float(0.5)).unwrap(), "0.5");
        assert_eq!(serde_json::to_string(&AttrValue::Flag(true)).unwrap(), "true");
    }

    #[test]
    fn test_integer_survives_round_trip() {
        let v: AttrValue = serde_json::from_str("5").unwrap();
        assert_eq!(v, AttrValue::Int(5));

        let v: AttrValue = serde_json::from_str("0.329").unwrap();
        assert_eq!(v, AttrValue::Float(0.329));
    }

    #[test]
    fn test_reserved_tables() {
        assert!(is_node_property("label"));
        assert!(is_node_property("r"));
        assert!(!is_node_property("size"));
        assert!(!is_node_property("weight"));

        assert!(is_edge_property("directed"));
        assert!(is_edge_property("source"));
        assert!(!is_edge_property("weight"));
    }

    #[test]
    fn test_as_number_widens_int() {
        assert_eq!(AttrValue::Int(3).as_number(), Some(3.0));
        assert_eq!(AttrValue::Float(2.5).as_number(), Some(2.5));
        assert_eq!(AttrValue::Text("3".into()).as_number(), None);
    }
}
