//! Event producers
//!
//! Producers drive the hub at their own pace: a random churn generator for
//! demos and load, and a replay pipeline that streams a recorded event log.

mod random;
mod replay;

pub use random::RandomChurn;
pub use replay::{replay_file, ReplayOptions};

use crate::types::{AttrValue, AttributeMap};

/// Default attributes for nodes a producer discovers on the fly: small and
/// steel-blue, colors as floats in [0,1].
pub fn default_node_attrs(label: &str) -> AttributeMap {
    let mut attrs = AttributeMap::new();
    attrs.insert("label".to_string(), AttrValue::Text(label.to_string()));
    attrs.insert("size".to_string(), AttrValue::Int(5));
    attrs.insert("r".to_string(), AttrValue::Float(84.0 / 255.0));
    attrs.insert("g".to_string(), AttrValue::Float(148.0 / 255.0));
    attrs.insert("b".to_string(), AttrValue::Float(183.0 / 255.0));
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attrs_are_unit_range_floats() {
        let attrs = default_node_attrs("n1");
        assert_eq!(attrs.get("label").unwrap().as_text(), Some("n1"));
        for channel in ["r", "g", "b"] {
            let value = attrs.get(channel).unwrap().as_number().unwrap();
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
