//! Wire codec for graph mutation events
//!
//! One event per line, one JSON object per event. The object carries exactly
//! one of the six keys `an, cn, dn, ae, ce, de` mapping the target id to its
//! payload, plus an optional top-level `t` timestamp:
//!
//! ```text
//! {"an": {"A": {"label": "A", "size": 5}}}
//! {"ae": {"e1": {"source": "A", "target": "B", "directed": true}}, "t": 12}
//! {"dn": {"A": {}}}
//! ```
//!
//! The literal payload `{"dn": {"filter": "ALL"}}` is the clear-graph control
//! event, not a deletion of a node named "filter". Attribute values travel
//! opaquely; in particular the codec never rescales `r`/`g`/`b` colors.

use serde_json::{Map, Number, Value};

use super::error::{ProtocolError, ProtocolResult};
use crate::types::{AttrValue, AttributeMap, GraphEvent};

/// The recognized top-level event keys, in wire order.
const EVENT_KEYS: &[&str] = &["an", "cn", "dn", "ae", "ce", "de"];

/// Encode one event as a self-delimited JSON object (no trailing newline).
pub fn encode(event: &GraphEvent) -> ProtocolResult<String> {
    let (key, id, payload): (&str, &str, Value) = match event {
        GraphEvent::AddNode { id, attrs, .. } => ("an", id, attrs_to_value(attrs)?),
        GraphEvent::ChangeNode { id, attrs, .. } => ("cn", id, attrs_to_value(attrs)?),
        GraphEvent::DeleteNode { id, .. } => ("dn", id, Value::Object(Map::new())),
        GraphEvent::AddEdge {
            id,
            source,
            target,
            directed,
            attrs,
            ..
        } => {
            // The structural fields live beside the generic attributes in the
            // payload, so an attribute reusing one of their names would be
            // silently clobbered here. Reject it instead.
            for key in crate::types::EDGE_STRUCTURAL_KEYS {
                if attrs.contains_key(*key) {
                    return Err(ProtocolError::MalformedEvent(format!(
                        "edge attribute '{}' collides with a structural field",
                        key
                    )));
                }
            }
            let mut payload = match attrs_to_value(attrs)? {
                Value::Object(map) => map,
                _ => unreachable!("attribute maps encode as objects"),
            };
            payload.insert("source".to_string(), Value::String(source.clone()));
            payload.insert("target".to_string(), Value::String(target.clone()));
            payload.insert("directed".to_string(), Value::Bool(*directed));
            ("ae", id, Value::Object(payload))
        }
        GraphEvent::ChangeEdge { id, attrs, .. } => ("ce", id, attrs_to_value(attrs)?),
        GraphEvent::DeleteEdge { id, .. } => ("de", id, Value::Object(Map::new())),
        GraphEvent::Clear { .. } => ("dn", "filter", Value::String("ALL".to_string())),
    };

    let mut inner = Map::new();
    inner.insert(id.to_string(), payload);

    let mut root = Map::new();
    root.insert(key.to_string(), Value::Object(inner));
    if let Some(t) = event.timestamp() {
        let number = Number::from_f64(t)
            .ok_or_else(|| ProtocolError::MalformedEvent("non-finite timestamp".to_string()))?;
        root.insert("t".to_string(), Value::Number(number));
    }

    Ok(serde_json::to_string(&Value::Object(root))?)
}

/// Decode one line into an event.
///
/// Fails if the line is not valid JSON, carries none or more than one of the
/// recognized event keys, or has a payload the format does not allow. The
/// source producers emit one id per line, so multi-id payload maps are
/// rejected as malformed.
pub fn decode(line: &str) -> ProtocolResult<GraphEvent> {
    let value: Value = serde_json::from_str(line)?;
    let root = value
        .as_object()
        .ok_or_else(|| malformed("event is not a JSON object"))?;

    let mut found = EVENT_KEYS.iter().filter(|k| root.contains_key(**k));
    let key = match (found.next(), found.next()) {
        (Some(key), None) => *key,
        (None, _) => return Err(malformed("no recognized event key")),
        (Some(_), Some(_)) => return Err(malformed("more than one event key")),
    };

    let t = match root.get("t") {
        None => None,
        Some(v) => Some(
            v.as_f64()
                .ok_or_else(|| malformed("timestamp is not a number"))?,
        ),
    };

    let inner = root[key]
        .as_object()
        .ok_or_else(|| malformed("event payload is not an object"))?;
    if inner.len() != 1 {
        return Err(malformed("event payload must carry exactly one id"));
    }
    let (id, body) = inner.iter().next().expect("len checked above");

    // The clear control event hides behind the dn key with a string payload.
    if key == "dn" && id == "filter" && body.as_str() == Some("ALL") {
        return Ok(GraphEvent::Clear { t });
    }

    let body = body
        .as_object()
        .ok_or_else(|| malformed("id payload is not an object"))?;

    let event = match key {
        "an" => GraphEvent::AddNode {
            id: id.clone(),
            attrs: value_to_attrs(body)?,
            t,
        },
        "cn" => GraphEvent::ChangeNode {
            id: id.clone(),
            attrs: value_to_attrs(body)?,
            t,
        },
        "dn" => GraphEvent::DeleteNode { id: id.clone(), t },
        "ae" => {
            let source = required_string(body, "source")?;
            let target = required_string(body, "target")?;
            let directed = match body.get("directed") {
                None => false,
                Some(Value::Bool(b)) => *b,
                Some(_) => return Err(malformed("directed flag is not a boolean")),
            };
            let mut attrs = AttributeMap::new();
            for (name, value) in body {
                if crate::types::EDGE_STRUCTURAL_KEYS.contains(&name.as_str()) {
                    continue;
                }
                attrs.insert(name.clone(), value_to_attr(name, value)?);
            }
            GraphEvent::AddEdge {
                id: id.clone(),
                source,
                target,
                directed,
                attrs,
                t,
            }
        }
        "ce" => GraphEvent::ChangeEdge {
            id: id.clone(),
            attrs: value_to_attrs(body)?,
            t,
        },
        "de" => GraphEvent::DeleteEdge { id: id.clone(), t },
        _ => unreachable!("key comes from EVENT_KEYS"),
    };

    Ok(event)
}

fn malformed(msg: &str) -> ProtocolError {
    ProtocolError::MalformedEvent(msg.to_string())
}

fn attrs_to_value(attrs: &AttributeMap) -> ProtocolResult<Value> {
    Ok(serde_json::to_value(attrs)?)
}

fn value_to_attrs(body: &Map<String, Value>) -> ProtocolResult<AttributeMap> {
    let mut attrs = AttributeMap::new();
    for (name, value) in body {
        attrs.insert(name.clone(), value_to_attr(name, value)?);
    }
    Ok(attrs)
}

fn value_to_attr(name: &str, value: &Value) -> ProtocolResult<AttrValue> {
    serde_json::from_value(value.clone()).map_err(|_| {
        ProtocolError::MalformedEvent(format!("attribute '{}' is not a scalar value", name))
    })
}

fn required_string(body: &Map<String, Value>, field: &str) -> ProtocolResult<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| ProtocolError::MalformedEvent(format!("edge is missing '{}'", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributeMap;

    fn attrs(pairs: &[(&str, AttrValue)]) -> AttributeMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_encode_add_node() {
        let event = GraphEvent::AddNode {
            id: "A".to_string(),
            attrs: attrs(&[
                ("label", AttrValue::Text("A".to_string())),
                ("size", AttrValue::Int(5)),
            ]),
            t: None,
        };
        assert_eq!(
            encode(&event).unwrap(),
            r#"{"an":{"A":{"label":"A","size":5}}}"#
        );
    }

    #[test]
    fn test_encode_delete_node_with_timestamp() {
        let event = GraphEvent::DeleteNode {
            id: "A".to_string(),
            t: Some(12.5),
        };
        assert_eq!(encode(&event).unwrap(), r#"{"dn":{"A":{}},"t":12.5}"#);
    }

    #[test]
    fn test_encode_clear() {
        let event = GraphEvent::Clear { t: None };
        assert_eq!(encode(&event).unwrap(), r#"{"dn":{"filter":"ALL"}}"#);
    }

    #[test]
    fn test_decode_add_edge_defaults_to_undirected() {
        let event = decode(r#"{"ae":{"e1":{"source":"A","target":"B"}}}"#).unwrap();
        match event {
            GraphEvent::AddEdge {
                id,
                source,
                target,
                directed,
                attrs,
                t,
            } => {
                assert_eq!(id, "e1");
                assert_eq!(source, "A");
                assert_eq!(target, "B");
                assert!(!directed);
                assert!(attrs.is_empty());
                assert_eq!(t, None);
            }
            other => panic!("expected AddEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_edge_lifts_structural_keys() {
        let line = r#"{"ae":{"e1":{"source":"A","target":"B","directed":true,"weight":2.0}}}"#;
        let event = decode(line).unwrap();
        match event {
            GraphEvent::AddEdge {
                directed, attrs, ..
            } => {
                assert!(directed);
                assert_eq!(attrs.get("weight"), Some(&AttrValue::Float(2.0)));
                assert!(!attrs.contains_key("source"));
                assert!(!attrs.contains_key("target"));
            }
            other => panic!("expected AddEdge, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_clear_control_value() {
        let event = decode(r#"{"dn":{"filter":"ALL"}}"#).unwrap();
        assert_eq!(event, GraphEvent::Clear { t: None });
    }

    #[test]
    fn test_decode_literal_filter_node_deletion() {
        // An object payload is a real deletion even for the id "filter".
        let event = decode(r#"{"dn":{"filter":{}}}"#).unwrap();
        assert_eq!(
            event,
            GraphEvent::DeleteNode {
                id: "filter".to_string(),
                t: None,
            }
        );
    }

    #[test]
    fn test_decode_rejects_bad_lines() {
        assert!(matches!(decode("not json"), Err(ProtocolError::Json(_))));
        assert!(matches!(
            decode(r#"{"xx":{"A":{}}}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode(r#"{"an":{"A":{}},"dn":{"B":{}}}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode(r#"{"an":{"A":{},"B":{}}}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode(r#"{"ae":{"e1":{"source":"A"}}}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode(r#"{"an":{"A":{"pos":[1,2]}}}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
        assert!(matches!(
            decode(r#"{"an":{"A":{}},"t":"noon"}"#),
            Err(ProtocolError::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_encode_rejects_structural_attr_collision() {
        let event = GraphEvent::AddEdge {
            id: "e1".to_string(),
            source: "A".to_string(),
            target: "B".to_string(),
            directed: false,
            attrs: attrs(&[("source", AttrValue::Text("X".to_string()))]),
            t: None,
        };
        assert!(matches!(
            encode(&event),
            Err(ProtocolError::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_round_trip_all_kinds() {
        let node_attrs = attrs(&[
            ("label", AttrValue::Text("node a".to_string())),
            ("r", AttrValue::Float(84.0 / 255.0)),
            ("size", AttrValue::Int(5)),
            ("visible", AttrValue::Flag(true)),
        ]);
        let edge_attrs = attrs(&[("weight", AttrValue::Float(2.0))]);

        let events = vec![
            GraphEvent::AddNode {
                id: "A".to_string(),
                attrs: node_attrs.clone(),
                t: Some(1.0),
            },
            GraphEvent::ChangeNode {
                id: "A".to_string(),
                attrs: node_attrs,
                t: None,
            },
            GraphEvent::DeleteNode {
                id: "A".to_string(),
                t: Some(2.0),
            },
            GraphEvent::AddEdge {
                id: "e1".to_string(),
                source: "A".to_string(),
                target: "B".to_string(),
                directed: true,
                attrs: edge_attrs.clone(),
                t: Some(3.0),
            },
            GraphEvent::ChangeEdge {
                id: "e1".to_string(),
                attrs: edge_attrs,
                t: None,
            },
            GraphEvent::DeleteEdge {
                id: "e1".to_string(),
                t: None,
            },
            GraphEvent::Clear { t: Some(4.0) },
        ];

        for event in events {
            let line = encode(&event).unwrap();
            let decoded = decode(&line).unwrap();
            assert_eq!(decoded, event, "round trip failed for {}", line);
        }
    }
}
