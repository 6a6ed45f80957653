//! JSON graph import.
//!
//! Accepted shapes:
//! - `{"nodes"|"vertices": [...], "edges"|"links": [...]}`
//! - `[{...}, {...}]`: a bare list of node objects, no edges

use serde_json::{Map, Value as JsonValue};

use crate::error::AppError;
use crate::models::{Edge, Graph, Node, Position, Properties};

const NODE_RESERVED: [&str; 3] = ["id", "label", "name"];
const EDGE_RESERVED: [&str; 4] = ["source", "target", "from", "to"];

/// Parse JSON text into a graph.
pub fn parse_json(content: &str) -> Result<Graph, AppError> {
    let data: JsonValue = serde_json::from_str(content)?;
    parse_value(&data)
}

/// Parse an already-decoded JSON value into a graph.
pub fn parse_value(data: &JsonValue) -> Result<Graph, AppError> {
    let mut graph = match data {
        JsonValue::Object(obj) if obj.contains_key("nodes") || obj.contains_key("vertices") => {
            let nodes = first_array(obj, &["nodes", "vertices"])
                .iter()
                .enumerate()
                .map(|(i, v)| node_from_value(i, v))
                .collect();
            let edges = first_array(obj, &["edges", "links"])
                .iter()
                .filter_map(edge_from_value)
                .collect();
            Graph::new(nodes, edges)
        }
        JsonValue::Array(items) => {
            let nodes = items
                .iter()
                .filter_map(JsonValue::as_object)
                .filter_map(node_from_record)
                .collect();
            Graph::new(nodes, Vec::new())
        }
        _ => {
            return Err(AppError::Validation(
                "Unrecognised JSON graph: expected an object with nodes/edges or a list of nodes"
                    .to_string(),
            ))
        }
    };

    graph.metadata.format = Some("json".to_string());
    Ok(graph)
}

fn first_array<'a>(obj: &'a Map<String, JsonValue>, keys: &[&str]) -> &'a [JsonValue] {
    keys.iter()
        .find_map(|k| obj.get(*k).and_then(JsonValue::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// String form of an id-like value; `None` for null.
fn id_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn first_string(obj: &Map<String, JsonValue>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| obj.get(*k).and_then(id_string))
}

fn node_from_value(index: usize, value: &JsonValue) -> Node {
    let Some(obj) = value.as_object() else {
        return id_string(value)
            .map(Node::new)
            .unwrap_or_else(|| Node::new(format!("node_{index}")));
    };

    let id = first_string(obj, &["id", "name"]).unwrap_or_else(|| format!("node_{index}"));
    let label = first_string(obj, &["label", "name"]).unwrap_or_else(|| id.clone());
    let properties = obj
        .iter()
        .filter(|(k, _)| !NODE_RESERVED.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    lift_known_fields(Node::new(id).with_label(label), properties)
}

/// List-of-records form: every key stays a property. Records with an empty id are skipped.
fn node_from_record(obj: &Map<String, JsonValue>) -> Option<Node> {
    let id = first_string(obj, &["id", "name"]).filter(|id| !id.is_empty())?;
    let label = first_string(obj, &["label", "name"]).unwrap_or_else(|| id.clone());
    let properties = obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    Some(lift_known_fields(Node::new(id).with_label(label), properties))
}

/// Move `type` and a well-formed `position` out of the property map.
fn lift_known_fields(mut node: Node, mut properties: Properties) -> Node {
    if let Some(JsonValue::String(kind)) = properties.get("type") {
        node.node_type = Some(kind.clone());
        properties.remove("type");
    }
    if let Some(position) = properties
        .get("position")
        .and_then(|p| serde_json::from_value::<Position>(p.clone()).ok())
    {
        node.position = Some(position);
        properties.remove("position");
    }
    node.properties = properties;
    node
}

fn edge_from_value(value: &JsonValue) -> Option<Edge> {
    let obj = value.as_object()?;
    let source = first_string(obj, &["source", "from"]);
    let target = first_string(obj, &["target", "to"]);
    let (Some(source), Some(target)) = (source, target) else {
        tracing::debug!("Skipping edge without endpoints: {}", value);
        return None;
    };

    let properties = obj
        .iter()
        .filter(|(k, _)| !EDGE_RESERVED.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(Edge {
        source,
        target,
        properties,
    })
}
