//! Graph models matching the graph API's JSON shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Property map attached to nodes and edges (string → JSON scalar).
pub type Properties = BTreeMap<String, JsonValue>;

/// Below this magnitude on every axis a position is treated as unassigned.
const UNPLACED_EPSILON: f64 = 0.01;

/// A point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// Origin.
    pub const ZERO: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether this position was actually placed (not sitting at the origin).
    pub fn is_placed(&self) -> bool {
        self.x.abs() > UNPLACED_EPSILON
            || self.y.abs() > UNPLACED_EPSILON
            || self.z.abs() > UNPLACED_EPSILON
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the graph.
    pub id: String,
    /// Display label. Empty means "use the id".
    #[serde(default)]
    pub label: String,
    /// Open type tag such as "server" or "database".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Assigned position, absent until a layout runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    /// Create a node whose label is its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            node_type: None,
            position: None,
            properties: Properties::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The node's type tag.
    ///
    /// Backends that normalise imports keep `type` inside the property map,
    /// so a string `type` property is used when the field itself is absent.
    pub fn kind(&self) -> Option<&str> {
        self.node_type
            .as_deref()
            .or_else(|| self.properties.get("type").and_then(JsonValue::as_str))
    }

    /// Label to display, falling back to the id.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    /// Whether the node has a usable (non-origin) position.
    pub fn has_position(&self) -> bool {
        self.position.is_some_and(|p| p.is_placed())
    }
}

/// A directed relation between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Counts and provenance carried alongside a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_count: Option<usize>,
    /// Import format ("csv", "json", "demo", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Set on filter results.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub filtered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_node_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_edge_count: Option<usize>,
    /// Edges dropped on load because an endpoint was missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropped_edges: Option<usize>,
    /// Anything else the source attached.
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// Nodes, edges and metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut graph = Self {
            nodes,
            edges,
            metadata: GraphMetadata::default(),
        };
        graph.refresh_counts();
        graph
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Bring `node_count` / `edge_count` in line with the sequences.
    pub fn refresh_counts(&mut self) {
        self.metadata.node_count = Some(self.nodes.len());
        self.metadata.edge_count = Some(self.edges.len());
    }

    /// Distinct node types, sorted.
    pub fn node_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .nodes
            .iter()
            .filter_map(|n| n.kind().map(str::to_string))
            .collect();
        types.sort();
        types.dedup();
        types
    }

    /// Centroid and radius of the sphere enclosing all placed nodes.
    pub fn bounding_sphere(&self) -> (Position, f64) {
        let placed: Vec<Position> = self.nodes.iter().filter_map(|n| n.position).collect();
        if placed.is_empty() {
            return (Position::ZERO, 1.0);
        }

        let count = placed.len() as f64;
        let center = Position::new(
            placed.iter().map(|p| p.x).sum::<f64>() / count,
            placed.iter().map(|p| p.y).sum::<f64>() / count,
            placed.iter().map(|p| p.z).sum::<f64>() / count,
        );
        let radius = placed
            .iter()
            .map(|p| p.distance(&center))
            .fold(0.0_f64, f64::max);

        (center, radius)
    }
}

/// Summary of a stored graph as listed by the graph API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub id: String,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_deserializes_backend_shape() {
        let node: Node = serde_json::from_value(json!({
            "id": "db-1",
            "label": "Primary DB",
            "position": {"x": 1.0, "y": 2.0, "z": 3.0},
            "properties": {"type": "database", "replicas": 2}
        }))
        .unwrap();

        assert_eq!(node.display_label(), "Primary DB");
        assert_eq!(node.kind(), Some("database"));
        assert_eq!(node.position, Some(Position::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_explicit_type_wins_over_property() {
        let node = Node::new("a")
            .with_type("server")
            .with_property("type", "api");
        assert_eq!(node.kind(), Some("server"));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "server");
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let node: Node = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(node.display_label(), "x");
    }

    #[test]
    fn test_origin_position_is_not_placed() {
        assert!(!Position::ZERO.is_placed());
        assert!(!Position::new(0.005, -0.009, 0.0).is_placed());
        assert!(Position::new(0.0, 0.0, 0.5).is_placed());
        assert!(!Node::new("a").with_position(Position::ZERO).has_position());
    }

    #[test]
    fn test_metadata_keeps_unknown_keys() {
        let graph: Graph = serde_json::from_value(json!({
            "nodes": [],
            "edges": [],
            "metadata": {"node_count": 0, "format": "csv", "source_file": "a.csv"}
        }))
        .unwrap();

        assert_eq!(graph.metadata.format.as_deref(), Some("csv"));
        assert_eq!(graph.metadata.extra["source_file"], "a.csv");
        assert!(!graph.metadata.filtered);
    }

    #[test]
    fn test_node_types_sorted_and_unique() {
        let graph = Graph::new(
            vec![
                Node::new("a").with_type("service"),
                Node::new("b").with_type("api"),
                Node::new("c").with_type("service"),
                Node::new("d"),
            ],
            vec![],
        );
        assert_eq!(graph.node_types(), vec!["api", "service"]);
    }

    #[test]
    fn test_bounding_sphere() {
        let graph = Graph::new(
            vec![
                Node::new("a").with_position(Position::new(-2.0, 0.0, 0.0)),
                Node::new("b").with_position(Position::new(2.0, 0.0, 0.0)),
            ],
            vec![],
        );
        let (center, radius) = graph.bounding_sphere();
        assert_eq!(center, Position::ZERO);
        assert!((radius - 2.0).abs() < 1e-9);
    }
}
