//! Domain models for graph data.

mod graph;

pub use graph::{Edge, Graph, GraphMetadata, GraphSummary, Node, Position, Properties};
