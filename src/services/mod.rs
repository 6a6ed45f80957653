//! Services orchestrating graph sources and the workspace.
//!
//! Services are built from the [`Context`](crate::context::Context) with the
//! `FromContext` derive.

mod graph;

pub use graph::GraphService;
