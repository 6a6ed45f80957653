//! graphsphere - 3D graph exploration client core
//!
//! Loads graphs from a graph API or local files, lays them out in 3D, filters
//! them against the originally loaded snapshot and shares changes with
//! collaborators.

pub mod cli;
pub mod collab;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod export;
pub mod graph;
pub mod import;
pub mod models;
pub mod presentation;
pub mod services;
pub mod source;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
