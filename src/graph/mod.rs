//! In-memory graph state: model, layout, filtering and selection.
//!
//! ## Module Structure
//!
//! - `model` - current graph and original snapshot
//! - `layout` - circular / sphere / random placement
//! - `filter` - connection-count, type and label filtering
//! - `selection` - selected node ids
//! - `workspace` - the aggregate that ties them together

pub mod filter;
pub mod layout;
pub mod model;
pub mod selection;
pub mod workspace;

pub use filter::{connection_counts, FilterPredicate};
pub use layout::{LayoutEngine, LayoutKind};
pub use model::{sanitize, GraphModel, LoadReport};
pub use selection::{SelectionState, Toggle};
pub use workspace::{LoadStatus, LoadTicket, Workspace};
