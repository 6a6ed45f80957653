//! Dependency injection infrastructure.
//!
//! - `FromRef<T>`: extract a value from a reference to `T`
//! - `#[derive(Context)]`: makes each field of the root extractable via `FromRef`
//! - `#[derive(FromContext)]`: builds a service by resolving each of its fields
//!
//! ```ignore
//! #[derive(Context, Clone)]
//! pub struct Context {
//!     pub workspace: AppWorkspace,
//!     pub source: AppSource,
//! }
//!
//! #[derive(FromContext, Clone)]
//! pub struct GraphService {
//!     workspace: AppWorkspace, // resolved via FromRef<Context>
//!     source: AppSource,
//! }
//!
//! let service = GraphService::from_ref(&ctx);
//! ```

/// Extract `Self` from a reference to `T`.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}

pub use di_macros::{Context, FromContext};
