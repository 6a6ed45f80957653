//! Compile-time dependency injection derives for graphsphere.
//!
//! - `#[derive(Context)]` turns every field of a composition root into
//!   something a service can ask for.
//! - `#[derive(FromContext)]` builds a service by asking the root for each of
//!   its fields.
//!
//! Generated code refers to `crate::FromRef`, so the consuming crate must
//! expose the trait at its root.

use proc_macro::TokenStream;

mod context;
mod fields;
mod from_context;

/// Derive `FromRef<Root>` for the type of every field of `Root`.
///
/// Every field type must be `Clone`; the root itself should be `Clone` too.
///
/// ```ignore
/// #[derive(Context, Clone)]
/// pub struct Context {
///     pub workspace: AppWorkspace,
///     pub config: Arc<Config>,
/// }
///
/// // impl FromRef<Context> for AppWorkspace { ... }
/// // impl FromRef<Context> for Arc<Config> { ... }
/// ```
#[proc_macro_derive(Context)]
pub fn derive_context(input: TokenStream) -> TokenStream {
    context::derive_context_impl(input)
}

/// Derive `FromRef<Context>` for a service whose fields can all be pulled
/// out of the root.
///
/// The root type defaults to `Context`. Use
/// `#[from_context(Context = "OtherRoot")]` to target a different one.
///
/// ```ignore
/// #[derive(FromContext, Clone)]
/// pub struct GraphService {
///     source: AppSource,
///     workspace: AppWorkspace,
/// }
/// ```
#[proc_macro_derive(FromContext, attributes(from_context))]
pub fn derive_from_context(input: TokenStream) -> TokenStream {
    from_context::derive_from_context_impl(input)
}
