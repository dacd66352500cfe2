//! Data-context layer: state containers that cache one fetch each.
//!
//! Three provider flavors differ only in cardinality: one record
//! ([`DocumentState`]), one page ([`CollectionState`]), one reduced
//! projection ([`PreviewState`]). Nothing here performs I/O; providers
//! emit [`crate::api::ApiCommand`]s and consume completions, and every
//! completion is generation-checked.

mod collection;
mod debounce;
mod document;
mod key;
mod preview;
mod selection;

pub use collection::CollectionState;
pub use debounce::Debouncer;
pub use document::DocumentState;
pub use key::{needs_fetch, FetchKey};
pub use preview::PreviewState;
pub use selection::SelectionSet;
