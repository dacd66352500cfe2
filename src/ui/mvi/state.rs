//! Base trait for UI state in the MVI architecture.

/// Marker trait for UI state objects.
///
/// States are immutable snapshots: cloned to derive the next state,
/// comparable to detect changes, and self-contained for rendering.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
