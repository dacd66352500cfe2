//! Base trait for intents in the MVI architecture.

/// Marker trait for intent objects: user actions, API completions, and
/// navigation events, consumed by reducers to produce new states.
pub trait Intent: Send + 'static {}
