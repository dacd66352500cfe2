//! Model-View-Intent (MVI) primitives for the UI layer.
//!
//! Unidirectional data flow: intents (key presses, API completions) go
//! through a pure reducer to produce the next state, and the view renders
//! state alone.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
