//! Extension task submission screen.

mod intent;
mod reducer;
mod state;

pub use intent::TaskIntent;
pub use reducer::TaskReducer;
pub use state::{TaskField, TaskFormState};
