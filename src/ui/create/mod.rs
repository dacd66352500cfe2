//! Object-creation sidebar.

mod intent;
mod reducer;
mod state;

pub use intent::CreateIntent;
pub use reducer::CreateReducer;
pub use state::{creation_fields, CreateField, CreateSidebarState};
