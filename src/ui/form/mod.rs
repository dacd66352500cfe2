//! Schema-driven field editors for the properties form.

mod intent;
mod reducer;
mod state;

pub use intent::FormIntent;
pub use reducer::FormReducer;
pub use state::{FieldEditor, FormState};
