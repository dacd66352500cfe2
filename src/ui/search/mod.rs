//! Quick-search screen with grouped results.

mod intent;
mod reducer;
mod state;

pub use intent::SearchIntent;
pub use reducer::SearchReducer;
pub use state::{groups_from_response, SearchGroup, SearchViewState};
