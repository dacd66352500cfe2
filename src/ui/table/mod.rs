//! Sortable, paginated collection table.

mod columns;
mod intent;
mod reducer;
mod state;

pub use columns::{column_specs, default_columns, render_cell, ColumnSpec};
pub use intent::TableIntent;
pub use reducer::TableReducer;
pub use state::TableViewState;
