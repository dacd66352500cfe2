use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum TableIntent {
    /// Row/column counts changed after a fetch; clamps cursor and focus.
    Sync {
        row_count: usize,
        column_count: usize,
    },
    CursorUp,
    CursorDown,
    ColumnLeft,
    ColumnRight,
    /// XOR the given ids into the selection.
    ToggleSelect(Vec<i64>),
    ClearSelection,
    Reset,
}

impl Intent for TableIntent {}
