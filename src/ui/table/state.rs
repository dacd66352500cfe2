use crate::data::SelectionSet;
use crate::ui::mvi::UiState;

/// Cursor, column focus and row selection for a collection table.
/// Row data itself lives in the collection provider; this state only
/// tracks what the table widget needs between renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableViewState {
    pub cursor: usize,
    pub focused_column: usize,
    /// When true, Enter toggles sort on the focused column instead of
    /// opening the focused cell.
    pub header_focused: bool,
    pub selection: SelectionSet,
    pub row_count: usize,
    pub column_count: usize,
}

impl UiState for TableViewState {}

impl TableViewState {
    pub fn clamped_cursor(&self) -> usize {
        self.cursor.min(self.row_count.saturating_sub(1))
    }
}
