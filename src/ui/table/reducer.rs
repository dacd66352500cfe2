use crate::ui::mvi::Reducer;
use crate::ui::table::intent::TableIntent;
use crate::ui::table::state::TableViewState;

pub struct TableReducer;

impl Reducer for TableReducer {
    type State = TableViewState;
    type Intent = TableIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TableIntent::Sync {
                row_count,
                column_count,
            } => TableViewState {
                row_count,
                column_count,
                cursor: state.cursor.min(row_count.saturating_sub(1)),
                focused_column: state.focused_column.min(column_count.saturating_sub(1)),
                ..state
            },
            TableIntent::CursorUp => {
                if state.header_focused {
                    return state;
                }
                if state.cursor == 0 {
                    TableViewState {
                        header_focused: true,
                        ..state
                    }
                } else {
                    TableViewState {
                        cursor: state.cursor - 1,
                        ..state
                    }
                }
            }
            TableIntent::CursorDown => {
                if state.header_focused {
                    return TableViewState {
                        header_focused: false,
                        ..state
                    };
                }
                let last = state.row_count.saturating_sub(1);
                TableViewState {
                    cursor: (state.cursor + 1).min(last),
                    ..state
                }
            }
            TableIntent::ColumnLeft => TableViewState {
                focused_column: state.focused_column.saturating_sub(1),
                ..state
            },
            TableIntent::ColumnRight => {
                let last = state.column_count.saturating_sub(1);
                TableViewState {
                    focused_column: (state.focused_column + 1).min(last),
                    ..state
                }
            }
            TableIntent::ToggleSelect(ids) => {
                let mut selection = state.selection;
                selection.toggle(&ids);
                TableViewState { selection, ..state }
            }
            TableIntent::ClearSelection => {
                let mut selection = state.selection;
                selection.clear();
                TableViewState { selection, ..state }
            }
            TableIntent::Reset => TableViewState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(rows: usize, columns: usize) -> TableViewState {
        TableReducer::reduce(
            TableViewState::default(),
            TableIntent::Sync {
                row_count: rows,
                column_count: columns,
            },
        )
    }

    #[test]
    fn cursor_stays_inside_rows() {
        let mut state = sized(2, 3);
        state = TableReducer::reduce(state, TableIntent::CursorDown);
        state = TableReducer::reduce(state, TableIntent::CursorDown);
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn cursor_up_from_first_row_reaches_header() {
        let state = TableReducer::reduce(sized(2, 3), TableIntent::CursorUp);
        assert!(state.header_focused);
    }

    #[test]
    fn toggle_select_is_xor() {
        let state = sized(3, 2);
        let state = TableReducer::reduce(state, TableIntent::ToggleSelect(vec![4]));
        assert!(state.selection.contains(4));
        let state = TableReducer::reduce(state, TableIntent::ToggleSelect(vec![4]));
        assert!(!state.selection.contains(4));
    }

    #[test]
    fn sync_clamps_cursor_after_shrink() {
        let mut state = sized(5, 2);
        state.cursor = 4;
        let state = TableReducer::reduce(
            state,
            TableIntent::Sync {
                row_count: 2,
                column_count: 2,
            },
        );
        assert_eq!(state.cursor, 1);
    }
}
