use crate::ui::mvi::Intent;
use crate::ui::search::state::SearchGroup;

#[derive(Debug, Clone)]
pub enum SearchIntent {
    Input(char),
    Backspace,
    /// The debounced request went out.
    Loading,
    Results(Vec<SearchGroup>),
    MoveUp,
    MoveDown,
    /// Activate the focused result; the app drains `chosen`.
    Choose,
}

impl Intent for SearchIntent {}
