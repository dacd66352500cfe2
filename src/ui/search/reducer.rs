use crate::ui::mvi::Reducer;
use crate::ui::search::intent::SearchIntent;
use crate::ui::search::state::SearchViewState;

pub struct SearchReducer;

impl Reducer for SearchReducer {
    type State = SearchViewState;
    type Intent = SearchIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            SearchIntent::Input(ch) => {
                let mut input = state.input;
                input.push(ch);
                SearchViewState { input, ..state }
            }
            SearchIntent::Backspace => {
                let mut input = state.input;
                input.pop();
                if input.is_empty() {
                    SearchViewState {
                        input,
                        groups: Vec::new(),
                        focused: None,
                        loading: false,
                        ..state
                    }
                } else {
                    SearchViewState { input, ..state }
                }
            }
            SearchIntent::Loading => SearchViewState {
                loading: true,
                ..state
            },
            SearchIntent::Results(groups) => {
                let focused = if groups.is_empty() { None } else { Some((0, 0)) };
                SearchViewState {
                    loading: false,
                    groups,
                    focused,
                    ..state
                }
            }
            SearchIntent::MoveUp => SearchViewState {
                focused: step_back(&state),
                ..state
            },
            SearchIntent::MoveDown => SearchViewState {
                focused: step_forward(&state),
                ..state
            },
            SearchIntent::Choose => {
                let chosen = state.focused.and_then(|(group, row)| {
                    let group = state.groups.get(group)?;
                    let id = group.results.get(row)?.id?;
                    Some((group.type_name.clone(), id))
                });
                SearchViewState { chosen, ..state }
            }
        }
    }
}

fn step_forward(state: &SearchViewState) -> Option<(usize, usize)> {
    let (group, row) = state.focused?;
    let current = state.groups.get(group)?;
    if row + 1 < current.results.len() {
        return Some((group, row + 1));
    }
    if group + 1 < state.groups.len() {
        return Some((group + 1, 0));
    }
    Some((group, row))
}

fn step_back(state: &SearchViewState) -> Option<(usize, usize)> {
    let (group, row) = state.focused?;
    if row > 0 {
        return Some((group, row - 1));
    }
    if group > 0 {
        let previous = state.groups.get(group - 1)?;
        return Some((group - 1, previous.results.len().saturating_sub(1)));
    }
    Some((group, row))
}
