use crate::ui::mvi::Reducer;
use crate::ui::picker::intent::PickerIntent;
use crate::ui::picker::state::{Picked, PickerDialogState};

pub struct PickerReducer;

impl Reducer for PickerReducer {
    type State = PickerDialogState;
    type Intent = PickerIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PickerIntent::Open { field, idtype } => PickerDialogState::Visible {
                field,
                idtype,
                query: String::new(),
                loading: false,
                results: Vec::new(),
                focused: 0,
                picked: None,
            },
            PickerIntent::Close => PickerDialogState::Hidden,
            PickerIntent::Input(ch) => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    mut query,
                    results,
                    focused,
                    loading,
                    picked,
                } => {
                    query.push(ch);
                    PickerDialogState::Visible {
                        field,
                        idtype,
                        query,
                        results,
                        focused,
                        loading,
                        picked,
                    }
                }
                other => other,
            },
            PickerIntent::Backspace => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    mut query,
                    results,
                    focused,
                    loading,
                    picked,
                } => {
                    query.pop();
                    // An emptied query means empty results, no fetch.
                    let results = if query.is_empty() { Vec::new() } else { results };
                    PickerDialogState::Visible {
                        field,
                        idtype,
                        query,
                        results,
                        focused: 0,
                        loading,
                        picked,
                    }
                }
                other => other,
            },
            PickerIntent::Loading => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    picked,
                    ..
                } => PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    loading: true,
                    picked,
                },
                other => other,
            },
            PickerIntent::Results(results) => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    picked,
                    ..
                } => PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused: 0,
                    loading: false,
                    picked,
                },
                other => other,
            },
            PickerIntent::MoveUp => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    loading,
                    picked,
                } => {
                    let focused = focused.saturating_sub(1);
                    PickerDialogState::Visible {
                        field,
                        idtype,
                        query,
                        results,
                        focused,
                        loading,
                        picked,
                    }
                }
                other => other,
            },
            PickerIntent::MoveDown => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    loading,
                    picked,
                } => {
                    let focused = (focused + 1).min(results.len().saturating_sub(1));
                    PickerDialogState::Visible {
                        field,
                        idtype,
                        query,
                        results,
                        focused,
                        loading,
                        picked,
                    }
                }
                other => other,
            },
            PickerIntent::Choose => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    loading,
                    ..
                } => {
                    let id = results.get(focused).and_then(|card| card.id);
                    let picked = id.map(|id| Picked {
                        field: field.clone(),
                        id: Some(id),
                    });
                    PickerDialogState::Visible {
                        field,
                        idtype,
                        query,
                        results,
                        focused,
                        loading,
                        picked,
                    }
                }
                other => other,
            },
            PickerIntent::Clear => match state {
                PickerDialogState::Visible {
                    field,
                    idtype,
                    query,
                    results,
                    focused,
                    loading,
                    ..
                } => PickerDialogState::Visible {
                    field: field.clone(),
                    idtype,
                    query,
                    results,
                    focused,
                    loading,
                    picked: Some(Picked { field, id: None }),
                },
                other => other,
            },
        }
    }
}
