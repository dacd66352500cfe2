use serde_json::Value;

use crate::ui::form::intent::FormIntent;
use crate::ui::form::state::{FieldEditor, FormState};
use crate::ui::mvi::Reducer;

pub struct FormReducer;

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::Load { fields } => FormState {
                fields,
                ..FormState::default()
            },
            FormIntent::FocusUp => {
                if state.editor.is_some() || state.fields.is_empty() {
                    return state;
                }
                let focused = if state.focused == 0 {
                    state.fields.len() - 1
                } else {
                    state.focused - 1
                };
                FormState { focused, ..state }
            }
            FormIntent::FocusDown => {
                if state.editor.is_some() || state.fields.is_empty() {
                    return state;
                }
                let focused = (state.focused + 1) % state.fields.len();
                FormState { focused, ..state }
            }
            FormIntent::OpenText { field, current } => FormState {
                editor: Some(FieldEditor::Text {
                    field,
                    buffer: current,
                }),
                ..state
            },
            FormIntent::OpenList { field, items } => FormState {
                editor: Some(FieldEditor::List {
                    field,
                    items,
                    input: String::new(),
                    cursor: 0,
                }),
                ..state
            },
            FormIntent::OpenJson { field, text } => FormState {
                editor: Some(FieldEditor::Json {
                    field,
                    text,
                    error: None,
                }),
                ..state
            },
            FormIntent::Input(ch) => map_editor(state, |editor| match editor {
                FieldEditor::Text { field, mut buffer } => {
                    buffer.push(ch);
                    FieldEditor::Text { field, buffer }
                }
                FieldEditor::List {
                    field,
                    items,
                    mut input,
                    cursor,
                } => {
                    input.push(ch);
                    FieldEditor::List {
                        field,
                        items,
                        input,
                        cursor,
                    }
                }
                FieldEditor::Json {
                    field, mut text, ..
                } => {
                    text.push(ch);
                    // Typing invalidates the previous parse error.
                    FieldEditor::Json {
                        field,
                        text,
                        error: None,
                    }
                }
            }),
            FormIntent::Backspace => map_editor(state, |editor| match editor {
                FieldEditor::Text { field, mut buffer } => {
                    buffer.pop();
                    FieldEditor::Text { field, buffer }
                }
                FieldEditor::List {
                    field,
                    items,
                    mut input,
                    cursor,
                } => {
                    input.pop();
                    FieldEditor::List {
                        field,
                        items,
                        input,
                        cursor,
                    }
                }
                FieldEditor::Json {
                    field, mut text, ..
                } => {
                    text.pop();
                    FieldEditor::Json {
                        field,
                        text,
                        error: None,
                    }
                }
            }),
            FormIntent::ListAppend => map_editor(state, |editor| match editor {
                FieldEditor::List {
                    field,
                    mut items,
                    input,
                    cursor,
                } => {
                    if input.is_empty() {
                        FieldEditor::List {
                            field,
                            items,
                            input,
                            cursor,
                        }
                    } else {
                        items.push(input);
                        FieldEditor::List {
                            field,
                            items,
                            input: String::new(),
                            cursor,
                        }
                    }
                }
                other => other,
            }),
            FormIntent::ListRemove => map_editor(state, |editor| match editor {
                FieldEditor::List {
                    field,
                    mut items,
                    input,
                    cursor,
                } => {
                    if cursor < items.len() {
                        items.remove(cursor);
                    }
                    let cursor = cursor.min(items.len().saturating_sub(1));
                    FieldEditor::List {
                        field,
                        items,
                        input,
                        cursor,
                    }
                }
                other => other,
            }),
            FormIntent::ListUp => map_editor(state, |editor| match editor {
                FieldEditor::List {
                    field,
                    items,
                    input,
                    cursor,
                } => {
                    let cursor = cursor.saturating_sub(1);
                    FieldEditor::List {
                        field,
                        items,
                        input,
                        cursor,
                    }
                }
                other => other,
            }),
            FormIntent::ListDown => map_editor(state, |editor| match editor {
                FieldEditor::List {
                    field,
                    items,
                    input,
                    cursor,
                } => {
                    let cursor = (cursor + 1).min(items.len().saturating_sub(1));
                    FieldEditor::List {
                        field,
                        items,
                        input,
                        cursor,
                    }
                }
                other => other,
            }),
            FormIntent::Commit => commit(state),
            FormIntent::Cancel => FormState {
                editor: None,
                ..state
            },
        }
    }
}

fn map_editor(state: FormState, f: impl FnOnce(FieldEditor) -> FieldEditor) -> FormState {
    match state.editor {
        Some(editor) => FormState {
            editor: Some(f(editor)),
            ..state
        },
        None => state,
    }
}

fn commit(state: FormState) -> FormState {
    let Some(editor) = state.editor else {
        return state;
    };

    match editor {
        FieldEditor::Text { field, buffer } => FormState {
            editor: None,
            committed: Some((field, Value::String(buffer))),
            ..state
        },
        FieldEditor::List { field, items, .. } => {
            let list = items.into_iter().map(Value::String).collect();
            FormState {
                editor: None,
                committed: Some((field, Value::Array(list))),
                ..state
            }
        }
        FieldEditor::Json { field, text, .. } => match serde_json::from_str::<Value>(&text) {
            Ok(value) => FormState {
                editor: None,
                committed: Some((field, value)),
                ..state
            },
            // Parse failures are surfaced, not swallowed: stay open with
            // the error visible next to the field.
            Err(err) => FormState {
                editor: Some(FieldEditor::Json {
                    field,
                    text,
                    error: Some(err.to_string()),
                }),
                ..state
            },
        },
    }
}
