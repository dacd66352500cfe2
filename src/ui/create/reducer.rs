use crate::ui::create::intent::CreateIntent;
use crate::ui::create::state::CreateSidebarState;
use crate::ui::mvi::Reducer;

pub struct CreateReducer;

impl Reducer for CreateReducer {
    type State = CreateSidebarState;
    type Intent = CreateIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CreateIntent::Open { type_name, fields } => CreateSidebarState::Visible {
                type_name,
                fields,
                focused: 0,
                submitting: false,
                errors: Default::default(),
            },
            CreateIntent::Close => CreateSidebarState::Hidden,
            CreateIntent::FocusUp => match state {
                CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    submitting,
                    errors,
                } => {
                    let focused = if focused == 0 {
                        fields.len().saturating_sub(1)
                    } else {
                        focused - 1
                    };
                    CreateSidebarState::Visible {
                        type_name,
                        fields,
                        focused,
                        submitting,
                        errors,
                    }
                }
                other => other,
            },
            CreateIntent::FocusDown => match state {
                CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    submitting,
                    errors,
                } => {
                    let focused = if fields.is_empty() {
                        0
                    } else {
                        (focused + 1) % fields.len()
                    };
                    CreateSidebarState::Visible {
                        type_name,
                        fields,
                        focused,
                        submitting,
                        errors,
                    }
                }
                other => other,
            },
            CreateIntent::Input(ch) => match state {
                CreateSidebarState::Visible {
                    type_name,
                    mut fields,
                    focused,
                    submitting,
                    errors,
                } => {
                    if let Some(field) = fields.get_mut(focused) {
                        field.value.push(ch);
                    }
                    CreateSidebarState::Visible {
                        type_name,
                        fields,
                        focused,
                        submitting,
                        errors,
                    }
                }
                other => other,
            },
            CreateIntent::Backspace => match state {
                CreateSidebarState::Visible {
                    type_name,
                    mut fields,
                    focused,
                    submitting,
                    errors,
                } => {
                    if let Some(field) = fields.get_mut(focused) {
                        field.value.pop();
                    }
                    CreateSidebarState::Visible {
                        type_name,
                        fields,
                        focused,
                        submitting,
                        errors,
                    }
                }
                other => other,
            },
            CreateIntent::Submitted => match state {
                CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    errors,
                    ..
                } => CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    submitting: true,
                    errors,
                },
                other => other,
            },
            CreateIntent::Rejected { errors } => match state {
                CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    ..
                } => CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    submitting: false,
                    errors,
                },
                other => other,
            },
            CreateIntent::Failed => match state {
                CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    errors,
                    ..
                } => CreateSidebarState::Visible {
                    type_name,
                    fields,
                    focused,
                    submitting: false,
                    errors,
                },
                other => other,
            },
        }
    }
}
