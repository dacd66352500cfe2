use crate::ui::mvi::Reducer;
use crate::ui::tasks::intent::TaskIntent;
use crate::ui::tasks::state::{TaskField, TaskFormState};

pub struct TaskReducer;

impl Reducer for TaskReducer {
    type State = TaskFormState;
    type Intent = TaskIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            TaskIntent::FocusNext => TaskFormState {
                focused: state.focused.next(),
                ..state
            },
            TaskIntent::FocusPrevious => TaskFormState {
                focused: state.focused.previous(),
                ..state
            },
            TaskIntent::Input(ch) => {
                let mut state = state;
                match state.focused {
                    TaskField::Extension => {}
                    TaskField::Action => state.action.push(ch),
                    TaskField::Params => state.params_text.push(ch),
                }
                state
            }
            TaskIntent::Backspace => {
                let mut state = state;
                match state.focused {
                    TaskField::Extension => state.ext_id = None,
                    TaskField::Action => {
                        state.action.pop();
                    }
                    TaskField::Params => {
                        state.params_text.pop();
                    }
                }
                state
            }
            TaskIntent::SetExtension(ext_id) => TaskFormState { ext_id, ..state },
            TaskIntent::Submit => {
                if state.submitting {
                    return state;
                }
                match state.build_submission() {
                    Ok(submission) => TaskFormState {
                        submitting: true,
                        submission: Some(submission),
                        field_errors: Default::default(),
                        ..state
                    },
                    Err(errors) => TaskFormState {
                        field_errors: errors,
                        ..state
                    },
                }
            }
            TaskIntent::ClearSubmission => TaskFormState {
                submission: None,
                ..state
            },
            TaskIntent::Accepted { message_id } => {
                let mut receipts = state.receipts;
                receipts.push(message_id);
                TaskFormState {
                    submitting: false,
                    receipts,
                    field_errors: Default::default(),
                    ..state
                }
            }
            TaskIntent::Rejected { errors } => TaskFormState {
                submitting: false,
                field_errors: errors,
                ..state
            },
            TaskIntent::Failed { message } => {
                let mut errors = state.errors;
                errors.push(message);
                TaskFormState {
                    submitting: false,
                    errors,
                    ..state
                }
            }
            TaskIntent::DismissError(index) => {
                let mut errors = state.errors;
                if index < errors.len() {
                    errors.remove(index);
                }
                TaskFormState { errors, ..state }
            }
            TaskIntent::DismissReceipt(index) => {
                let mut receipts = state.receipts;
                if index < receipts.len() {
                    receipts.remove(index);
                }
                TaskFormState { receipts, ..state }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TaskFormState {
        TaskFormState {
            ext_id: Some(7),
            action: "sync".to_string(),
            params_text: r#"{"dry_run": true}"#.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn submit_stages_submission() {
        let state = TaskReducer::reduce(filled(), TaskIntent::Submit);
        assert!(state.submitting);
        let submission = state.submission.unwrap();
        assert_eq!(submission.ext_id, 7);
        assert_eq!(submission.action, "sync");
        assert_eq!(submission.params["dry_run"], true);
    }

    #[test]
    fn submit_without_extension_reports_field_error() {
        let state = TaskFormState {
            ext_id: None,
            ..filled()
        };
        let state = TaskReducer::reduce(state, TaskIntent::Submit);
        assert!(!state.submitting);
        assert!(state.submission.is_none());
        assert!(state.field_errors.contains_key("ext_id"));
    }

    #[test]
    fn malformed_params_surface_instead_of_submitting() {
        let state = TaskFormState {
            params_text: "{not json".to_string(),
            ..filled()
        };
        let state = TaskReducer::reduce(state, TaskIntent::Submit);
        assert!(state.submission.is_none());
        assert!(state.field_errors.contains_key("params"));
    }

    #[test]
    fn empty_params_submit_as_empty_object() {
        let state = TaskFormState {
            params_text: "  ".to_string(),
            ..filled()
        };
        let state = TaskReducer::reduce(state, TaskIntent::Submit);
        let submission = state.submission.unwrap();
        assert!(submission.params.as_object().is_some_and(|map| map.is_empty()));
    }
}
