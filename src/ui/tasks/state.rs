use serde_json::json;

use crate::api::{FieldErrors, TaskSubmission};
use crate::ui::mvi::UiState;

/// Which input of the task form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskField {
    #[default]
    Extension,
    Action,
    Params,
}

impl TaskField {
    pub fn next(self) -> Self {
        match self {
            TaskField::Extension => TaskField::Action,
            TaskField::Action => TaskField::Params,
            TaskField::Params => TaskField::Extension,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            TaskField::Extension => TaskField::Params,
            TaskField::Action => TaskField::Extension,
            TaskField::Params => TaskField::Action,
        }
    }
}

/// Extension action submission form plus its receipt/error lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskFormState {
    pub focused: TaskField,
    /// Target extension, assigned through the object picker.
    pub ext_id: Option<i64>,
    pub action: String,
    /// Raw JSON typed for the action parameters.
    pub params_text: String,
    pub field_errors: FieldErrors,
    pub submitting: bool,
    /// `message_id`s of accepted submissions.
    pub receipts: Vec<String>,
    /// Transport-level failures, individually dismissable.
    pub errors: Vec<String>,
    /// Built by a successful Submit; the app drains and sends it.
    pub submission: Option<TaskSubmission>,
}

impl UiState for TaskFormState {}

impl TaskFormState {
    /// Validate the form and build the submission. Empty params mean an
    /// empty object; unparseable params or a missing extension become
    /// field errors.
    pub fn build_submission(&self) -> Result<TaskSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();

        let params = if self.params_text.trim().is_empty() {
            Ok(json!({}))
        } else {
            serde_json::from_str(&self.params_text)
        };
        if let Err(err) = &params {
            errors.insert("params".to_string(), err.to_string());
        }
        if self.action.trim().is_empty() {
            errors.insert("action".to_string(), "action is required".to_string());
        }
        let Some(ext_id) = self.ext_id else {
            errors.insert("ext_id".to_string(), "extension is required".to_string());
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TaskSubmission {
            ext_id,
            action: self.action.trim().to_string(),
            params: params.unwrap_or(json!({})),
        })
    }
}
