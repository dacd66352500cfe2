use crate::api::FieldErrors;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum TaskIntent {
    FocusNext,
    FocusPrevious,
    Input(char),
    Backspace,
    /// Target extension chosen through the picker. `None` clears it.
    SetExtension(Option<i64>),
    /// Validate the form and stage a submission for the app to send.
    Submit,
    /// The app drained the staged submission.
    ClearSubmission,
    Accepted { message_id: String },
    Rejected { errors: FieldErrors },
    Failed { message: String },
    DismissError(usize),
    DismissReceipt(usize),
}

impl Intent for TaskIntent {}
