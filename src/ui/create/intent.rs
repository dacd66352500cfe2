use crate::api::FieldErrors;
use crate::ui::create::state::CreateField;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CreateIntent {
    Open {
        type_name: String,
        fields: Vec<CreateField>,
    },
    FocusUp,
    FocusDown,
    Input(char),
    Backspace,
    /// The app queued the create request.
    Submitted,
    /// Server rejected the payload; inputs stay filled for correction.
    Rejected { errors: FieldErrors },
    /// Transport failure; clears the submitting flag only.
    Failed,
    Close,
}

impl Intent for CreateIntent {}
