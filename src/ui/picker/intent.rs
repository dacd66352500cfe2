use crate::api::PreviewCard;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum PickerIntent {
    Open { field: String, idtype: String },
    Input(char),
    Backspace,
    /// A quick search went out for the current query.
    Loading,
    Results(Vec<PreviewCard>),
    MoveUp,
    MoveDown,
    /// Assign the focused result's id to the field.
    Choose,
    /// Clear the reference (`id = None`).
    Clear,
    Close,
}

impl Intent for PickerIntent {}
