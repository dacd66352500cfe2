use crate::api::PreviewCard;
use crate::ui::mvi::UiState;

/// Dialog for reassigning a reference field by searching its target type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PickerDialogState {
    #[default]
    Hidden,
    Visible {
        /// The reference field being edited.
        field: String,
        /// Entity type the reference points at.
        idtype: String,
        query: String,
        loading: bool,
        results: Vec<PreviewCard>,
        focused: usize,
        /// Set when the user picks a result or clears the reference;
        /// the app drains it and closes the dialog.
        picked: Option<Picked>,
    },
}

impl UiState for PickerDialogState {}

impl PickerDialogState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    pub fn take_picked(&mut self) -> Option<Picked> {
        match self {
            PickerDialogState::Visible { picked, .. } => picked.take(),
            PickerDialogState::Hidden => None,
        }
    }
}

/// A resolved pick: `id = None` clears the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Picked {
    pub field: String,
    pub id: Option<i64>,
}
