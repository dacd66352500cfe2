use crate::ui::mvi::UiState;
use serde_json::Value;

/// State of the schema-driven properties form on a detail view.
///
/// The form navigates the visible fields of the document and opens one
/// editor at a time. Committed values are staged in `committed` for the
/// app to apply to the document provider and convert per the field's
/// declared kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub fields: Vec<String>,
    pub focused: usize,
    pub editor: Option<FieldEditor>,
    pub committed: Option<(String, Value)>,
}

impl UiState for FormState {}

impl FormState {
    pub fn focused_field(&self) -> Option<&str> {
        self.fields.get(self.focused).map(String::as_str)
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }
}

/// The open editor, shaped by the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEditor {
    /// Single-line text or number entry.
    Text { field: String, buffer: String },
    /// Ordered string list: append buffer plus per-item cursor.
    List {
        field: String,
        items: Vec<String>,
        input: String,
        cursor: usize,
    },
    /// Raw JSON text. A failed parse stays open with the error shown.
    Json {
        field: String,
        text: String,
        error: Option<String>,
    },
}

impl FieldEditor {
    pub fn field(&self) -> &str {
        match self {
            FieldEditor::Text { field, .. }
            | FieldEditor::List { field, .. }
            | FieldEditor::Json { field, .. } => field,
        }
    }
}
