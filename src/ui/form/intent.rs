use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FormIntent {
    /// Reset the form to a new field list.
    Load { fields: Vec<String> },
    FocusUp,
    FocusDown,
    OpenText { field: String, current: String },
    OpenList { field: String, items: Vec<String> },
    OpenJson { field: String, text: String },
    Input(char),
    Backspace,
    /// Append the input buffer to the open list editor.
    ListAppend,
    /// Remove the list item under the cursor.
    ListRemove,
    ListUp,
    ListDown,
    /// Commit the open editor. Text and list editors always commit; the
    /// JSON editor commits only if its text parses, otherwise it stays
    /// open with the parse error set. The app drains `committed`.
    Commit,
    Cancel,
}

impl Intent for FormIntent {}
