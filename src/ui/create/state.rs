use crate::api::FieldErrors;
use crate::ui::mvi::UiState;

/// Sidebar for creating a new object of the current collection's type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CreateSidebarState {
    #[default]
    Hidden,
    Visible {
        type_name: String,
        fields: Vec<CreateField>,
        focused: usize,
        submitting: bool,
        errors: FieldErrors,
    },
}

impl UiState for CreateSidebarState {}

impl CreateSidebarState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// One input of a creation form.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateField {
    pub key: String,
    pub label: String,
    pub value: String,
}

impl CreateField {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: String::new(),
        }
    }
}

/// The per-type creation forms. Types without a bespoke form get a
/// name-only fallback.
pub fn creation_fields(type_name: &str) -> Vec<CreateField> {
    match type_name {
        "Vendor" => vec![
            CreateField::new("name", "Name"),
            CreateField::new("url", "Website"),
            CreateField::new("image_url", "Image"),
        ],
        "Listing" => vec![
            CreateField::new("sku", "SKU"),
            CreateField::new("title", "Title"),
            CreateField::new("detail_url", "Detail page"),
        ],
        "Customer" => vec![
            CreateField::new("name", "Name"),
            CreateField::new("email", "Email"),
        ],
        "Extension" => vec![
            CreateField::new("name", "Name"),
            CreateField::new("module", "Module"),
        ],
        _ => vec![CreateField::new("name", "Name")],
    }
}
