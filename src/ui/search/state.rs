use crate::api::{PreviewCard, QuickResponse};
use crate::ui::mvi::UiState;

/// The quick-search screen: one input, grouped results per type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchViewState {
    pub input: String,
    pub loading: bool,
    pub groups: Vec<SearchGroup>,
    /// (group index, result index) of the highlighted row.
    pub focused: Option<(usize, usize)>,
    /// Set when the user activates a result; the app drains it and
    /// navigates to the detail route.
    pub chosen: Option<(String, i64)>,
}

impl UiState for SearchViewState {}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroup {
    /// Entity type name in route casing, e.g. `Vendor`.
    pub type_name: String,
    pub total: u64,
    pub results: Vec<PreviewCard>,
}

impl SearchViewState {
    pub fn focused_card(&self) -> Option<&PreviewCard> {
        let (group, row) = self.focused?;
        self.groups.get(group)?.results.get(row)
    }
}

/// Flatten a quick-search response into display groups. Group keys come
/// back lowercase; routes use capitalized type names.
pub fn groups_from_response(response: &QuickResponse) -> Vec<SearchGroup> {
    response
        .groups
        .iter()
        .filter(|(_, group)| !group.results.is_empty())
        .map(|(key, group)| SearchGroup {
            type_name: capitalize(key),
            total: group.total,
            results: group.results.clone(),
        })
        .collect()
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_capitalize_and_skip_empty() {
        let response = QuickResponse::from_body(&json!({
            "total": 2,
            "vendor": { "total": 1, "results": [{ "id": 1, "title": "Acme" }] },
            "listing": { "total": 1, "results": [{ "id": 2 }] },
            "customer": { "total": 0, "results": [] }
        }));
        let groups = groups_from_response(&response);
        let names: Vec<&str> = groups.iter().map(|g| g.type_name.as_str()).collect();
        assert_eq!(names, vec!["Listing", "Vendor"]);
    }
}
