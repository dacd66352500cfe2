//! Opaque query and view objects passed through to the backend.
//!
//! Both wrap arbitrary JSON that the server interprets. The client only
//! touches the reserved sub-keys `_sort`, `_page`, `_only` and `_exclude`,
//! which drive pagination, sorting and response shaping. Value equality on
//! the wrapped JSON is what fetch keys use to decide whether a provider
//! must re-fetch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Direction stored under the `_sort` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Ascending,
    Descending,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Ascending => "asc",
            SortDir::Descending => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDir::Ascending),
            "desc" => Some(SortDir::Descending),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Ascending => SortDir::Descending,
            SortDir::Descending => SortDir::Ascending,
        }
    }
}

/// A filter predicate, passed verbatim to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Value);

impl Default for Query {
    fn default() -> Self {
        Query(Value::Object(Map::new()))
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        Query(value)
    }

    /// Predicate matching a single object by id.
    pub fn by_id(id: i64) -> Self {
        Query(json!({ "id": id }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn entries_mut(&mut self) -> &mut Map<String, Value> {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        match &mut self.0 {
            Value::Object(map) => map,
            _ => unreachable!("entries_mut coerces to an object"),
        }
    }

    pub fn page(&self) -> Option<u64> {
        self.0.get("_page").and_then(Value::as_u64)
    }

    pub fn set_page(&mut self, page: u64) {
        self.entries_mut().insert("_page".to_string(), json!(page));
    }

    /// Current sort direction for a column, if one is set.
    pub fn sort_dir(&self, column: &str) -> Option<SortDir> {
        self.0
            .get("_sort")
            .and_then(|sort| sort.get(column))
            .and_then(Value::as_str)
            .and_then(SortDir::parse)
    }

    /// Toggle the sort direction of a column: unset becomes ascending,
    /// then each activation flips the direction.
    pub fn toggle_sort(&mut self, column: &str) {
        let next = self
            .sort_dir(column)
            .map(SortDir::flipped)
            .unwrap_or(SortDir::Ascending);

        let entries = self.entries_mut();
        let sort = entries
            .entry("_sort".to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !sort.is_object() {
            *sort = Value::Object(Map::new());
        }
        if let Some(map) = sort.as_object_mut() {
            map.insert(column.to_string(), json!(next.as_str()));
        }
    }
}

/// A response-shaping directive, passed verbatim to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct View(Value);

impl Default for View {
    fn default() -> Self {
        View(Value::Object(Map::new()))
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Self {
        View(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Projection used for compact display: title, image, description, url.
    pub fn preview() -> Self {
        View::new().only(["id", "title", "image", "description", "url"])
    }

    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<Value> = fields.into_iter().map(|f| json!(f.into())).collect();
        self.entries_mut().insert("_only".to_string(), Value::Array(list));
        self
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<Value> = fields.into_iter().map(|f| json!(f.into())).collect();
        self.entries_mut()
            .insert("_exclude".to_string(), Value::Array(list));
        self
    }

    fn entries_mut(&mut self) -> &mut Map<String, Value> {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        match &mut self.0 {
            Value::Object(map) => map,
            _ => unreachable!("entries_mut coerces to an object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_sort_cycles_direction() {
        let mut query = Query::new();
        assert_eq!(query.sort_dir("name"), None);

        query.toggle_sort("name");
        assert_eq!(query.sort_dir("name"), Some(SortDir::Ascending));

        query.toggle_sort("name");
        assert_eq!(query.sort_dir("name"), Some(SortDir::Descending));

        query.toggle_sort("name");
        assert_eq!(query.sort_dir("name"), Some(SortDir::Ascending));
    }

    #[test]
    fn toggle_sort_keeps_other_columns() {
        let mut query = Query::new();
        query.toggle_sort("name");
        query.toggle_sort("price");
        assert_eq!(query.sort_dir("name"), Some(SortDir::Ascending));
        assert_eq!(query.sort_dir("price"), Some(SortDir::Ascending));
    }

    #[test]
    fn set_page_overwrites() {
        let mut query = Query::by_id(7);
        query.set_page(3);
        query.set_page(4);
        assert_eq!(query.page(), Some(4));
        assert_eq!(query.as_value().get("id"), Some(&json!(7)));
    }

    #[test]
    fn opaque_keys_pass_through() {
        let query = Query::from_value(json!({ "eq": { "state": "NY" } }));
        assert_eq!(query.as_value()["eq"]["state"], json!("NY"));
    }

    #[test]
    fn preview_view_projects_card_fields() {
        let view = View::preview();
        let only = view.as_value()["_only"].as_array().cloned().unwrap_or_default();
        assert!(only.contains(&json!("title")));
        assert!(only.contains(&json!("url")));
    }

    #[test]
    fn queries_compare_by_value() {
        let a = Query::from_value(json!({ "id": 1, "eq": { "x": 2 } }));
        let b = Query::from_value(json!({ "id": 1, "eq": { "x": 2 } }));
        assert_eq!(a, b);
    }
}
