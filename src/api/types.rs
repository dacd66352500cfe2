//! Wire types for the backend's JSON REST contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::schema::SchemaSet;

/// Per-field validation messages embedded in an otherwise-2xx response.
pub type FieldErrors = BTreeMap<String, String>;

/// Envelope carrying schema definitions alongside filter results.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaEnvelope {
    #[serde(default)]
    pub definitions: Map<String, Value>,
}

/// Response of `POST /api/{type}/filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default)]
    pub pages: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub schema: Option<SchemaEnvelope>,
}

fn default_page() -> u64 {
    1
}

impl FilterResponse {
    pub fn schema_set(&self) -> Option<SchemaSet> {
        self.schema
            .as_ref()
            .map(|envelope| SchemaSet::from_definitions(&envelope.definitions))
    }
}

/// Extract an embedded `errors: {field: message}` map, if present.
pub fn embedded_errors(body: &Value) -> Option<FieldErrors> {
    let map = body.get("errors")?.as_object()?;
    Some(
        map.iter()
            .map(|(field, message)| (field.clone(), display_message(message)))
            .collect(),
    )
}

fn display_message(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        // The server sometimes wraps a single message in a list.
        Value::Array(list) if list.len() == 1 => display_message(&list[0]),
        other => other.to_string(),
    }
}

/// Outcome of an update: applied, or rejected with field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Applied(Value),
    Rejected(FieldErrors),
}

impl SaveOutcome {
    pub fn from_body(body: Value) -> Self {
        match embedded_errors(&body) {
            Some(errors) if !errors.is_empty() => SaveOutcome::Rejected(errors),
            _ => SaveOutcome::Applied(body),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, SaveOutcome::Applied(_))
    }
}

/// Outcome of a create: new id, or rejected with field errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(i64),
    Rejected(FieldErrors),
}

impl CreateOutcome {
    pub fn from_body(body: &Value) -> Option<Self> {
        if let Some(errors) = embedded_errors(body) {
            if !errors.is_empty() {
                return Some(CreateOutcome::Rejected(errors));
            }
        }
        body.get("id").and_then(Value::as_i64).map(CreateOutcome::Created)
    }
}

/// Reduced projection of an entity used for compact display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreviewCard {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PreviewCard {
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// One type's slice of a quick-search response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuickGroup {
    pub total: u64,
    pub results: Vec<PreviewCard>,
}

/// Grouped quick-search results, keyed by lowercase type name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuickResponse {
    pub total: u64,
    pub groups: BTreeMap<String, QuickGroup>,
}

impl QuickResponse {
    /// Parsed by hand: group keys are dynamic and sit next to scalar
    /// bookkeeping keys in the same object.
    pub fn from_body(body: &Value) -> Self {
        let mut response = QuickResponse::default();
        let Some(map) = body.as_object() else {
            return response;
        };

        response.total = map.get("total").and_then(Value::as_u64).unwrap_or(0);
        for (key, value) in map {
            let Some(group) = value.as_object() else {
                continue;
            };
            let Some(results) = group.get("results").and_then(Value::as_array) else {
                continue;
            };
            response.groups.insert(
                key.clone(),
                QuickGroup {
                    total: group.get("total").and_then(Value::as_u64).unwrap_or(0),
                    results: results.iter().map(PreviewCard::from_value).collect(),
                },
            );
        }
        response
    }
}

/// Payload of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSubmission {
    pub ext_id: i64,
    pub action: String,
    pub params: Value,
}

/// Outcome of a task submission.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Accepted { message_id: String },
    Rejected(FieldErrors),
}

impl TaskOutcome {
    pub fn from_body(body: &Value) -> Option<Self> {
        if let Some(errors) = embedded_errors(body) {
            if !errors.is_empty() {
                return Some(TaskOutcome::Rejected(errors));
            }
        }
        let message_id = body.get("message_id")?;
        let message_id = match message_id {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        Some(TaskOutcome::Accepted { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_outcome_splits_on_embedded_errors() {
        let rejected = SaveOutcome::from_body(json!({ "errors": { "name": "required" } }));
        assert_eq!(
            rejected,
            SaveOutcome::Rejected(BTreeMap::from([("name".to_string(), "required".to_string())]))
        );

        let applied = SaveOutcome::from_body(json!({ "id": 1, "name": "Acme" }));
        assert!(applied.is_applied());
    }

    #[test]
    fn create_outcome_requires_id_or_errors() {
        assert_eq!(
            CreateOutcome::from_body(&json!({ "id": 42 })),
            Some(CreateOutcome::Created(42))
        );
        assert!(matches!(
            CreateOutcome::from_body(&json!({ "errors": { "url": "not a url" } })),
            Some(CreateOutcome::Rejected(_))
        ));
        assert_eq!(CreateOutcome::from_body(&json!({ "status": "ok" })), None);
    }

    #[test]
    fn quick_response_groups_by_type() {
        let body = json!({
            "total": 3,
            "vendor": { "total": 1, "results": [{ "id": 1, "title": "Acme" }] },
            "listing": { "total": 2, "results": [{ "id": 2 }, { "id": 3 }] },
            "status": "ok"
        });
        let response = QuickResponse::from_body(&body);
        assert_eq!(response.total, 3);
        assert_eq!(response.groups.len(), 2);
        assert_eq!(response.groups["vendor"].results[0].title.as_deref(), Some("Acme"));
        assert_eq!(response.groups["listing"].total, 2);
    }

    #[test]
    fn filter_response_defaults_missing_counts() {
        let response: FilterResponse =
            serde_json::from_value(json!({ "items": [{ "id": 1 }] })).unwrap();
        assert_eq!(response.page, 1);
        assert_eq!(response.total, 0);
        assert!(response.schema_set().is_none());
    }

    #[test]
    fn error_lists_collapse_to_single_message() {
        let errors = embedded_errors(&json!({ "errors": { "url": ["not a url"] } }));
        assert_eq!(
            errors,
            Some(BTreeMap::from([("url".to_string(), "not a url".to_string())]))
        );
    }
}
