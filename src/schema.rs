//! Runtime schema model for catalog entity types.
//!
//! The backend describes each entity type with a JSON-schema-like blob:
//! a `properties` map of field descriptors plus a `required` list. The
//! client never validates records against it; the schema only decides
//! which editor a field gets and how its value is decorated.
//!
//! Field kinds are an exhaustive tagged union. A declared type the client
//! does not recognize is carried as [`FieldKind::Unknown`] and rendered as
//! a visible error row, never dropped silently.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Parsed schemas for every entity type a response described.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaSet {
    definitions: BTreeMap<String, Schema>,
}

impl SchemaSet {
    pub fn from_definitions(definitions: &Map<String, Value>) -> Self {
        let definitions = definitions
            .iter()
            .map(|(name, value)| (name.clone(), Schema::from_value(value)))
            .collect();
        Self { definitions }
    }

    pub fn get(&self, type_name: &str) -> Option<&Schema> {
        self.definitions.get(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Schema)> {
        self.definitions.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Schema for a single entity type, fields in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn from_value(value: &Value) -> Self {
        let required: Vec<&str> = value
            .get("required")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let fields = value
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(key, descriptor)| {
                        FieldDescriptor::from_value(key, descriptor, required.contains(&key.as_str()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Fields to render: an `only` allowlist wins, otherwise everything
    /// not named by `exclude`, in schema order.
    pub fn visible_fields(&self, only: Option<&[String]>, exclude: &[String]) -> Vec<&FieldDescriptor> {
        match only {
            Some(keys) => keys.iter().filter_map(|key| self.field(key)).collect(),
            None => self
                .fields
                .iter()
                .filter(|f| !exclude.iter().any(|e| e == &f.key))
                .collect(),
        }
    }
}

/// One field of an entity schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn from_value(key: &str, descriptor: &Value, required: bool) -> Self {
        let label = ["label", "title", "name"]
            .iter()
            .find_map(|probe| descriptor.get(*probe).and_then(Value::as_str))
            .unwrap_or(key)
            .to_string();

        Self {
            key: key.to_string(),
            label,
            kind: FieldKind::from_descriptor(descriptor),
            required,
        }
    }

    /// Label with the cosmetic unit suffix for percent fields.
    pub fn display_label(&self) -> String {
        match self.kind {
            FieldKind::Number(NumberFormat::Percent) => format!("{} (%)", self.label),
            _ => self.label.clone(),
        }
    }
}

/// Declared kind of a field, driving editor selection.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Foreign-key-like reference to another entity type.
    Reference { idtype: String },
    /// Ordered list of strings.
    List,
    /// Free-form nested JSON.
    Json,
    Text(TextFormat),
    Number(NumberFormat),
    /// Declared type the client does not recognize; the raw tag is kept
    /// so the renderer can show it.
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Url,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Integer,
    Float,
    Currency,
    Percent,
}

impl FieldKind {
    pub fn from_descriptor(descriptor: &Value) -> Self {
        if let Some(idtype) = descriptor.get("idtype").and_then(Value::as_str) {
            return FieldKind::Reference {
                idtype: idtype.to_string(),
            };
        }

        let format = descriptor.get("format").and_then(Value::as_str);
        match descriptor.get("type").and_then(Value::as_str) {
            Some("array") => FieldKind::List,
            Some("object") => FieldKind::Json,
            Some("string") => match format {
                Some("url") => FieldKind::Text(TextFormat::Url),
                Some("email") => FieldKind::Text(TextFormat::Email),
                Some("integer") => FieldKind::Number(NumberFormat::Integer),
                Some("float") => FieldKind::Number(NumberFormat::Float),
                Some("currency") => FieldKind::Number(NumberFormat::Currency),
                Some("percent") => FieldKind::Number(NumberFormat::Percent),
                _ => FieldKind::Text(TextFormat::Plain),
            },
            Some("number") => match format {
                Some("integer") => FieldKind::Number(NumberFormat::Integer),
                Some("currency") => FieldKind::Number(NumberFormat::Currency),
                Some("percent") => FieldKind::Number(NumberFormat::Percent),
                _ => FieldKind::Number(NumberFormat::Float),
            },
            Some(other) => FieldKind::Unknown(other.to_string()),
            None => FieldKind::Unknown("unspecified".to_string()),
        }
    }

    /// Cosmetic glyph shown next to the input, if the format has one.
    pub fn decoration(&self) -> Option<&'static str> {
        match self {
            FieldKind::Text(TextFormat::Url) => Some("url"),
            FieldKind::Text(TextFormat::Email) => Some("@"),
            FieldKind::Number(NumberFormat::Currency) => Some("$"),
            FieldKind::Number(NumberFormat::Percent) => Some("%"),
            _ => None,
        }
    }

    /// Increment hint for numeric inputs.
    pub fn step(&self) -> Option<f64> {
        match self {
            FieldKind::Number(NumberFormat::Integer) => Some(1.0),
            FieldKind::Number(NumberFormat::Float) | FieldKind::Number(NumberFormat::Currency) => {
                Some(0.01)
            }
            FieldKind::Number(NumberFormat::Percent) => Some(0.1),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vendor_schema() -> Schema {
        Schema::from_value(&json!({
            "properties": {
                "name": { "label": "Name", "type": "string" },
                "url": { "title": "Website", "type": "string", "format": "url" },
                "ext_id": { "label": "Extension", "idtype": "Extension" },
                "avg_margin": { "type": "number", "format": "percent" },
                "domains": { "type": "array" },
                "extra": { "type": "object" },
                "mystery": { "type": "blob" }
            },
            "required": ["name"]
        }))
    }

    #[test]
    fn kinds_parse_exhaustively() {
        let schema = vendor_schema();
        assert_eq!(schema.field("name").map(|f| &f.kind), Some(&FieldKind::Text(TextFormat::Plain)));
        assert_eq!(
            schema.field("url").map(|f| &f.kind),
            Some(&FieldKind::Text(TextFormat::Url))
        );
        assert_eq!(
            schema.field("ext_id").map(|f| &f.kind),
            Some(&FieldKind::Reference { idtype: "Extension".to_string() })
        );
        assert_eq!(
            schema.field("avg_margin").map(|f| &f.kind),
            Some(&FieldKind::Number(NumberFormat::Percent))
        );
        assert_eq!(schema.field("domains").map(|f| &f.kind), Some(&FieldKind::List));
        assert_eq!(schema.field("extra").map(|f| &f.kind), Some(&FieldKind::Json));
    }

    #[test]
    fn unknown_type_keeps_raw_tag() {
        let schema = vendor_schema();
        assert_eq!(
            schema.field("mystery").map(|f| &f.kind),
            Some(&FieldKind::Unknown("blob".to_string()))
        );
    }

    #[test]
    fn label_falls_back_to_key() {
        let schema = vendor_schema();
        assert_eq!(schema.field("domains").map(|f| f.label.as_str()), Some("domains"));
        assert_eq!(schema.field("url").map(|f| f.label.as_str()), Some("Website"));
    }

    #[test]
    fn percent_label_gets_unit_suffix() {
        let schema = vendor_schema();
        let field = schema.field("avg_margin").cloned();
        assert_eq!(field.map(|f| f.display_label()), Some("avg_margin (%)".to_string()));
    }

    #[test]
    fn required_flag_set_from_list() {
        let schema = vendor_schema();
        assert!(schema.field("name").is_some_and(|f| f.required));
        assert!(schema.field("url").is_some_and(|f| !f.required));
    }

    #[test]
    fn visible_fields_honor_only_and_exclude() {
        let schema = vendor_schema();
        let only = vec!["url".to_string(), "name".to_string()];
        let keys: Vec<&str> = schema
            .visible_fields(Some(&only), &[])
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(keys, vec!["url", "name"]);

        let exclude = vec!["mystery".to_string(), "extra".to_string()];
        let keys: Vec<&str> = schema
            .visible_fields(None, &exclude)
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert!(!keys.contains(&"mystery"));
        assert!(keys.contains(&"name"));
    }
}
