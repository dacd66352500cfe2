//! Column resolution and cell formatting for collection tables.
//!
//! Most columns are schema-driven: the key names a field, the header
//! comes from the field label and the value is formatted per its kind.
//! A small per-type table of custom columns bypasses the schema and
//! composes cells out of several fields (e.g. `Vendor/SKU`, `Summary`).

use serde_json::Value;

use crate::schema::{FieldKind, NumberFormat, Schema, TextFormat};

/// A resolved table column: header text plus how to fill its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub key: String,
    pub header: String,
    pub custom: bool,
    /// Numeric columns are right-aligned.
    pub numeric: bool,
    /// Whether a header activation may toggle sort. Custom columns do
    /// not map to a single field and are not sortable.
    pub sortable: bool,
}

/// Resolve the column keys for a table. Custom columns resolve even
/// when the schema has no matching field; plain keys fall back to the
/// raw key as header when the schema does not know them.
pub fn column_specs(type_name: &str, schema: Option<&Schema>, keys: &[String]) -> Vec<ColumnSpec> {
    keys.iter()
        .map(|key| {
            if is_custom_column(type_name, key) {
                return ColumnSpec {
                    key: key.clone(),
                    header: key.clone(),
                    custom: true,
                    numeric: false,
                    sortable: false,
                };
            }
            match schema.and_then(|s| s.field(leaf(key))) {
                Some(field) => ColumnSpec {
                    key: key.clone(),
                    header: field.display_label(),
                    custom: false,
                    numeric: field.kind.is_numeric(),
                    sortable: true,
                },
                None => ColumnSpec {
                    key: key.clone(),
                    header: leaf(key).to_string(),
                    custom: false,
                    numeric: false,
                    sortable: true,
                },
            }
        })
        .collect()
}

/// Default column set for a type's collection page.
pub fn default_columns(type_name: &str) -> Vec<String> {
    let keys: &[&str] = match type_name {
        "Vendor" => &["name", "url", "avg_margin"],
        "Listing" => &["sku", "Vendor/SKU", "Summary", "price"],
        "Customer" => &["name", "email"],
        "Extension" => &["name", "module"],
        _ => &["id", "name"],
    };
    keys.iter().map(|k| k.to_string()).collect()
}

/// Fill one cell. Custom renderers first, then schema-driven formatting,
/// then the raw value.
pub fn render_cell(type_name: &str, schema: Option<&Schema>, key: &str, row: &Value) -> String {
    if let Some(text) = custom_cell(type_name, key, row) {
        return text;
    }

    let value = value_at_path(row, key);
    match schema.and_then(|s| s.field(leaf(key))).map(|f| &f.kind) {
        Some(FieldKind::Number(format)) => format_number(value, *format),
        Some(FieldKind::List) => match value.and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .map(display_scalar)
                .collect::<Vec<_>>()
                .join(", "),
            None => String::new(),
        },
        Some(FieldKind::Json) => value.map(Value::to_string).unwrap_or_default(),
        Some(FieldKind::Reference { .. }) => value.map(display_scalar).unwrap_or_default(),
        Some(FieldKind::Text(TextFormat::Plain | TextFormat::Url | TextFormat::Email)) | None => {
            value.map(display_scalar).unwrap_or_default()
        }
        Some(FieldKind::Unknown(tag)) => format!("<unknown type: {tag}>"),
    }
}

fn is_custom_column(type_name: &str, key: &str) -> bool {
    type_name == "Listing" && matches!(key, "Vendor" | "Vendor/SKU" | "Image" | "Summary" | "Score")
}

fn custom_cell(type_name: &str, key: &str, row: &Value) -> Option<String> {
    if type_name != "Listing" {
        return None;
    }
    match key {
        "Vendor" => Some(
            row.pointer("/vendor/name")
                .and_then(Value::as_str)
                .unwrap_or("n/a")
                .to_string(),
        ),
        "Vendor/SKU" => {
            let vendor = row.pointer("/vendor/name").and_then(Value::as_str).unwrap_or("n/a");
            let sku = row.get("sku").map(display_scalar).unwrap_or_default();
            Some(format!("{vendor} · {sku}"))
        }
        "Image" => Some(
            row.get("image_url")
                .and_then(Value::as_str)
                .unwrap_or("n/a")
                .to_string(),
        ),
        "Summary" => {
            let title = row.get("title").and_then(Value::as_str).unwrap_or("untitled");
            let category = row.get("category").and_then(Value::as_str).unwrap_or("n/a");
            let rank = row.get("rank").map(display_scalar).unwrap_or_else(|| "n/a".to_string());
            Some(format!("{title} (category: {category}, rank: {rank})"))
        }
        "Score" => Some(format_number(row.get("_score"), NumberFormat::Percent)),
        _ => None,
    }
}

/// Dotted paths walk nested objects, `vendor.name` style.
fn value_at_path<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = row;
    for step in path.split('.') {
        current = current.get(step)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn format_number(value: Option<&Value>, format: NumberFormat) -> String {
    let Some(number) = value.and_then(as_f64) else {
        return "n/a".to_string();
    };
    match format {
        NumberFormat::Integer => group_thousands(&format!("{}", number.round() as i64)),
        NumberFormat::Float => format!("{number}"),
        NumberFormat::Currency => format!("${}", group_thousands(&format!("{number:.2}"))),
        NumberFormat::Percent => format!("{}%", trim_zeros(&format!("{:.2}", number * 100.0))),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn group_thousands(raw: &str) -> String {
    let (number, fraction) = match raw.split_once('.') {
        Some((n, f)) => (n, Some(f)),
        None => (raw, None),
    };
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };

    let mut grouped = String::new();
    for (index, ch) in digits.chars().enumerate() {
        let remaining = digits.len() - index;
        if index > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn trim_zeros(raw: &str) -> String {
    if !raw.contains('.') {
        return raw.to_string();
    }
    raw.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing_schema() -> Schema {
        Schema::from_value(&json!({
            "properties": {
                "sku": { "type": "string" },
                "price": { "type": "number", "format": "currency" },
                "rank": { "type": "number", "format": "integer" },
                "margin": { "type": "number", "format": "percent" }
            }
        }))
    }

    #[test]
    fn custom_columns_bypass_schema() {
        let specs = column_specs("Listing", Some(&listing_schema()), &default_columns("Listing"));
        let custom: Vec<&str> = specs
            .iter()
            .filter(|c| c.custom)
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(custom, vec!["Vendor/SKU", "Summary"]);
        assert!(specs.iter().filter(|c| c.custom).all(|c| !c.sortable));
    }

    #[test]
    fn vendor_sku_cell_composes_both_fields() {
        let row = json!({ "vendor": { "name": "Acme" }, "sku": "AC-100" });
        assert_eq!(render_cell("Listing", None, "Vendor/SKU", &row), "Acme · AC-100");
    }

    #[test]
    fn summary_cell_tolerates_missing_fields() {
        let row = json!({ "id": 3, "title": "Widget" });
        assert_eq!(
            render_cell("Listing", None, "Summary", &row),
            "Widget (category: n/a, rank: n/a)"
        );
    }

    #[test]
    fn numeric_formats_apply() {
        let schema = listing_schema();
        let row = json!({ "price": 1234.5, "rank": 10500, "margin": 0.325 });
        assert_eq!(render_cell("Listing", Some(&schema), "price", &row), "$1,234.50");
        assert_eq!(render_cell("Listing", Some(&schema), "rank", &row), "10,500");
        assert_eq!(render_cell("Listing", Some(&schema), "margin", &row), "32.5%");
    }

    #[test]
    fn dotted_path_reads_nested_value() {
        let row = json!({ "vendor": { "name": "Acme" } });
        assert_eq!(render_cell("Vendor", None, "vendor.name", &row), "Acme");
    }

    #[test]
    fn missing_number_renders_na() {
        let schema = listing_schema();
        let row = json!({ "sku": "X" });
        assert_eq!(render_cell("Listing", Some(&schema), "price", &row), "n/a");
    }
}
