use serde_json::json;

use colander_admin::api::types::FilterResponse;
use colander_admin::api::{ApiCommand, ApiError, SaveOutcome};
use colander_admin::data::DocumentState;
use colander_admin::query::View;

fn vendor_response(id: i64, name: &str) -> FilterResponse {
    serde_json::from_value(json!({
        "items": [{ "id": id, "name": name, "url": "http://acme.test" }],
        "total": 1,
        "page": 1,
        "pages": 1,
        "per_page": 10,
        "schema": {
            "definitions": {
                "Vendor": {
                    "properties": {
                        "id": { "type": "number", "format": "integer" },
                        "name": { "label": "Name", "type": "string" },
                        "url": { "type": "string", "format": "url" }
                    },
                    "required": ["name"]
                }
            }
        }
    }))
    .expect("valid filter response")
}

fn loaded_document() -> (DocumentState, u64) {
    let mut document = DocumentState::new("Vendor");
    document.set_target("Vendor", Some(1), View::new());
    let command = document.begin_fetch().expect("first fetch fires");
    let generation = match command {
        ApiCommand::Filter { generation, .. } => generation,
        other => panic!("expected filter command, got {other:?}"),
    };
    document.complete_fetch(generation, Ok(vendor_response(1, "Acme")));
    (document, generation)
}

#[test]
fn identical_target_does_not_refetch() {
    let (mut document, _) = loaded_document();

    document.set_target("Vendor", Some(1), View::new());
    assert!(document.begin_fetch().is_none());

    // Any component changing by value fires again.
    document.set_target("Vendor", Some(2), View::new());
    assert!(document.begin_fetch().is_some());
}

#[test]
fn save_sends_exactly_the_staged_edits() {
    let (mut document, _) = loaded_document();

    document.edit("name", json!("Acme Corp"));
    let command = document.begin_save().expect("save fires");
    match command {
        ApiCommand::Update { data, query, .. } => {
            assert_eq!(data.len(), 1);
            assert_eq!(data["name"], json!("Acme Corp"));
            assert_eq!(query.as_value()["id"], json!(1));
        }
        other => panic!("expected update command, got {other:?}"),
    }
}

#[test]
fn editing_back_to_original_unstages() {
    let (mut document, _) = loaded_document();

    document.edit("name", json!("Acme Corp"));
    assert!(document.has_edits());
    document.edit("name", json!("Acme"));
    assert!(!document.has_edits());
    assert!(document.begin_save().is_none());
}

#[test]
fn successful_save_merges_and_clears_edits() {
    let (mut document, _) = loaded_document();

    document.edit("name", json!("Acme Corp"));
    let command = document.begin_save().expect("save fires");
    let generation = match command {
        ApiCommand::Update { generation, .. } => generation,
        other => panic!("unexpected command {other:?}"),
    };

    document.complete_save(generation, Ok(SaveOutcome::Applied(json!({ "status": "ok" }))));
    assert!(!document.has_edits());
    assert_eq!(
        document.doc.as_ref().and_then(|doc| doc.get("name")),
        Some(&json!("Acme Corp"))
    );
}

#[test]
fn rejected_save_keeps_edits_staged() {
    let (mut document, _) = loaded_document();

    document.edit("url", json!("nope"));
    let command = document.begin_save().expect("save fires");
    let generation = match command {
        ApiCommand::Update { generation, .. } => generation,
        other => panic!("unexpected command {other:?}"),
    };

    let errors = std::collections::BTreeMap::from([("url".to_string(), "not a url".to_string())]);
    document.complete_save(generation, Ok(SaveOutcome::Rejected(errors)));

    assert!(document.has_edits());
    assert_eq!(document.save_payload()["url"], json!("nope"));
    assert_eq!(document.errors.get("url").map(String::as_str), Some("not a url"));
    // Displayed record keeps the original value until a save applies.
    assert_eq!(
        document.doc.as_ref().and_then(|doc| doc.get("url")),
        Some(&json!("http://acme.test"))
    );
}

#[test]
fn stale_generation_completion_is_dropped() {
    let (mut document, first_generation) = loaded_document();

    // Retarget and start a newer fetch before the old response lands.
    document.set_target("Vendor", Some(2), View::new());
    let command = document.begin_fetch().expect("second fetch fires");
    let second_generation = match command {
        ApiCommand::Filter { generation, .. } => generation,
        other => panic!("unexpected command {other:?}"),
    };
    assert!(second_generation > first_generation);

    document.complete_fetch(first_generation, Ok(vendor_response(1, "Stale")));
    assert!(document.loading, "stale completion must not clear loading");

    document.complete_fetch(second_generation, Ok(vendor_response(2, "Fresh")));
    assert!(!document.loading);
    assert_eq!(
        document.doc.as_ref().and_then(|doc| doc.get("name")),
        Some(&json!("Fresh"))
    );
}

#[test]
fn failed_fetch_reports_and_allows_retry() {
    let mut document = DocumentState::new("Vendor");
    document.set_target("Vendor", Some(1), View::new());
    let command = document.begin_fetch().expect("fetch fires");
    let generation = match command {
        ApiCommand::Filter { generation, .. } => generation,
        other => panic!("unexpected command {other:?}"),
    };

    let message = document.complete_fetch(
        generation,
        Err(ApiError::Timeout {
            path: "/api/Vendor/filter".to_string(),
        }),
    );
    assert!(message.is_some());
    assert!(document.doc.is_none());
    // The same key can be fetched again after a failure.
    assert!(document.begin_fetch().is_some());
}
