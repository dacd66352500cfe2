use serde_json::json;

use colander_admin::api::types::FilterResponse;
use colander_admin::api::{ApiCommand, SaveOutcome, Slot};
use colander_admin::data::CollectionState;
use colander_admin::query::{Query, SortDir, View};

fn listings_response() -> FilterResponse {
    serde_json::from_value(json!({
        "items": [
            { "id": 10, "sku": "A-1", "price": 5.0 },
            { "id": 11, "sku": "A-2", "price": 6.0 },
            { "id": 12, "sku": "A-3", "price": 7.0 }
        ],
        "total": 3,
        "page": 1,
        "pages": 1,
        "per_page": 10
    }))
    .expect("valid filter response")
}

fn loaded_collection() -> (CollectionState, u64) {
    let mut collection =
        CollectionState::new(Slot::Collection, "Listing", Query::new(), View::new());
    let command = collection.begin_fetch().expect("first fetch fires");
    let generation = match command {
        ApiCommand::Filter { generation, .. } => generation,
        other => panic!("expected filter command, got {other:?}"),
    };
    collection.complete_fetch(generation, Ok(listings_response()));
    (collection, generation)
}

#[test]
fn unindexed_save_plan_visits_every_row() {
    let (collection, _) = loaded_collection();
    assert_eq!(collection.save_plan(None), vec![0, 1, 2]);
    assert_eq!(collection.save_plan(Some(1)), vec![1]);
}

#[test]
fn row_failure_does_not_stop_later_rows() {
    let (mut collection, generation) = loaded_collection();

    collection.edit_row(0, "price", json!(9.0));
    collection.edit_row(1, "price", json!(10.0));
    collection.edit_row(2, "price", json!(11.0));

    // Every planned row yields its own command regardless of siblings.
    let commands: Vec<ApiCommand> = collection
        .save_plan(None)
        .into_iter()
        .filter_map(|row| collection.begin_row_save(row))
        .collect();
    assert_eq!(commands.len(), 3);

    // Row 0 fails, rows 1 and 2 still apply.
    let errors = std::collections::BTreeMap::from([("price".to_string(), "too low".to_string())]);
    collection.complete_row_save(generation, 0, Ok(SaveOutcome::Rejected(errors)));
    collection.complete_row_save(generation, 1, Ok(SaveOutcome::Applied(json!({}))));
    collection.complete_row_save(generation, 2, Ok(SaveOutcome::Applied(json!({}))));

    assert!(!collection.row_errors(0).map(|e| e.is_empty()).unwrap_or(true));
    assert!(collection.row_edits(0).is_some_and(|e| !e.is_empty()));
    assert!(collection.row_edits(1).is_some_and(|e| e.is_empty()));
    assert_eq!(collection.items[2]["price"], json!(11.0));
}

#[test]
fn rows_without_edits_or_id_are_skipped() {
    let (mut collection, _) = loaded_collection();
    collection.edit_row(1, "price", json!(10.0));

    let commands: Vec<usize> = collection
        .save_plan(None)
        .into_iter()
        .filter(|row| collection.begin_row_save(*row).is_some())
        .collect();
    assert_eq!(commands, vec![1]);
}

#[test]
fn sort_toggle_changes_fetch_key() {
    let (mut collection, _) = loaded_collection();

    // Unchanged key after the first load: no duplicate fetch.
    assert!(collection.begin_fetch().is_none());

    collection.toggle_sort("price");
    assert_eq!(collection.query().sort_dir("price"), Some(SortDir::Ascending));
    assert!(collection.begin_fetch().is_some());

    collection.toggle_sort("price");
    assert_eq!(collection.query().sort_dir("price"), Some(SortDir::Descending));
    assert!(collection.begin_fetch().is_some());
}

#[test]
fn fetch_resets_row_edit_slots_to_item_count() {
    let (mut collection, _) = loaded_collection();
    collection.edit_row(2, "price", json!(11.0));

    collection.set_page(2);
    let command = collection.begin_fetch().expect("page change refetches");
    let generation = match command {
        ApiCommand::Filter { generation, .. } => generation,
        other => panic!("unexpected command {other:?}"),
    };

    let response: FilterResponse = serde_json::from_value(json!({
        "items": [{ "id": 13, "sku": "B-1" }],
        "total": 4,
        "page": 2,
        "pages": 2,
        "per_page": 3
    }))
    .expect("valid filter response");
    collection.complete_fetch(generation, Ok(response));

    assert_eq!(collection.items.len(), 1);
    assert!(collection.row_edits(0).is_some_and(|e| e.is_empty()));
    assert!(collection.row_edits(2).is_none());
}
