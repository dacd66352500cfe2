use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use colander_admin::api::types::FilterResponse;
use colander_admin::api::{ApiCommand, ApiEvent, QuickOrigin, QuickResponse, Slot};
use colander_admin::config::Config;
use colander_admin::routes::Route;
use colander_admin::ui::app::App;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Customer with a reference field that starts out unset.
fn customer_response() -> FilterResponse {
    serde_json::from_value(json!({
        "items": [{ "id": 5, "name": "Jo" }],
        "total": 1,
        "page": 1,
        "pages": 1,
        "per_page": 10,
        "schema": {
            "definitions": {
                "Customer": {
                    "properties": {
                        "id": { "type": "number", "format": "integer" },
                        "name": { "type": "string" },
                        "ext_id": { "label": "Extension", "idtype": "Extension" }
                    }
                }
            }
        }
    }))
    .expect("valid filter response")
}

fn loaded_app() -> App {
    let mut app = App::new(Config::default(), Route::detail("Customer", 5));
    let commands = app.take_commands();
    let generation = commands
        .iter()
        .find_map(|command| match command {
            ApiCommand::Filter {
                slot: Slot::Document,
                generation,
                ..
            } => Some(*generation),
            _ => None,
        })
        .expect("document fetch queued");

    app.handle_api(ApiEvent::FilterDone {
        slot: Slot::Document,
        generation,
        result: Ok(customer_response()),
    });
    app
}

#[test]
fn pick_then_clear_resets_the_preview_without_a_prior_value() {
    let mut app = loaded_app();
    let now = Instant::now();
    assert_eq!(app.form().fields, vec!["name", "ext_id"]);

    // Unset reference: no preview fetch was queued.
    assert!(app.take_commands().is_empty());

    // Focus ext_id and open the picker.
    app.on_key(key(KeyCode::Down), now);
    app.on_key(key(KeyCode::Enter), now);
    assert!(app.picker().is_visible());

    // Search the reference's target type.
    app.on_key(key(KeyCode::Char('a')), now);
    app.on_tick(now + Duration::from_millis(500));
    let generation = match app.take_commands().as_slice() {
        [ApiCommand::Quick {
            origin: QuickOrigin::Picker,
            generation,
            types,
            ..
        }] => {
            assert_eq!(types, &vec!["extension".to_string()]);
            *generation
        }
        other => panic!("expected one picker search, got {other:?}"),
    };
    app.handle_api(ApiEvent::QuickDone {
        origin: QuickOrigin::Picker,
        generation,
        result: Ok(QuickResponse::from_body(&json!({
            "total": 1,
            "extension": { "total": 1, "results": [{ "id": 9, "title": "Amazon" }] }
        }))),
    });

    // Pick the result: the edit stages and the preview starts fetching.
    app.on_key(key(KeyCode::Enter), now);
    assert!(!app.picker().is_visible());
    assert_eq!(app.document().save_payload()["ext_id"], json!(9));

    let commands = app.take_commands();
    let preview_generation = commands
        .iter()
        .find_map(|command| match command {
            ApiCommand::Filter {
                slot: Slot::Preview { field },
                generation,
                ..
            } if field == "ext_id" => Some(*generation),
            _ => None,
        })
        .expect("preview fetch queued");
    app.handle_api(ApiEvent::FilterDone {
        slot: Slot::Preview {
            field: "ext_id".to_string(),
        },
        generation: preview_generation,
        result: Ok(serde_json::from_value(json!({
            "items": [{ "id": 9, "title": "Amazon" }],
            "total": 1
        }))
        .expect("valid filter response")),
    });
    assert!(app
        .preview("ext_id")
        .is_some_and(|preview| preview.card.is_some()));

    // Reopen the picker and clear the reference.
    app.on_key(key(KeyCode::Enter), now);
    assert!(app.picker().is_visible());
    app.on_key(key(KeyCode::Delete), now);

    assert!(!app.picker().is_visible());
    assert_eq!(app.document().save_payload()["ext_id"], json!(null));
    let preview = app.preview("ext_id").expect("preview provider exists");
    assert!(preview.card.is_none(), "cleared reference resets the preview");
    assert!(!preview.loading);
    assert!(app.take_commands().is_empty(), "clearing does not fetch");
}
